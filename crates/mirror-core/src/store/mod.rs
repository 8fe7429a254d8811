//! Store collaborator seams.
//!
//! The synchronizer never talks to a concrete CMS. Pages and folders
//! are reached through these traits, and the engine receives the
//! handles at every call instead of owning them. [`MemoryPageStore`]
//! and [`MemoryFolderStore`] are the deterministic reference
//! implementations the test suites run against.

mod memory;

pub use memory::{MemoryFolderStore, MemoryPageStore};

use mirror_tree::{FolderId, FolderPath, FolderRecord, PageId, PageRecord};

use crate::error::Result;

/// The two page fields the synchronizer may write back outside a full
/// persist. Keeping this enum closed is what makes the write-back path
/// provably hook-free: a `FieldWrite` can never re-enter the persist
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWrite {
    /// Persist a generated URL segment.
    Segment(String),
    /// Persist the folder binding, or clear it.
    FolderRef(Option<FolderId>),
}

/// Read/write access to the page hierarchy.
///
/// All methods are synchronous; the engine runs inside the host's own
/// write operation and the host guarantees one logical writer per
/// page at a time.
pub trait PageStore {
    /// Fetch a page by id.
    fn get(&self, id: PageId) -> Result<PageRecord>;

    /// Resolve the parent page of `page`. A dangling parent reference
    /// resolves to `None`, matching hosts that return null for missing
    /// relations.
    fn parent_of(&self, page: &PageRecord) -> Result<Option<PageRecord>>;

    /// Persisted pages directly under `parent` (`None` means the tree
    /// roots), in id order.
    fn children_of(&self, parent: Option<PageId>) -> Result<Vec<PageRecord>>;

    /// Every persisted page, in id order. Tree walks use this to reach
    /// pages whose parent reference no longer resolves.
    fn all(&self) -> Result<Vec<PageRecord>>;

    /// Write a single field of a persisted page without running any
    /// lifecycle hooks. This is the reentrancy escape hatch: the
    /// synchronizer stores its folder binding through here so a sync
    /// pass can never trigger another sync pass.
    fn write_field(&mut self, id: PageId, write: FieldWrite) -> Result<()>;

    /// Generate a fresh segment candidate from display text.
    fn generate_segment(&self, page: &PageRecord, from_title: &str) -> String;

    /// Whether `page.segment()` is unique among its siblings. A
    /// persisted page never conflicts with itself.
    fn segment_is_unique(&self, page: &PageRecord) -> bool;
}

/// Access to the folder hierarchy.
pub trait FolderStore {
    /// Find the folder at `path`, creating it and any missing
    /// ancestors when absent.
    fn find_or_create(&mut self, path: &FolderPath) -> Result<FolderId>;

    /// The folder at `path`, if one exists. Never creates.
    fn find(&self, path: &FolderPath) -> Result<Option<FolderRecord>>;

    /// Fetch a folder by id.
    fn get(&self, id: FolderId) -> Result<FolderRecord>;

    /// Persist a mutated folder record.
    fn write(&mut self, folder: &FolderRecord) -> Result<()>;

    /// The folder's parent id, if it has one.
    fn parent_of(&self, id: FolderId) -> Result<Option<FolderId>>;

    /// Materialize the folder's path from its parent chain.
    fn path_of(&self, id: FolderId) -> Result<FolderPath>;
}
