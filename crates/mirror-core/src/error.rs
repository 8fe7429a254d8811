//! Error types for mirror-core

use std::path::PathBuf;

use mirror_tree::{FolderId, PageId, TypeName};

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during folder synchronization
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The uniqueness loop ran out of attempts; the page store keeps
    /// reporting sibling conflicts
    #[error("Segment {stem:?} could not be made unique after {attempts} attempts")]
    SegmentExhausted { stem: String, attempts: usize },

    /// A brand-new page carries neither a segment nor a title to
    /// derive one from
    #[error("A new {page_type} page has no segment and no title to derive one from")]
    SegmentUnresolvable { page_type: TypeName },

    /// Every configured root for this page type collapses to the bare
    /// assets root
    #[error("Folder root for page type {page_type} resolves to the degenerate root {root:?}")]
    InvalidRoot { page_type: TypeName, root: String },

    /// Page id not present in the page store
    #[error("Page {id} not found")]
    PageNotFound { id: PageId },

    /// Folder id not present in the folder store
    #[error("Folder {id} not found")]
    FolderNotFound { id: FolderId },

    /// A folder was requested for the empty path, which denotes the
    /// assets root itself
    #[error("Cannot create a folder at the assets root itself")]
    EmptyFolderPath,

    /// The folder store cannot serve reads or writes right now
    #[error("Folder store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Config file could not be read
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tree(#[from] mirror_tree::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
