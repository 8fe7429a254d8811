//! In-memory reference stores.
//!
//! Deterministic implementations of the store seams, used by the test
//! suites and by embedders that have no CMS behind them yet. Ids are
//! assigned sequentially starting at 1; folder paths are materialized
//! by walking parent links, never cached.

use std::collections::BTreeMap;

use mirror_tree::{
    FolderId, FolderPath, FolderRecord, PageField, PageId, PageRecord, SegmentFilter,
};

use super::{FieldWrite, FolderStore, PageStore};
use crate::error::{Error, Result};

/// Parent-chain walks longer than this are treated as corrupt.
const MAX_FOLDER_DEPTH: usize = 64;

/// Page store backed by a `BTreeMap`.
#[derive(Debug)]
pub struct MemoryPageStore {
    pages: BTreeMap<PageId, PageRecord>,
    next_id: u64,
    filter: SegmentFilter,
}

impl Default for MemoryPageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self {
            pages: BTreeMap::new(),
            next_id: 1,
            filter: SegmentFilter::new(),
        }
    }

    /// Store `page` the way a host CMS completes a write: assign an id
    /// on first persist and flush the record's change set.
    ///
    /// Lifecycle hooks are the caller's business; test hosts wire the
    /// engine around this call.
    pub fn persist(&mut self, page: &mut PageRecord) -> PageId {
        let id = match page.id() {
            Some(id) => id,
            None => {
                let id = PageId::new(self.next_id);
                self.next_id += 1;
                page.assign_id(id);
                id
            }
        };
        page.clear_changes();
        self.pages.insert(id, page.clone());
        id
    }

    /// Remove a page. Folders are left behind on purpose; deletion
    /// cleanup is host policy, not synchronization.
    pub fn remove(&mut self, id: PageId) -> Option<PageRecord> {
        self.pages.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageStore for MemoryPageStore {
    fn get(&self, id: PageId) -> Result<PageRecord> {
        self.pages
            .get(&id)
            .cloned()
            .ok_or(Error::PageNotFound { id })
    }

    fn parent_of(&self, page: &PageRecord) -> Result<Option<PageRecord>> {
        Ok(page
            .parent_id()
            .and_then(|parent_id| self.pages.get(&parent_id).cloned()))
    }

    fn children_of(&self, parent: Option<PageId>) -> Result<Vec<PageRecord>> {
        Ok(self
            .pages
            .values()
            .filter(|page| page.parent_id() == parent)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<PageRecord>> {
        Ok(self.pages.values().cloned().collect())
    }

    fn write_field(&mut self, id: PageId, write: FieldWrite) -> Result<()> {
        let page = self.pages.get_mut(&id).ok_or(Error::PageNotFound { id })?;
        match write {
            FieldWrite::Segment(segment) => {
                page.set_segment(segment);
                page.clear_change(PageField::Segment);
            }
            FieldWrite::FolderRef(folder) => {
                page.set_folder_ref(folder);
                page.clear_change(PageField::FolderRef);
            }
        }
        Ok(())
    }

    fn generate_segment(&self, _page: &PageRecord, from_title: &str) -> String {
        self.filter.filter(from_title)
    }

    fn segment_is_unique(&self, page: &PageRecord) -> bool {
        self.pages
            .values()
            .filter(|other| other.parent_id() == page.parent_id() && other.id() != page.id())
            .all(|other| other.segment() != page.segment())
    }
}

/// Folder store backed by a `BTreeMap`, with chain-creating path
/// lookup and a write counter the tests use to assert exact write
/// budgets.
#[derive(Debug)]
pub struct MemoryFolderStore {
    folders: BTreeMap<FolderId, FolderRecord>,
    next_id: u64,
    writes: usize,
}

impl Default for MemoryFolderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFolderStore {
    pub fn new() -> Self {
        Self {
            folders: BTreeMap::new(),
            next_id: 1,
            writes: 0,
        }
    }

    /// Folder mutations (creations included) since construction.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Direct child of `parent` by name.
    pub fn child_by_name(&self, parent: Option<FolderId>, name: &str) -> Option<&FolderRecord> {
        self.folders
            .values()
            .find(|folder| folder.parent_id == parent && folder.name == name)
    }

    /// Folder at a full materialized path, if present.
    pub fn by_path(&self, path: &FolderPath) -> Option<&FolderRecord> {
        let mut parent: Option<FolderId> = None;
        let mut found: Option<&FolderRecord> = None;
        for component in path.components() {
            let folder = self.child_by_name(parent, component)?;
            parent = Some(folder.id);
            found = Some(folder);
        }
        found
    }

    /// All folders in id order.
    pub fn all(&self) -> Vec<FolderRecord> {
        self.folders.values().cloned().collect()
    }
}

impl FolderStore for MemoryFolderStore {
    fn find_or_create(&mut self, path: &FolderPath) -> Result<FolderId> {
        let mut parent: Option<FolderId> = None;
        let mut current: Option<FolderId> = None;
        for component in path.components() {
            let existing = self.child_by_name(parent, component).map(|f| f.id);
            let id = match existing {
                Some(id) => id,
                None => {
                    let id = FolderId::new(self.next_id);
                    self.next_id += 1;
                    self.folders
                        .insert(id, FolderRecord::new(id, component, parent));
                    self.writes += 1;
                    id
                }
            };
            parent = Some(id);
            current = Some(id);
        }
        current.ok_or(Error::EmptyFolderPath)
    }

    fn find(&self, path: &FolderPath) -> Result<Option<FolderRecord>> {
        Ok(self.by_path(path).cloned())
    }

    fn get(&self, id: FolderId) -> Result<FolderRecord> {
        self.folders
            .get(&id)
            .cloned()
            .ok_or(Error::FolderNotFound { id })
    }

    fn write(&mut self, folder: &FolderRecord) -> Result<()> {
        if !self.folders.contains_key(&folder.id) {
            return Err(Error::FolderNotFound { id: folder.id });
        }
        self.folders.insert(folder.id, folder.clone());
        self.writes += 1;
        Ok(())
    }

    fn parent_of(&self, id: FolderId) -> Result<Option<FolderId>> {
        self.folders
            .get(&id)
            .map(|folder| folder.parent_id)
            .ok_or(Error::FolderNotFound { id })
    }

    fn path_of(&self, id: FolderId) -> Result<FolderPath> {
        let mut components = Vec::new();
        let mut current = Some(id);
        while let Some(folder_id) = current {
            let folder = self
                .folders
                .get(&folder_id)
                .ok_or(Error::FolderNotFound { id: folder_id })?;
            components.push(folder.name.clone());
            current = folder.parent_id;
            if components.len() > MAX_FOLDER_DEPTH {
                return Err(Error::StoreUnavailable {
                    message: format!("folder {id} parent chain exceeds depth {MAX_FOLDER_DEPTH}"),
                });
            }
        }
        components.reverse();
        Ok(components
            .iter()
            .fold(FolderPath::root(), |path, component| path.join(component)))
    }
}
