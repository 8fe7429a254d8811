//! [`TestSite`]: a miniature CMS host around the synchronizer.

use mirror_core::{
    FolderStore, MemoryFolderStore, MemoryPageStore, PageStore, Result, SyncConfig, SyncEngine,
    SyncOutcome,
};
use mirror_tree::{FolderRecord, LocaleTag, PageId, PageRecord, TypeRegistry};

/// A page tree with live folder mirroring and assertion helpers.
///
/// # Example
///
/// ```
/// use mirror_test_utils::TestSite;
///
/// let mut site = TestSite::new();
/// let mut page = site.draft("Create Page Test");
/// let id = site.persist(&mut page).unwrap();
/// site.assert_folder_name(id, "create-page-test");
/// ```
pub struct TestSite {
    pub engine: SyncEngine,
    pub pages: MemoryPageStore,
    pub folders: MemoryFolderStore,
}

impl Default for TestSite {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSite {
    /// Site with default config and the builtin page types.
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self::with_engine(SyncEngine::new(config, TypeRegistry::with_builtins()))
    }

    pub fn with_engine(engine: SyncEngine) -> Self {
        Self {
            engine,
            pages: MemoryPageStore::new(),
            folders: MemoryFolderStore::new(),
        }
    }

    /// Draft a standard `Page` with a title.
    pub fn draft(&self, title: &str) -> PageRecord {
        self.draft_typed("Page", title)
    }

    /// Draft a page of a specific type.
    pub fn draft_typed(&self, page_type: &str, title: &str) -> PageRecord {
        let mut page = PageRecord::draft(page_type);
        page.set_title(title);
        page
    }

    /// Draft a child page under an existing one.
    pub fn draft_child(&self, title: &str, parent: PageId) -> PageRecord {
        let mut page = self.draft(title);
        page.set_parent(Some(parent));
        page
    }

    /// Draft a localized page.
    pub fn draft_localized(&self, title: &str, locale: &str) -> PageRecord {
        let mut page = self.draft(title);
        page.set_locale(Some(LocaleTag::new(locale)));
        page
    }

    /// The full host write pipeline: before hook, store persist, after
    /// hook.
    pub fn persist(&mut self, page: &mut PageRecord) -> Result<PageId> {
        self.engine
            .before_persist(page, &mut self.pages, &mut self.folders)?;
        let id = self.pages.persist(page);
        self.engine
            .after_persist(page, &mut self.pages, &mut self.folders)?;
        Ok(id)
    }

    /// A host that only wires the after hook; folder work happens
    /// post-persist through the narrow field write.
    pub fn persist_after_only(&mut self, page: &mut PageRecord) -> Result<PageId> {
        let id = self.pages.persist(page);
        self.engine
            .after_persist(page, &mut self.pages, &mut self.folders)?;
        Ok(id)
    }

    /// Persist without any hooks wired, leaving drift behind.
    pub fn persist_unmirrored(&mut self, page: &mut PageRecord) -> PageId {
        self.pages.persist(page)
    }

    /// The duplicate pipeline: duplicate hook, then a full persist of
    /// the clone.
    pub fn duplicate(&mut self, original: PageId) -> Result<PageId> {
        let mut clone = self.reload(original).duplicate();
        self.engine.before_duplicate(&mut clone);
        self.persist(&mut clone)
    }

    /// Run a repair pass over the whole tree.
    pub fn repair(&mut self) -> Result<SyncOutcome> {
        self.engine.repair(&mut self.pages, &mut self.folders)
    }

    /// Fetch the stored record for a page.
    pub fn reload(&self, id: PageId) -> PageRecord {
        self.pages.get(id).expect("page should exist")
    }

    /// The stored folder bound to a page.
    pub fn folder_of(&self, id: PageId) -> FolderRecord {
        let folder_id = self
            .reload(id)
            .folder_ref()
            .expect("page should be bound to a folder");
        self.folders.get(folder_id).expect("folder should exist")
    }

    /// Materialized folder path of a page's folder.
    pub fn folder_path(&self, id: PageId) -> String {
        self.folders
            .path_of(self.folder_of(id).id)
            .expect("folder path should materialize")
            .to_string()
    }

    /// Assert the page's folder carries the expected name.
    pub fn assert_folder_name(&self, id: PageId, expected: &str) {
        let folder = self.folder_of(id);
        assert_eq!(
            folder.name, expected,
            "folder for page {id} should be named {expected:?}, found {:?}",
            folder.name
        );
    }

    /// Assert the page's folder hangs under the folder of `parent`;
    /// `None` asserts it sits directly under the configured root
    /// container instead.
    pub fn assert_folder_under(&self, id: PageId, parent: Option<PageId>) {
        match parent {
            Some(parent) => {
                let folder = self.folder_of(id);
                let expected = self.folder_of(parent).id;
                assert_eq!(
                    folder.parent_id,
                    Some(expected),
                    "folder for page {id} should hang under the folder of page {parent}"
                );
            }
            None => {
                let page = self.reload(id);
                let root = self
                    .engine
                    .config()
                    .folder_root_for(page.page_type())
                    .expect("configured root should resolve");
                let path = self
                    .folders
                    .path_of(self.folder_of(id).id)
                    .expect("folder path should materialize");
                assert_eq!(
                    path.parent(),
                    Some(root),
                    "folder for page {id} should sit directly under the root container"
                );
            }
        }
    }

    /// Assert the page has no folder bound.
    pub fn assert_no_folder(&self, id: PageId) {
        let page = self.reload(id);
        assert_eq!(
            page.folder_ref(),
            None,
            "page {id} should not be bound to a folder"
        );
    }
}
