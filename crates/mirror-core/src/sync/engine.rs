//! The folder synchronizer.
//!
//! One engine instance serves a whole site. It holds resolved config
//! and the policy filter, nothing else; page and folder stores are
//! handed in at every call, so the host keeps ownership of its own
//! persistence layer.
//!
//! The state machine is deliberately small. A page that passes policy
//! is either unbound (no folder reference), in which case its folder
//! is created and bound, or bound, in which case the folder follows
//! segment renames and parent moves. Everything else is a no-op, which
//! is what makes repeated passes idempotent.

use mirror_tree::{FolderId, FolderPath, PageField, PageRecord, TypeRegistry};
use tracing::{debug, warn};

use super::{SyncAction, SyncOutcome, segment};
use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::hooks::PageEvent;
use crate::policy::{PolicyDecision, SyncPolicy};
use crate::store::{FieldWrite, FolderStore, PageStore};

/// The folder synchronizer. Cheap to clone; holds no store handles.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    config: SyncConfig,
    policy: SyncPolicy,
}

impl SyncEngine {
    /// Engine for a site with the given resolved config and page-type
    /// registry.
    pub fn new(config: SyncConfig, registry: TypeRegistry) -> Self {
        let policy = SyncPolicy::new(&config, registry);
        Self { config, policy }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Single wiring point for hosts: dispatch a lifecycle event.
    pub fn handle(
        &self,
        event: PageEvent,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<SyncOutcome> {
        match event {
            PageEvent::BeforePersist => self.before_persist(page, pages, folders),
            PageEvent::AfterPersist => self.after_persist(page, pages, folders),
            PageEvent::BeforeDuplicate => Ok(self.before_duplicate(page)),
        }
    }

    /// Hook: the page's fields are about to be persisted. Change flags
    /// still reflect the host's edits.
    pub fn before_persist(
        &self,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<SyncOutcome> {
        self.run(PageEvent::BeforePersist, page, pages, folders)
    }

    /// Hook: the page's fields were just persisted and its change set
    /// flushed. Catches hosts that only wire the after side, and pages
    /// bound late; an already-synchronized page passes through with no
    /// writes.
    pub fn after_persist(
        &self,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<SyncOutcome> {
        self.run(PageEvent::AfterPersist, page, pages, folders)
    }

    /// Hook: a duplicated page is about to be persisted for the first
    /// time. Drops the folder binding inherited from the original so
    /// the clone gets a folder of its own; an already-persisted record
    /// is not a fresh clone and passes through untouched.
    pub fn before_duplicate(&self, clone: &mut PageRecord) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        if clone.is_new() && clone.folder_ref().is_some() {
            clone.set_folder_ref(None);
            debug!("Cleared folder binding inherited by duplicate");
            outcome.actions.push(SyncAction::ClearedBinding);
        }
        outcome
    }

    fn run(
        &self,
        event: PageEvent,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<SyncOutcome> {
        match self.policy.evaluate(page) {
            PolicyDecision::Skip(reason) => {
                debug!(%event, %reason, "Skipping folder sync");
                Ok(SyncOutcome {
                    actions: vec![SyncAction::Skipped { reason }],
                })
            }
            PolicyDecision::Sync => self.sync(page, pages, folders),
        }
    }

    /// One synchronization pass over a page that already passed the
    /// policy filter.
    pub fn sync(
        &self,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();
        match page.folder_ref() {
            None => self.bind(page, pages, folders, &mut outcome)?,
            Some(folder_id) => self.update(page, folder_id, pages, folders, &mut outcome)?,
        }
        Ok(outcome)
    }

    /// Unbound to bound: create (or adopt) the folder and store the
    /// binding.
    pub(super) fn bind(
        &self,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        // the folder name must be final before the first folder write
        let assigned = match segment::resolve(page, pages) {
            Ok(assigned) => assigned,
            // a draft with no identity and no usable title cannot name
            // its folder yet; the after-persist pass has the id for
            // the page-{id} fallback
            Err(Error::SegmentUnresolvable { .. }) if page.is_new() => {
                debug!("Deferring folder binding until the page has an identity");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        if assigned {
            outcome.actions.push(SyncAction::SegmentAssigned {
                segment: page.segment().to_string(),
            });
        }

        let parent_path = self.target_parent_path(page, pages, folders)?;
        let path = parent_path.join(page.segment());
        let folder_id = folders.find_or_create(&path)?;

        let mut folder = folders.get(folder_id)?;
        folder.name = page.segment().to_string();
        folder.title = if page.title().is_empty() {
            folder.name.clone()
        } else {
            page.title().to_string()
        };
        folders.write(&folder)?;
        debug!(folder = %folder_id, %path, "Created folder for page");
        outcome.actions.push(SyncAction::CreatedFolder {
            folder: folder_id,
            path,
        });

        page.set_folder_ref(Some(folder_id));
        if let Some(id) = page.id() {
            // persisted page: store the binding through the narrow,
            // hook-free field write so this pass cannot re-enter itself
            pages.write_field(id, FieldWrite::FolderRef(Some(folder_id)))?;
            page.clear_change(PageField::FolderRef);
            if assigned {
                pages.write_field(id, FieldWrite::Segment(page.segment().to_string()))?;
                page.clear_change(PageField::Segment);
            }
        }
        outcome.actions.push(SyncAction::BoundFolder {
            page: page.id(),
            folder: folder_id,
        });
        Ok(())
    }

    /// Bound: the folder follows segment renames and parent moves.
    fn update(
        &self,
        page: &mut PageRecord,
        folder_id: FolderId,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        if page.is_changed(PageField::Segment) && !page.segment().is_empty() {
            let mut folder = folders.get(folder_id)?;
            if folder.name != page.segment() {
                folder.name = page.segment().to_string();
                folders.write(&folder)?;
                debug!(folder = %folder_id, name = %folder.name, "Renamed folder to follow segment");
                outcome.actions.push(SyncAction::RenamedFolder {
                    folder: folder_id,
                    name: folder.name.clone(),
                });
            }
        }

        if page.is_changed(PageField::Parent) && page.parent_id().is_some() {
            let new_parent = self.resolve_parent_folder(page, pages, folders)?;
            let current = folders.parent_of(folder_id)?;
            // a folder must never become its own parent
            if current != Some(new_parent) && new_parent != folder_id {
                let mut folder = folders.get(folder_id)?;
                folder.parent_id = Some(new_parent);
                folders.write(&folder)?;
                debug!(folder = %folder_id, new_parent = %new_parent, "Re-parented folder");
                outcome.actions.push(SyncAction::ReparentedFolder {
                    folder: folder_id,
                    new_parent,
                });
            }
        }
        Ok(())
    }

    /// Path the page's folder should be created under: the parent
    /// page's materialized folder when the parent participates and is
    /// bound, otherwise the configured root container.
    pub(super) fn target_parent_path(
        &self,
        page: &PageRecord,
        pages: &dyn PageStore,
        folders: &dyn FolderStore,
    ) -> Result<FolderPath> {
        if let Some(parent) = pages.parent_of(page)?
            && self.policy.should_sync(&parent)
            && let Some(parent_folder) = parent.folder_ref()
        {
            let path = folders.path_of(parent_folder)?;
            if !path.is_root() {
                return Ok(path);
            }
            warn!(
                parent_folder = %parent_folder,
                "Parent folder path is degenerate, using the configured root"
            );
        }
        self.config.folder_root_for(page.page_type())
    }

    /// Folder id a bound page's folder should hang under. Excluded or
    /// folder-less parents resolve to the configured root container,
    /// creating it on demand.
    pub(super) fn resolve_parent_folder(
        &self,
        page: &PageRecord,
        pages: &dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<FolderId> {
        if let Some(parent) = pages.parent_of(page)?
            && self.policy.should_sync(&parent)
            && let Some(parent_folder) = parent.folder_ref()
        {
            return Ok(parent_folder);
        }
        let root = self.config.folder_root_for(page.page_type())?;
        folders.find_or_create(&root)
    }

    /// Materialized path of the page's bound folder, for host upload
    /// surfaces. Unbound pages report the configured root container.
    pub fn folder_path_of(
        &self,
        page: &PageRecord,
        folders: &dyn FolderStore,
    ) -> Result<FolderPath> {
        match page.folder_ref() {
            Some(folder_id) => folders.path_of(folder_id),
            None => self.config.folder_root_for(page.page_type()),
        }
    }
}
