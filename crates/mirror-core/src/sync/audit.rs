//! Invariant audit and bulk repair.
//!
//! The per-write engine keeps a live site consistent, but trees
//! arrive drifted: imports, direct database edits, or years of
//! history from before mirroring was enabled. [`SyncEngine::audit`]
//! verifies the mirroring invariants read-only across the whole tree;
//! [`SyncEngine::repair`] walks parents-first and restores them
//! through the same primitives the per-write path uses.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use mirror_tree::segment::{strip_numeric_suffix, with_numeric_suffix};
use mirror_tree::{FolderId, FolderPath, PageField, PageId, PageRecord};
use tracing::{debug, info};

use super::engine::SyncEngine;
use super::segment::MAX_SEGMENT_ATTEMPTS;
use super::{SyncAction, SyncOutcome};
use crate::error::{Error, Result};
use crate::store::{FieldWrite, FolderStore, PageStore};

/// Overall verdict of an audit pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditStatus {
    Healthy,
    Drifted,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Healthy => write!(f, "healthy"),
            AuditStatus::Drifted => write!(f, "drifted"),
        }
    }
}

/// The specific invariant a page violates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ViolationKind {
    /// The page has no folder bound at all.
    MissingFolder,
    /// The bound folder's name does not match the page segment.
    NameMismatch { expected: String, actual: String },
    /// The bound folder hangs under the wrong parent folder.
    ParentMismatch {
        expected: FolderId,
        actual: Option<FolderId>,
    },
    /// The page has no eligible parent and its folder is not directly
    /// under the configured root container.
    NotUnderRoot {
        root: FolderPath,
        actual: FolderPath,
    },
    /// Another page is bound to the same folder.
    SharedFolder { other_page: PageId },
    /// The bound folder id is unknown to the folder store.
    DanglingFolder { folder: FolderId },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingFolder => write!(f, "no folder bound"),
            ViolationKind::NameMismatch { expected, actual } => {
                write!(f, "folder named {actual:?}, expected {expected:?}")
            }
            ViolationKind::ParentMismatch { expected, actual } => match actual {
                Some(actual) => write!(f, "folder under {actual}, expected {expected}"),
                None => write!(f, "folder at assets root, expected under {expected}"),
            },
            ViolationKind::NotUnderRoot { root, actual } => {
                write!(f, "folder at {actual}, expected directly under {root}")
            }
            ViolationKind::SharedFolder { other_page } => {
                write!(f, "folder shared with page {other_page}")
            }
            ViolationKind::DanglingFolder { folder } => {
                write!(f, "bound folder {folder} does not exist")
            }
        }
    }
}

/// A page whose folder state violates an invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub page: PageId,
    pub segment: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} ({}): {}", self.page, self.segment, self.kind)
    }
}

/// Result of a read-only invariant audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub status: AuditStatus,
    pub violations: Vec<Violation>,
    pub generated_at: DateTime<Utc>,
}

impl AuditReport {
    fn new(violations: Vec<Violation>) -> Self {
        let status = if violations.is_empty() {
            AuditStatus::Healthy
        } else {
            AuditStatus::Drifted
        };
        Self {
            status,
            violations,
            generated_at: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AuditStatus::Healthy
    }

    /// Violations recorded for one page.
    pub fn violations_for(&self, page: PageId) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.page == page).collect()
    }
}

/// Seeds for a whole-tree walk: the tree roots plus every persisted
/// page whose parent reference no longer resolves. The per-write path
/// treats a dangling parent as a root, so the walks must reach those
/// pages the same way.
fn effective_roots(pages: &dyn PageStore) -> Result<VecDeque<PageRecord>> {
    let mut seeds: VecDeque<PageRecord> = pages.children_of(None)?.into();
    for page in pages.all()? {
        if page.parent_id().is_some() && pages.parent_of(&page)?.is_none() {
            seeds.push_back(page);
        }
    }
    Ok(seeds)
}

/// Whether the folder at `path` exists and is claimed by a page other
/// than `page_id` in the current walk.
fn slot_claimed(
    path: &FolderPath,
    page_id: PageId,
    folders: &dyn FolderStore,
    owners: &HashMap<FolderId, PageId>,
) -> Result<bool> {
    Ok(folders
        .find(path)?
        .is_some_and(|folder| owners.get(&folder.id).is_some_and(|owner| *owner != page_id)))
}

impl SyncEngine {
    /// Verify the folder-mirroring invariants across the whole tree,
    /// without writing anything.
    ///
    /// Pages the policy excludes are not audited, but their subtrees
    /// still are.
    pub fn audit(
        &self,
        pages: &dyn PageStore,
        folders: &dyn FolderStore,
    ) -> Result<AuditReport> {
        let mut violations = Vec::new();
        let mut owners: HashMap<FolderId, PageId> = HashMap::new();
        let mut queue = effective_roots(pages)?;

        while let Some(page) = queue.pop_front() {
            if let Some(id) = page.id() {
                queue.extend(pages.children_of(Some(id))?);
            }
            if !self.policy().should_sync(&page) {
                continue;
            }
            let Some(page_id) = page.id() else {
                continue;
            };
            self.audit_page(&page, page_id, pages, folders, &mut owners, &mut violations)?;
        }

        let report = AuditReport::new(violations);
        info!(
            status = %report.status,
            violations = report.violations.len(),
            "Folder audit finished"
        );
        Ok(report)
    }

    fn audit_page(
        &self,
        page: &PageRecord,
        page_id: PageId,
        pages: &dyn PageStore,
        folders: &dyn FolderStore,
        owners: &mut HashMap<FolderId, PageId>,
        violations: &mut Vec<Violation>,
    ) -> Result<()> {
        let push = |kind: ViolationKind, violations: &mut Vec<Violation>| {
            violations.push(Violation {
                page: page_id,
                segment: page.segment().to_string(),
                kind,
            });
        };

        let Some(folder_id) = page.folder_ref() else {
            push(ViolationKind::MissingFolder, violations);
            return Ok(());
        };

        let folder = match folders.get(folder_id) {
            Ok(folder) => folder,
            Err(Error::FolderNotFound { .. }) => {
                push(ViolationKind::DanglingFolder { folder: folder_id }, violations);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if let Some(owner) = owners.insert(folder_id, page_id) {
            push(ViolationKind::SharedFolder { other_page: owner }, violations);
        }

        if !page.segment().is_empty() && folder.name != page.segment() {
            push(
                ViolationKind::NameMismatch {
                    expected: page.segment().to_string(),
                    actual: folder.name.clone(),
                },
                violations,
            );
        }

        let eligible_parent = match pages.parent_of(page)? {
            Some(parent) if self.policy().should_sync(&parent) => parent.folder_ref(),
            _ => None,
        };
        match eligible_parent {
            Some(expected) => {
                let actual = folders.parent_of(folder_id)?;
                if actual != Some(expected) {
                    push(ViolationKind::ParentMismatch { expected, actual }, violations);
                }
            }
            None => {
                let root = self.config().folder_root_for(page.page_type())?;
                let actual = folders.path_of(folder_id)?;
                if actual.parent().as_ref() != Some(&root) {
                    push(ViolationKind::NotUnderRoot { root, actual }, violations);
                }
            }
        }
        Ok(())
    }

    /// Restore the folder-mirroring invariants across the whole tree.
    ///
    /// Walks parents-first so every page sees its parent's folder
    /// already repaired. Loaded records carry no change flags, so the
    /// per-write transitions would not fire on their own; repair
    /// compares stored state directly and applies the same bind,
    /// rename, and re-parent writes the engine uses. A healthy tree
    /// comes back with an empty outcome.
    pub fn repair(
        &self,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
    ) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();
        let mut owners: HashMap<FolderId, PageId> = HashMap::new();
        let mut queue = effective_roots(pages)?;

        while let Some(mut page) = queue.pop_front() {
            if self.policy().should_sync(&page) {
                self.repair_page(&mut page, pages, folders, &mut owners, &mut outcome)?;
            }
            if let Some(id) = page.id() {
                queue.extend(pages.children_of(Some(id))?);
            }
        }

        info!(actions = outcome.actions.len(), "Folder repair finished");
        Ok(outcome)
    }

    fn repair_page(
        &self,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &mut dyn FolderStore,
        owners: &mut HashMap<FolderId, PageId>,
        outcome: &mut SyncOutcome,
    ) -> Result<()> {
        let Some(page_id) = page.id() else {
            return Ok(());
        };

        let folder_id = match page.folder_ref() {
            None => {
                self.split_segment(page, pages, folders, owners)?;
                self.bind(page, pages, folders, outcome)?;
                if let Some(folder_id) = page.folder_ref() {
                    owners.insert(folder_id, page_id);
                }
                return Ok(());
            }
            Some(folder_id) => folder_id,
        };

        let folder = match folders.get(folder_id) {
            Ok(folder) => Some(folder),
            Err(Error::FolderNotFound { .. }) => None,
            Err(err) => return Err(err),
        };

        // dangling binding or folder already claimed by an earlier
        // page: drop the binding and bind a folder of this page's own
        let claimed = owners.contains_key(&folder_id);
        let Some(folder) = folder.filter(|_| !claimed) else {
            debug!(page = %page_id, folder = %folder_id, "Rebinding page to a fresh folder");
            page.set_folder_ref(None);
            self.split_segment(page, pages, folders, owners)?;
            self.bind(page, pages, folders, outcome)?;
            if let Some(folder_id) = page.folder_ref() {
                owners.insert(folder_id, page_id);
            }
            return Ok(());
        };
        owners.insert(folder_id, page_id);

        if !page.segment().is_empty() && folder.name != page.segment() {
            let mut folder = folder.clone();
            folder.name = page.segment().to_string();
            folders.write(&folder)?;
            outcome.actions.push(SyncAction::RenamedFolder {
                folder: folder_id,
                name: folder.name.clone(),
            });
        }

        let expected = self.resolve_parent_folder(page, pages, folders)?;
        let current = folders.parent_of(folder_id)?;
        if current != Some(expected) && expected != folder_id {
            let mut folder = folders.get(folder_id)?;
            folder.parent_id = Some(expected);
            folders.write(&folder)?;
            outcome.actions.push(SyncAction::ReparentedFolder {
                folder: folder_id,
                new_parent: expected,
            });
        }
        Ok(())
    }

    /// A page about to bind must not land on a folder an earlier page
    /// in the walk already claims. Two pages can legitimately resolve
    /// to the exact same path (same segment under distinct excluded
    /// parents), and `bind` alone would adopt the claimed folder there.
    /// Suffixes the segment until its slot is free or holds an
    /// unclaimed folder, storing the new value through the narrow
    /// field write.
    fn split_segment(
        &self,
        page: &mut PageRecord,
        pages: &mut dyn PageStore,
        folders: &dyn FolderStore,
        owners: &HashMap<FolderId, PageId>,
    ) -> Result<()> {
        let Some(page_id) = page.id() else {
            return Ok(());
        };
        if page.segment().is_empty() {
            return Ok(());
        }
        let parent_path = self.target_parent_path(page, pages, folders)?;
        if !slot_claimed(&parent_path.join(page.segment()), page_id, folders, owners)? {
            return Ok(());
        }

        let stem = strip_numeric_suffix(page.segment()).to_string();
        let mut count = 2;
        loop {
            let candidate = with_numeric_suffix(&stem, count);
            if !slot_claimed(&parent_path.join(&candidate), page_id, folders, owners)? {
                page.set_segment(candidate);
                break;
            }
            count += 1;
            if count > MAX_SEGMENT_ATTEMPTS {
                return Err(Error::SegmentExhausted {
                    stem,
                    attempts: MAX_SEGMENT_ATTEMPTS,
                });
            }
        }
        pages.write_field(page_id, FieldWrite::Segment(page.segment().to_string()))?;
        page.clear_change(PageField::Segment);
        debug!(page = %page_id, segment = %page.segment(), "Suffixed segment to split a shared path");
        Ok(())
    }
}
