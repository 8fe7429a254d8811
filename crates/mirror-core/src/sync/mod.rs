//! Folder synchronization.
//!
//! [`SyncEngine`] reacts to page lifecycle events and issues the
//! minimal set of folder writes; [`SyncOutcome`] reports what a pass
//! did; the audit half verifies and repairs the mirroring invariants
//! across a whole tree.

mod audit;
mod engine;
mod segment;

pub use audit::{AuditReport, AuditStatus, Violation, ViolationKind};
pub use engine::SyncEngine;

use serde::{Deserialize, Serialize};
use std::fmt;

use mirror_tree::{FolderId, FolderPath, PageId};

use crate::policy::SkipReason;

/// One observable step a synchronization pass took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "action")]
pub enum SyncAction {
    /// A segment was generated or suffixed for uniqueness.
    SegmentAssigned { segment: String },
    /// A folder was created at `path` for the page.
    CreatedFolder { folder: FolderId, path: FolderPath },
    /// The page's folder reference was stored. `page` is `None` when
    /// the page itself had not been persisted yet.
    BoundFolder {
        page: Option<PageId>,
        folder: FolderId,
    },
    /// The bound folder was renamed to follow the segment.
    RenamedFolder { folder: FolderId, name: String },
    /// The bound folder moved under a new parent folder.
    ReparentedFolder {
        folder: FolderId,
        new_parent: FolderId,
    },
    /// A duplicated page's inherited folder binding was cleared.
    ClearedBinding,
    /// Policy excluded the page; nothing was done.
    Skipped { reason: SkipReason },
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::SegmentAssigned { segment } => {
                write!(f, "assigned segment {segment:?}")
            }
            SyncAction::CreatedFolder { folder, path } => {
                write!(f, "created folder {folder} at {path}")
            }
            SyncAction::BoundFolder { folder, .. } => {
                write!(f, "bound folder {folder}")
            }
            SyncAction::RenamedFolder { folder, name } => {
                write!(f, "renamed folder {folder} to {name:?}")
            }
            SyncAction::ReparentedFolder { folder, new_parent } => {
                write!(f, "re-parented folder {folder} under {new_parent}")
            }
            SyncAction::ClearedBinding => write!(f, "cleared inherited folder binding"),
            SyncAction::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// What one synchronization pass did, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub actions: Vec<SyncAction>,
}

impl SyncOutcome {
    /// Folder mutations among the actions. Chain creation counts once
    /// per [`SyncAction::CreatedFolder`]; store-level write totals are
    /// the folder store's business.
    pub fn folder_writes(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| {
                matches!(
                    action,
                    SyncAction::CreatedFolder { .. }
                        | SyncAction::RenamedFolder { .. }
                        | SyncAction::ReparentedFolder { .. }
                )
            })
            .count()
    }

    /// The folder this pass bound, when it bound one.
    pub fn bound_folder(&self) -> Option<FolderId> {
        self.actions.iter().find_map(|action| match action {
            SyncAction::BoundFolder { folder, .. } => Some(*folder),
            _ => None,
        })
    }

    /// The skip reason, when the pass was a policy skip.
    pub fn skipped(&self) -> Option<&SkipReason> {
        self.actions.iter().find_map(|action| match action {
            SyncAction::Skipped { reason } => Some(reason),
            _ => None,
        })
    }

    /// Whether the pass took no action at all.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
