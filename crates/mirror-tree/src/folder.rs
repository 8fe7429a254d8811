//! Folder records.

use serde::{Deserialize, Serialize};

use crate::id::FolderId;

/// A storage folder mirrored from a page.
///
/// `name` is the machine path component and tracks the owning page's
/// URL segment; `title` is display text and free to track the page
/// title instead. Nesting is expressed only through `parent_id`; paths
/// are materialized by the folder store, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: FolderId,
    pub name: String,
    pub title: String,
    pub parent_id: Option<FolderId>,
}

impl FolderRecord {
    /// New folder whose title starts out equal to its name.
    pub fn new(id: FolderId, name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        let name = name.into();
        Self {
            id,
            title: name.clone(),
            name,
            parent_id,
        }
    }

    /// Whether the folder sits directly under the assets root.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
