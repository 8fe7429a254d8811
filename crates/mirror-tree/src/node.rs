//! Page records and field-level change tracking.
//!
//! A [`PageRecord`] carries its own change set the way CMS ORMs do:
//! typed setters mark a field changed only when the value actually
//! differs, and the page store flushes the set when the record is
//! persisted. `is_changed` therefore answers "does this field differ
//! from the last persisted value", which is exactly the signal the
//! synchronizer keys its rename and re-parent transitions on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::id::{FolderId, PageId};
use crate::registry::TypeName;

/// Language/region tag attached to a translated page, e.g. `en_US`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTag(String);

impl LocaleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LocaleTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Fields of a page record that participate in change tracking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PageField {
    Title,
    Segment,
    Parent,
    Locale,
    FolderRef,
}

impl PageField {
    const ALL: [PageField; 5] = [
        PageField::Title,
        PageField::Segment,
        PageField::Parent,
        PageField::Locale,
        PageField::FolderRef,
    ];
}

impl fmt::Display for PageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageField::Title => "title",
            PageField::Segment => "segment",
            PageField::Parent => "parent",
            PageField::Locale => "locale",
            PageField::FolderRef => "folder-ref",
        };
        write!(f, "{name}")
    }
}

/// A content page as the synchronizer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    id: Option<PageId>,
    page_type: TypeName,
    title: String,
    segment: String,
    parent_id: Option<PageId>,
    locale: Option<LocaleTag>,
    folder_ref: Option<FolderId>,
    #[serde(default)]
    changed: BTreeSet<PageField>,
}

impl PageRecord {
    /// An unpersisted draft of the given type. Everything else starts
    /// empty; use the setters to fill the record in.
    pub fn draft(page_type: impl Into<TypeName>) -> Self {
        Self {
            id: None,
            page_type: page_type.into(),
            title: String::new(),
            segment: String::new(),
            parent_id: None,
            locale: None,
            folder_ref: None,
            changed: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> Option<PageId> {
        self.id
    }

    pub fn page_type(&self) -> &TypeName {
        &self.page_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn parent_id(&self) -> Option<PageId> {
        self.parent_id
    }

    pub fn locale(&self) -> Option<&LocaleTag> {
        self.locale.as_ref()
    }

    pub fn folder_ref(&self) -> Option<FolderId> {
        self.folder_ref
    }

    /// Whether the record has never been persisted.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Whether `field` differs from the last persisted value.
    pub fn is_changed(&self, field: PageField) -> bool {
        self.changed.contains(&field)
    }

    /// Fields changed since the last persist, in declaration order.
    pub fn changed_fields(&self) -> impl Iterator<Item = PageField> + '_ {
        self.changed.iter().copied()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if self.title != title {
            self.title = title;
            self.changed.insert(PageField::Title);
        }
    }

    pub fn set_segment(&mut self, segment: impl Into<String>) {
        let segment = segment.into();
        if self.segment != segment {
            self.segment = segment;
            self.changed.insert(PageField::Segment);
        }
    }

    pub fn set_parent(&mut self, parent: Option<PageId>) {
        if self.parent_id != parent {
            self.parent_id = parent;
            self.changed.insert(PageField::Parent);
        }
    }

    pub fn set_locale(&mut self, locale: Option<LocaleTag>) {
        if self.locale != locale {
            self.locale = locale;
            self.changed.insert(PageField::Locale);
        }
    }

    pub fn set_folder_ref(&mut self, folder: Option<FolderId>) {
        if self.folder_ref != folder {
            self.folder_ref = folder;
            self.changed.insert(PageField::FolderRef);
        }
    }

    /// Assign the store identity on first persist. Later calls with a
    /// different id are ignored; identities never change.
    pub fn assign_id(&mut self, id: PageId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    /// Flush the whole change set. Stores call this at the end of a
    /// persist, between the before and after lifecycle hooks.
    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }

    /// Flush a single field, after it was written through a narrow
    /// store-side field write.
    pub fn clear_change(&mut self, field: PageField) {
        self.changed.remove(&field);
    }

    /// Clone for duplication: identity dropped and every field marked
    /// changed so the clone persists as a full new record. The folder
    /// reference is intentionally kept; clearing it is the duplicate
    /// lifecycle hook's job.
    pub fn duplicate(&self) -> Self {
        let mut clone = self.clone();
        clone.id = None;
        clone.changed = BTreeSet::from(PageField::ALL);
        clone
    }
}
