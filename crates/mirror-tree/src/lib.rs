//! # mirror-tree - Page-Tree Vocabulary
//!
//! Foundation types shared by every crate in the folder-mirror
//! workspace. This layer knows nothing about synchronization or
//! storage; it defines the vocabulary the higher layers speak:
//!
//! - [`PageId`] / [`FolderId`]: store-assigned identities
//! - [`PageRecord`]: a content page with field-level change tracking
//! - [`FolderRecord`]: a storage folder owned by a page
//! - [`FolderPath`]: normalized, assets-relative folder paths
//! - [`TypeRegistry`]: page-type names with supertype links
//! - [`SegmentFilter`]: title-to-URL-segment filtering

pub mod error;
pub mod folder;
pub mod id;
pub mod node;
pub mod path;
pub mod registry;
pub mod segment;

pub use error::{Error, Result};
pub use folder::FolderRecord;
pub use id::{FolderId, PageId};
pub use node::{LocaleTag, PageField, PageRecord};
pub use path::FolderPath;
pub use registry::{TypeName, TypeRegistry};
pub use segment::SegmentFilter;
