//! # mirror-core - Folder Synchronization
//!
//! Keeps an asset-folder hierarchy in lockstep with a content-page
//! hierarchy: every page that passes the exclusion policy owns exactly
//! one folder, folder names follow page URL segments, and folder
//! nesting follows page nesting.
//!
//! ## Architecture
//!
//! ```text
//! host write pipeline
//!   before-persist ──▶ SyncPolicy ──▶ SyncEngine ──▶ PageStore
//!   after-persist  ──▶    │              │           FolderStore
//!   before-duplicate      │              │
//!                    SyncConfig     SyncOutcome
//! ```
//!
//! The engine is stateless between calls; the host hands it the page
//! record and store handles at each lifecycle hook. Folder bindings are
//! written back through a narrow, hook-free field write so a sync pass
//! can never re-enter itself.

pub mod config;
pub mod error;
pub mod hooks;
pub mod policy;
pub mod store;
pub mod sync;

pub use config::{SyncConfig, SyncManifest, TypeOverride};
pub use error::{Error, Result};
pub use hooks::PageEvent;
pub use policy::{PolicyDecision, SkipReason, SyncPolicy};
pub use store::{FieldWrite, FolderStore, MemoryFolderStore, MemoryPageStore, PageStore};
pub use sync::{
    AuditReport, AuditStatus, SyncAction, SyncEngine, SyncOutcome, Violation, ViolationKind,
};
