//! Manifest parsing for `mirror.toml` files.
//!
//! The manifest is the on-disk schema for synchronization settings. A
//! host parses one, or merges several layers site-wide to per-section,
//! and resolves the result into a [`SyncConfig`].
//!
//! [`SyncConfig`]: super::SyncConfig

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

fn default_folder_root() -> String {
    "Articles".to_string()
}

fn default_ignored_types() -> Vec<String> {
    vec!["VirtualPage".to_string(), "ErrorPage".to_string()]
}

/// Per-type override table, `[types.<TypeName>]` in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeOverride {
    /// Root container for pages of this exact type; the global root
    /// applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_root: Option<String>,
}

/// On-disk synchronization settings.
///
/// # Example
///
/// ```
/// use mirror_core::SyncManifest;
///
/// let manifest = SyncManifest::parse(r#"
///     folder_root = "Content"
///     ignored_types = ["VirtualPage"]
///
///     [types.NewsPage]
///     folder_root = "News"
/// "#).unwrap();
/// assert_eq!(manifest.folder_root, "Content");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncManifest {
    /// Global root container name for mirrored folders.
    #[serde(default = "default_folder_root")]
    pub folder_root: String,

    /// Mirror folders for non-default-locale translations too.
    #[serde(default)]
    pub create_folder_for_translations: bool,

    /// Default content locale. Absent means the site carries no
    /// translation layer and locale filtering is off entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,

    /// Page types (together with their subtypes) that never get
    /// folders.
    #[serde(default = "default_ignored_types")]
    pub ignored_types: Vec<String>,

    /// Per-type overrides keyed by page type name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub types: HashMap<String, TypeOverride>,
}

impl Default for SyncManifest {
    fn default() -> Self {
        Self {
            folder_root: default_folder_root(),
            create_folder_for_translations: false,
            default_locale: None,
            ignored_types: default_ignored_types(),
            types: HashMap::new(),
        }
    }
}

impl SyncManifest {
    /// Parse a manifest from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another manifest layer into this one.
    ///
    /// Scalars from `other` win when they differ from the schema
    /// default, the translation flag only strengthens, ignored types
    /// extend uniquely, and per-type tables merge field-wise.
    pub fn merge(&mut self, other: &SyncManifest) {
        if other.folder_root != default_folder_root() {
            self.folder_root = other.folder_root.clone();
        }
        if other.create_folder_for_translations {
            self.create_folder_for_translations = true;
        }
        if other.default_locale.is_some() {
            self.default_locale = other.default_locale.clone();
        }
        for ignored in &other.ignored_types {
            if !self.ignored_types.contains(ignored) {
                self.ignored_types.push(ignored.clone());
            }
        }
        for (name, overrides) in &other.types {
            let entry = self.types.entry(name.clone()).or_default();
            if overrides.folder_root.is_some() {
                entry.folder_root = overrides.folder_root.clone();
            }
        }
    }
}
