//! Synchronization configuration.
//!
//! [`SyncManifest`] is the on-disk schema; [`SyncConfig`] is the
//! resolved view the policy filter and engine consume. Root resolution
//! follows the fallback chain: per-type override, then the global
//! root, then an error once everything has degenerated to the bare
//! assets root.

mod manifest;

pub use manifest::{SyncManifest, TypeOverride};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use mirror_tree::{FolderPath, LocaleTag, TypeName};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Resolved synchronization settings.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    folder_root: String,
    create_folder_for_translations: bool,
    default_locale: Option<LocaleTag>,
    ignored_types: Vec<TypeName>,
    type_roots: HashMap<TypeName, String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from_manifest(&SyncManifest::default())
    }
}

impl SyncConfig {
    /// Resolve a parsed manifest into typed settings.
    pub fn from_manifest(manifest: &SyncManifest) -> Self {
        let type_roots = manifest
            .types
            .iter()
            .filter_map(|(name, overrides)| {
                overrides
                    .folder_root
                    .clone()
                    .map(|root| (TypeName::new(name.clone()), root))
            })
            .collect();
        Self {
            folder_root: manifest.folder_root.clone(),
            create_folder_for_translations: manifest.create_folder_for_translations,
            default_locale: manifest.default_locale.clone().map(LocaleTag::new),
            ignored_types: manifest
                .ignored_types
                .iter()
                .map(|name| TypeName::new(name.clone()))
                .collect(),
            type_roots,
        }
    }

    /// Load and resolve a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading mirror manifest");
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = SyncManifest::parse(&content)?;
        Ok(Self::from_manifest(&manifest))
    }

    pub fn create_folder_for_translations(&self) -> bool {
        self.create_folder_for_translations
    }

    pub fn default_locale(&self) -> Option<&LocaleTag> {
        self.default_locale.as_ref()
    }

    /// Whether the site carries a translation layer at all.
    pub fn localization_enabled(&self) -> bool {
        self.default_locale.is_some()
    }

    pub fn ignored_types(&self) -> &[TypeName] {
        &self.ignored_types
    }

    /// Resolve the root container for a page type: the per-type
    /// override unless it degenerates to `/`, then the global root,
    /// then an error when that degenerates too.
    pub fn folder_root_for(&self, page_type: &TypeName) -> Result<FolderPath> {
        if let Some(root) = self.type_roots.get(page_type) {
            let path = FolderPath::new(root);
            if !path.is_root() {
                return Ok(path);
            }
            warn!(
                %page_type,
                root = %root,
                "Per-type folder root is degenerate, falling back to the global root"
            );
        }
        let path = FolderPath::new(&self.folder_root);
        if path.is_root() {
            return Err(Error::InvalidRoot {
                page_type: page_type.clone(),
                root: self.folder_root.clone(),
            });
        }
        Ok(path)
    }

    /// Replace the global root container name.
    pub fn with_folder_root(mut self, root: impl Into<String>) -> Self {
        self.folder_root = root.into();
        self
    }

    /// Enable or disable folders for non-default-locale translations.
    pub fn with_translation_folders(mut self, enabled: bool) -> Self {
        self.create_folder_for_translations = enabled;
        self
    }

    /// Set (or clear) the default locale; `None` switches locale
    /// filtering off.
    pub fn with_default_locale(mut self, locale: Option<LocaleTag>) -> Self {
        self.default_locale = locale;
        self
    }

    /// Replace the ignored type list.
    pub fn with_ignored_types(mut self, types: Vec<TypeName>) -> Self {
        self.ignored_types = types;
        self
    }

    /// Add or replace a per-type root container.
    pub fn with_type_root(mut self, page_type: impl Into<TypeName>, root: impl Into<String>) -> Self {
        self.type_roots.insert(page_type.into(), root.into());
        self
    }
}
