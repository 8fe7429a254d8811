//! Exclusion policy.
//!
//! Decides whether a page participates in folder mirroring at all. The
//! filter runs before and after every persist and is a pure function
//! of the page, the config, and the type registry, so both evaluations
//! of a single persist agree by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use mirror_tree::{LocaleTag, PageRecord, TypeName, TypeRegistry};

use crate::config::SyncConfig;

/// Why a page was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The page's concrete type is in, or beneath, the ignored set.
    IgnoredType(TypeName),
    /// Locale filtering is on and the page is a non-default-locale
    /// translation.
    NotDefaultLocale(LocaleTag),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::IgnoredType(page_type) => {
                write!(f, "page type {page_type} is ignored")
            }
            SkipReason::NotDefaultLocale(locale) => {
                write!(f, "locale {locale} is not the default locale")
            }
        }
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyDecision {
    /// The page participates in folder mirroring.
    Sync,
    /// The page is left alone; the reason names the matching rule.
    Skip(SkipReason),
}

impl PolicyDecision {
    pub fn is_sync(&self) -> bool {
        matches!(self, PolicyDecision::Sync)
    }
}

/// The policy filter: exclusion by page type and by locale.
///
/// A page without a locale is treated as default-locale content even
/// when localization is enabled, so legacy untranslated pages keep
/// their folders.
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    ignored_types: Vec<TypeName>,
    default_locale: Option<LocaleTag>,
    create_folder_for_translations: bool,
    registry: TypeRegistry,
}

impl SyncPolicy {
    pub fn new(config: &SyncConfig, registry: TypeRegistry) -> Self {
        Self {
            ignored_types: config.ignored_types().to_vec(),
            default_locale: config.default_locale().cloned(),
            create_folder_for_translations: config.create_folder_for_translations(),
            registry,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Policy verdict as a plain bool.
    pub fn should_sync(&self, page: &PageRecord) -> bool {
        self.evaluate(page).is_sync()
    }

    /// Full verdict with the skip reason.
    pub fn evaluate(&self, page: &PageRecord) -> PolicyDecision {
        for ignored in &self.ignored_types {
            if self.registry.is_a(page.page_type(), ignored) {
                return PolicyDecision::Skip(SkipReason::IgnoredType(page.page_type().clone()));
            }
        }
        if let Some(default_locale) = &self.default_locale
            && !self.create_folder_for_translations
            && let Some(locale) = page.locale()
            && locale != default_locale
        {
            return PolicyDecision::Skip(SkipReason::NotDefaultLocale(locale.clone()));
        }
        PolicyDecision::Sync
    }
}
