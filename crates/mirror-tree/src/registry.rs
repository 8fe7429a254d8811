//! Page-type registry.
//!
//! The exclusion policy matches "exact type or any subtype", which CMS
//! hosts express through their class hierarchy. Rust has no such
//! hierarchy, so hosts register their page types here with optional
//! supertype links and the policy walks the chain.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Name of a concrete page type, e.g. `Page` or `ErrorPage`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Registry of page types and their supertype links.
///
/// An unregistered type name still matches itself in [`is_a`], so hosts
/// that never subclass anything can skip registration entirely.
///
/// [`is_a`]: TypeRegistry::is_a
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    supertypes: HashMap<TypeName, Option<TypeName>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the conventional CMS page types: `Page` as
    /// the base with `VirtualPage`, `ErrorPage` and `RedirectorPage`
    /// beneath it.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("Page");
        let base = TypeName::new("Page");
        for subtype in ["VirtualPage", "ErrorPage", "RedirectorPage"] {
            registry
                .supertypes
                .insert(TypeName::new(subtype), Some(base.clone()));
        }
        registry
    }

    /// Register a root type with no supertype.
    pub fn register(&mut self, name: impl Into<TypeName>) {
        self.supertypes.insert(name.into(), None);
    }

    /// Register a type beneath an already-registered supertype.
    pub fn register_subtype(
        &mut self,
        name: impl Into<TypeName>,
        supertype: impl Into<TypeName>,
    ) -> Result<()> {
        let name = name.into();
        let supertype = supertype.into();
        if !self.supertypes.contains_key(&supertype) {
            return Err(Error::UnknownSupertype {
                page_type: name.to_string(),
                supertype: supertype.to_string(),
            });
        }
        // re-registering an existing type must not close a loop
        if name == supertype || self.is_a(&supertype, &name) {
            return Err(Error::SupertypeCycle {
                page_type: name.to_string(),
                supertype: supertype.to_string(),
            });
        }
        self.supertypes.insert(name, Some(supertype));
        Ok(())
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.supertypes.contains_key(name)
    }

    /// Direct supertype of a registered type, if it has one.
    pub fn supertype_of(&self, name: &TypeName) -> Option<&TypeName> {
        self.supertypes.get(name).and_then(|s| s.as_ref())
    }

    /// Whether `name` is `ancestor` itself or sits anywhere beneath it.
    pub fn is_a(&self, name: &TypeName, ancestor: &TypeName) -> bool {
        if name == ancestor {
            return true;
        }
        let mut current = self.supertype_of(name);
        while let Some(supertype) = current {
            if supertype == ancestor {
                return true;
            }
            current = self.supertype_of(supertype);
        }
        false
    }

    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }

    /// All registered type names, sorted.
    pub fn type_names(&self) -> Vec<&TypeName> {
        let mut names: Vec<&TypeName> = self.supertypes.keys().collect();
        names.sort();
        names
    }
}
