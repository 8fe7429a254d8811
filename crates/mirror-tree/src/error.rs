//! Error types for mirror-tree

/// Result type for mirror-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-tree operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A subtype was registered under a type the registry has never seen
    #[error("Unknown supertype {supertype} for page type {page_type}")]
    UnknownSupertype { page_type: String, supertype: String },

    /// A supertype link would make the type chain circular
    #[error("Registering {page_type} under {supertype} would create a supertype cycle")]
    SupertypeCycle { page_type: String, supertype: String },
}
