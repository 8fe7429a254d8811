//! Shared test utilities for the folder-mirror workspace.
//!
//! [`TestSite`] wires the synchronizer into a miniature host: the
//! in-memory stores, the full persist pipeline with both lifecycle
//! hooks, and assertion helpers that speak in pages rather than
//! folder ids.

pub mod site;

pub use site::TestSite;
