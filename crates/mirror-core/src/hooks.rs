//! Lifecycle hook events.
//!
//! The host CMS owns the page write pipeline; these are the points
//! where it hands control to the synchronizer. Both persist events run
//! the policy filter and then a full sync pass; the duplicate event
//! only clears the clone's inherited folder binding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Events in a page's write lifecycle the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageEvent {
    /// Immediately before the page's own fields are persisted. Change
    /// flags still reflect the host's edits here.
    BeforePersist,
    /// Immediately after the page's own fields were persisted. Change
    /// flags have been flushed by the store at this point.
    AfterPersist,
    /// Before a cloned page is first persisted.
    BeforeDuplicate,
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageEvent::BeforePersist => "before-persist",
            PageEvent::AfterPersist => "after-persist",
            PageEvent::BeforeDuplicate => "before-duplicate",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_event_serde_roundtrip() {
        for event in [
            PageEvent::BeforePersist,
            PageEvent::AfterPersist,
            PageEvent::BeforeDuplicate,
        ] {
            let json = serde_json::to_string(&event).unwrap();
            let back: PageEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }
    }

    #[test]
    fn test_page_event_display_matches_serde() {
        let json = serde_json::to_string(&PageEvent::BeforePersist).unwrap();
        assert_eq!(json, format!("\"{}\"", PageEvent::BeforePersist));
    }
}
