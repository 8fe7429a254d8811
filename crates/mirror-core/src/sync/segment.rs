//! Segment resolution for folder naming.
//!
//! The folder takes its name from the page's URL segment, so the
//! segment must be final before the first folder write. Resolution
//! recovers the conventional CMS rules: generate from the title for
//! fresh pages, re-filter hand-edited values, fall back to `page-{id}`
//! when nothing can be derived, and suffix `-2`, `-3`, ... until the
//! segment is unique among its siblings.

use mirror_tree::segment::{NEW_PAGE_PLACEHOLDER, strip_numeric_suffix, with_numeric_suffix};
use mirror_tree::{PageField, PageRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::PageStore;

/// Upper bound on uniqueness attempts. The sibling count bounds the
/// loop in practice; this guards against a store that never validates.
pub(crate) const MAX_SEGMENT_ATTEMPTS: usize = 1000;

/// Ensure `page` carries a finalized, sibling-unique segment,
/// generating one when needed. Returns whether the segment was
/// (re)assigned.
pub(crate) fn resolve(page: &mut PageRecord, pages: &dyn PageStore) -> Result<bool> {
    let mut assigned = false;

    let placeholder = page.segment().is_empty() || page.segment() == NEW_PAGE_PLACEHOLDER;
    if placeholder && !page.title().is_empty() {
        let title = page.title().to_string();
        let generated = pages.generate_segment(page, &title);
        if generated != page.segment() {
            page.set_segment(generated);
            assigned = true;
        }
    } else if page.is_new() || page.is_changed(PageField::Segment) {
        // hand-edited values go through the same filter
        let current = page.segment().to_string();
        let filtered = pages.generate_segment(page, &current);
        if filtered != current {
            page.set_segment(filtered);
            assigned = true;
        }
    }

    if page.segment().is_empty() {
        match page.id() {
            Some(id) => {
                page.set_segment(format!("page-{id}"));
                assigned = true;
            }
            None => {
                return Err(Error::SegmentUnresolvable {
                    page_type: page.page_type().clone(),
                });
            }
        }
    }

    if !pages.segment_is_unique(page) {
        let stem = strip_numeric_suffix(page.segment()).to_string();
        let mut count = 2;
        loop {
            page.set_segment(with_numeric_suffix(&stem, count));
            assigned = true;
            if pages.segment_is_unique(page) {
                break;
            }
            count += 1;
            if count > MAX_SEGMENT_ATTEMPTS {
                return Err(Error::SegmentExhausted {
                    stem,
                    attempts: MAX_SEGMENT_ATTEMPTS,
                });
            }
        }
        debug!(segment = %page.segment(), "Resolved sibling-unique segment");
    }

    Ok(assigned)
}
