//! Pagination state inspection
//!
//! Derives current/total page numbers and next/previous availability for
//! reporting.

use super::locator::PaginationLocator;
use super::strategies::{is_page_number, select_all};
use super::types::{NextPageCandidate, PaginationState};
use crate::dom::Document;
use tracing::debug;

/// Summarizes where a document sits in its pagination
#[derive(Debug)]
pub struct PaginationStateInspector<'a> {
    locator: &'a PaginationLocator,
}

impl<'a> PaginationStateInspector<'a> {
    /// Create an inspector sharing a locator's configuration
    pub fn new(locator: &'a PaginationLocator) -> Self {
        Self { locator }
    }

    /// Inspect the document, re-running the locate cascade for `has_next`
    ///
    /// When a locate result is already at hand, `inspect_with` avoids the
    /// second cascade run.
    pub fn inspect(&self, doc: &dyn Document) -> PaginationState {
        let next = self.locator.locate(doc);
        self.inspect_with(doc, next.as_ref())
    }

    /// Inspect the document using an existing locate result
    pub fn inspect_with(
        &self,
        doc: &dyn Document,
        next: Option<&NextPageCandidate>,
    ) -> PaginationState {
        let selectors = self.locator.selectors();

        let current_page = select_all(doc, &selectors.current_page)
            .first()
            .and_then(|&el| doc.text_content(el).trim().parse::<u32>().ok())
            .unwrap_or(1);

        let total_pages = selectors
            .page_links
            .iter()
            .flat_map(|selector| select_all(doc, selector))
            .filter_map(|el| {
                let text = doc.text_content(el);
                let text = text.trim();
                is_page_number(text).then(|| text.parse::<u32>().ok()).flatten()
            })
            .max();

        let has_previous = !select_all(doc, &selectors.previous).is_empty();

        let state = PaginationState {
            current_page,
            total_pages,
            has_next: next.is_some(),
            has_previous,
        };
        debug!("Pagination state: {:?}", state);
        state
    }
}
