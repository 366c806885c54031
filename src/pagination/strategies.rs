//! Pagination strategy implementations
//!
//! Each matcher handles one way sites expose their "next page" control.
//! Matchers are independent of each other; ordering is the locator's job.

use super::extract::{extract_text, extract_url};
use super::types::{MatchContext, Matcher, NextPageCandidate, StrategyKind};
use super::validator::ElementValidator;
use crate::dom::{Document, ElementId};
use tracing::{debug, warn};

/// Run a selector query, treating a bad selector as "nothing found"
pub(crate) fn select_all(doc: &dyn Document, selector: &str) -> Vec<ElementId> {
    doc.query_selector_all(selector).unwrap_or_else(|e| {
        warn!("Skipping selector: {}", e);
        Vec::new()
    })
}

/// Scoped variant of `select_all`
pub(crate) fn select_within(doc: &dyn Document, scope: ElementId, selector: &str) -> Vec<ElementId> {
    doc.query_selector_all_within(scope, selector)
        .unwrap_or_else(|e| {
            warn!("Skipping selector: {}", e);
            Vec::new()
        })
}

fn matches(doc: &dyn Document, element: ElementId, selector: &str) -> bool {
    doc.matches(element, selector).unwrap_or_else(|e| {
        warn!("Skipping selector: {}", e);
        false
    })
}

/// First valid element satisfying `predicate`, in document order
fn first_valid(
    doc: &dyn Document,
    elements: Vec<ElementId>,
    predicate: impl Fn(ElementId) -> bool,
) -> Option<ElementId> {
    elements
        .into_iter()
        .find(|&el| predicate(el) && ElementValidator::is_valid(doc, el))
}

fn hit(kind: StrategyKind, doc: &dyn Document, element: ElementId) -> NextPageCandidate {
    let candidate = NextPageCandidate::new(kind, element, extract_url(doc, element));
    debug!(
        "{} matched element {} (url: {:?})",
        kind, element, candidate.url
    );
    candidate
}

/// The six matchers in cascade order
pub fn default_cascade() -> Vec<Box<dyn Matcher>> {
    vec![
        Box::new(RelAttributeMatcher),
        Box::new(TextContentMatcher),
        Box::new(ClassIdMatcher),
        Box::new(AriaLabelMatcher),
        Box::new(NumberedPaginationMatcher),
        Box::new(InfiniteScrollMatcher),
    ]
}

// ============================================================================
// Rel Attribute
// ============================================================================

/// `rel="next"` (then `rel="nofollow next"`) on an anchor or link
///
/// The standardized semantic signal, so it runs first.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelAttributeMatcher;

impl Matcher for RelAttributeMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RelAttribute
    }

    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate> {
        ctx.selectors.rel_next.iter().find_map(|selector| {
            first_valid(doc, select_all(doc, selector), |_| true)
                .map(|el| hit(self.kind(), doc, el))
        })
    }
}

// ============================================================================
// Text Content
// ============================================================================

/// Clickable element whose text reads "next" in one of the configured languages
#[derive(Debug, Clone, Copy, Default)]
pub struct TextContentMatcher;

impl Matcher for TextContentMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TextContent
    }

    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate> {
        let clickable = select_all(doc, &ctx.selectors.clickable);
        first_valid(doc, clickable, |el| {
            ctx.patterns.is_next_text(&extract_text(doc, el))
        })
        .map(|el| hit(self.kind(), doc, el))
    }
}

// ============================================================================
// Class / Id
// ============================================================================

/// Clickable element whose class or id looks like "next"
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassIdMatcher;

impl Matcher for ClassIdMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ClassId
    }

    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate> {
        let clickable = select_all(doc, &ctx.selectors.clickable);
        first_valid(doc, clickable, |el| {
            let class = doc.attribute(el, "class").unwrap_or_default();
            let id = doc.attribute(el, "id").unwrap_or_default();
            let surface = format!("{class} {id}");
            !surface.trim().is_empty() && ctx.patterns.is_next_class_id(&surface)
        })
        .map(|el| hit(self.kind(), doc, el))
    }
}

// ============================================================================
// Aria Label
// ============================================================================

/// Element whose accessible label reads "next"
///
/// `aria-labelledby` targets contribute their text after `aria-label`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaLabelMatcher;

impl AriaLabelMatcher {
    fn label(doc: &dyn Document, element: ElementId) -> String {
        let mut parts = Vec::new();
        if let Some(label) = doc.attribute(element, "aria-label") {
            parts.push(label.trim().to_string());
        }
        if let Some(ids) = doc.attribute(element, "aria-labelledby") {
            for id in ids.split_whitespace() {
                if let Some(referenced) = doc.element_by_id(id) {
                    parts.push(doc.text_content(referenced).trim().to_string());
                }
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

impl Matcher for AriaLabelMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AriaLabel
    }

    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate> {
        let labelled = select_all(doc, &ctx.selectors.aria);
        first_valid(doc, labelled, |el| {
            let label = Self::label(doc, el);
            !label.is_empty() && ctx.patterns.is_next_label(&label)
        })
        .map(|el| hit(self.kind(), doc, el))
    }
}

// ============================================================================
// Numbered Pagination
// ============================================================================

/// The item right after the marked current page in a numbered block
///
/// Position relative to the current page is structural evidence, which is
/// why this ranks above the text and class heuristics in confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedPaginationMatcher;

impl NumberedPaginationMatcher {
    /// Links and buttons of the container, plus current-page markers that
    /// are not themselves wrapping a link (`<span class="current">3</span>`)
    ///
    /// Nested markers (`<li class="active"><span class="current">`) collapse
    /// into the outermost one.
    fn items(doc: &dyn Document, container: ElementId, ctx: &MatchContext<'_>) -> Vec<ElementId> {
        let links = &ctx.selectors.pagination_items;
        let query = format!("{links}, {}", ctx.selectors.current_page);
        let found: Vec<ElementId> = select_within(doc, container, &query)
            .into_iter()
            .filter(|&el| matches(doc, el, links) || select_within(doc, el, links).is_empty())
            .collect();

        found
            .iter()
            .copied()
            .filter(|&el| !Self::has_item_ancestor(doc, el, container, &found))
            .collect()
    }

    fn has_item_ancestor(
        doc: &dyn Document,
        element: ElementId,
        container: ElementId,
        items: &[ElementId],
    ) -> bool {
        let mut current = doc.parent(element);
        while let Some(ancestor) = current {
            if ancestor == container {
                return false;
            }
            if items.contains(&ancestor) {
                return true;
            }
            current = doc.parent(ancestor);
        }
        false
    }

    fn is_current(doc: &dyn Document, element: ElementId, ctx: &MatchContext<'_>) -> bool {
        let marker = &ctx.selectors.current_page;
        matches(doc, element, marker)
            || doc
                .parent(element)
                .is_some_and(|parent| matches(doc, parent, marker))
    }

    fn current_index(doc: &dyn Document, items: &[ElementId], ctx: &MatchContext<'_>) -> Option<usize> {
        items
            .iter()
            .position(|&el| Self::is_current(doc, el, ctx))
            .or_else(|| {
                items
                    .iter()
                    .position(|&el| doc.attribute(el, "disabled").is_some())
            })
    }
}

/// Non-empty and all ASCII digits
pub(crate) fn is_page_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

impl Matcher for NumberedPaginationMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NumberedPagination
    }

    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate> {
        let container = ctx
            .selectors
            .pagination_containers
            .iter()
            .find_map(|selector| select_all(doc, selector).into_iter().next())?;

        let items = Self::items(doc, container, ctx);
        let current = Self::current_index(doc, &items, ctx)?;
        let next = *items.get(current + 1)?;

        let text = doc.text_content(next);
        let text = text.trim();
        if !(is_page_number(text) || ctx.patterns.is_next_token(text)) {
            debug!("Item after current page is not a page link: '{}'", text);
            return None;
        }

        ElementValidator::is_valid(doc, next).then(|| hit(self.kind(), doc, next))
    }
}

// ============================================================================
// Infinite Scroll
// ============================================================================

/// "Load more" style control
///
/// Substring matching is the weakest signal, so this runs last. Falls back to
/// the current location when the control has no URL of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteScrollMatcher;

impl Matcher for InfiniteScrollMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::InfiniteScroll
    }

    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate> {
        let candidates = select_all(doc, &ctx.selectors.load_more_candidates);
        let el = first_valid(doc, candidates, |el| {
            ctx.patterns.is_load_more(&extract_text(doc, el))
        })?;

        let candidate = NextPageCandidate::load_more(el, extract_url(doc, el), doc.location());
        debug!(
            "{} matched element {} (url: {:?})",
            self.kind(),
            el,
            candidate.url
        );
        Some(candidate)
    }
}
