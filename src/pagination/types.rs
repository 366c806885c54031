//! Pagination types and traits
//!
//! Defines the candidate, strategy and state abstractions shared by the
//! matchers, the locator and the inspector.

use crate::config::CompiledPatterns;
use crate::config::SelectorConfig;
use crate::dom::{Document, ElementId};
use serde::{Deserialize, Serialize};

/// Which matcher produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// `rel="next"` on a link
    RelAttribute,
    /// Multilingual "next" text
    TextContent,
    /// "next"-like class or id
    ClassId,
    /// "next"-like accessible label
    AriaLabel,
    /// Link following the current page in a numbered block
    NumberedPagination,
    /// "Load more" control
    InfiniteScroll,
}

impl StrategyKind {
    /// All strategies in cascade order
    pub const CASCADE: [StrategyKind; 6] = [
        StrategyKind::RelAttribute,
        StrategyKind::TextContent,
        StrategyKind::ClassId,
        StrategyKind::AriaLabel,
        StrategyKind::NumberedPagination,
        StrategyKind::InfiniteScroll,
    ];

    /// Fixed advisory confidence of the strategy
    pub fn confidence(self) -> f32 {
        match self {
            StrategyKind::RelAttribute => 1.0,
            StrategyKind::NumberedPagination => 0.95,
            StrategyKind::TextContent => 0.9,
            StrategyKind::AriaLabel => 0.85,
            StrategyKind::ClassId => 0.8,
            StrategyKind::InfiniteScroll => 0.7,
        }
    }

    /// Kebab-case name
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::RelAttribute => "rel-attribute",
            StrategyKind::TextContent => "text-content",
            StrategyKind::ClassId => "class-id",
            StrategyKind::AriaLabel => "aria-label",
            StrategyKind::NumberedPagination => "numbered-pagination",
            StrategyKind::InfiniteScroll => "infinite-scroll",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single best "next page" opportunity found by a locate call
///
/// `element` is a non-owning handle; it must not be used after a navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPageCandidate {
    /// Control to click (or whose URL to follow)
    pub element: ElementId,
    /// Resolved destination, if any
    pub url: Option<String>,
    /// Matcher that produced the candidate
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    /// Advisory, per-strategy score
    pub confidence: f32,
    /// No URL could be resolved for the element
    pub click_only: bool,
    /// Content is expected to be appended in place
    pub is_load_more: bool,
}

impl NextPageCandidate {
    /// Create a candidate for `kind`; `click_only` follows from `url`
    pub fn new(kind: StrategyKind, element: ElementId, url: Option<String>) -> Self {
        Self {
            element,
            click_only: url.is_none(),
            url,
            kind,
            confidence: kind.confidence(),
            is_load_more: false,
        }
    }

    /// Create a load-more candidate
    ///
    /// `url` is what the element itself resolved to; when absent the current
    /// location stands in and the candidate stays click-only.
    pub fn load_more(element: ElementId, url: Option<String>, location: String) -> Self {
        Self {
            element,
            click_only: url.is_none(),
            url: Some(url.unwrap_or(location)),
            kind: StrategyKind::InfiniteScroll,
            confidence: StrategyKind::InfiniteScroll.confidence(),
            is_load_more: true,
        }
    }
}

/// Summary of where the document sits in its pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Current page number (1 when unknown)
    pub current_page: u32,
    /// Highest page number found in the pagination links
    pub total_pages: Option<u32>,
    /// A next-page candidate exists
    pub has_next: bool,
    /// A previous-page control exists
    pub has_previous: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: None,
            has_next: false,
            has_previous: false,
        }
    }
}

impl PaginationState {
    /// Is this the last known page?
    pub fn is_last_page(&self) -> bool {
        !self.has_next || self.total_pages.is_some_and(|total| self.current_page >= total)
    }
}

/// Outcome of a single matcher, for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Matcher that ran
    pub kind: StrategyKind,
    /// What it found
    pub candidate: Option<NextPageCandidate>,
}

/// Everything a matcher needs besides the document
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Compiled phrase and regex lists
    pub patterns: &'a CompiledPatterns,
    /// Selector configuration
    pub selectors: &'a SelectorConfig,
}

/// A single detection strategy in the cascade
pub trait Matcher: Send + Sync {
    /// The strategy this matcher implements
    fn kind(&self) -> StrategyKind;

    /// Look for a next-page candidate; `None` is a miss, never an error
    fn attempt(&self, doc: &dyn Document, ctx: &MatchContext<'_>) -> Option<NextPageCandidate>;
}
