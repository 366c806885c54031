//! Pagination module
//!
//! Supports: rel attribute, multilingual text, class/id, aria label,
//! numbered pagination, load-more (infinite scroll)
//!
//! # Overview
//!
//! The pagination module finds the single best control that advances a
//! listing to its next page. Six independent matchers are run by the
//! `PaginationLocator` in a fixed priority order; the first success wins.
//! Every matcher gates its candidates through the `ElementValidator` and
//! reads elements through the shared text/URL extractors.

mod extract;
mod inspector;
mod locator;
mod strategies;
mod types;
mod validator;

pub use extract::{extract_text, extract_url};
pub use inspector::PaginationStateInspector;
pub use locator::PaginationLocator;
pub use strategies::{
    default_cascade, AriaLabelMatcher, ClassIdMatcher, InfiniteScrollMatcher,
    NumberedPaginationMatcher, RelAttributeMatcher, TextContentMatcher,
};
pub use types::{
    MatchContext, Matcher, NextPageCandidate, PaginationState, StrategyKind, StrategyReport,
};
pub use validator::ElementValidator;
