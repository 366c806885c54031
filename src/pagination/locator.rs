//! Pagination locator
//!
//! Runs the matchers as a short-circuiting cascade: the first success wins
//! and later matchers are not evaluated for that call.

use super::strategies::{default_cascade, select_all};
use super::types::{MatchContext, Matcher, NextPageCandidate, StrategyKind, StrategyReport};
use crate::config::{CompiledPatterns, LocatorConfig, SelectionPolicy, SelectorConfig};
use crate::dom::Document;
use crate::error::Result;
use tracing::{debug, info};

/// Finds the single best control that advances a listing
///
/// Holds only compiled configuration; every call re-scans the live document.
pub struct PaginationLocator {
    matchers: Vec<Box<dyn Matcher>>,
    patterns: CompiledPatterns,
    selectors: SelectorConfig,
    selection: SelectionPolicy,
}

impl PaginationLocator {
    /// Create a locator from a configuration
    pub fn new(config: &LocatorConfig) -> Result<Self> {
        Ok(Self {
            matchers: default_cascade(),
            patterns: config.compile()?,
            selectors: config.selectors.clone(),
            selection: config.selection,
        })
    }

    /// Create a locator with the built-in configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(&LocatorConfig::default())
    }

    /// Replace the matcher list (order is cascade order)
    #[must_use]
    pub fn with_matchers(mut self, matchers: Vec<Box<dyn Matcher>>) -> Self {
        self.matchers = matchers;
        self
    }

    /// Change how the winner is chosen
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Strategies in the order they are tried
    pub fn cascade(&self) -> Vec<StrategyKind> {
        self.matchers.iter().map(|m| m.kind()).collect()
    }

    fn context(&self) -> MatchContext<'_> {
        MatchContext {
            patterns: &self.patterns,
            selectors: &self.selectors,
        }
    }

    /// Locate the next-page candidate, if any
    pub fn locate(&self, doc: &dyn Document) -> Option<NextPageCandidate> {
        let candidate = match self.selection {
            SelectionPolicy::PriorityOrder => {
                let ctx = self.context();
                self.matchers.iter().find_map(|m| m.attempt(doc, &ctx))
            }
            SelectionPolicy::HighestConfidence => self
                .evaluate_all(doc)
                .into_iter()
                .filter_map(|report| report.candidate)
                // max_by keeps the last maximum, so walk in reverse to let
                // cascade order break ties
                .rev()
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence)),
        };

        match &candidate {
            Some(c) => info!(
                "Next page via {} (confidence {}, url: {:?})",
                c.kind, c.confidence, c.url
            ),
            None => debug!("No next-page candidate found"),
        }
        candidate
    }

    /// Run every matcher without short-circuiting
    pub fn evaluate_all(&self, doc: &dyn Document) -> Vec<StrategyReport> {
        let ctx = self.context();
        self.matchers
            .iter()
            .map(|m| StrategyReport {
                kind: m.kind(),
                candidate: m.attempt(doc, &ctx),
            })
            .collect()
    }

    /// Does the document carry explicit infinite-scroll markup?
    ///
    /// Independent of any button text.
    pub fn probe_infinite_scroll_markup(&self, doc: &dyn Document) -> bool {
        self.selectors
            .infinite_scroll_markers
            .iter()
            .any(|selector| !select_all(doc, selector).is_empty())
    }

    pub(crate) fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }
}

impl std::fmt::Debug for PaginationLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationLocator")
            .field("cascade", &self.cascade())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}
