//! Traversal controller
//!
//! Executes a located candidate: a full navigation when a URL is known, or a
//! click followed by a bounded wait for the body to grow.

use crate::config::TraversalConfig;
use crate::dom::{Document, ElementId};
use crate::pagination::NextPageCandidate;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lower bound applied to the configured poll interval
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How a content-materialization wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Body height exceeded its initial value
    Grew,
    /// The maximum wait elapsed without growth
    TimedOut,
    /// The caller cancelled the wait
    Cancelled,
}

impl WaitOutcome {
    /// Did new content materialize?
    pub fn grew(self) -> bool {
        matches!(self, Self::Grew)
    }
}

/// Drives a page transition for a located candidate
///
/// Callers must serialize `advance` calls: a navigation invalidates the
/// document the candidate was matched against.
#[derive(Debug, Clone, Default)]
pub struct TraversalController {
    config: TraversalConfig,
}

impl TraversalController {
    /// Create a controller with the given timings
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    /// Timings in use
    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Advance to the next page
    ///
    /// Returns `false` for a missing candidate, a failed click or navigation,
    /// or a click that produced no new content within the wait. Failures are
    /// logged, never returned.
    pub async fn advance(&self, doc: &dyn Document, candidate: Option<&NextPageCandidate>) -> bool {
        self.advance_with_cancel(doc, candidate, &CancellationToken::new())
            .await
    }

    /// `advance`, with a token that aborts the content wait
    pub async fn advance_with_cancel(
        &self,
        doc: &dyn Document,
        candidate: Option<&NextPageCandidate>,
        cancel: &CancellationToken,
    ) -> bool {
        let Some(candidate) = candidate else {
            debug!("Nothing to advance: no candidate");
            return false;
        };
        if !doc.contains(candidate.element) {
            warn!(
                "Candidate element {} is no longer in the document",
                candidate.element
            );
            return false;
        }

        if candidate.is_load_more {
            return self.click_and_wait(doc, candidate.element, cancel).await;
        }

        if let Some(url) = &candidate.url {
            // the document is being replaced; there is nothing left to wait on
            return match doc.navigate(url) {
                Ok(()) => {
                    info!("Navigating to next page: {}", url);
                    true
                }
                Err(e) => {
                    warn!("Navigation failed: {}", e);
                    false
                }
            };
        }

        self.click_and_wait(doc, candidate.element, cancel).await
    }

    async fn click_and_wait(
        &self,
        doc: &dyn Document,
        element: ElementId,
        cancel: &CancellationToken,
    ) -> bool {
        if let Err(e) = doc.dispatch_click(element) {
            warn!("Click on {} failed: {}", element, e);
            return false;
        }

        let outcome = self
            .await_content_materialization_with_cancel(doc, self.config.max_wait(), cancel)
            .await;
        info!("Clicked {}, content wait ended: {:?}", element, outcome);
        outcome.grew()
    }

    /// Wait for the body's scroll height to exceed its current value
    ///
    /// Resolves `true` on the first poll that sees growth, `false` only once
    /// `max_wait` has fully elapsed. Layouts that replace content instead of
    /// appending it are not detected.
    pub async fn await_content_materialization(&self, doc: &dyn Document, max_wait: Duration) -> bool {
        self.await_content_materialization_with_cancel(doc, max_wait, &CancellationToken::new())
            .await
            .grew()
    }

    /// Cancellable form of `await_content_materialization`
    pub async fn await_content_materialization_with_cancel(
        &self,
        doc: &dyn Document,
        max_wait: Duration,
        cancel: &CancellationToken,
    ) -> WaitOutcome {
        let initial = doc.body_scroll_height();
        let deadline = Instant::now() + max_wait;
        let poll = self.config.poll_interval().max(MIN_POLL_INTERVAL);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("Body height stayed at {} for {:?}", initial, max_wait);
                return WaitOutcome::TimedOut;
            }

            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Content wait cancelled");
                    return WaitOutcome::Cancelled;
                }
                () = sleep(poll.min(remaining)) => {}
            }

            let height = doc.body_scroll_height();
            if height > initial {
                debug!("Body height grew from {} to {}", initial, height);
                return WaitOutcome::Grew;
            }
        }
    }
}
