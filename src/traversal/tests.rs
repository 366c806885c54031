//! Tests for traversal module

use super::*;
use crate::config::TraversalConfig;
use crate::dom::{BoundingBox, ComputedStyle, Document, ElementId, HtmlDocument};
use crate::error::{Error, Result};
use crate::pagination::{NextPageCandidate, PaginationLocator, StrategyKind};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn doc(body: &str) -> HtmlDocument {
    HtmlDocument::parse(
        &format!("<body>{body}</body>"),
        "https://feed.test/items",
    )
    .unwrap()
    .with_scroll_height(2000)
}

fn fast_controller() -> TraversalController {
    TraversalController::new(TraversalConfig::new(300, 20))
}

/// Grow the document body after `delay`, as an AJAX append would
fn grow_after(doc: &HtmlDocument, delay: Duration) {
    let height = doc.scroll_height();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        height.grow(800);
    });
}

/// Host document with a single element whose clicks are refused, and which
/// counts how often the body height is measured
#[derive(Default)]
struct RefusingDocument {
    height_reads: Cell<usize>,
}

impl Document for RefusingDocument {
    fn query_selector_all(&self, _selector: &str) -> Result<Vec<ElementId>> {
        Ok(vec![ElementId(0)])
    }

    fn query_selector_all_within(&self, _scope: ElementId, _selector: &str) -> Result<Vec<ElementId>> {
        Ok(Vec::new())
    }

    fn matches(&self, _element: ElementId, _selector: &str) -> Result<bool> {
        Ok(false)
    }

    fn element_by_id(&self, _id: &str) -> Option<ElementId> {
        None
    }

    fn parent(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    fn contains(&self, element: ElementId) -> bool {
        element == ElementId(0)
    }

    fn tag_name(&self, _element: ElementId) -> Option<String> {
        Some("button".to_string())
    }

    fn attribute(&self, _element: ElementId, _name: &str) -> Option<String> {
        None
    }

    fn text_content(&self, _element: ElementId) -> String {
        "Load more".to_string()
    }

    fn href(&self, _element: ElementId) -> Option<String> {
        None
    }

    fn computed_style(&self, _element: ElementId) -> ComputedStyle {
        ComputedStyle::default()
    }

    fn bounding_box(&self, _element: ElementId) -> BoundingBox {
        BoundingBox::new(80.0, 18.0)
    }

    fn dispatch_click(&self, element: ElementId) -> Result<()> {
        Err(Error::StaleElement { element: element.0 })
    }

    fn navigate(&self, url: &str) -> Result<()> {
        Err(Error::navigation(url, "host refused navigation"))
    }

    fn location(&self) -> String {
        "https://feed.test/items".to_string()
    }

    fn body_scroll_height(&self) -> u64 {
        self.height_reads.set(self.height_reads.get() + 1);
        1000
    }
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_default_timings() {
    let controller = TraversalController::default();
    assert_eq!(controller.config().max_wait(), Duration::from_millis(5000));
    assert_eq!(controller.config().poll_interval(), Duration::from_millis(100));
}

#[test]
fn test_wait_outcome_grew() {
    assert!(WaitOutcome::Grew.grew());
    assert!(!WaitOutcome::TimedOut.grew());
    assert!(!WaitOutcome::Cancelled.grew());
}

// ============================================================================
// Content Materialization
// ============================================================================

#[tokio::test]
async fn test_wait_resolves_promptly_on_growth() {
    let doc = doc("<p>items</p>");
    let controller = TraversalController::default();
    grow_after(&doc, Duration::from_millis(150));

    let started = Instant::now();
    let grew = controller
        .await_content_materialization(&doc, Duration::from_millis(5000))
        .await;

    assert!(grew);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_wait_times_out_only_after_full_wait() {
    let doc = doc("<p>items</p>");
    let controller = fast_controller();

    let started = Instant::now();
    let grew = controller
        .await_content_materialization(&doc, Duration::from_millis(300))
        .await;

    assert!(!grew);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_wait_ignores_shrinking() {
    let doc = doc("<p>items</p>");
    let height = doc.scroll_height();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        height.set(1000);
    });

    let outcome = fast_controller()
        .await_content_materialization_with_cancel(
            &doc,
            Duration::from_millis(100),
            &CancellationToken::new(),
        )
        .await;
    assert_eq!(outcome, WaitOutcome::TimedOut);
}

#[tokio::test]
async fn test_zero_poll_interval_does_not_spin() {
    let doc = RefusingDocument::default();
    let controller = TraversalController::new(TraversalConfig::new(50, 0));

    let grew = controller
        .await_content_materialization(&doc, Duration::from_millis(50))
        .await;

    assert!(!grew);
    // one initial read plus at most one per millisecond
    assert!(doc.height_reads.get() <= 60, "polled {} times", doc.height_reads.get());
}

#[tokio::test]
async fn test_wait_can_be_cancelled() {
    let doc = doc("<p>items</p>");
    let controller = TraversalController::default();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let outcome = controller
        .await_content_materialization_with_cancel(&doc, Duration::from_millis(5000), &cancel)
        .await;

    assert_eq!(outcome, WaitOutcome::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(1));
}

// ============================================================================
// Advance
// ============================================================================

#[tokio::test]
async fn test_advance_without_candidate() {
    let doc = doc("<p>items</p>");
    assert!(!fast_controller().advance(&doc, None).await);
}

#[tokio::test]
async fn test_advance_stale_element() {
    let doc = doc("<p>items</p>");
    let candidate = NextPageCandidate::new(
        StrategyKind::TextContent,
        ElementId(9_999),
        Some("https://feed.test/items?page=2".to_string()),
    );

    assert!(!fast_controller().advance(&doc, Some(&candidate)).await);
    assert!(doc.navigations().is_empty());
}

#[tokio::test]
async fn test_advance_navigates_when_url_known() {
    let doc = doc(r#"<a rel="next" href="?page=2">Next</a>"#);
    let locator = PaginationLocator::with_defaults().unwrap();
    let candidate = locator.locate(&doc);

    let started = Instant::now();
    assert!(fast_controller().advance(&doc, candidate.as_ref()).await);

    // navigation is terminal, no content wait
    assert!(started.elapsed() < Duration::from_millis(300));
    assert_eq!(doc.navigations(), vec!["https://feed.test/items?page=2"]);
    assert!(doc.clicks().is_empty());
}

#[tokio::test]
async fn test_advance_navigation_failure_is_false() {
    let doc = doc(r#"<a href="/x">x</a>"#);
    let element = doc.query_selector("a").unwrap().unwrap();
    let candidate = NextPageCandidate::new(
        StrategyKind::RelAttribute,
        element,
        Some("http://[::1".to_string()),
    );

    assert!(!fast_controller().advance(&doc, Some(&candidate)).await);
    assert!(doc.navigations().is_empty());
}

#[tokio::test]
async fn test_advance_load_more_clicks_even_with_url() {
    let doc = doc(r#"<a href="/items?cursor=abc">Load more</a>"#);
    let locator = PaginationLocator::with_defaults().unwrap();
    let candidate = locator.locate(&doc).unwrap();
    assert!(candidate.is_load_more);

    grow_after(&doc, Duration::from_millis(40));
    assert!(fast_controller().advance(&doc, Some(&candidate)).await);

    assert_eq!(doc.clicks(), vec![candidate.element]);
    assert!(doc.navigations().is_empty());
}

#[tokio::test]
async fn test_advance_load_more_without_growth() {
    let doc = doc("<button>Load more</button>");
    let locator = PaginationLocator::with_defaults().unwrap();
    let candidate = locator.locate(&doc).unwrap();

    let started = Instant::now();
    assert!(!fast_controller().advance(&doc, Some(&candidate)).await);
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(doc.clicks().len(), 1);
}

#[tokio::test]
async fn test_advance_click_only_waits_for_content() {
    let doc = doc(r#"<button onclick="router.next()">Next</button>"#);
    let locator = PaginationLocator::with_defaults().unwrap();
    let candidate = locator.locate(&doc).unwrap();
    assert!(candidate.click_only);
    assert!(!candidate.is_load_more);

    grow_after(&doc, Duration::from_millis(40));
    assert!(fast_controller().advance(&doc, Some(&candidate)).await);
    assert_eq!(doc.clicks(), vec![candidate.element]);
}

#[tokio::test]
async fn test_advance_refused_click_is_false_without_waiting() {
    let doc = RefusingDocument::default();
    let candidate = NextPageCandidate::load_more(ElementId(0), None, doc.location());
    assert!(candidate.is_load_more);

    let started = Instant::now();
    assert!(!TraversalController::default().advance(&doc, Some(&candidate)).await);

    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(doc.height_reads.get(), 0);
}

#[tokio::test]
async fn test_advance_refused_navigation_is_false() {
    let doc = RefusingDocument::default();
    let candidate = NextPageCandidate::new(
        StrategyKind::RelAttribute,
        ElementId(0),
        Some("https://feed.test/items?page=2".to_string()),
    );

    assert!(!fast_controller().advance(&doc, Some(&candidate)).await);
}

#[tokio::test]
async fn test_advance_cancelled_wait_is_false() {
    let doc = doc("<button>Show more</button>");
    let locator = PaginationLocator::with_defaults().unwrap();
    let candidate = locator.locate(&doc).unwrap();

    let controller = TraversalController::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let started = Instant::now();
    assert!(
        !controller
            .advance_with_cancel(&doc, Some(&candidate), &cancel)
            .await
    );
    assert!(started.elapsed() < Duration::from_secs(1));
}
