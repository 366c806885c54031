//! In-memory document over a parsed HTML snapshot
//!
//! Uses the scraper crate for parsing and selector matching. Style and
//! layout are approximated from inline declarations, which is enough for the
//! validity gate: `display`, `visibility`, `opacity`, `width` and `height`.
//! Clicks and navigations are recorded rather than executed.

use super::types::{BoundingBox, ComputedStyle, Document, ElementId};
use crate::error::{Error, Result};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Elements the user agent never renders
const NON_RENDERED: &[&str] = &[
    "head", "script", "style", "template", "meta", "link", "title", "noscript",
];

/// Elements that occupy space without text or element children
const SELF_SIZED: &[&str] = &[
    "img", "input", "button", "select", "textarea", "svg", "canvas", "video", "iframe",
];

/// Elements whose `disabled` property follows the attribute (and fieldsets)
const FORM_CONTROLS: &[&str] = &[
    "button", "input", "select", "textarea", "optgroup", "option", "fieldset",
];

/// Elements with a native `href` property
const HREF_ELEMENTS: &[&str] = &["a", "area", "link"];

const DEFAULT_WIDTH: f64 = 80.0;
const DEFAULT_HEIGHT: f64 = 18.0;

/// Shared handle to a document's body scroll height
///
/// Cloning shares the underlying value, so a host (or a test) can grow the
/// body from another task while a traversal wait is polling it.
#[derive(Debug, Clone, Default)]
pub struct ScrollHeight(Arc<AtomicU64>);

impl ScrollHeight {
    /// Create a handle with an initial height
    pub fn new(height: u64) -> Self {
        Self(Arc::new(AtomicU64::new(height)))
    }

    /// Current height
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Replace the height
    pub fn set(&self, height: u64) {
        self.0.store(height, Ordering::SeqCst);
    }

    /// Grow the height, as appended content would
    pub fn grow(&self, by: u64) {
        self.0.fetch_add(by, Ordering::SeqCst);
    }
}

/// Document backed by a parsed HTML snapshot
pub struct HtmlDocument {
    html: Html,
    /// Element nodes in document order; `ElementId` indexes into this
    nodes: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
    location: RefCell<String>,
    scroll_height: ScrollHeight,
    clicks: RefCell<Vec<ElementId>>,
    navigations: RefCell<Vec<String>>,
}

impl HtmlDocument {
    /// Parse `html` as the document currently shown at `location`
    pub fn parse(html: &str, location: &str) -> Result<Self> {
        let location = Url::parse(location)?;
        let html = Html::parse_document(html);
        let nodes: Vec<NodeId> = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(|e| e.id())
            .collect();
        let positions = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        Ok(Self {
            html,
            nodes,
            positions,
            location: RefCell::new(location.to_string()),
            scroll_height: ScrollHeight::default(),
            clicks: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
        })
    }

    /// Set the initial body scroll height
    #[must_use]
    pub fn with_scroll_height(self, height: u64) -> Self {
        self.scroll_height.set(height);
        self
    }

    /// Handle to the body scroll height
    pub fn scroll_height(&self) -> ScrollHeight {
        self.scroll_height.clone()
    }

    /// Elements clicked so far, in order
    pub fn clicks(&self) -> Vec<ElementId> {
        self.clicks.borrow().clone()
    }

    /// Navigation targets so far, in order
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.nodes
            .iter()
            .filter_map(|&node| self.html.tree.get(node).and_then(ElementRef::wrap))
    }

    fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        let node = *self.nodes.get(id.0)?;
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }

    fn index_of(&self, element: ElementRef<'_>) -> Option<ElementId> {
        self.positions.get(&element.id()).copied().map(ElementId)
    }

    fn stale(id: ElementId) -> Error {
        Error::StaleElement { element: id.0 }
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("location", &self.location.borrow())
            .field("scroll_height", &self.scroll_height.get())
            .finish_non_exhaustive()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::selector(selector, e.to_string()))
}

/// Last value of `property` in the element's inline style
fn style_value(element: ElementRef<'_>, property: &str) -> Option<String> {
    let style = element.value().attr("style")?;
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| {
            value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_lowercase()
        })
        .last()
}

fn is_rendered(element: ElementRef<'_>) -> bool {
    let tag = element.value().name();
    !(NON_RENDERED.contains(&tag)
        || element.value().attr("hidden").is_some()
        || style_value(element, "display").as_deref() == Some("none"))
}

fn parse_px(value: Option<String>) -> Option<f64> {
    value?.trim().trim_end_matches("px").trim().parse().ok()
}

fn parse_opacity(value: &str) -> Option<f32> {
    match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok().map(|p| p / 100.0),
        None => value.parse().ok(),
    }
}

impl Document for HtmlDocument {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .elements()
            .enumerate()
            .filter(|(_, e)| selector.matches(e))
            .map(|(i, _)| ElementId(i))
            .collect())
    }

    fn query_selector_all_within(
        &self,
        scope: ElementId,
        selector: &str,
    ) -> Result<Vec<ElementId>> {
        let selector = parse_selector(selector)?;
        let scope = self.element(scope).ok_or_else(|| Self::stale(scope))?;
        Ok(scope
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|e| selector.matches(e))
            .filter_map(|e| self.index_of(e))
            .collect())
    }

    fn matches(&self, element: ElementId, selector: &str) -> Result<bool> {
        let selector = parse_selector(selector)?;
        let element = self.element(element).ok_or_else(|| Self::stale(element))?;
        Ok(selector.matches(&element))
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.elements()
            .position(|e| e.value().id() == Some(id))
            .map(ElementId)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self
            .element(element)?
            .ancestors()
            .find_map(ElementRef::wrap)?;
        self.index_of(parent)
    }

    fn contains(&self, element: ElementId) -> bool {
        self.element(element).is_some()
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        self.element(element).map(|e| e.value().name().to_string())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?
            .value()
            .attr(name)
            .map(str::to_string)
    }

    fn text_content(&self, element: ElementId) -> String {
        self.element(element)
            .map(|e| e.text().collect())
            .unwrap_or_default()
    }

    fn href(&self, element: ElementId) -> Option<String> {
        let element = self.element(element)?;
        if !HREF_ELEMENTS.contains(&element.value().name()) {
            return None;
        }
        let raw = element.value().attr("href")?;
        let resolved = match Url::parse(&self.location.borrow()) {
            Ok(base) => base.join(raw.trim()),
            Err(_) => Url::parse(raw.trim()),
        };
        resolved.ok().map(|u| u.to_string())
    }

    fn computed_style(&self, element: ElementId) -> ComputedStyle {
        let Some(element) = self.element(element) else {
            return ComputedStyle::default();
        };

        let mut style = ComputedStyle::default();
        let lineage: Vec<ElementRef<'_>> = std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .collect();

        if lineage.iter().any(|e| !is_rendered(*e)) {
            style.display = "none".to_string();
        } else if let Some(display) = style_value(element, "display") {
            style.display = display;
        }

        // visibility inherits from the nearest element that sets it
        if let Some(visibility) = lineage.iter().find_map(|e| style_value(*e, "visibility")) {
            style.visibility = visibility;
        }

        if let Some(opacity) = style_value(element, "opacity").and_then(|v| parse_opacity(&v)) {
            style.opacity = opacity;
        }

        style
    }

    fn bounding_box(&self, element: ElementId) -> BoundingBox {
        if self.computed_style(element).display == "none" {
            return BoundingBox::default();
        }
        let Some(element) = self.element(element) else {
            return BoundingBox::default();
        };

        let width = parse_px(style_value(element, "width"));
        let height = parse_px(style_value(element, "height"));

        let has_content = SELF_SIZED.contains(&element.value().name())
            || element.text().any(|t| !t.trim().is_empty())
            || element.children().any(|c| c.value().is_element());

        if has_content {
            BoundingBox::new(
                width.unwrap_or(DEFAULT_WIDTH),
                height.unwrap_or(DEFAULT_HEIGHT),
            )
        } else {
            BoundingBox::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
        }
    }

    fn disabled_property(&self, element: ElementId) -> bool {
        let Some(element) = self.element(element) else {
            return false;
        };
        if !FORM_CONTROLS.contains(&element.value().name()) {
            return false;
        }
        element.value().attr("disabled").is_some()
            || element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().name() == "fieldset" && a.value().attr("disabled").is_some())
    }

    fn dispatch_click(&self, element: ElementId) -> Result<()> {
        if !self.contains(element) {
            return Err(Self::stale(element));
        }
        debug!("Click dispatched on element {}", element);
        self.clicks.borrow_mut().push(element);
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        let target = Url::parse(&self.location.borrow())
            .and_then(|base| base.join(url))
            .map_err(|e| Error::navigation(url, e.to_string()))?;
        debug!("Navigating to {}", target);
        self.navigations.borrow_mut().push(target.to_string());
        *self.location.borrow_mut() = target.to_string();
        Ok(())
    }

    fn location(&self) -> String {
        self.location.borrow().clone()
    }

    fn body_scroll_height(&self) -> u64 {
        self.scroll_height.get()
    }
}
