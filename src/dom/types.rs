//! Document capability and element handle types

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Opaque handle to an element
///
/// Only meaningful for the document that produced it, and only until that
/// document navigates away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The slice of computed style the validity gate looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    /// Computed `display`
    pub display: String,
    /// Computed `visibility`
    pub visibility: String,
    /// Computed `opacity`
    pub opacity: f32,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        }
    }
}

impl ComputedStyle {
    /// Is the element hidden by style alone?
    pub fn is_hidden(&self) -> bool {
        self.display == "none" || self.visibility == "hidden" || self.opacity <= 0.0
    }
}

/// Layout box of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Width in CSS pixels
    pub width: f64,
    /// Height in CSS pixels
    pub height: f64,
}

impl BoundingBox {
    /// Create a bounding box
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are zero
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Queryable, interactive view of a rendered document
///
/// Selector queries return elements in document order. Everything except
/// `dispatch_click` and `navigate` is read-only.
pub trait Document {
    /// All elements matching `selector`
    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>>;

    /// All descendants of `scope` matching `selector`
    fn query_selector_all_within(&self, scope: ElementId, selector: &str)
        -> Result<Vec<ElementId>>;

    /// First element matching `selector`
    fn query_selector(&self, selector: &str) -> Result<Option<ElementId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Does `element` match `selector`?
    fn matches(&self, element: ElementId, selector: &str) -> Result<bool>;

    /// Element with the given `id` attribute
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// Parent element, if any
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Is `element` still part of this document?
    fn contains(&self, element: ElementId) -> bool;

    /// Lowercase tag name
    fn tag_name(&self, element: ElementId) -> Option<String>;

    /// Raw attribute value
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Concatenated text of the element and its descendants
    fn text_content(&self, element: ElementId) -> String;

    /// Resolved (absolute) `href` property, for elements that have one
    fn href(&self, element: ElementId) -> Option<String>;

    /// Computed style
    fn computed_style(&self, element: ElementId) -> ComputedStyle;

    /// Layout box
    fn bounding_box(&self, element: ElementId) -> BoundingBox;

    /// `disabled` DOM property (may differ from the attribute)
    fn disabled_property(&self, _element: ElementId) -> bool {
        false
    }

    /// Dispatch a click on `element`
    fn dispatch_click(&self, element: ElementId) -> Result<()>;

    /// Start a full navigation to `url`
    fn navigate(&self, url: &str) -> Result<()>;

    /// Current location
    fn location(&self) -> String;

    /// Scrollable height of the document body
    fn body_scroll_height(&self) -> u64;
}
