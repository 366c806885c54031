//! Document module
//!
//! The queryable/interactive surface every locator and traversal component
//! works against.
//!
//! # Overview
//!
//! - `Document` - object-safe capability: selector queries, attribute/text/style
//!   accessors, bounding boxes, click dispatch and navigation
//! - `ElementId` - opaque handle to an element of one document
//! - `HtmlDocument` - in-memory implementation over a parsed HTML snapshot

mod html;
mod types;

pub use html::{HtmlDocument, ScrollHeight};
pub use types::{BoundingBox, ComputedStyle, Document, ElementId};
