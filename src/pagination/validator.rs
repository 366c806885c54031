//! Element validity gate
//!
//! Presentational check only: it does not look at scroll position or
//! whether the element is inside the viewport.

use crate::dom::{Document, ElementId};
use tracing::trace;

/// Visibility/enabled gate applied to every candidate element
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementValidator;

impl ElementValidator {
    /// Can a user see and activate `element`?
    pub fn is_valid(doc: &dyn Document, element: ElementId) -> bool {
        if !doc.contains(element) {
            trace!("Rejected {}: not in document", element);
            return false;
        }

        if doc.computed_style(element).is_hidden() {
            trace!("Rejected {}: hidden by style", element);
            return false;
        }

        if doc.bounding_box(element).is_empty() {
            trace!("Rejected {}: zero-size box", element);
            return false;
        }

        if doc.attribute(element, "disabled").is_some() || doc.disabled_property(element) {
            trace!("Rejected {}: disabled", element);
            return false;
        }

        true
    }
}
