//! Traversal module
//!
//! Executes a located next-page candidate.
//!
//! # Features
//!
//! - **Navigation**: candidates with a URL trigger a full page navigation
//! - **Click + wait**: load-more and click-only candidates are clicked, then
//!   the body height is polled until it grows or the wait times out
//! - **Cancellation**: waits accept a `CancellationToken`

mod controller;

pub use controller::{TraversalController, WaitOutcome};

#[cfg(test)]
mod tests;
