// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Pagewalk
//!
//! Heuristic next-page discovery and traversal for rendered listing pages.
//!
//! ## Features
//!
//! - **Cascading Locator**: six matchers run in priority order, first valid hit wins
//! - **Multilingual Patterns**: "next" and "load more" in a dozen languages, extendable via YAML
//! - **Visibility Gate**: hidden, zero-size and disabled controls are never returned
//! - **State Inspection**: current page, total pages, next/previous availability
//! - **Traversal**: navigate by URL, or click and wait for content to materialize
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::{HtmlDocument, PaginationLocator, TraversalController, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let doc = HtmlDocument::parse(&html, "https://shop.example/list")?;
//!
//!     let locator = PaginationLocator::with_defaults()?;
//!     let candidate = locator.locate(&doc);
//!
//!     let controller = TraversalController::default();
//!     let advanced = controller.advance(&doc, candidate.as_ref()).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      PaginationLocator                          │
//! │  locate() → Option<Candidate>   evaluate_all() → Vec<Report>    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Rel    │   Text    │  Aria / Class │ Numbered  │  Infinite   │
//! ├──────────┴───────────┴───────────────┴───────────┴─────────────┤
//! │        ElementValidator  ·  extract_text  ·  extract_url        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │             Document (HtmlDocument over scraper)                │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                     TraversalController::advance
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Locator configuration and pattern compilation
pub mod config;

/// Document capability abstraction
pub mod dom;

/// Next-page location strategies
pub mod pagination;

/// Page transition execution
pub mod traversal;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{load_config, load_config_from_str, LocatorConfig, SelectionPolicy};
pub use dom::{Document, ElementId, HtmlDocument};
pub use error::{Error, Result};
pub use pagination::{
    NextPageCandidate, PaginationLocator, PaginationState, PaginationStateInspector,
    StrategyKind,
};
pub use traversal::{TraversalController, WaitOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
