//! # todomvc-e2e
//!
//! Browser-driven end-to-end checks for TodoMVC-style applications, over the
//! Chrome DevTools Protocol (CDP).
//!
//! ## Running the suite
//!
//! ```bash
//! # Against an app on http://localhost:3000
//! cargo run --bin todomvc-e2e
//!
//! # Somewhere else, headless, with screenshots of failures
//! BASE_URL=http://localhost:8080 cargo run --bin todomvc-e2e -- --headless --screenshots target/e2e
//!
//! # The same scenarios as individual tests
//! cargo test -- --ignored
//! ```
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use todomvc_e2e::{SuiteConfig, with_session};
//! use todomvc_e2e::todo::{Expect, add_item, labels_of, list_items, open};
//!
//! # fn main() -> todomvc_e2e::Result<()> {
//! let config = SuiteConfig::from_env()?;
//!
//! let labels = with_session(&config, |session| {
//!     open(session, "/")?;
//!     add_item(session, "Buy milk")?;
//!     labels_of(&list_items(session, Expect::Count(1))?, Expect::Any)
//! })?;
//!
//! assert_eq!(labels, vec!["Buy milk"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: session lifecycle and configuration
//! - [`wait`]: expected conditions and bounded polling
//! - [`todo`]: selectors, interaction helpers and the page object
//! - [`scenarios`]: the scenarios themselves
//! - [`runner`]: runs scenarios and reports outcomes
//! - [`error`]: error types and result alias

pub mod browser;
pub mod error;
pub mod runner;
pub mod scenarios;
pub mod todo;
pub mod wait;

pub use browser::{BrowserKind, Session, SuiteConfig, with_session};
pub use error::{E2eError, Result, expect_eq};
pub use runner::{Runner, ScenarioOutcome, SuiteReport};
pub use scenarios::Scenario;
pub use wait::{Condition, DomProbe};
