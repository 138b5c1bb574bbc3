//! Browser session management and configuration

pub mod config;
mod probe;
pub mod session;

pub use config::{BrowserKind, SuiteConfig};
pub use session::{Session, with_session};
