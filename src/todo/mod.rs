//! TodoMVC interaction layer
//!
//! - selectors: the page contract the suite relies on
//! - helpers: the one canonical set of interactions
//! - page: a page object built on the helpers

pub mod filter;
pub mod helpers;
pub mod page;
pub mod selectors;

pub use filter::Filter;
pub use helpers::{
    Expect, ItemHandle, add_item, apply_filter, clear_completed, delete_item, is_completed, labels_of, list_items,
    open, remaining_count, toggle_complete,
};
pub use page::TodoPage;
