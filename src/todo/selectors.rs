//! Affordances the suite expects the application under test to render

/// New-item text input; also the readiness marker after navigation
pub const NEW_TODO: &str = "input.new-todo";

/// One row per rendered item, in display order
pub const TODO_ITEMS: &str = "ul.todo-list li";

pub const ITEM_LABEL: &str = "label";
pub const ITEM_TOGGLE: &str = "input.toggle";
pub const ITEM_DESTROY: &str = "button.destroy";

/// Class carried by a row whose item is completed
pub const COMPLETED_CLASS: &str = "completed";

/// Number of items left to do
pub const REMAINING_COUNT: &str = "span.todo-count strong";

pub const CLEAR_COMPLETED: &str = "button.clear-completed";

/// Footer links switching between All, Active and Completed
pub const FILTER_LINKS: &str = "ul.filters a";

/// Selector for the row at zero-based `position` in the current list
pub fn item_row(position: usize) -> String {
    format!("{}:nth-child({})", TODO_ITEMS, position + 1)
}

/// Selector for `child` inside the row at `position`
pub fn item_child(position: usize, child: &str) -> String {
    format!("{} {}", item_row(position), child)
}
