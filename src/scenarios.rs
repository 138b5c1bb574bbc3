//! The end-to-end scenarios, each run against its own fresh session
//!
//! Every scenario opens the application, drives it through the helpers and
//! compares what the page shows with literal expectations. A mismatch is an
//! [`E2eError::Assertion`](crate::E2eError::Assertion).

use crate::{browser::Session,
            error::{Result, expect_eq},
            todo::{Expect, Filter, add_item, apply_filter, clear_completed, delete_item, is_completed, labels_of,
                   list_items, open, remaining_count, selectors, toggle_complete},
            wait::Condition};

/// A named scenario
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub run: fn(&Session) -> Result<()>,
}

const SCENARIOS: &[Scenario] = &[
    Scenario { name: "add_single_todo_is_visible", run: add_single_todo_is_visible },
    Scenario { name: "add_multiple_todos", run: add_multiple_todos },
    Scenario { name: "mark_todo_completed_updates_class_and_counter", run: mark_todo_completed_updates_class_and_counter },
    Scenario { name: "filter_active_shows_only_active_todos", run: filter_active_shows_only_active_todos },
    Scenario { name: "filter_completed_shows_only_completed_todos", run: filter_completed_shows_only_completed_todos },
    Scenario { name: "clear_completed_removes_completed_items", run: clear_completed_removes_completed_items },
    Scenario { name: "delete_todo_removes_it_from_list", run: delete_todo_removes_it_from_list },
    Scenario { name: "filter_all_twice_shows_same_items", run: filter_all_twice_shows_same_items },
    Scenario { name: "toggle_twice_restores_active_state", run: toggle_twice_restores_active_state },
    Scenario { name: "delete_removes_exactly_one_item", run: delete_removes_exactly_one_item },
    Scenario { name: "clear_completed_spares_items_added_later", run: clear_completed_spares_items_added_later },
];

/// Every scenario, in the order the runner executes them
pub fn all() -> &'static [Scenario] {
    SCENARIOS
}

/// Look a scenario up by name
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.name == name)
}

fn add_all(session: &Session, texts: &[&str]) -> Result<()> {
    for (added, text) in texts.iter().enumerate() {
        add_item(session, text)?;
        list_items(session, Expect::Count(added + 1))?;
    }
    Ok(())
}

fn shows_completed(row: &str) -> Expect {
    Condition::has_class(row, selectors::COMPLETED_CLASS).into()
}

fn shows_active(row: &str) -> Expect {
    Condition::lacks_class(row, selectors::COMPLETED_CLASS).into()
}

/// Toggle the item at `position` and check that its row shows as completed
fn complete(session: &Session, count: usize, position: usize) -> Result<()> {
    let items = list_items(session, Expect::Count(count))?;
    let item = &items[position];
    toggle_complete(item)?;
    expect_eq("item completed", true, is_completed(item, shows_completed(&item.selector()))?)
}

/// Labels once exactly `count` rows are rendered
fn labels(session: &Session, count: usize) -> Result<Vec<String>> {
    labels_of(&list_items(session, Expect::Count(count))?, Expect::Any)
}

pub fn add_single_todo_is_visible(session: &Session) -> Result<()> {
    open(session, "/")?;

    add_item(session, "Buy milk")?;

    expect_eq("labels", vec!["Buy milk".to_string()], labels(session, 1)?)
}

pub fn add_multiple_todos(session: &Session) -> Result<()> {
    open(session, "/")?;

    add_all(session, &["Task 1", "Task 2", "Task 3"])?;

    let labels = labels(session, 3)?;
    expect_eq("labels", vec!["Task 1", "Task 2", "Task 3"], labels.iter().map(String::as_str).collect())
}

pub fn mark_todo_completed_updates_class_and_counter(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["Learn Selenium", "Write tests"])?;

    let items = list_items(session, Expect::Count(2))?;
    toggle_complete(&items[0])?;

    expect_eq("first item completed", true, is_completed(&items[0], shows_completed(&items[0].selector()))?)?;
    expect_eq("second item completed", false, is_completed(&items[1], Expect::Any)?)?;

    let remaining = remaining_count(session, Condition::text_equals(selectors::REMAINING_COUNT, "1").into())?;
    expect_eq("remaining count", 1, remaining)
}

pub fn filter_active_shows_only_active_todos(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["Active task", "Completed task"])?;
    complete(session, 2, 1)?;

    apply_filter(session, Filter::Active)?;

    expect_eq("labels", vec!["Active task".to_string()], labels(session, 1)?)
}

pub fn filter_completed_shows_only_completed_todos(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["Active task", "Completed task"])?;
    complete(session, 2, 1)?;

    apply_filter(session, Filter::Completed)?;

    expect_eq("labels", vec!["Completed task".to_string()], labels(session, 1)?)
}

pub fn clear_completed_removes_completed_items(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["Keep me", "Remove me"])?;
    complete(session, 2, 1)?;

    expect_eq("clear completed clicked", true, clear_completed(session)?)?;

    expect_eq("labels", vec!["Keep me".to_string()], labels(session, 1)?)
}

pub fn delete_todo_removes_it_from_list(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_item(session, "Delete this")?;

    let items = list_items(session, Expect::Count(1))?;
    expect_eq("item count", 1, items.len())?;

    delete_item(&items[0])?;

    let remaining = list_items(session, Expect::Count(0))?;
    expect_eq("item count after delete", 0, remaining.len())
}

pub fn filter_all_twice_shows_same_items(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["First", "Second"])?;
    complete(session, 2, 0)?;

    apply_filter(session, Filter::All)?;
    let once = labels(session, 2)?;

    apply_filter(session, Filter::All)?;
    let twice = labels(session, 2)?;

    expect_eq("labels after applying All twice", once, twice)
}

pub fn toggle_twice_restores_active_state(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_item(session, "Round trip")?;

    let items = list_items(session, Expect::Count(1))?;
    let row = items[0].selector();
    expect_eq("completed before toggling", false, is_completed(&items[0], Expect::Any)?)?;

    toggle_complete(&items[0])?;
    expect_eq("completed after toggling once", true, is_completed(&items[0], shows_completed(&row))?)?;

    toggle_complete(&items[0])?;
    expect_eq("completed after toggling twice", false, is_completed(&items[0], shows_active(&row))?)
}

pub fn delete_removes_exactly_one_item(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["Alpha", "Beta", "Gamma"])?;

    let items = list_items(session, Expect::Count(3))?;
    delete_item(&items[1])?;

    expect_eq("labels", vec!["Alpha".to_string(), "Gamma".to_string()], labels(session, 2)?)
}

pub fn clear_completed_spares_items_added_later(session: &Session) -> Result<()> {
    open(session, "/")?;
    add_all(session, &["Done already", "Still open"])?;
    complete(session, 2, 0)?;

    expect_eq("clear completed clicked", true, clear_completed(session)?)?;
    list_items(session, Expect::Count(1))?;

    add_item(session, "Added later")?;
    expect_eq("labels", vec!["Still open".to_string(), "Added later".to_string()], labels(session, 2)?)?;

    // Nothing is completed now, so clearing is a no-op
    expect_eq("clear completed clicked", false, clear_completed(session)?)
}
