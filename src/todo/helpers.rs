//! Stateless interactions with a TodoMVC page
//!
//! Every function here is a function of the session (or an item handle) and
//! its arguments; all state lives in the application under test. Commands
//! return as soon as they are dispatched, so reads take an [`Expect`] and
//! wait on it before touching the DOM.

use crate::{browser::Session,
            error::{E2eError, Result},
            todo::{filter::Filter, selectors::*},
            wait::{Condition, DomProbe}};
use std::fmt;

/// What the page must show before a read goes ahead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expect {
    /// Read whatever is rendered right now
    Any,
    /// Wait until exactly this many rows are rendered
    Count(usize),
    /// Wait until an arbitrary condition holds
    Until(Condition),
}

impl Expect {
    /// Condition to wait on before reading, if any
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Self::Any => None,
            Self::Count(count) => Some(Condition::count_equals(TODO_ITEMS, *count)),
            Self::Until(condition) => Some(condition.clone()),
        }
    }
}

impl From<Condition> for Expect {
    fn from(condition: Condition) -> Self {
        Self::Until(condition)
    }
}

fn settle(session: &Session, expect: &Expect) -> Result<()> {
    match expect.condition() {
        Some(condition) => session.wait_for(&condition),
        None => Ok(()),
    }
}

/// Number of rows to hand out once `expect` holds. A satisfied
/// `Expect::Count(n)` is taken as is so a later re-render cannot change it.
fn settled_rows<P: DomProbe + ?Sized>(expect: &Expect, probe: &P) -> Result<usize> {
    match expect {
        Expect::Count(count) => Ok(*count),
        _ => probe.count(TODO_ITEMS),
    }
}

/// Transient handle to the row at `position` in the currently rendered list
#[derive(Clone, Copy)]
pub struct ItemHandle<'a> {
    session: &'a Session,
    position: usize,
}

impl<'a> ItemHandle<'a> {
    pub fn position(&self) -> usize {
        self.position
    }

    /// CSS selector of this row
    pub fn selector(&self) -> String {
        item_row(self.position)
    }

    fn child(&self, child: &str) -> String {
        item_child(self.position, child)
    }
}

impl fmt::Debug for ItemHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandle").field("position", &self.position).finish()
    }
}

/// Navigate to `base_url + path` and wait for the new-item input to be visible
pub fn open(session: &Session, path: &str) -> Result<()> {
    let url = session.config().url_for(path);
    log::debug!("Opening {}", url);

    session.navigate(&url)?;
    session.wait_for(&Condition::visible(NEW_TODO))
}

/// Type `text` into the new-item input and submit it with Enter.
///
/// Does not wait for the new row to render.
pub fn add_item(session: &Session, text: &str) -> Result<()> {
    session.wait_for(&Condition::visible(NEW_TODO))?;
    let input = session.find_element(NEW_TODO)?;

    input.click().map_err(|e| E2eError::interaction("focus new item input", e))?;

    // Clear with End and Backspace so frameworks with controlled inputs see the edits
    let current_len = input
        .call_js_fn("function() { return this.value.length; }", vec![], false)
        .map_err(|e| E2eError::interaction("read new item input", e))?
        .value
        .and_then(|v| v.as_u64())
        .unwrap_or(0);

    if current_len > 0 {
        let tab = session.tab();
        tab.press_key("End").map_err(|e| E2eError::interaction("clear new item input", e))?;
        for _ in 0..current_len {
            tab.press_key("Backspace").map_err(|e| E2eError::interaction("clear new item input", e))?;
        }
    }

    input.type_into(text).map_err(|e| E2eError::interaction("type new item", e))?;
    session.tab().press_key("Enter").map_err(|e| E2eError::interaction("submit new item", e))?;

    log::debug!("Submitted item {:?}", text);
    Ok(())
}

/// Current rows in display order, once `expect` holds. No rows is an empty
/// list, not an error.
pub fn list_items(session: &Session, expect: Expect) -> Result<Vec<ItemHandle<'_>>> {
    settle(session, &expect)?;

    let count = settled_rows(&expect, session.tab().as_ref())?;
    log::debug!("Found {} item(s)", count);

    Ok((0..count).map(|position| ItemHandle { session, position }).collect())
}

/// Label text of each item, in the order given, once `expect` holds.
/// An empty slice reads nothing and so waits on nothing.
pub fn labels_of(items: &[ItemHandle<'_>], expect: Expect) -> Result<Vec<String>> {
    if let Some(first) = items.first() {
        settle(first.session, &expect)?;
    }

    let labels = items
        .iter()
        .map(|item| {
            let selector = item.child(ITEM_LABEL);
            item.session
                .tab()
                .text(&selector)?
                .ok_or_else(|| E2eError::ElementNotFound(format!("Element '{}' not found", selector)))
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!("Labels: {:?}", labels);
    Ok(labels)
}

/// Click the completion checkbox of `item`
pub fn toggle_complete(item: &ItemHandle<'_>) -> Result<()> {
    item.session
        .find_element(&item.child(ITEM_TOGGLE))?
        .click()
        .map_err(|e| E2eError::interaction("toggle item", e))?;

    log::debug!("Toggled item {}", item.position);
    Ok(())
}

/// Whether the row of `item` carries the completed class, once `expect` holds
pub fn is_completed(item: &ItemHandle<'_>, expect: Expect) -> Result<bool> {
    settle(item.session, &expect)?;

    let selector = item.selector();
    let classes = item
        .session
        .tab()
        .classes(&selector)?
        .ok_or_else(|| E2eError::ElementNotFound(format!("Element '{}' not found", selector)))?;

    Ok(classes.iter().any(|c| c == COMPLETED_CLASS))
}

/// Click the footer link for `filter`
pub fn apply_filter(session: &Session, filter: Filter) -> Result<()> {
    session.wait_for(&Condition::present(FILTER_LINKS))?;
    session
        .find_element_by_xpath(&filter.xpath())?
        .click()
        .map_err(|e| E2eError::interaction("apply filter", e))?;

    log::debug!("Applied filter {}", filter);
    Ok(())
}

/// Click "Clear completed" if it is shown. Returns whether it was clicked;
/// an absent control means there is nothing to clear.
pub fn clear_completed(session: &Session) -> Result<bool> {
    let tab = session.tab();
    if tab.count(CLEAR_COMPLETED)? == 0 || !tab.is_visible(CLEAR_COMPLETED)? {
        log::debug!("No completed items to clear");
        return Ok(false);
    }

    session.find_element(CLEAR_COMPLETED)?.click().map_err(|e| E2eError::interaction("clear completed", e))?;

    Ok(true)
}

/// Remove `item` with its destroy button
pub fn delete_item(item: &ItemHandle<'_>) -> Result<()> {
    // The destroy button is only rendered visible while the row is hovered
    item.session
        .find_element(&item.selector())?
        .move_mouse_over()
        .map_err(|e| E2eError::interaction("hover item", e))?;

    item.session.wait_for(&Condition::visible(item.child(ITEM_DESTROY)))?;
    item.session
        .find_element(&item.child(ITEM_DESTROY))?
        .click()
        .map_err(|e| E2eError::interaction("delete item", e))?;

    log::debug!("Deleted item {}", item.position);
    Ok(())
}

/// Number shown in the "items left" counter, once `expect` holds
pub fn remaining_count(session: &Session, expect: Expect) -> Result<usize> {
    settle(session, &expect)?;

    let text = session
        .tab()
        .text(REMAINING_COUNT)?
        .ok_or_else(|| E2eError::ElementNotFound(format!("Element '{}' not found", REMAINING_COUNT)))?;

    text.parse().map_err(|_| E2eError::Assertion {
        what: "remaining count".to_string(),
        expected: "a whole number".to_string(),
        actual: format!("{:?}", text),
    })
}
