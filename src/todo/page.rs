use crate::{browser::{Session, SuiteConfig},
            error::Result,
            todo::{filter::Filter,
                   helpers::{self, Expect, ItemHandle},
                   selectors::{ITEM_TOGGLE, REMAINING_COUNT}},
            wait::{Condition, DomProbe}};

/// Page object for the TodoMVC screen. Owns its session; every action
/// delegates to [`helpers`].
pub struct TodoPage {
    session: Session,
}

impl TodoPage {
    /// Start a fresh session for this page
    pub fn start(config: &SuiteConfig) -> Result<Self> {
        Ok(Self { session: Session::acquire(config)? })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Load the application root
    pub fn open(&self) -> Result<()> {
        helpers::open(&self.session, "/")
    }

    /// Submit a new item
    pub fn add(&self, text: &str) -> Result<()> {
        helpers::add_item(&self.session, text)
    }

    /// Switch to the "All" filter and return how many completion toggles are
    /// rendered, waiting for at least one
    pub fn show_all(&self) -> Result<usize> {
        helpers::apply_filter(&self.session, Filter::All)?;
        self.session.wait_for(&Condition::present(ITEM_TOGGLE))?;

        let toggles = self.session.tab().count(ITEM_TOGGLE)?;
        log::debug!("{} toggle(s) under the All filter", toggles);
        Ok(toggles)
    }

    pub fn items(&self, expect: Expect) -> Result<Vec<ItemHandle<'_>>> {
        helpers::list_items(&self.session, expect)
    }

    pub fn labels(&self, expect: Expect) -> Result<Vec<String>> {
        helpers::labels_of(&self.items(expect)?, Expect::Any)
    }

    /// Counter value once the counter is rendered
    pub fn remaining(&self) -> Result<usize> {
        helpers::remaining_count(&self.session, Condition::present(REMAINING_COUNT).into())
    }

    /// Release the session
    pub fn stop(self) {
        self.session.release();
    }
}
