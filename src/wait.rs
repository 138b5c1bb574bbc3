//! Expected conditions and bounded polling
//!
//! The browser renders asynchronously relative to the commands sent to it, so
//! every read that follows a mutation goes through [`wait_for`]: a named
//! [`Condition`] is checked against the live page until it holds or the
//! timeout elapses.

use crate::error::{E2eError, Result};
use std::{fmt,
          thread,
          time::{Duration, Instant}};

/// Read-only view of a rendered page, enough to evaluate a [`Condition`]
pub trait DomProbe {
    /// Number of elements matching `selector`
    fn count(&self, selector: &str) -> Result<usize>;

    /// Whether the first element matching `selector` exists and is rendered
    fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Trimmed text of the first element matching `selector`
    fn text(&self, selector: &str) -> Result<Option<String>>;

    /// Class list of the first element matching `selector`
    fn classes(&self, selector: &str) -> Result<Option<Vec<String>>>;
}

/// A named predicate over the page used to bound a wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Present(String),
    Visible(String),
    TextEquals { selector: String, text: String },
    CountEquals { selector: String, count: usize },
    HasClass { selector: String, class: String },
    LacksClass { selector: String, class: String },
}

impl Condition {
    pub fn present(selector: impl Into<String>) -> Self {
        Self::Present(selector.into())
    }

    pub fn visible(selector: impl Into<String>) -> Self {
        Self::Visible(selector.into())
    }

    pub fn text_equals(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self::TextEquals { selector: selector.into(), text: text.into() }
    }

    pub fn count_equals(selector: impl Into<String>, count: usize) -> Self {
        Self::CountEquals { selector: selector.into(), count }
    }

    pub fn has_class(selector: impl Into<String>, class: impl Into<String>) -> Self {
        Self::HasClass { selector: selector.into(), class: class.into() }
    }

    pub fn lacks_class(selector: impl Into<String>, class: impl Into<String>) -> Self {
        Self::LacksClass { selector: selector.into(), class: class.into() }
    }

    /// Evaluate once against the current page
    pub fn is_met<P: DomProbe + ?Sized>(&self, probe: &P) -> Result<bool> {
        match self {
            Self::Present(selector) => Ok(probe.count(selector)? > 0),
            Self::Visible(selector) => probe.is_visible(selector),
            Self::TextEquals { selector, text } => Ok(probe.text(selector)?.as_deref() == Some(text.as_str())),
            Self::CountEquals { selector, count } => Ok(probe.count(selector)? == *count),
            Self::HasClass { selector, class } => {
                Ok(probe.classes(selector)?.is_some_and(|classes| classes.iter().any(|c| c == class)))
            }
            // A missing element does not satisfy "lacks class": the row must still be there
            Self::LacksClass { selector, class } => {
                Ok(probe.classes(selector)?.is_some_and(|classes| classes.iter().all(|c| c != class)))
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(selector) => write!(f, "presence of '{}'", selector),
            Self::Visible(selector) => write!(f, "visibility of '{}'", selector),
            Self::TextEquals { selector, text } => write!(f, "text of '{}' to equal {:?}", selector, text),
            Self::CountEquals { selector, count } => write!(f, "{} element(s) matching '{}'", count, selector),
            Self::HasClass { selector, class } => write!(f, "'{}' to have class '{}'", selector, class),
            Self::LacksClass { selector, class } => write!(f, "'{}' to lose class '{}'", selector, class),
        }
    }
}

/// Poll `check` until it yields a value or `timeout` elapses.
///
/// `E2eError::Evaluation` from `check` counts as "not yet" (the page may be
/// mid-navigation); any other error is returned immediately.
pub fn poll_until<T, F>(description: &str, timeout: Duration, interval: Duration, mut check: F) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    let started = Instant::now();
    let mut last_error: Option<E2eError> = None;

    loop {
        match check() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(E2eError::Evaluation(reason)) => {
                log::debug!("Probe for {} failed, retrying: {}", description, reason);
                last_error = Some(E2eError::Evaluation(reason));
            }
            Err(e) => return Err(e),
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            let condition = match last_error {
                Some(e) => format!("{} (last error: {})", description, e),
                None => description.to_string(),
            };
            return Err(E2eError::Timeout { condition, waited: elapsed });
        }

        thread::sleep(interval.min(timeout - elapsed));
    }
}

/// Block until `condition` holds on `probe`, failing with
/// [`E2eError::Timeout`] after `timeout`
pub fn wait_for<P: DomProbe + ?Sized>(
    probe: &P,
    condition: &Condition,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let description = condition.to_string();
    poll_until(&description, timeout, interval, || Ok(condition.is_met(probe)?.then_some(())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::{Cell, RefCell},
              collections::HashMap};

    /// In-memory page: each selector maps to a list of rows, each row a
    /// (text, classes) pair. `script` applies mutations after N probes.
    #[derive(Default)]
    struct FakePage {
        rows: RefCell<HashMap<String, Vec<(String, Vec<String>)>>>,
        hidden: RefCell<Vec<String>>,
        probes: Cell<usize>,
        script: RefCell<Vec<(usize, Box<dyn Fn(&FakePage)>)>>,
        fail_first: Cell<usize>,
    }

    impl FakePage {
        fn set(&self, selector: &str, rows: &[(&str, &[&str])]) {
            let rows = rows
                .iter()
                .map(|(text, classes)| (text.to_string(), classes.iter().map(|c| c.to_string()).collect()))
                .collect();
            self.rows.borrow_mut().insert(selector.to_string(), rows);
        }

        fn after(&self, probes: usize, action: impl Fn(&FakePage) + 'static) {
            self.script.borrow_mut().push((probes, Box::new(action)));
        }

        fn tick(&self) -> Result<()> {
            let n = self.probes.get() + 1;
            self.probes.set(n);
            let due: Vec<_> = {
                let mut script = self.script.borrow_mut();
                let (due, rest): (Vec<_>, Vec<_>) = script.drain(..).partition(|(at, _)| *at <= n);
                *script = rest;
                due
            };
            for (_, action) in due {
                action(self);
            }
            if self.fail_first.get() > 0 {
                self.fail_first.set(self.fail_first.get() - 1);
                return Err(E2eError::Evaluation("Execution context was destroyed".to_string()));
            }
            Ok(())
        }

        fn first(&self, selector: &str) -> Option<(String, Vec<String>)> {
            self.rows.borrow().get(selector).and_then(|rows| rows.first().cloned())
        }
    }

    impl DomProbe for FakePage {
        fn count(&self, selector: &str) -> Result<usize> {
            self.tick()?;
            Ok(self.rows.borrow().get(selector).map_or(0, |rows| rows.len()))
        }

        fn is_visible(&self, selector: &str) -> Result<bool> {
            self.tick()?;
            Ok(self.first(selector).is_some() && !self.hidden.borrow().iter().any(|s| s == selector))
        }

        fn text(&self, selector: &str) -> Result<Option<String>> {
            self.tick()?;
            Ok(self.first(selector).map(|(text, _)| text))
        }

        fn classes(&self, selector: &str) -> Result<Option<Vec<String>>> {
            self.tick()?;
            Ok(self.first(selector).map(|(_, classes)| classes))
        }
    }

    const FAST: Duration = Duration::from_millis(1);

    #[test]
    fn test_present_and_count_conditions() {
        let page = FakePage::default();
        page.set("ul.todo-list li", &[("Task 1", &[]), ("Task 2", &[])]);

        assert!(Condition::present("ul.todo-list li").is_met(&page).unwrap());
        assert!(!Condition::present("button.clear-completed").is_met(&page).unwrap());
        assert!(Condition::count_equals("ul.todo-list li", 2).is_met(&page).unwrap());
        assert!(Condition::count_equals("button.clear-completed", 0).is_met(&page).unwrap());
    }

    #[test]
    fn test_visibility_requires_rendered_element() {
        let page = FakePage::default();
        page.set("input.new-todo", &[("", &[])]);
        assert!(Condition::visible("input.new-todo").is_met(&page).unwrap());

        page.hidden.borrow_mut().push("input.new-todo".to_string());
        assert!(!Condition::visible("input.new-todo").is_met(&page).unwrap());
        assert!(!Condition::visible("input.missing").is_met(&page).unwrap());
    }

    #[test]
    fn test_text_and_class_conditions() {
        let page = FakePage::default();
        page.set("span.todo-count strong", &[("1", &[])]);
        page.set("li:nth-child(1)", &[("Learn Selenium", &["completed"])]);

        assert!(Condition::text_equals("span.todo-count strong", "1").is_met(&page).unwrap());
        assert!(!Condition::text_equals("span.todo-count strong", "2").is_met(&page).unwrap());
        assert!(Condition::has_class("li:nth-child(1)", "completed").is_met(&page).unwrap());
        assert!(!Condition::lacks_class("li:nth-child(1)", "completed").is_met(&page).unwrap());
        assert!(!Condition::lacks_class("li:nth-child(9)", "completed").is_met(&page).unwrap());
    }

    #[test]
    fn test_wait_for_observes_late_update() {
        let page = FakePage::default();
        page.after(3, |p| p.set("ul.todo-list li", &[("Buy milk", &[])]));

        wait_for(&page, &Condition::count_equals("ul.todo-list li", 1), Duration::from_secs(2), FAST).unwrap();
        assert!(page.probes.get() >= 3);
    }

    #[test]
    fn test_wait_for_times_out() {
        let page = FakePage::default();
        let err = wait_for(&page, &Condition::visible("input.new-todo"), Duration::from_millis(20), FAST).unwrap_err();

        match err {
            E2eError::Timeout { condition, waited } => {
                assert_eq!(condition, "visibility of 'input.new-todo'");
                assert!(waited >= Duration::from_millis(20));
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_evaluation_errors_are_retried() {
        let page = FakePage::default();
        page.set("input.new-todo", &[("", &[])]);
        page.fail_first.set(2);

        wait_for(&page, &Condition::present("input.new-todo"), Duration::from_secs(2), FAST).unwrap();
    }

    #[test]
    fn test_timeout_reports_last_evaluation_error() {
        let page = FakePage::default();
        page.fail_first.set(usize::MAX);

        let err = wait_for(&page, &Condition::present("input.new-todo"), Duration::from_millis(10), FAST).unwrap_err();
        assert!(err.to_string().contains("Execution context was destroyed"));
    }

    #[test]
    fn test_poll_until_propagates_other_errors() {
        let mut calls = 0;
        let err = poll_until::<(), _>("row toggle", Duration::from_secs(1), FAST, || {
            calls += 1;
            Err(E2eError::ElementNotFound("input.toggle".to_string()))
        })
        .unwrap_err();

        assert_eq!(calls, 1);
        assert!(matches!(err, E2eError::ElementNotFound(_)));
    }

    #[test]
    fn test_condition_display() {
        assert_eq!(
            Condition::count_equals("ul.todo-list li", 3).to_string(),
            "3 element(s) matching 'ul.todo-list li'"
        );
        assert_eq!(
            Condition::text_equals("span.todo-count strong", "1").to_string(),
            "text of 'span.todo-count strong' to equal \"1\""
        );
    }
}
