//! Runs scenarios one session at a time and collects a report

use crate::{browser::{Session, SuiteConfig},
            error::E2eError,
            scenarios::Scenario};
use serde::Serialize;
use std::{any::Any,
          fs,
          panic::{self, AssertUnwindSafe},
          path::{Path, PathBuf},
          time::{Duration, Instant}};

/// Result of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

/// Outcomes of a whole run, in execution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit status for this report
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Executes scenarios, each in a session of its own
#[derive(Debug, Clone)]
pub struct Runner {
    config: SuiteConfig,
    screenshot_dir: Option<PathBuf>,
}

impl Runner {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config, screenshot_dir: None }
    }

    /// Save a PNG of the page to `dir` whenever a scenario fails
    pub fn screenshots(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = Some(dir.into());
        self
    }

    pub fn run(&self, scenarios: &[Scenario]) -> SuiteReport {
        let outcomes = scenarios.iter().map(|scenario| self.run_one(scenario)).collect();
        SuiteReport { outcomes }
    }

    pub fn run_one(&self, scenario: &Scenario) -> ScenarioOutcome {
        let started = Instant::now();
        log::info!("Running {}", scenario.name);

        let (failure, screenshot) = match Session::acquire(&self.config) {
            Err(e) => (Some(e.to_string()), None),
            Ok(session) => {
                let failure = match panic::catch_unwind(AssertUnwindSafe(|| (scenario.run)(&session))) {
                    Ok(Ok(())) => None,
                    Ok(Err(e)) => Some(e.to_string()),
                    Err(payload) => Some(format!("Scenario panicked: {}", panic_message(payload.as_ref()))),
                };

                let screenshot = match (&failure, &self.screenshot_dir) {
                    (Some(_), Some(dir)) => save_screenshot(&session, dir, scenario.name),
                    _ => None,
                };

                session.release();
                (failure, screenshot)
            }
        };

        let outcome = ScenarioOutcome {
            name: scenario.name.to_string(),
            passed: failure.is_none(),
            failure,
            duration_ms: whole_millis(started.elapsed()),
            screenshot,
        };

        match &outcome.failure {
            None => log::info!("PASS {} ({} ms)", outcome.name, outcome.duration_ms),
            Some(reason) => log::error!("FAIL {} ({} ms): {}", outcome.name, outcome.duration_ms, reason),
        }

        outcome
    }
}

/// Capture the page into `<dir>/<name>.png`. Failures are logged, not
/// reported, so the scenario's own failure reason is kept.
fn save_screenshot(session: &Session, dir: &Path, name: &str) -> Option<PathBuf> {
    let path = screenshot_path(dir, name);

    let written = session.screenshot().and_then(|png| {
        fs::create_dir_all(dir)
            .and_then(|_| fs::write(&path, png))
            .map_err(|e| E2eError::interaction("write screenshot", e))
    });

    match written {
        Ok(()) => {
            log::info!("Saved screenshot to {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::warn!("Could not save screenshot for {}: {}", name, e);
            None
        }
    }
}

/// Milliseconds in `elapsed`, saturating instead of wrapping
fn whole_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn screenshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.png", name))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
