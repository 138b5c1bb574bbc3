use crate::error::{E2eError, Result};
use clap::{ArgAction, Parser, ValueEnum, builder::BoolishValueParser};
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_IMPLICIT_WAIT: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browsers the suite knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BrowserKind {
    #[default]
    #[value(alias = "chromium")]
    Chrome,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
        }
    }
}

/// Settings for one suite run, threaded into every session it starts.
///
/// Each setting can come from a flag or from the environment variable named
/// in `--help`; flags win.
#[derive(Debug, Clone, Parser)]
#[command(name = "todomvc-e2e")]
pub struct SuiteConfig {
    /// Root URL of the application under test
    #[arg(long, env = "BASE_URL", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Floor applied to element lookups and the default bound for waits, in seconds
    #[arg(long, env = "IMPLICIT_WAIT", value_name = "SECONDS", default_value = "5", value_parser = parse_seconds)]
    pub implicit_wait: Duration,

    /// Interval between two checks of a wait condition
    #[arg(skip = DEFAULT_POLL_INTERVAL)]
    pub poll_interval: Duration,

    /// Browser to drive
    #[arg(long, env = "BROWSER", value_enum, ignore_case = true, default_value_t = BrowserKind::Chrome)]
    pub browser: BrowserKind,

    /// Run without a visible window; `--headless false` turns it off again
    #[arg(
        long,
        env = "HEADLESS",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true"
    )]
    pub headless: bool,

    /// Start headed windows maximized
    #[arg(
        long,
        env = "START_MAXIMIZED",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value = "true",
        default_missing_value = "true"
    )]
    pub start_maximized: bool,

    #[arg(skip = 1280u32)]
    pub window_width: u32,

    #[arg(skip = 800u32)]
    pub window_height: u32,

    /// Chrome binary; auto-detected when unset
    #[arg(long = "executable-path", env = "CHROME_PATH", value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Disable the Chrome sandbox (needed in some containers)
    #[arg(long = "no-sandbox", action = ArgAction::SetFalse)]
    pub sandbox: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            implicit_wait: DEFAULT_IMPLICIT_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            browser: BrowserKind::Chrome,
            headless: false,
            start_maximized: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            sandbox: true,
        }
    }
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn start_maximized(mut self, maximized: bool) -> Self {
        self.start_maximized = maximized;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Read `BASE_URL`, `IMPLICIT_WAIT`, `BROWSER`, `HEADLESS`,
    /// `START_MAXIMIZED` and `CHROME_PATH` from the process environment,
    /// ignoring the command line
    pub fn from_env() -> Result<Self> {
        Self::try_parse_from(["todomvc-e2e"]).map_err(|e| E2eError::Config(e.to_string()))
    }

    /// Join `path` onto the base URL with exactly one slash between them
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() { format!("{}/", base) } else { format!("{}/{}", base, path) }
    }
}

fn parse_seconds(raw: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = raw.trim().parse().map_err(|_| format!("'{}' is not a number of seconds", raw))?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("'{}' must be a non-negative number of seconds", raw));
    }

    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<SuiteConfig, clap::Error> {
        SuiteConfig::try_parse_from(std::iter::once("todomvc-e2e").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();

        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.implicit_wait, Duration::from_secs(5));
        assert_eq!(config.browser, BrowserKind::Chrome);
        assert!(!config.headless);
        assert!(config.start_maximized);
        assert!(config.sandbox);
    }

    #[test]
    fn test_flags_override() {
        let config = parse(&[
            "--base-url",
            "http://127.0.0.1:8080/",
            "--implicit-wait",
            "2.5",
            "--browser",
            "Chromium",
            "--headless",
            "yes",
            "--start-maximized",
            "off",
            "--no-sandbox",
        ])
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.implicit_wait, Duration::from_millis(2500));
        assert_eq!(config.browser, BrowserKind::Chrome);
        assert!(config.headless);
        assert!(!config.start_maximized);
        assert!(!config.sandbox);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!((config.window_width, config.window_height), (1280, 800));
    }

    #[test]
    fn test_headless_flag_without_value_and_switched_back() {
        assert!(parse(&["--headless"]).unwrap().headless);
        assert!(!parse(&["--headless", "false"]).unwrap().headless);
    }

    #[test]
    fn test_rejects_unknown_browser() {
        let err = parse(&["--browser", "firefox"]).unwrap_err();
        assert!(err.to_string().contains("firefox"));
    }

    #[test]
    fn test_rejects_bad_wait_and_flag() {
        assert!(parse(&["--implicit-wait", "soon"]).is_err());
        assert!(parse(&["--implicit-wait", "-1"]).is_err());
        assert!(parse(&["--headless", "maybe"]).is_err());
    }

    #[test]
    fn test_help_names_environment_variables() {
        let help = SuiteConfig::command().render_help().to_string();

        for var in ["BASE_URL", "IMPLICIT_WAIT", "BROWSER", "HEADLESS", "START_MAXIMIZED", "CHROME_PATH"] {
            assert!(help.contains(&format!("env: {}", var)), "help does not mention {}:\n{}", var, help);
        }
    }

    #[test]
    fn test_url_for_joins_single_slash() {
        let config = SuiteConfig::new().base_url("http://localhost:3000/");
        assert_eq!(config.url_for("/"), "http://localhost:3000/");
        assert_eq!(config.url_for(""), "http://localhost:3000/");
        assert_eq!(config.url_for("/#/active"), "http://localhost:3000/#/active");

        let config = SuiteConfig::new().base_url("http://localhost:3000");
        assert_eq!(config.url_for("#/completed"), "http://localhost:3000/#/completed");
    }

    #[test]
    fn test_builder() {
        let config = SuiteConfig::new().headless(true).window_size(800, 600).sandbox(false);

        assert!(config.headless);
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 600);
        assert!(!config.sandbox);
    }
}
