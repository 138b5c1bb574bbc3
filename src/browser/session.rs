use crate::{browser::config::{BrowserKind, SuiteConfig},
            error::{E2eError, Result},
            wait::{self, Condition}};
use headless_chrome::{Browser, Element, Tab, protocol::cdp::Page::CaptureScreenshotFormatOption};
use std::{ffi::OsStr,
          sync::Arc,
          time::{Duration, Instant}};

/// One live browser process bound to one scenario.
///
/// A session is released exactly once: either explicitly through
/// [`Session::release`] or, if the scenario unwinds first, on drop.
pub struct Session {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Tab the scenario drives
    tab: Arc<Tab>,

    config: SuiteConfig,

    released: bool,
}

impl Session {
    /// Launch a browser configured from `config` and open the tab scenarios drive
    pub fn acquire(config: &SuiteConfig) -> Result<Self> {
        match config.browser {
            BrowserKind::Chrome => Self::launch_chrome(config),
        }
    }

    fn launch_chrome(config: &SuiteConfig) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Keep the browser alive through long scenarios (default is 30 seconds)
        launch_opts.idle_browser_timeout = Duration::from_secs(10 * 60);

        launch_opts.headless = config.headless;
        launch_opts.window_size = Some((config.window_width, config.window_height));

        if config.start_maximized && !config.headless {
            launch_opts.args.push(OsStr::new("--start-maximized"));
        }

        if let Some(path) = &config.chrome_path {
            launch_opts.path = Some(path.clone());
        }

        launch_opts.sandbox = config.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| E2eError::SessionStart(e.to_string()))?;

        let tab = browser.new_tab().map_err(|e| E2eError::SessionStart(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(config.implicit_wait);

        log::info!(
            "Started {} session (headless: {}, implicit wait: {:?})",
            config.browser.as_str(),
            config.headless,
            config.implicit_wait
        );

        Ok(Self { browser, tab, config: config.clone(), released: false })
    }

    /// Tear the session down. Never fails: teardown problems are logged so
    /// they cannot shadow the scenario's own outcome.
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // The process itself exits when the Browser is dropped; closing the tabs
        // first lets the page unload cleanly
        match self.browser.get_tabs().lock().map(|tabs| tabs.clone()) {
            Ok(tabs) => {
                for tab in tabs {
                    if let Err(e) = tab.close(false) {
                        log::warn!("Ignoring error while closing tab: {}", e);
                    }
                }
            }
            Err(e) => log::warn!("Ignoring error while listing tabs at teardown: {}", e),
        }

        log::info!("Released {} session", self.config.browser.as_str());
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Tab the scenario drives
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the tab to `url` and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| E2eError::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;

        let started = Instant::now();
        self.tab.wait_until_navigated().map_err(|e| {
            log::debug!("Navigation to {} did not complete: {}", url, e);
            navigation_timeout(url, started.elapsed())
        })?;

        Ok(())
    }

    /// Find the first element matching `css_selector`, waiting up to the
    /// implicit wait for it to appear
    pub fn find_element(&self, css_selector: &str) -> Result<Element<'_>> {
        self.tab
            .wait_for_element_with_custom_timeout(css_selector, self.config.implicit_wait)
            .map_err(|e| E2eError::ElementNotFound(format!("Element '{}' not found: {}", css_selector, e)))
    }

    /// Find the first element matching an XPath expression, waiting up to the
    /// implicit wait for it to appear
    pub fn find_element_by_xpath(&self, xpath: &str) -> Result<Element<'_>> {
        self.tab
            .wait_for_xpath_with_custom_timeout(xpath, self.config.implicit_wait)
            .map_err(|e| E2eError::ElementNotFound(format!("Element '{}' not found: {}", xpath, e)))
    }

    /// Block until `condition` holds, bounded by the implicit wait
    pub fn wait_for(&self, condition: &Condition) -> Result<()> {
        self.wait_for_within(condition, self.config.implicit_wait)
    }

    /// Block until `condition` holds, bounded by `timeout`
    pub fn wait_for_within(&self, condition: &Condition, timeout: Duration) -> Result<()> {
        wait::wait_for(self.tab.as_ref(), condition, timeout, self.config.poll_interval)
    }

    /// Capture the visible viewport as PNG bytes
    pub fn screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| E2eError::interaction("screenshot", e))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.released {
            log::debug!("Session dropped without explicit release");
        }
        self.teardown();
    }
}

fn navigation_timeout(url: &str, waited: Duration) -> E2eError {
    E2eError::Timeout { condition: format!("navigation to {}", url), waited }
}

/// Acquire a session, hand it to `scenario`, and release it on every exit
/// path: normal return, error return, and panic.
pub fn with_session<T, F>(config: &SuiteConfig, scenario: F) -> Result<T>
where
    F: FnOnce(&Session) -> Result<T>,
{
    let session = Session::acquire(config)?;
    let outcome = scenario(&session);
    session.release();
    outcome
}
