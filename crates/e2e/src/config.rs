//! Runner, browser and timing configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::cases::Case;
use crate::error::{E2eError, E2eResult};
use crate::server::ServerConfig;

/// Deployed instance the suite targets when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://3.89.8.171/";

/// Where chromedriver listens by default.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Root URL of the application under test
    pub base_url: String,

    /// Browser session settings
    pub browser: BrowserConfig,

    /// Waits and settle delays
    pub timing: Timing,

    /// Disposable app server to start before the suite
    pub app_server: Option<ServerConfig>,

    /// chromedriver binary to spawn instead of connecting to `browser.webdriver_url`
    pub chromedriver: Option<PathBuf>,

    /// Case numbers to run; empty runs the whole catalog
    pub cases: Vec<u8>,

    /// Write the suite result as JSON here
    pub results_json: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserConfig::default(),
            timing: Timing::default(),
            app_server: None,
            chromedriver: None,
            cases: Vec::new(),
            results_json: None,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::InvalidConfig(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if !(self.browser.webdriver_url.starts_with("http://")
            || self.browser.webdriver_url.starts_with("https://"))
        {
            return Err(E2eError::InvalidConfig(format!(
                "WebDriver URL must be http(s): {}",
                self.browser.webdriver_url
            )));
        }
        if let Some(bad) = self.cases.iter().find(|n| Case::from_number(**n).is_none()) {
            return Err(E2eError::InvalidConfig(format!("no such case: {}", bad)));
        }
        Ok(())
    }
}

/// Configuration for the browser session
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub remote_debugging_port: Option<u16>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            remote_debugging_port: Some(9222),
        }
    }
}

impl BrowserConfig {
    /// Chrome command-line switches for this configuration.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless".to_string());
        }
        args.push("--no-sandbox".to_string());
        args.push("--disable-dev-shm-usage".to_string());
        args.push("--disable-gpu".to_string());
        args.push(format!("--window-size={},{}", self.window_width, self.window_height));
        if let Some(port) = self.remote_debugging_port {
            args.push(format!("--remote-debugging-port={}", port));
        }
        args
    }
}

/// Bounded waits and fixed settle delays used by the cases
#[derive(Debug, Clone)]
pub struct Timing {
    /// Implicit wait applied to element lookups
    pub implicit_wait: Duration,
    /// Dialog wait after a submission whose dialog text is asserted
    pub dialog_wait: Duration,
    /// Dialog wait after a submission whose dialog is only dismissed
    pub short_dialog_wait: Duration,
    /// Interval between dialog probes
    pub dialog_poll: Duration,
    /// Pause after requesting logout
    pub logout_settle: Duration,
    /// Pause after loading a page
    pub page_settle: Duration,
    /// Pause after submitting a form that may be blocked by validation
    pub submit_settle: Duration,
    /// Pause after logging in
    pub login_settle: Duration,
    /// Deadline for one case, preamble included
    pub case_deadline: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            implicit_wait: Duration::from_secs(10),
            dialog_wait: Duration::from_secs(10),
            short_dialog_wait: Duration::from_secs(5),
            dialog_poll: Duration::from_millis(250),
            logout_settle: Duration::from_secs(1),
            page_settle: Duration::from_secs(2),
            submit_settle: Duration::from_secs(2),
            login_settle: Duration::from_secs(3),
            case_deadline: Duration::from_secs(120),
        }
    }
}

impl Timing {
    /// No settle delays and near-instant dialog waits.
    pub fn immediate() -> Self {
        Self {
            implicit_wait: Duration::ZERO,
            dialog_wait: Duration::from_millis(20),
            short_dialog_wait: Duration::from_millis(20),
            dialog_poll: Duration::from_millis(5),
            logout_settle: Duration::ZERO,
            page_settle: Duration::ZERO,
            submit_settle: Duration::ZERO,
            login_settle: Duration::ZERO,
            case_deadline: Duration::from_secs(5),
        }
    }
}
