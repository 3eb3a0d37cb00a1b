//! Main test runner that orchestrates fixtures, the browser session and the case catalog

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::cases::{Case, CATALOG};
use crate::config::RunnerConfig;
use crate::context::TestContext;
use crate::error::{E2eError, E2eResult};
use crate::outcome::{CaseResult, CaseStatus, CaseVerdict, TestSuiteResult};
use crate::server::{find_free_port, ServerConfig, ServerHandle};
use crate::session::Session;
use crate::webdriver::WebDriverSession;

/// Main E2E test runner
pub struct TestRunner {
    config: RunnerConfig,

    /// Disposable application instance (if any)
    app_server: Option<ServerHandle>,

    /// Spawned chromedriver (if any)
    driver: Option<ServerHandle>,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            config,
            app_server: None,
            driver: None,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Cases to run, always in catalog order
    pub fn selected_cases(&self) -> Vec<Case> {
        CATALOG
            .iter()
            .copied()
            .filter(|c| self.config.cases.is_empty() || self.config.cases.contains(&c.number()))
            .collect()
    }

    /// Start the app server and chromedriver fixtures that are configured
    pub async fn start_fixtures(&mut self) -> E2eResult<()> {
        if self.app_server.is_none() {
            if let Some(server_config) = self.config.app_server.clone() {
                self.app_server = Some(ServerHandle::spawn(server_config).await?);
            }
        }

        if self.driver.is_none() {
            if let Some(binary) = self.config.chromedriver.clone() {
                let port = find_free_port()?;
                let driver = ServerHandle::spawn(ServerConfig::chromedriver(&binary, port)).await?;

                // Point the session at the driver we just started
                self.config.browser.webdriver_url = format!("http://127.0.0.1:{}", port);
                self.driver = Some(driver);
            }
        }
        Ok(())
    }

    /// Stop fixtures in reverse start order
    pub fn stop_fixtures(&mut self) -> E2eResult<()> {
        if let Some(mut driver) = self.driver.take() {
            driver.stop()?;
        }
        if let Some(mut server) = self.app_server.take() {
            server.stop()?;
        }
        Ok(())
    }

    /// Start fixtures, open a browser and run the selected cases
    pub async fn run(&mut self) -> E2eResult<TestSuiteResult> {
        self.config.validate()?;
        self.start_fixtures().await?;

        let session = match WebDriverSession::connect(
            &self.config.browser,
            self.config.timing.implicit_wait,
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                let _ = self.stop_fixtures();
                return Err(e);
            }
        };

        Ok(self.run_then_teardown(Box::new(session)).await)
    }

    /// Run the selected cases on `session`, then stop fixtures.
    /// Teardown errors are logged; the results are kept.
    pub async fn run_then_teardown(&mut self, session: Box<dyn Session>) -> TestSuiteResult {
        let result = self.run_with_session(session).await;
        if let Err(e) = self.stop_fixtures() {
            warn!("Failed to stop fixtures: {}", e);
        }
        result
    }

    /// Run the selected cases on `session`, then quit it whatever happened
    pub async fn run_with_session(&self, session: Box<dyn Session>) -> TestSuiteResult {
        let mut ctx = TestContext::new(session, &self.config.base_url, self.config.timing.clone());
        let cases = self.selected_cases();
        let start = Instant::now();
        let mut suite = TestSuiteResult::new(&self.config.base_url, Utc::now());

        info!("Running {} case(s) against {}", cases.len(), self.config.base_url);

        for case in cases {
            let result = run_case(&mut ctx, case, self.config.timing.case_deadline).await;
            suite.record(result);
        }

        if let Err(e) = ctx.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        suite.duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} errored, {} skipped ({} ms)",
            suite.passed, suite.failed, suite.errored, suite.skipped, suite.duration_ms
        );
        suite
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_fixtures();
    }
}

async fn preamble_then_run(ctx: &mut TestContext, case: Case) -> E2eResult<CaseVerdict> {
    ctx.preamble().await?;
    case.run(ctx).await
}

/// Run one case under its deadline and record how it went
async fn run_case(ctx: &mut TestContext, case: Case, deadline: Duration) -> CaseResult {
    let start = Instant::now();
    debug!("Running {}", case.label());

    let result = match timeout(deadline, preamble_then_run(ctx, case)).await {
        Ok(result) => result,
        Err(_) => Err(E2eError::Timeout(format!(
            "{} did not finish within {:?}",
            case.label(),
            deadline
        ))),
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(CaseVerdict::Passed { note }) => {
            info!("✓ Test {} Passed: {} ({} ms)", case.number(), note, duration_ms);
        }
        Ok(CaseVerdict::Skipped { reason }) => {
            info!("↷ Test {} Skipped: {}", case.number(), reason);
        }
        Err(e) => {
            error!("✗ Test {} {} - {}", case.number(), case.name(), e);
        }
    }

    CaseResult {
        number: case.number(),
        name: case.name().to_string(),
        status: CaseStatus::from_run(result),
        duration_ms,
    }
}
