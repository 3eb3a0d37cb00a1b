//! Per-suite test context: the browser handle plus the helpers cases share

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Timing;
use crate::error::{E2eError, E2eResult};
use crate::identity::{GeneratedIdentity, IdentityFactory};
use crate::outcome::SubmissionOutcome;
use crate::session::{Locator, PageElement, Session};

pub struct TestContext {
    session: Box<dyn Session>,
    base_url: String,
    timing: Timing,
    identities: IdentityFactory,
}

impl TestContext {
    pub fn new(session: Box<dyn Session>, base_url: &str, timing: Timing) -> Self {
        Self {
            session,
            base_url: base_url.to_string(),
            timing,
            identities: IdentityFactory::new(),
        }
    }

    pub fn with_identities(mut self, identities: IdentityFactory) -> Self {
        self.identities = identities;
        self
    }

    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path below the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Fresh identity with an email unused in this run
    pub fn identity(&mut self, name: &str, password: &str) -> GeneratedIdentity {
        self.identities.identity(name, password)
    }

    /// Reset towards an anonymous session and land on the base URL.
    ///
    /// The logout request is best-effort. The remote server is shared, so
    /// the session may still be authenticated afterwards; that is logged and
    /// left to the cases' skip handling.
    pub async fn preamble(&self) -> E2eResult<()> {
        if let Err(e) = self.session.goto(&self.url("logout.php")).await {
            warn!("Logout before case failed: {}", e);
        }
        sleep(self.timing.logout_settle).await;

        self.open_base().await?;

        let markup = self.session.page_source().await?;
        if !markup.contains("register.php") {
            warn!("Landing page has no registration form; session may still be authenticated");
        }
        Ok(())
    }

    /// Navigate to the base URL and let the page settle
    pub async fn open_base(&self) -> E2eResult<()> {
        self.session.goto(&self.base_url).await?;
        sleep(self.timing.page_settle).await;
        Ok(())
    }

    pub async fn settle(&self, duration: Duration) {
        sleep(duration).await;
    }

    /// First element matching `locator`; its absence is an error
    pub async fn find(&self, locator: &Locator) -> E2eResult<Box<dyn PageElement>> {
        self.find_optional(locator)
            .await?
            .ok_or_else(|| E2eError::ElementNotFound(locator.to_string()))
    }

    /// First element matching `locator`, if any
    pub async fn find_optional(&self, locator: &Locator) -> E2eResult<Option<Box<dyn PageElement>>> {
        Ok(self.session.find_all(locator).await?.into_iter().next())
    }

    pub async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<Box<dyn PageElement>>> {
        self.session.find_all(locator).await
    }

    pub async fn is_displayed(&self, locator: &Locator) -> E2eResult<bool> {
        self.find(locator).await?.is_displayed().await
    }

    /// Type `text` into the first element matching `locator`
    pub async fn fill(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        self.find(locator).await?.send_keys(text).await
    }

    pub async fn current_url(&self) -> E2eResult<String> {
        self.session.current_url().await
    }

    pub async fn page_source(&self) -> E2eResult<String> {
        self.session.page_source().await
    }

    /// Poll for a native dialog for up to `timeout`. When one opens its text
    /// is read and the dialog accepted.
    pub async fn wait_for_dialog(&self, timeout: Duration) -> E2eResult<Option<String>> {
        let start = Instant::now();
        loop {
            if let Some(text) = self.session.alert_text().await? {
                debug!("Dialog: {}", text);
                self.session.accept_alert().await?;
                return Ok(Some(text));
            }
            if start.elapsed() >= timeout {
                debug!("No dialog within {:?}", timeout);
                return Ok(None);
            }
            sleep(self.timing.dialog_poll).await;
        }
    }

    /// Click `button` and classify what the page did
    pub async fn submit(
        &self,
        button: &dyn PageElement,
        dialog_wait: Duration,
    ) -> E2eResult<SubmissionOutcome> {
        let before = self.session.current_url().await?;
        button.click().await?;

        if let Some(text) = self.wait_for_dialog(dialog_wait).await? {
            return Ok(SubmissionOutcome::Dialog(text));
        }

        let url = self.session.current_url().await?;
        if url != before {
            return Ok(SubmissionOutcome::Redirect(url));
        }
        Ok(SubmissionOutcome::Content(url))
    }

    /// Release the browser session
    pub async fn close(&self) -> E2eResult<()> {
        self.session.quit().await
    }
}
