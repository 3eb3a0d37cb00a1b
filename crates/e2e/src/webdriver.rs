//! WebDriver browser automation

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::ChromiumLikeCapabilities;
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::error::E2eResult;
use crate::session::{Locator, PageElement, Session};

/// Chrome session driven through a WebDriver endpoint
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Open a new browser session and apply the implicit element wait
    pub async fn connect(config: &BrowserConfig, implicit_wait: Duration) -> E2eResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in config.chrome_args() {
            caps.add_arg(&arg)?;
        }

        info!("Connecting to WebDriver at {}", config.webdriver_url);
        let driver = WebDriver::new(config.webdriver_url.clone(), caps).await?;
        driver.set_implicit_wait_timeout(implicit_wait).await?;
        debug!("Implicit wait set to {:?}", implicit_wait);

        Ok(Self { driver })
    }
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Name(v) => By::Name(v.clone()),
        Locator::XPath(v) => By::XPath(v.clone()),
        Locator::Tag(v) => By::Tag(v.clone()),
        Locator::ClassName(v) => By::ClassName(v.clone()),
    }
}

struct WebDriverElement(WebElement);

#[async_trait]
impl PageElement for WebDriverElement {
    async fn is_displayed(&self) -> E2eResult<bool> {
        Ok(self.0.is_displayed().await?)
    }

    async fn text(&self) -> E2eResult<String> {
        Ok(self.0.text().await?)
    }

    async fn attr(&self, name: &str) -> E2eResult<Option<String>> {
        Ok(self.0.attr(name.to_string()).await?)
    }

    async fn send_keys(&self, text: &str) -> E2eResult<()> {
        Ok(self.0.send_keys(text.to_string()).await?)
    }

    async fn click(&self) -> E2eResult<()> {
        Ok(self.0.click().await?)
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        Ok(self.driver.goto(url.to_string()).await?)
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.driver.title().await?)
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn page_source(&self) -> E2eResult<String> {
        Ok(self.driver.source().await?)
    }

    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<Box<dyn PageElement>>> {
        let elements = self.driver.find_all(to_by(locator)).await?;
        Ok(elements
            .into_iter()
            .map(|e| Box::new(WebDriverElement(e)) as Box<dyn PageElement>)
            .collect())
    }

    async fn alert_text(&self) -> E2eResult<Option<String>> {
        // Any failure here means "no dialog open"; the caller polls.
        match self.driver.get_alert_text().await {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                debug!("No dialog: {}", e);
                Ok(None)
            }
        }
    }

    async fn accept_alert(&self) -> E2eResult<()> {
        Ok(self.driver.accept_alert().await?)
    }

    async fn quit(&self) -> E2eResult<()> {
        info!("Closing browser session");
        Ok(self.driver.clone().quit().await?)
    }
}
