//! Browser session seam
//!
//! Cases only ever see these traits. [`crate::webdriver::WebDriverSession`]
//! implements them over a real browser; tests plug in an in-memory page.

use std::fmt;

use async_trait::async_trait;

use crate::error::E2eResult;

/// How an element is located on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// `name` attribute
    Name(String),
    XPath(String),
    /// Tag name, e.g. `h2`
    Tag(String),
    /// Single class name, e.g. `container`
    ClassName(String),
}

impl Locator {
    pub fn name(value: &str) -> Self {
        Locator::Name(value.to_string())
    }

    pub fn xpath(value: &str) -> Self {
        Locator::XPath(value.to_string())
    }

    pub fn tag(value: &str) -> Self {
        Locator::Tag(value.to_string())
    }

    pub fn class(value: &str) -> Self {
        Locator::ClassName(value.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Name(v) => write!(f, "name={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
            Locator::Tag(v) => write!(f, "tag={}", v),
            Locator::ClassName(v) => write!(f, "class={}", v),
        }
    }
}

/// One element of the current page
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn is_displayed(&self) -> E2eResult<bool>;

    /// Rendered text
    async fn text(&self) -> E2eResult<String>;

    /// Attribute value; `None` when absent. Boolean attributes read as `"true"`.
    async fn attr(&self, name: &str) -> E2eResult<Option<String>>;

    async fn send_keys(&self, text: &str) -> E2eResult<()>;

    async fn click(&self) -> E2eResult<()>;
}

/// A live browser session
#[async_trait]
pub trait Session: Send + Sync {
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn title(&self) -> E2eResult<String>;

    async fn current_url(&self) -> E2eResult<String>;

    /// Serialized markup of the current page
    async fn page_source(&self) -> E2eResult<String>;

    /// Every element matching `locator`; empty when nothing matches.
    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<Box<dyn PageElement>>>;

    /// Text of the open native dialog, `None` when there is none.
    async fn alert_text(&self) -> E2eResult<Option<String>>;

    async fn accept_alert(&self) -> E2eResult<()>;

    /// Release the browser. Further calls are invalid.
    async fn quit(&self) -> E2eResult<()>;
}
