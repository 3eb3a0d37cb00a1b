//! Student Management System E2E Suite
//!
//! This crate drives a headless browser against a deployed Student
//! Management System and checks registration, login, session-gated
//! pages, logout and a handful of markup assumptions:
//! - Talks to the browser over WebDriver (chromedriver)
//! - Optionally spawns a disposable app server and the driver itself
//! - Runs a fixed, ordered catalog of cases with a per-case preamble
//! - Tolerates leftover session state by recording skips, not failures
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TestRunner                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  start fixtures  -> ServerHandle (app server, chromedriver) │
//! │  connect         -> WebDriverSession (impl Session)         │
//! │  for case in CATALOG (ascending):                           │
//! │      TestContext::preamble()   logout, goto base, settle    │
//! │      Case::run(&mut ctx)       -> CaseVerdict               │
//! │      classify                  -> CaseStatus                │
//! │  quit session, stop fixtures                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SubmissionOutcome = Dialog(text)                           │
//! │                    | Redirect(url)                          │
//! │                    | Content(url)                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cases;
pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod selectors;
pub mod server;
pub mod session;
pub mod webdriver;

pub use cases::{Case, CATALOG};
pub use config::{BrowserConfig, RunnerConfig, Timing};
pub use context::TestContext;
pub use error::{E2eError, E2eResult};
pub use outcome::{CaseResult, CaseStatus, CaseVerdict, SubmissionOutcome, TestSuiteResult};
pub use runner::TestRunner;
pub use session::{Locator, PageElement, Session};
