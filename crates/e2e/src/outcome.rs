//! Case verdicts, recorded statuses and suite results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::E2eError;

/// What a case body concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseVerdict {
    Passed { note: String },
    /// An expected form or element was absent because of leftover session state
    Skipped { reason: String },
}

impl CaseVerdict {
    pub fn passed(note: impl Into<String>) -> Self {
        CaseVerdict::Passed { note: note.into() }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        CaseVerdict::Skipped {
            reason: reason.into(),
        }
    }
}

/// How the runner recorded a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Skipped { reason: String },
    /// Assertion mismatch
    Failed { reason: String },
    /// Anything else: missing element, browser error, deadline
    Errored { reason: String },
}

impl CaseStatus {
    pub fn from_run(result: Result<CaseVerdict, E2eError>) -> Self {
        match result {
            Ok(CaseVerdict::Passed { .. }) => CaseStatus::Passed,
            Ok(CaseVerdict::Skipped { reason }) => CaseStatus::Skipped { reason },
            Err(e) if e.is_assertion() => CaseStatus::Failed {
                reason: e.to_string(),
            },
            Err(e) => CaseStatus::Errored {
                reason: e.to_string(),
            },
        }
    }

    /// Passed and skipped cases do not fail the suite
    pub fn is_success(&self) -> bool {
        matches!(self, CaseStatus::Passed | CaseStatus::Skipped { .. })
    }
}

/// Result of running a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub number: u8,
    pub name: String,
    #[serde(flatten)]
    pub status: CaseStatus,
    pub duration_ms: u64,
}

/// Result of running the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<CaseResult>,
}

impl TestSuiteResult {
    pub fn new(base_url: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            base_url: base_url.to_string(),
            total: 0,
            passed: 0,
            failed: 0,
            errored: 0,
            skipped: 0,
            duration_ms: 0,
            results: Vec::new(),
        }
    }

    /// Tally and keep a case result
    pub fn record(&mut self, result: CaseResult) {
        self.total += 1;
        match result.status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Skipped { .. } => self.skipped += 1,
            CaseStatus::Failed { .. } => self.failed += 1,
            CaseStatus::Errored { .. } => self.errored += 1,
        }
        self.results.push(result);
    }

    pub fn success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    pub fn status_of(&self, number: u8) -> Option<&CaseStatus> {
        self.results
            .iter()
            .find(|r| r.number == number)
            .map(|r| &r.status)
    }
}

/// Observable result of submitting a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// A native dialog opened within the wait; it has been accepted
    Dialog(String),
    /// No dialog, and the browser ended up on a different URL
    Redirect(String),
    /// No dialog, same URL as before the submission
    Content(String),
}

impl SubmissionOutcome {
    pub fn dialog_text(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Dialog(text) => Some(text),
            _ => None,
        }
    }
}
