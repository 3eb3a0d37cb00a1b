//! End-of-suite reporting

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::E2eResult;
use crate::outcome::{CaseStatus, TestSuiteResult};

const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Summary block printed after the suite
pub fn render_summary(results: &TestSuiteResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "TEST SUMMARY:");
    let _ = writeln!(out, "Tests run: {}", results.total);
    let _ = writeln!(out, "Failures: {}", results.failed);
    let _ = writeln!(out, "Errors: {}", results.errored);
    let _ = writeln!(out, "Skipped: {}", results.skipped);

    for result in &results.results {
        match &result.status {
            CaseStatus::Failed { reason } | CaseStatus::Errored { reason } => {
                let _ = writeln!(out, "  test_{:02}_{}: {}", result.number, result.name, reason);
            }
            _ => {}
        }
    }

    if results.success() {
        let _ = writeln!(out, "🎉 ALL TESTS PASSED!");
    } else {
        let _ = writeln!(out, "⚠️  Some tests failed - check the detailed output above");
    }
    let _ = write!(out, "{}", rule());
    out
}

pub fn print_summary(results: &TestSuiteResult) {
    println!("{}", render_summary(results));
}

/// Write the suite result as pretty JSON
pub fn write_results(results: &TestSuiteResult, path: &Path) -> E2eResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;

    info!("Results written to: {}", path.display());
    Ok(())
}
