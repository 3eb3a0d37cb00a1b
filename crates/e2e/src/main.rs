//! Student Management System E2E suite - entry point
//!
//! Runs the whole catalog against the deployed instance with no flags.
//! Exit code: 0 all passed or skipped, 1 a case failed, 2 setup error.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sms_e2e::config::{BrowserConfig, DEFAULT_BASE_URL, DEFAULT_WEBDRIVER_URL};
use sms_e2e::report::{print_summary, rule, write_results};
use sms_e2e::server::ServerConfig;
use sms_e2e::{RunnerConfig, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "sms-e2e")]
#[command(about = "Browser E2E suite for the Student Management System")]
struct Args {
    /// Root URL of the application under test
    #[arg(long, env = "SMS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// WebDriver endpoint to connect to
    #[arg(long, env = "SMS_WEBDRIVER_URL", default_value = DEFAULT_WEBDRIVER_URL)]
    webdriver_url: String,

    /// Spawn this chromedriver binary instead of using --webdriver-url
    #[arg(long, env = "SMS_CHROMEDRIVER")]
    chromedriver: Option<PathBuf>,

    /// Start a disposable app server with this command before the suite
    #[arg(long, env = "SMS_SERVE_CMD")]
    serve_cmd: Option<String>,

    /// Run only these case numbers (repeatable)
    #[arg(long = "case")]
    cases: Vec<u8>,

    /// Show the browser window
    #[arg(long)]
    no_headless: bool,

    /// Write results as JSON to this path
    #[arg(long)]
    results_json: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> anyhow::Result<bool> {
    let app_server = match &args.serve_cmd {
        Some(cmd) => Some(ServerConfig::app_server(cmd, &args.base_url)?),
        None => None,
    };

    let config = RunnerConfig {
        base_url: args.base_url,
        browser: BrowserConfig {
            webdriver_url: args.webdriver_url,
            headless: !args.no_headless,
            ..Default::default()
        },
        app_server,
        chromedriver: args.chromedriver,
        cases: args.cases,
        results_json: args.results_json,
        ..Default::default()
    };

    println!("Starting Student Management System Test Suite...");
    println!("{}", rule());

    let mut runner = TestRunner::with_config(config);
    let results = runner.run().await?;

    print_summary(&results);

    if let Some(path) = &runner.config().results_json {
        write_results(&results, path)?;
    }

    Ok(results.success())
}
