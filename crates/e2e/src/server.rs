//! Process fixtures - spawning and health checking helper servers
//!
//! Used for a disposable application instance and for chromedriver. Both are
//! child processes that become usable once an HTTP probe answers.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Handle to a running fixture process
pub struct ServerHandle {
    child: Child,
    name: String,
    pub health_url: String,
}

impl ServerHandle {
    /// Spawn the configured process and wait until it answers its probe
    pub async fn spawn(config: ServerConfig) -> E2eResult<Self> {
        info!("Spawning {} ({})", config.name, config.program);

        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            E2eError::ServerStartup(format!("Failed to spawn {}: {}", config.program, e))
        })?;

        let mut handle = ServerHandle {
            child,
            name: config.name.clone(),
            health_url: config.health_url.clone(),
        };

        if let Err(e) = handle.wait_for_healthy(config.startup_timeout).await {
            let _ = handle.stop();
            return Err(e);
        }

        info!("{} is healthy at {}", handle.name, handle.health_url);
        Ok(handle)
    }

    /// Wait for the process to respond to its health probe
    async fn wait_for_healthy(&mut self, timeout_duration: Duration) -> E2eResult<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            if let Some(status) = self.child.try_wait()? {
                return Err(E2eError::ServerStartup(format!(
                    "{} exited during startup with {}",
                    self.name, status
                )));
            }

            match client.get(&self.health_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Health check returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for {} to start...", self.name);
                    }
                    // Connection refused is expected while starting
                    if !e.is_connect() {
                        warn!("Health check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(E2eError::ServerHealthCheck(attempts))
    }

    /// Stop the process
    pub fn stop(&mut self) -> E2eResult<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        info!("Stopping {} (pid: {})", self.name, self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Configuration for spawning a fixture process
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Label used in logs
    pub name: String,

    pub program: String,

    pub args: Vec<String>,

    /// URL that answers 2xx once the process is ready
    pub health_url: String,

    /// Timeout for startup
    pub startup_timeout: Duration,
}

impl ServerConfig {
    /// Application server started from a whitespace-separated command line.
    pub fn app_server(command_line: &str, health_url: &str) -> E2eResult<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts
            .next()
            .ok_or_else(|| E2eError::InvalidConfig("empty server command".to_string()))?;

        Ok(Self {
            name: "app server".to_string(),
            program,
            args: parts.collect(),
            health_url: health_url.to_string(),
            startup_timeout: Duration::from_secs(30),
        })
    }

    /// chromedriver listening on `port`.
    pub fn chromedriver(binary: &Path, port: u16) -> Self {
        Self {
            name: "chromedriver".to_string(),
            program: binary.to_string_lossy().to_string(),
            args: vec![format!("--port={}", port)],
            health_url: format!("http://127.0.0.1:{}/status", port),
            startup_timeout: Duration::from_secs(30),
        }
    }
}

/// Find a free port to use
pub fn find_free_port() -> E2eResult<u16> {
    use std::net::TcpListener;

    let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    Ok(port)
}
