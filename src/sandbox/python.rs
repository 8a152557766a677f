//! Local Python interpreter sandbox.
//!
//! Spawns one long-lived interpreter running a small driver that reads a
//! JSON request per line (`{"code": "..."}`) and answers with one JSON
//! execution record per line. Globals persist between requests. The trailing
//! expression of a block becomes a text result and open matplotlib figures
//! are reported as charts.

use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use super::CodeSandbox;
use crate::config::Settings;
use crate::types::{Execution, ExecutionArtifact, ExecutionError, Logs};
use crate::{Error, Result};

const DRIVER: &str = include_str!("driver.py");

pub const DEFAULT_SANDBOX_TIMEOUT: Duration = Duration::from_secs(300);

/// One reply line from the driver. Output streams sit at the top level.
#[derive(Debug, Deserialize)]
struct DriverReply {
    #[serde(default)]
    stdout: Vec<String>,
    #[serde(default)]
    stderr: Vec<String>,
    #[serde(default)]
    results: Vec<ExecutionArtifact>,
    #[serde(default)]
    error: Option<ExecutionError>,
}

impl From<DriverReply> for Execution {
    fn from(reply: DriverReply) -> Self {
        Execution {
            logs: Logs {
                stdout: reply.stdout,
                stderr: reply.stderr,
            },
            results: reply.results,
            error: reply.error,
        }
    }
}

fn parse_reply(line: &str) -> Result<Execution> {
    serde_json::from_str::<DriverReply>(line)
        .map(Execution::from)
        .map_err(|e| Error::sandbox(format!("malformed driver reply: {}", e)))
}

struct DriverProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Python interpreter speaking the line-delimited JSON driver protocol.
pub struct PythonSandbox {
    process: Option<DriverProcess>,
    timeout: Duration,
}

impl std::fmt::Debug for PythonSandbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonSandbox")
            .field("pid", &self.process.as_ref().and_then(|p| p.child.id()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PythonSandbox {
    /// Start the driver under the given interpreter binary.
    pub async fn spawn(python: impl AsRef<OsStr>) -> Result<Self> {
        let python = python.as_ref();
        let mut cmd = Command::new(python);
        cmd.arg("-u").arg("-c").arg(DRIVER);
        cmd.env("MPLBACKEND", "Agg");
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            Error::sandbox(format!(
                "Failed to spawn {}: {}",
                python.to_string_lossy(),
                e
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::sandbox("interpreter stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::sandbox("interpreter stdout unavailable"))?;

        debug!(pid = child.id(), "Python sandbox started");
        Ok(Self {
            process: Some(DriverProcess {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
            timeout: DEFAULT_SANDBOX_TIMEOUT,
        })
    }

    /// Start the interpreter named in `settings` with its execution timeout.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::spawn(&settings.python)
            .await?
            .with_timeout(settings.sandbox_timeout))
    }

    /// Upper bound on a single block's run time.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    async fn round_trip(process: &mut DriverProcess, request: &str) -> Result<String> {
        process.stdin.write_all(request.as_bytes()).await?;
        process.stdin.write_all(b"\n").await?;
        process.stdin.flush().await?;

        let mut line = String::new();
        let read = process.stdout.read_line(&mut line).await?;
        if read == 0 {
            return Err(Error::sandbox("interpreter exited"));
        }
        Ok(line)
    }

    async fn shutdown(&mut self) {
        if let Some(mut process) = self.process.take() {
            if let Err(e) = process.child.kill().await {
                warn!(error = %e, "Failed to kill python sandbox");
            }
        }
    }
}

#[async_trait]
impl CodeSandbox for PythonSandbox {
    async fn run_code(&mut self, code: &str) -> Result<Execution> {
        let request = serde_json::to_string(&serde_json::json!({ "code": code }))?;
        let timeout = self.timeout;
        let process = self
            .process
            .as_mut()
            .ok_or_else(|| Error::sandbox("interpreter is not running"))?;

        let line = match tokio::time::timeout(timeout, Self::round_trip(process, &request)).await {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => {
                self.shutdown().await;
                return Err(e);
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "Code execution timed out");
                self.shutdown().await;
                return Err(Error::Timeout(timeout));
            }
        };

        let execution = parse_reply(&line)?;
        debug!(
            stdout_lines = execution.logs.stdout.len(),
            results = execution.results.len(),
            is_error = execution.is_error(),
            "Code block executed"
        );
        Ok(execution)
    }
}
