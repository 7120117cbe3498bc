use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code reported when the child could not be spawned or awaited
pub const SPAWN_FAILURE_EXIT_CODE: i32 = -1;

/// Captured result of one external process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ProcessOutput {
    /// ffprobe is treated as failed whenever it wrote to stderr,
    /// whatever its exit code was.
    pub fn has_error_output(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// Executes an external command and captures its output.
///
/// Implementations never fail: a missing executable or an abnormal exit is
/// reported through the returned [`ProcessOutput`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> ProcessOutput;
}

/// Default runner backed by `tokio::process`.
///
/// The child is not killed when the awaiting future is dropped, so a caller
/// that abandons a probe (e.g. through a timeout) leaves ffprobe running
/// until it exits on its own.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> ProcessOutput {
        debug!("Executing process: {} {:?}", program, args);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", program, e);
                return ProcessOutput {
                    stdout: String::new(),
                    stderr: format!("Failed to execute {}: {}", program, e),
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                };
            }
        };

        // Both pipes are drained concurrently while the child runs.
        match child.wait_with_output().await {
            Ok(output) => {
                let exit_code = output.status.code().unwrap_or(SPAWN_FAILURE_EXIT_CODE);
                debug!("{} exited with code {}", program, exit_code);
                ProcessOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code,
                }
            }
            Err(e) => {
                warn!("Failed to wait for {}: {}", program, e);
                ProcessOutput {
                    stdout: String::new(),
                    stderr: format!("Failed to wait for {}: {}", program, e),
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                }
            }
        }
    }
}
