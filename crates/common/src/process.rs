//! External tool invocation.
//!
//! Every external program the packager drives (`makecert`, `pvk2pfx`,
//! `msbuild`) goes through [`ToolCommand`]: output is captured, a non-zero
//! exit becomes [`ProcessError::Failed`] carrying the tool's own output, and an
//! optional timeout kills the child when it expires.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Errors from running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{program} not found on PATH")]
    NotFound { program: String },
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} timed out after {}s", .after.as_secs())]
    Timeout { program: String, after: Duration },
    #[error("{program} exited with code {}: {output}", .code.map_or_else(|| "?".to_string(), |c| c.to_string()))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },
}

/// Captured output of a successful run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Builder for one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Kills the child and fails with [`ProcessError::Timeout`] once `timeout` elapses.
    /// `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Renders the command line for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }

    /// Runs the command to completion.
    pub async fn run(&self) -> Result<ToolOutput, ProcessError> {
        debug!("exec: {}", self.display());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: self.program.clone(),
                }
            } else {
                ProcessError::Spawn {
                    program: self.program.clone(),
                    source: e,
                }
            }
        })?;

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(after) => tokio::time::timeout(after, wait)
                .await
                .map_err(|_| ProcessError::Timeout {
                    program: self.program.clone(),
                    after,
                })?,
            None => wait.await,
        }
        .map_err(|e| ProcessError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(ToolOutput { stdout, stderr })
        } else {
            let combined = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            Err(ProcessError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                output: combined.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_spaced_args() {
        let cmd = ToolCommand::new("pvk2pfx").args(["/pvk", "C:/My Build/App_Key.pvk"]);
        assert_eq!(cmd.display(), r#"pvk2pfx /pvk "C:/My Build/App_Key.pvk""#);
        assert_eq!(cmd.arguments().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = ToolCommand::new("winpack-definitely-not-a-real-tool")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_captures_stdout() {
        let out = ToolCommand::new("sh")
            .args(["-c", "echo signed; echo 'warning MSB3026' >&2"])
            .run()
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "signed");
        assert_eq!(out.stderr.trim(), "warning MSB3026");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo bad key >&2; exit 3"])
            .run()
            .await
            .unwrap_err();
        match err {
            ProcessError::Failed { code, output, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let err = ToolCommand::new("sleep")
            .arg("5")
            .timeout(Some(Duration::from_millis(100)))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout { .. }));
    }
}
