//! Hand-off to the native build.

use async_trait::async_trait;
use common::process::{ProcessError, ToolCommand};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Builds a generated solution for one platform.
#[async_trait]
pub trait BuildInvoker: Send + Sync {
    async fn build(&self, solution: &Path, platform: &str) -> Result<(), ProcessError>;
}

/// `msbuild` from the Visual Studio developer environment.
#[derive(Debug, Clone)]
pub struct MsBuild {
    program: String,
    timeout: Option<Duration>,
}

impl MsBuild {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            program: "msbuild".into(),
            timeout,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// `msbuild <solution> /p:Platform=<platform>`
    pub fn command(&self, solution: &Path, platform: &str) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg(solution.to_string_lossy())
            .arg(format!("/p:Platform={platform}"))
            .timeout(self.timeout)
    }
}

impl Default for MsBuild {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl BuildInvoker for MsBuild {
    async fn build(&self, solution: &Path, platform: &str) -> Result<(), ProcessError> {
        info!("Building {} ({})", solution.display(), platform);
        let output = self.command(solution, platform).run().await?;
        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!("msbuild: {}", line.trim());
        }
        Ok(())
    }
}
