use super::error::{AdbError, AdbResult};
use super::types::{Bridge, CommandOutput, Outcome};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Bridge client backed by the external `adb` binary.
#[derive(Debug, Clone)]
pub struct AdbShell {
    program: PathBuf,
}

impl Default for AdbShell {
    fn default() -> Self {
        Self::new("adb")
    }
}

impl AdbShell {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn describe(&self, args: &[&str], target: Option<&str>) -> String {
        let mut parts = vec![self.program.display().to_string()];
        if let Some(serial) = target {
            parts.push("-s".to_string());
            parts.push(serial.to_string());
        }
        parts.extend(args.iter().map(|a| a.to_string()));
        parts.join(" ")
    }
}

impl Bridge for AdbShell {
    async fn ensure_available(&self) -> AdbResult<()> {
        let output = Command::new(&self.program)
            .arg("version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AdbError::from_spawn(&self.program, self.describe(&["version"], None), e))?;
        if !output.status.success() {
            return Err(AdbError::ToolUnusable {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        log::debug!(
            "Using {}: {}",
            self.program.display(),
            String::from_utf8_lossy(&output.stdout).lines().next().unwrap_or("")
        );
        Ok(())
    }

    async fn run(
        &self,
        args: &[&str],
        target: Option<&str>,
        timeout: Option<Duration>,
    ) -> AdbResult<Outcome> {
        let description = self.describe(args, target);
        log::debug!("Running: {description} (timeout {timeout:?})");

        let mut cmd = Command::new(&self.program);
        if let Some(serial) = target {
            cmd.arg("-s").arg(serial);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out call drops the future; the child must not outlive it.
            .kill_on_drop(true);

        let output = cmd.output();
        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, output).await {
                Ok(result) => result,
                Err(_) => {
                    log::debug!("Timed out after {limit:?}: {description}");
                    return Ok(Outcome::TimedOut(limit));
                }
            },
            None => output.await,
        }
        .map_err(|e| AdbError::from_spawn(&self.program, description.clone(), e))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::trace!("{description} -> {:?}", result);
        Ok(Outcome::Completed(result))
    }
}
