//! Subprocess invocation with output capture and an optional timeout.

use crate::error::{ToolError, ToolResult};
use crate::traits::CommandOutput;
use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

/// A program plus the leading arguments shared by every invocation
/// (`npx wrangler ...`).
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// `timeout_secs == 0` disables the timeout.
    pub fn new(program: impl Into<String>, base_args: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            base_args,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }

    /// Human-readable command line for logs and error messages
    pub fn describe<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> String {
        std::iter::once(self.program.clone())
            .chain(self.base_args.iter().cloned())
            .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the program with `args` appended to the base arguments and wait
    /// for it to exit.
    ///
    /// A non-zero exit is not an error here; see [`CommandOutput::success`].
    pub async fn run<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> ToolResult<CommandOutput> {
        let command_line = self.describe(args);
        log::debug!("Running: {}", command_line);

        let all_args: Vec<OsString> = self
            .base_args
            .iter()
            .map(OsString::from)
            .chain(args.iter().map(|a| a.as_ref().to_os_string()))
            .collect();

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&all_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout also reaches grandchildren
        // (`npx` runs wrangler as a separate node process).
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(|e| ToolError::Spawn {
            command: command_line.clone(),
            source: e,
        })?;
        let pid = child.id();

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    if let Some(pid) = pid {
                        kill_process_group(pid);
                    }
                    return Err(ToolError::Timeout {
                        command: command_line,
                        timeout_secs: limit.as_secs(),
                    })
                }
            },
            None => wait.await,
        }
        .map_err(|e| ToolError::Spawn {
            command: command_line.clone(),
            source: e,
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Like [`run`](Self::run), but a non-zero exit becomes
    /// [`ToolError::CommandFailed`].
    pub async fn run_checked<S: AsRef<std::ffi::OsStr>>(
        &self,
        args: &[S],
    ) -> ToolResult<CommandOutput> {
        let output = self.run(args).await?;
        if output.success {
            Ok(output)
        } else {
            Err(ToolError::CommandFailed {
                command: self.describe(args),
                exit_code: output.exit_code,
                stderr: output.diagnostics().to_string(),
            })
        }
    }
}

/// SIGKILL every process in the group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => log::warn!("Could not kill process group {}: {}", pid, e),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
