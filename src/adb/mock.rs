// Scripted bridge used by unit and scenario tests
use super::error::{AdbError, AdbResult};
use super::types::{Bridge, CommandOutput, Outcome};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub args: Vec<String>,
    pub target: Option<String>,
    pub timeout: Option<Duration>,
}

impl Call {
    pub fn line(&self) -> String {
        self.args.join(" ")
    }
}

struct Script {
    target: Option<String>,
    args: String,
    // The last queued response repeats once the queue is drained.
    responses: VecDeque<Outcome>,
}

/// A `Bridge` that answers from scripted responses and records every call.
/// Unscripted commands exit with status 1 and no output.
#[derive(Default)]
pub struct MockBridge {
    scripts: RefCell<Vec<Script>>,
    calls: RefCell<Vec<Call>>,
    tool_missing: bool,
}

pub fn ok(stdout: &str) -> Outcome {
    Outcome::Completed(CommandOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub fn fail(code: i32, stderr: &str) -> Outcome {
    Outcome::Completed(CommandOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

pub fn timed_out() -> Outcome {
    Outcome::TimedOut(Duration::ZERO)
}

impl MockBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the availability check fail as if `adb` were not installed.
    pub fn missing_tool(mut self) -> Self {
        self.tool_missing = true;
        self
    }

    /// Script a response for `args` regardless of target.
    pub fn on(self, args: &str, response: Outcome) -> Self {
        self.push(None, args, response)
    }

    /// Script a response for `args` sent to a specific serial.
    pub fn on_device(self, serial: &str, args: &str, response: Outcome) -> Self {
        self.push(Some(serial), args, response)
    }

    fn push(self, target: Option<&str>, args: &str, response: Outcome) -> Self {
        {
            let mut scripts = self.scripts.borrow_mut();
            let existing = scripts
                .iter_mut()
                .find(|s| s.args == args && s.target.as_deref() == target);
            match existing {
                Some(script) => script.responses.push_back(response),
                None => scripts.push(Script {
                    target: target.map(str::to_string),
                    args: args.to_string(),
                    responses: VecDeque::from([response]),
                }),
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_starting_with(&self, first: &str) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) == Some(first))
            .cloned()
            .collect()
    }

    fn respond(&self, call: &Call) -> Outcome {
        let line = call.line();
        let mut scripts = self.scripts.borrow_mut();
        // Target-specific scripts win over target-agnostic ones.
        let index = scripts
            .iter()
            .position(|s| s.args == line && s.target.is_some() && s.target == call.target)
            .or_else(|| {
                scripts
                    .iter()
                    .position(|s| s.args == line && s.target.is_none())
            });
        match index {
            Some(i) => {
                let responses = &mut scripts[i].responses;
                if responses.len() > 1 {
                    responses.pop_front().unwrap_or_else(|| fail(1, ""))
                } else {
                    responses.front().cloned().unwrap_or_else(|| fail(1, ""))
                }
            }
            None => fail(1, ""),
        }
    }
}

impl Bridge for MockBridge {
    async fn ensure_available(&self) -> AdbResult<()> {
        if self.tool_missing {
            return Err(AdbError::ToolMissing {
                program: "adb".into(),
            });
        }
        Ok(())
    }

    async fn run(
        &self,
        args: &[&str],
        target: Option<&str>,
        timeout: Option<Duration>,
    ) -> AdbResult<Outcome> {
        let call = Call {
            args: args.iter().map(|a| a.to_string()).collect(),
            target: target.map(str::to_string),
            timeout,
        };
        self.calls.borrow_mut().push(call.clone());
        match self.respond(&call) {
            // Timeouts consume the caller's budget so deadline logic can be
            // exercised on a paused clock.
            Outcome::TimedOut(_) => {
                let limit = timeout.unwrap_or(Duration::ZERO);
                tokio::time::sleep(limit).await;
                Ok(Outcome::TimedOut(limit))
            }
            completed => Ok(completed),
        }
    }
}
