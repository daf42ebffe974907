// Core ADB types and traits
use super::error::{AdbError, AdbResult};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Status token `adb devices` prints for a device that is ready for commands.
pub const READY_STATUS: &str = "device";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transport {
    Usb,
    Network,
}

impl Transport {
    /// Network serials are `host:port`; anything else is a USB serial.
    pub fn of(serial: &str) -> Self {
        if serial.contains(':') {
            Transport::Network
        } else {
            Transport::Usb
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Device {
    pub serial: String,
    pub transport: Transport,
}

impl Device {
    pub fn new(serial: impl Into<String>) -> Self {
        let serial = serial.into();
        let transport = Transport::of(&serial);
        Self { serial, transport }
    }
}

/// Parse a single port value: ASCII digits only, 1-65535.
pub fn parse_port(value: &str) -> AdbResult<u16> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AdbError::InvalidPort {
            value: value.to_string(),
        });
    }
    let n: u64 = value.parse().map_err(|_| AdbError::InvalidPort {
        value: value.to_string(),
    })?;
    match u16::try_from(n) {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(AdbError::PortOutOfRange { value: n }),
    }
}

/// Traffic to `device_port` on the device is routed to `host_port` on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverseRule {
    pub device_port: u16,
    pub host_port: u16,
}

impl ReverseRule {
    /// Parse a comma-separated list. Either every entry is valid or nothing is returned.
    pub fn parse_list(list: &str) -> AdbResult<Vec<ReverseRule>> {
        list.split(',').map(str::parse).collect()
    }
}

impl FromStr for ReverseRule {
    type Err = AdbError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let invalid = || AdbError::InvalidReverseRule {
            token: token.to_string(),
        };
        let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        let (device, host) = match token.split_once(':') {
            Some((device, host)) => (device, host),
            None => (token, token),
        };
        if !is_number(device) || !is_number(host) {
            return Err(invalid());
        }
        Ok(ReverseRule {
            device_port: parse_port(device)?,
            host_port: parse_port(host)?,
        })
    }
}

impl fmt::Display for ReverseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.device_port == self.host_port {
            write!(f, "{}", self.device_port)
        } else {
            write!(f, "{}:{}", self.device_port, self.host_port)
        }
    }
}

/// Captured result of a bridge process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, trimmed. adb is not consistent about which
    /// stream carries status text, so callers inspect both.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(CommandOutput),
    TimedOut(Duration),
}

impl Outcome {
    /// Trimmed stdout of a successful run, if any.
    pub fn success_stdout(&self) -> Option<&str> {
        match self {
            Outcome::Completed(out) if out.success() => Some(out.stdout.trim()),
            _ => None,
        }
    }
}

// Trait defining how commands reach the device bridge. One process per call,
// no retry at this layer.
#[allow(async_fn_in_trait)]
pub trait Bridge {
    /// Check that the bridge tool is installed and runnable.
    async fn ensure_available(&self) -> AdbResult<()> {
        Ok(())
    }

    /// Run `args` against `target` (`-s <serial>`), bounded by `timeout`.
    /// A nonzero exit is returned as data, never as an error.
    async fn run(
        &self,
        args: &[&str],
        target: Option<&str>,
        timeout: Option<Duration>,
    ) -> AdbResult<Outcome>;

    async fn shell(&self, serial: &str, command: &[&str], timeout: Duration) -> AdbResult<Outcome> {
        let mut args = Vec::with_capacity(command.len() + 1);
        args.push("shell");
        args.extend_from_slice(command);
        self.run(&args, Some(serial), Some(timeout)).await
    }
}
