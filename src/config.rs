// Validated run configuration
use crate::adb::error::AdbResult;
use crate::adb::types::ReverseRule;
use crate::args::Args;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5555;

/// Timing of the connect handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakePolicy {
    /// Wall-clock budget for the whole retry loop.
    pub deadline: Duration,
    pub retry_interval: Duration,
    /// Upper bound for a single `adb connect`.
    pub attempt_timeout: Duration,
}

impl Default for HandshakePolicy {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(5),
            retry_interval: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Bypasses discovery when set.
    pub ip: Option<Ipv4Addr>,
    pub reverse: Vec<ReverseRule>,
    pub adb_program: PathBuf,
    pub handshake: HandshakePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ip: None,
            reverse: Vec::new(),
            adb_program: PathBuf::from("adb"),
            handshake: HandshakePolicy::default(),
        }
    }
}

impl Config {
    /// All validation happens here, before anything touches the device.
    pub fn from_args(args: &Args) -> AdbResult<Self> {
        let reverse = match &args.reverse {
            Some(list) => ReverseRule::parse_list(list)?,
            None => Vec::new(),
        };
        Ok(Self {
            port: args.port,
            ip: args.ip,
            reverse,
            adb_program: args.adb.clone(),
            handshake: HandshakePolicy::default(),
        })
    }
}
