// Types for the wireless connection workflow
use crate::adb::{Device, RuleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectState {
    Unstarted,
    Discovering,
    AwaitingSelection,
    ModeSwitching,
    Connecting,
    Connected,
    Failed,
}

impl ConnectState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectState::Connected | ConnectState::Failed)
    }
}

/// A device offered to the operator, with its resolved display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub device: Device,
    pub name: String,
}

/// The confirmed connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// `ip:port`, usable as an adb serial.
    pub target: String,
    /// `None` when the device was addressed by `--ip` only.
    pub name: Option<String>,
    pub already_connected: bool,
    pub came_from_usb: bool,
}

impl Session {
    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} at {}", self.target),
            None => self.target.clone(),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub session: Session,
    pub forwards: Vec<RuleOutcome>,
}
