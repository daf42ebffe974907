use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for wireless ADB setup.
pub type AdbResult<T> = Result<T, AdbError>;

/// Coarse classification of fatal conditions, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ToolMissing,
    Discovery,
    ModeSwitch,
    HandshakeTimeout,
    InteractionAborted,
    Io,
}

/// The error type for all wireless ADB operations.
#[derive(Debug, Error)]
pub enum AdbError {
    #[error("Invalid port '{value}'. Must be 1-65535.")]
    InvalidPort { value: String },

    #[error("Port {value} out of range. Must be 1-65535.")]
    PortOutOfRange { value: u64 },

    #[error("Invalid reverse port '{token}'. Must be port or device:host.")]
    InvalidReverseRule { token: String },

    #[error(
        "'{}' not found. Install Android SDK platform-tools or pass --adb <PATH>.",
        .program.display()
    )]
    ToolMissing { program: PathBuf },

    #[error("'{}' is installed but not usable ({status}).", .program.display())]
    ToolUnusable { program: PathBuf, status: String },

    #[error("Failed to run '{command}': {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list adb devices: {output}")]
    DeviceListFailed { output: String },

    #[error("No devices found. Connect a device and enable USB debugging.")]
    NoDevices,

    #[error("Could not determine the wireless IP address of {serial}.")]
    AddressNotFound { serial: String },

    #[error("Failed to enable TCP/IP mode on {serial}: {output}")]
    ModeSwitchFailed { serial: String, output: String },

    #[error("Failed to connect to {target} within {deadline:?}: {last_output}")]
    HandshakeTimeout {
        target: String,
        deadline: Duration,
        last_output: String,
    },

    #[error("Interrupted")]
    InteractionAborted,
}

impl AdbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdbError::InvalidPort { .. }
            | AdbError::PortOutOfRange { .. }
            | AdbError::InvalidReverseRule { .. } => ErrorKind::Validation,
            AdbError::ToolMissing { .. } | AdbError::ToolUnusable { .. } => ErrorKind::ToolMissing,
            AdbError::CommandFailed { .. } => ErrorKind::Io,
            AdbError::DeviceListFailed { .. }
            | AdbError::NoDevices
            | AdbError::AddressNotFound { .. } => ErrorKind::Discovery,
            AdbError::ModeSwitchFailed { .. } => ErrorKind::ModeSwitch,
            AdbError::HandshakeTimeout { .. } => ErrorKind::HandshakeTimeout,
            AdbError::InteractionAborted => ErrorKind::InteractionAborted,
        }
    }

    /// Map a spawn failure onto the error the operator should see.
    /// A missing binary is reported as such rather than as a raw I/O error.
    pub fn from_spawn(program: &std::path::Path, command: String, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AdbError::ToolMissing {
                program: program.to_path_buf(),
            }
        } else {
            AdbError::CommandFailed { command, source }
        }
    }
}
