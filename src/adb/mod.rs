// ADB module - everything that talks to the external `adb` binary.
// Discovery, address resolution and forwarding are free functions over the
// `Bridge` trait so they can run against a scripted bridge in tests.

pub mod address;
pub mod devices;
pub mod error;
pub mod forward;
pub mod shell;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

// Re-export the main types and functions for easy access
pub use address::resolve_wireless_address;
pub use devices::{DeviceSet, list_devices, resolve_name};
pub use error::{AdbError, AdbResult, ErrorKind};
pub use forward::{RuleOutcome, apply_reverse_rules};
pub use shell::AdbShell;
pub use types::{Bridge, CommandOutput, Device, Outcome, ReverseRule, Transport};
