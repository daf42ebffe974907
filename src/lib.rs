pub mod adb;
pub mod args;
pub mod config;
pub mod wireless;

pub use adb::{AdbError, AdbResult, AdbShell};
pub use config::Config;
