use crate::adb::types::parse_port;
use clap::{ArgAction, Parser};
use std::net::Ipv4Addr;
use std::path::PathBuf;

const EXAMPLES: &str = "\
EXAMPLES:
    adbw                          # basic wireless setup
    adbw -p 5556                  # custom port
    adbw -r 3000,8080             # with reverse port forwarding
    adbw -r 8080:9090             # device port 8080 -> host port 9090
    adbw --ip 192.168.1.42        # reconnect without USB";

/// Set up wireless ADB debugging with device selection.
#[derive(Parser, Debug)]
#[command(name = "adbw", version, after_help = EXAMPLES)]
pub struct Args {
    /// ADB port on the device.
    #[arg(short, long, value_name = "PORT", default_value = "5555", value_parser = parse_port)]
    pub port: u16,

    /// Comma-separated reverse forwards, each PORT or DEVICE_PORT:HOST_PORT.
    #[arg(short, long, value_name = "PORTS")]
    pub reverse: Option<String>,

    /// Device IP for direct reconnection (skips USB discovery).
    #[arg(long, value_name = "IP")]
    pub ip: Option<Ipv4Addr>,

    /// adb binary to invoke.
    #[arg(long, value_name = "PATH", env = "ADBW_ADB", default_value = "adb")]
    pub adb: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
