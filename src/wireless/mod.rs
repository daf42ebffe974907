// Wireless setup workflow: tool check, connection, reverse forwarding.
pub mod console;
pub mod fsm;
pub mod select;
pub mod types;


pub use console::{Console, StdConsole};
pub use fsm::Orchestrator;
pub use types::{Candidate, ConnectState, Report, Session};

use crate::adb::{AdbResult, Bridge, ReverseRule, RuleOutcome, apply_reverse_rules};
use crate::config::Config;

fn describe_rules(rules: &[ReverseRule]) -> String {
    rules
        .iter()
        .map(ReverseRule::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the whole workflow. Forwarding failures are reported as warnings
/// and never turn a connected session into an error.
pub async fn run<B: Bridge, C: Console>(
    bridge: &B,
    console: &mut C,
    config: &Config,
) -> AdbResult<Report> {
    bridge.ensure_available().await?;

    let session = Orchestrator::new(bridge, &mut *console, config.handshake)
        .establish(config)
        .await?;

    let mut forwards = Vec::new();
    if !config.reverse.is_empty() {
        console.status(&format!(
            "Setting up reverse forwarding on ports {}",
            describe_rules(&config.reverse)
        ));
        forwards = apply_reverse_rules(bridge, &session.target, &config.reverse).await;
        for outcome in &forwards {
            if let RuleOutcome::Failed { rule, reason } = outcome {
                console.warn(&format!(
                    "Failed to reverse port {}: {reason}",
                    rule.device_port
                ));
            }
        }
    }

    if session.came_from_usb && !session.already_connected {
        console.status("You can now disconnect the USB cable.");
    }

    Ok(Report { session, forwards })
}
