// Reverse port forwarding against an established session
use super::types::{Bridge, Outcome, ReverseRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Applied(ReverseRule),
    Failed { rule: ReverseRule, reason: String },
}

impl RuleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied(_))
    }
}

/// Install every rule in order against `target`. Failures are recorded per
/// rule; earlier rules are never rolled back.
pub async fn apply_reverse_rules<B: Bridge>(
    bridge: &B,
    target: &str,
    rules: &[ReverseRule],
) -> Vec<RuleOutcome> {
    let mut outcomes = Vec::with_capacity(rules.len());
    for &rule in rules {
        let device = format!("tcp:{}", rule.device_port);
        let host = format!("tcp:{}", rule.host_port);
        let outcome = match bridge.run(&["reverse", &device, &host], Some(target), None).await {
            Ok(Outcome::Completed(out)) if out.success() => RuleOutcome::Applied(rule),
            Ok(Outcome::Completed(out)) => RuleOutcome::Failed {
                rule,
                reason: out.combined(),
            },
            Ok(Outcome::TimedOut(limit)) => RuleOutcome::Failed {
                rule,
                reason: format!("timed out after {limit:?}"),
            },
            Err(e) => RuleOutcome::Failed {
                rule,
                reason: e.to_string(),
            },
        };
        match &outcome {
            RuleOutcome::Applied(_) => log::info!("Reverse {device} -> {host} on {target}"),
            RuleOutcome::Failed { reason, .. } => {
                log::warn!("Reverse {device} -> {host} on {target} failed: {reason}")
            }
        }
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::mock::{MockBridge, fail, ok};

    fn rule(device_port: u16, host_port: u16) -> ReverseRule {
        ReverseRule {
            device_port,
            host_port,
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let bridge = MockBridge::new()
            .on("reverse tcp:3000 tcp:3000", fail(1, "error: more than one device/emulator"))
            .on("reverse tcp:8080 tcp:9090", ok("8080\n"));
        let rules = [rule(3000, 3000), rule(8080, 9090)];

        let outcomes = apply_reverse_rules(&bridge, "10.0.0.5:5555", &rules).await;

        assert_eq!(
            outcomes,
            vec![
                RuleOutcome::Failed {
                    rule: rule(3000, 3000),
                    reason: "error: more than one device/emulator".to_string()
                },
                RuleOutcome::Applied(rule(8080, 9090)),
            ],
            "first failure is recorded and the second rule still applies"
        );
        let calls = bridge.calls();
        assert_eq!(calls.len(), 2, "one reverse call per rule");
        assert!(
            calls
                .iter()
                .all(|c| c.target.as_deref() == Some("10.0.0.5:5555")),
            "rules target the wireless session"
        );
    }

    #[tokio::test]
    async fn test_rules_are_applied_in_input_order() {
        let bridge = MockBridge::new()
            .on("reverse tcp:4000 tcp:4000", ok(""))
            .on("reverse tcp:1 tcp:65535", ok(""));
        let outcomes =
            apply_reverse_rules(&bridge, "10.0.0.5:5555", &[rule(4000, 4000), rule(1, 65535)]).await;
        assert!(outcomes.iter().all(RuleOutcome::is_applied), "all rules applied: {outcomes:?}");
        let lines: Vec<String> = bridge.calls().iter().map(|c| c.line()).collect();
        assert_eq!(
            lines,
            vec!["reverse tcp:4000 tcp:4000", "reverse tcp:1 tcp:65535"],
            "rules run in the order given"
        );
    }
}
