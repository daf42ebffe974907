// State machine that turns a USB (or already networked) device into a
// confirmed wireless session.
use super::console::Console;
use super::select;
use super::types::{Candidate, ConnectState, Session};
use crate::adb::{
    AdbError, AdbResult, Bridge, Device, Outcome, list_devices, resolve_name,
    resolve_wireless_address,
};
use crate::config::{Config, HandshakePolicy};
use tokio::time::{Instant, sleep};

const CONNECTED_MARKERS: [&str; 2] = ["connected to", "already connected"];

/// `adb connect` prints "failed to connect to", which must not match.
pub fn is_connected(output: &str) -> bool {
    CONNECTED_MARKERS.iter().any(|m| output.contains(m))
}

pub struct Orchestrator<'a, B: Bridge, C: Console> {
    bridge: &'a B,
    console: &'a mut C,
    policy: HandshakePolicy,
    state: ConnectState,
}

impl<'a, B: Bridge, C: Console> Orchestrator<'a, B, C> {
    pub fn new(bridge: &'a B, console: &'a mut C, policy: HandshakePolicy) -> Self {
        Self {
            bridge,
            console,
            policy,
            state: ConnectState::Unstarted,
        }
    }

    pub fn state(&self) -> ConnectState {
        self.state
    }

    // Connected and Failed are final.
    fn transition(&mut self, next: ConnectState) {
        if self.state == next || self.state.is_terminal() {
            return;
        }
        log::debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub async fn establish(&mut self, config: &Config) -> AdbResult<Session> {
        let result = self.drive(config).await;
        match &result {
            Ok(session) => {
                log::info!("Session ready: {session:?}");
                self.transition(ConnectState::Connected);
            }
            Err(e) => {
                log::debug!("Connection failed ({:?}): {e}", e.kind());
                self.transition(ConnectState::Failed);
            }
        }
        result
    }

    async fn drive(&mut self, config: &Config) -> AdbResult<Session> {
        if let Some(ip) = config.ip {
            let target = format!("{ip}:{}", config.port);
            self.handshake(&target).await?;
            self.console.status(&format!("Connected to {target}"));
            return Ok(Session {
                target,
                name: None,
                already_connected: false,
                came_from_usb: false,
            });
        }

        self.transition(ConnectState::Discovering);
        let devices = list_devices(self.bridge).await?;
        if devices.is_empty() {
            return Err(AdbError::NoDevices);
        }

        if !devices.usb.is_empty() {
            let chosen = self.select(&devices.usb, "Multiple devices found:").await?;
            // Resolve before tcpip: some devices lose the address once USB mode drops.
            let ip = resolve_wireless_address(self.bridge, &chosen.device.serial).await?;
            let target = format!("{ip}:{}", config.port);

            if devices.has_network_target(&target) {
                let session = Session {
                    target,
                    name: Some(chosen.name),
                    already_connected: true,
                    came_from_usb: true,
                };
                self.console
                    .status(&format!("Already connected to {}", session.describe()));
                return Ok(session);
            }

            self.console.status(&format!(
                "Setting up wireless ADB on {} port {}",
                chosen.name, config.port
            ));
            self.switch_to_tcpip(&chosen.device.serial, config.port).await?;
            self.handshake(&target).await?;
            let session = Session {
                target,
                name: Some(chosen.name),
                already_connected: false,
                came_from_usb: true,
            };
            self.console
                .status(&format!("Connected to {}", session.describe()));
            return Ok(session);
        }

        let targets: Vec<Device> = devices.network.iter().cloned().collect();
        let chosen = self
            .select(&targets, "Multiple wireless devices found:")
            .await?;
        let session = Session {
            target: chosen.device.serial,
            name: Some(chosen.name),
            already_connected: true,
            came_from_usb: false,
        };
        self.console
            .status(&format!("Already connected to {}", session.describe()));
        Ok(session)
    }

    /// A single candidate is taken as-is; several go to the operator.
    async fn select(&mut self, devices: &[Device], heading: &str) -> AdbResult<Candidate> {
        let mut candidates = Vec::with_capacity(devices.len());
        for device in devices {
            let name = resolve_name(self.bridge, &device.serial).await;
            candidates.push(Candidate {
                device: device.clone(),
                name,
            });
        }
        if candidates.len() == 1 {
            return Ok(candidates.remove(0));
        }

        self.transition(ConnectState::AwaitingSelection);
        let index = select::choose(&mut *self.console, heading, &candidates).await?;
        self.transition(ConnectState::Discovering);
        Ok(candidates.swap_remove(index))
    }

    async fn switch_to_tcpip(&mut self, serial: &str, port: u16) -> AdbResult<()> {
        self.transition(ConnectState::ModeSwitching);
        let port = port.to_string();
        let failed = |output: String| AdbError::ModeSwitchFailed {
            serial: serial.to_string(),
            output,
        };
        match self.bridge.run(&["tcpip", &port], Some(serial), None).await? {
            Outcome::Completed(out) => {
                let output = out.combined();
                if !out.success() || output.to_lowercase().contains("error") {
                    return Err(failed(output));
                }
                log::info!("{serial}: {output}");
                Ok(())
            }
            Outcome::TimedOut(limit) => Err(failed(format!("timed out after {limit:?}"))),
        }
    }

    /// Retry `adb connect` until it reports success or the deadline passes.
    /// Attempt timeouts and sleeps are clamped to the remaining budget.
    async fn handshake(&mut self, target: &str) -> AdbResult<()> {
        self.transition(ConnectState::Connecting);
        self.console.status(&format!("Connecting to {target}..."));

        let deadline = Instant::now() + self.policy.deadline;
        let mut attempt = 0u32;
        let mut last_output: String;
        loop {
            attempt += 1;
            let remaining = deadline.saturating_duration_since(Instant::now());
            let limit = self.policy.attempt_timeout.min(remaining);
            match self.bridge.run(&["connect", target], None, Some(limit)).await? {
                Outcome::Completed(out) => {
                    last_output = out.combined();
                    if is_connected(&last_output) {
                        log::info!("Connected on attempt {attempt}: {last_output}");
                        return Ok(());
                    }
                }
                Outcome::TimedOut(_) => last_output = "connection timed out".to_string(),
            }
            log::debug!("Attempt {attempt} to connect to {target}: {last_output}");

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            sleep(self.policy.retry_interval.min(remaining)).await;
            if Instant::now() >= deadline {
                break;
            }
        }

        Err(AdbError::HandshakeTimeout {
            target: target.to_string(),
            deadline: self.policy.deadline,
            last_output,
        })
    }
}
