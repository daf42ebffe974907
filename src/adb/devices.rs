// Device directory: what is attached, and what to call it
use super::error::{AdbError, AdbResult};
use super::types::{Bridge, Device, Outcome, READY_STATUS, Transport};
use std::collections::BTreeSet;
use std::time::Duration;

const PROP_QUERY_TIMEOUT: Duration = Duration::from_secs(5);
const UNKNOWN_MODEL: &str = "Unknown";

/// Ready devices partitioned by transport. USB order follows `adb devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSet {
    pub usb: Vec<Device>,
    pub network: BTreeSet<Device>,
}

impl DeviceSet {
    pub fn is_empty(&self) -> bool {
        self.usb.is_empty() && self.network.is_empty()
    }

    /// Whether `target` (`ip:port`) is already attached over the network.
    pub fn has_network_target(&self, target: &str) -> bool {
        self.network.iter().any(|d| d.serial == target)
    }
}

/// Only `<serial> device` lines count; headers, `unauthorized`, `offline` and
/// `-l` style lines with extra fields are ignored.
pub fn parse_devices(output: &str) -> DeviceSet {
    let mut set = DeviceSet::default();
    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 2 || parts[1] != READY_STATUS {
            continue;
        }
        let device = Device::new(parts[0]);
        match device.transport {
            Transport::Network => {
                set.network.insert(device);
            }
            Transport::Usb => set.usb.push(device),
        }
    }
    set
}

pub async fn list_devices<B: Bridge>(bridge: &B) -> AdbResult<DeviceSet> {
    match bridge.run(&["devices"], None, None).await? {
        Outcome::Completed(out) if out.success() => {
            let set = parse_devices(&out.stdout);
            log::info!(
                "Found {} USB and {} network device(s)",
                set.usb.len(),
                set.network.len()
            );
            Ok(set)
        }
        Outcome::Completed(out) => Err(AdbError::DeviceListFailed {
            output: out.combined(),
        }),
        Outcome::TimedOut(limit) => Err(AdbError::DeviceListFailed {
            output: format!("timed out after {limit:?}"),
        }),
    }
}

/// Combine independently fetched brand/model into a display name.
pub fn merge_name(brand: Option<&str>, model: Option<&str>) -> String {
    let model = model.filter(|m| !m.is_empty()).unwrap_or(UNKNOWN_MODEL);
    match brand.filter(|b| !b.is_empty()) {
        Some(brand) => format!("{brand} {model}"),
        None => model.to_string(),
    }
}

async fn query_prop<B: Bridge>(bridge: &B, serial: &str, prop: &str) -> Option<String> {
    match bridge
        .shell(serial, &["getprop", prop], PROP_QUERY_TIMEOUT)
        .await
    {
        Ok(outcome) => {
            let value = outcome.success_stdout().filter(|v| !v.is_empty());
            if value.is_none() {
                log::warn!("No value for {prop} on {serial}: {outcome:?}");
            }
            value.map(str::to_string)
        }
        Err(e) => {
            log::warn!("Query for {prop} on {serial} failed: {e}");
            None
        }
    }
}

/// Best-effort `"<brand> <model>"`; never fails.
pub async fn resolve_name<B: Bridge>(bridge: &B, serial: &str) -> String {
    let brand = query_prop(bridge, serial, "ro.product.brand").await;
    let model = query_prop(bridge, serial, "ro.product.model").await;
    merge_name(brand.as_deref(), model.as_deref())
}
