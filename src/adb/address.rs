// Wireless address resolution for a USB-attached device
use super::error::{AdbError, AdbResult};
use super::types::{Bridge, Outcome};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Conventional Android Wi-Fi interfaces, most likely first.
pub const WIRELESS_INTERFACES: [&str; 3] = ["wlan0", "wlan1", "wifi0"];

const ADDRESS_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// First valid IPv4 in an `inet <ip>/<prefix>` stanza of `ip addr show` output.
pub fn find_inet_address(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        line.match_indices("inet ").find_map(|(at, marker)| {
            let rest = &line[at + marker.len()..];
            let (candidate, _) = rest.split_once('/')?;
            candidate.parse().ok()
        })
    })
}

/// First valid IPv4 following a `src` token in `ip route` output.
pub fn find_route_source(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        tokens
            .windows(2)
            .filter(|pair| pair[0] == "src")
            .find_map(|pair| pair[1].parse().ok())
    })
}

/// Completed, successful output of a shell query; timeouts and failures
/// yield `None` so the caller moves on to its next strategy.
fn usable(outcome: Outcome, what: &str) -> Option<String> {
    match outcome {
        Outcome::Completed(out) if out.success() => Some(out.stdout),
        Outcome::Completed(out) => {
            log::debug!("{what} exited with {:?}: {}", out.code, out.combined());
            None
        }
        Outcome::TimedOut(limit) => {
            log::warn!("{what} timed out after {limit:?}");
            None
        }
    }
}

pub async fn resolve_wireless_address<B: Bridge>(bridge: &B, serial: &str) -> AdbResult<Ipv4Addr> {
    for iface in WIRELESS_INTERFACES {
        let outcome = bridge
            .shell(serial, &["ip", "addr", "show", iface], ADDRESS_QUERY_TIMEOUT)
            .await?;
        if let Some(stdout) = usable(outcome, &format!("ip addr show {iface}"))
            && let Some(ip) = find_inet_address(&stdout)
        {
            log::info!("{serial}: {iface} has address {ip}");
            return Ok(ip);
        }
    }

    let outcome = bridge
        .shell(serial, &["ip", "route"], ADDRESS_QUERY_TIMEOUT)
        .await?;
    if let Some(stdout) = usable(outcome, "ip route")
        && let Some(ip) = find_route_source(&stdout)
    {
        log::info!("{serial}: routing table source address {ip}");
        return Ok(ip);
    }

    Err(AdbError::AddressNotFound {
        serial: serial.to_string(),
    })
}
