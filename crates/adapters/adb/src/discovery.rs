//! mDNS discovery of devices announcing wireless debugging.
//!
//! Browsing runs on a blocking thread for a fixed window; announcements that
//! are withdrawn before the window closes are dropped.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use mdns_sd::{ServiceDaemon, ServiceEvent};

use lanhub_domain::device::Device;

use crate::error::AdbError;

/// One resolved service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Announcement {
    pub fullname: String,
    pub addresses: Vec<IpAddr>,
    pub port: u16,
}

/// Browse `service_type` for `window` and return what is still announced
/// when it closes.
pub(crate) async fn browse(
    service_type: String,
    window: Duration,
) -> Result<Vec<Announcement>, AdbError> {
    tokio::task::spawn_blocking(move || browse_blocking(&service_type, window)).await?
}

fn browse_blocking(service_type: &str, window: Duration) -> Result<Vec<Announcement>, AdbError> {
    let daemon = ServiceDaemon::new()?;
    let receiver = daemon.browse(service_type)?;
    let deadline = Instant::now() + window;
    let mut found: HashMap<String, Announcement> = HashMap::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let Ok(event) = receiver.recv_timeout(remaining) else {
            break;
        };
        match event {
            ServiceEvent::ServiceResolved(info) => {
                tracing::debug!(name = info.get_fullname(), "service resolved");
                found.insert(
                    info.get_fullname().to_string(),
                    Announcement {
                        fullname: info.get_fullname().to_string(),
                        addresses: info.get_addresses().iter().copied().collect(),
                        port: info.get_port(),
                    },
                );
            }
            ServiceEvent::ServiceRemoved(_, fullname) => {
                tracing::debug!(name = %fullname, "service removed");
                found.remove(&fullname);
            }
            _ => {}
        }
    }

    if let Err(err) = daemon.stop_browse(service_type) {
        tracing::debug!(error = %err, "failed to stop mDNS browse");
    }
    if let Err(err) = daemon.shutdown() {
        tracing::debug!(error = %err, "failed to shut down mDNS daemon");
    }

    Ok(found.into_values().collect())
}

/// Render `ip:port`, preferring IPv4 and bracketing IPv6.
pub(crate) fn format_address(addresses: &[IpAddr], port: u16) -> Option<String> {
    let ip = addresses
        .iter()
        .filter(|ip| ip.is_ipv4())
        .min()
        .or_else(|| addresses.iter().min())?;
    Some(match ip {
        IpAddr::V4(v4) => format!("{v4}:{port}"),
        IpAddr::V6(v6) => format!("[{v6}]:{port}"),
    })
}

/// Turn an announcement into a device record of type `device_type`.
///
/// Returns `None` for announcements without an address or instance name.
pub(crate) fn device_from_announcement(
    announcement: &Announcement,
    device_type: &str,
) -> Option<Device> {
    let address = format_address(&announcement.addresses, announcement.port)?;
    let id = announcement.fullname.split('.').next().unwrap_or_default();
    Device::builder()
        .id(id)
        .device_type(device_type)
        .address(address)
        .meta("raw_name", announcement.fullname.clone())
        .build()
        .inspect_err(|err| {
            tracing::warn!(name = %announcement.fullname, error = %err, "ignoring announcement");
        })
        .ok()
}
