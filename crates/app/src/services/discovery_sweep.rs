//! Discovery sweep: replace each device family's registry entries with what
//! its adapter currently finds on the network.
//!
//! For every adapter with active discovery the sweep removes all devices of
//! that type and then lets the adapter upsert what it finds. Adapters without
//! active discovery are still invoked, but their (manually seeded) devices are
//! never cleared. A failing adapter is logged and recorded in the report; the
//! sweep moves on to the next one.

use std::fmt;
use std::sync::Arc;

use crate::services::adapter_directory::AdapterDirectory;
use crate::services::device_registry::DeviceRegistry;

/// Outcome of sweeping one device type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepStatus {
    /// Discovery ran; `found` devices were upserted after clearing `cleared`.
    Discovered { cleared: usize, found: usize },
    /// The adapter has no active discovery; seeded devices were kept.
    Passive,
    /// Clearing or discovery failed with the given message.
    Failed(String),
}

/// Per-type line of a [`SweepReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    pub device_type: &'static str,
    pub status: SweepStatus,
}

/// Result of a full sweep, ordered by device type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    /// Total number of devices upserted across all types.
    #[must_use]
    pub fn found(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome.status {
                SweepStatus::Discovered { found, .. } => found,
                _ => 0,
            })
            .sum()
    }

    /// Types whose sweep failed.
    #[must_use]
    pub fn failures(&self) -> Vec<&SweepOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, SweepStatus::Failed(_)))
            .collect()
    }
}

impl fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SweepStatus::Discovered { cleared, found } => write!(
                f,
                "{}: {found} found ({cleared} previous entries cleared)",
                self.device_type
            ),
            SweepStatus::Passive => write!(
                f,
                "{}: no active discovery, seeded devices kept",
                self.device_type
            ),
            SweepStatus::Failed(message) => {
                write!(f, "{}: discovery failed: {message}", self.device_type)
            }
        }
    }
}

/// Runs type-scoped rediscovery across every registered adapter.
pub struct DiscoverySweep {
    registry: Arc<DeviceRegistry>,
    directory: Arc<AdapterDirectory>,
}

impl DiscoverySweep {
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>, directory: Arc<AdapterDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Sweep every adapter in type order.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for adapter in self.directory.adapters() {
            let device_type = adapter.device_type();

            let cleared = if adapter.has_discovery() {
                match self.registry.remove_type(device_type).await {
                    Ok(cleared) => Some(cleared),
                    Err(err) => {
                        let message = err.describe();
                        tracing::warn!(device_type, error = %message, "could not clear devices before discovery");
                        report.outcomes.push(SweepOutcome {
                            device_type,
                            status: SweepStatus::Failed(message),
                        });
                        continue;
                    }
                }
            } else {
                None
            };

            let status = match (adapter.discover(&self.registry).await, cleared) {
                (Ok(found), Some(cleared)) => {
                    tracing::info!(device_type, found, cleared, "discovery finished");
                    SweepStatus::Discovered { cleared, found }
                }
                (Ok(_), None) => {
                    tracing::debug!(device_type, "adapter has no active discovery");
                    SweepStatus::Passive
                }
                (Err(err), _) => {
                    let message = err.describe();
                    tracing::warn!(device_type, error = %message, "discovery failed");
                    SweepStatus::Failed(message)
                }
            };
            report.outcomes.push(SweepOutcome {
                device_type,
                status,
            });
        }

        report
    }
}
