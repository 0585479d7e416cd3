//! Network-wide device summary derived from the registry on demand.

use serde::Serialize;

use crate::entity::{Entity, EntityKind};

/// Aggregate view over every device in the registry.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkOverview {
    pub total_devices: usize,
    pub online_devices: usize,
    pub offline_devices: usize,
    /// `healthy` when at least one device is online, `degraded` otherwise.
    pub network_status: &'static str,
    /// Mean battery level across online devices, rounded to two decimals.
    /// Zero when no device is online.
    pub avg_battery_level: f64,
    /// Mean signal strength across online devices, rounded to two decimals.
    /// Zero when no device is online.
    pub avg_signal_strength: f64,
}

/// Fold the given entities into a [`NetworkOverview`].
///
/// Non-device entities are ignored. Averages are computed over online
/// devices only; a fleet that is entirely offline reports zero for both.
pub fn summarize(entities: &[Entity]) -> NetworkOverview {
    let devices: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Device)
        .collect();
    let online: Vec<&&Entity> = devices
        .iter()
        .filter(|d| d.attr_str("status") == Some("online"))
        .collect();

    let (avg_battery, avg_signal) = if online.is_empty() {
        (0.0, 0.0)
    } else {
        let count = online.len() as f64;
        let battery: f64 = online
            .iter()
            .map(|d| d.attr_f64("battery_level").unwrap_or(0.0))
            .sum();
        let signal: f64 = online
            .iter()
            .map(|d| d.attr_f64("signal_strength").unwrap_or(0.0))
            .sum();
        (round2(battery / count), round2(signal / count))
    };

    NetworkOverview {
        total_devices: devices.len(),
        online_devices: online.len(),
        offline_devices: devices.len() - online.len(),
        network_status: if online.is_empty() {
            "degraded"
        } else {
            "healthy"
        },
        avg_battery_level: avg_battery,
        avg_signal_strength: avg_signal,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
