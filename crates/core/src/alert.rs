//! Device alert rules evaluated on demand over the registry.
//!
//! Alerts are not stored: every evaluation walks the current device set and
//! reports which rules fire right now. Two conditions are tracked, low
//! battery and offline status, and a device can trip both at once.

use serde::Serialize;
use serde_json::Value;

use crate::entity::{Entity, EntityKind};
use crate::types::{new_id, EntityId, Timestamp};

/// Battery percentage below which the low battery rule fires.
pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;

/// Severity of a fired alert rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Degraded but still functioning.
    Warning,
    /// Needs attention now.
    Critical,
}

/// A single fired rule for a single device.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// Fresh UUID for this evaluation; alerts are ephemeral and a new id is
    /// assigned every time the rule fires.
    pub id: String,
    /// Which rule fired (`low_battery`, `device_offline`).
    pub kind: &'static str,
    pub severity: AlertSeverity,
    /// The device the rule fired for.
    pub entity_id: EntityId,
    /// Human-readable description naming the device.
    pub message: String,
    /// When the evaluation ran.
    pub timestamp: Timestamp,
}

/// A condition checked against every device on each evaluation.
struct AlertRule {
    kind: &'static str,
    severity: AlertSeverity,
    applies: fn(&Entity) -> bool,
    message: fn(&Entity) -> String,
}

/// Rule table, in evaluation order.
static RULES: &[AlertRule] = &[
    AlertRule {
        kind: "low_battery",
        severity: AlertSeverity::Warning,
        applies: battery_low,
        message: battery_message,
    },
    AlertRule {
        kind: "device_offline",
        severity: AlertSeverity::Critical,
        applies: device_offline,
        message: offline_message,
    },
];

fn battery_low(entity: &Entity) -> bool {
    entity
        .attr_f64("battery_level")
        .is_some_and(|level| level < LOW_BATTERY_THRESHOLD)
}

fn battery_message(entity: &Entity) -> String {
    let level = entity
        .attributes
        .get("battery_level")
        .cloned()
        .unwrap_or(Value::Null);
    format!(
        "Device {} has low battery ({}%)",
        entity.display_name(),
        level
    )
}

fn device_offline(entity: &Entity) -> bool {
    entity.attr_str("status") == Some("offline")
}

fn offline_message(entity: &Entity) -> String {
    format!("Device {} is offline", entity.display_name())
}

/// Evaluate every rule against every device in `entities`.
///
/// Non-device entities never alert. The result is ordered by entity first
/// (in the order given) and by rule table order within an entity, so a
/// device that is both offline and low on battery yields exactly two alerts
/// with `low_battery` first.
pub fn evaluate(entities: &[Entity]) -> Vec<Alert> {
    let now = chrono::Utc::now();
    let mut alerts = Vec::new();
    for entity in entities {
        if entity.kind != EntityKind::Device {
            continue;
        }
        for rule in RULES {
            if (rule.applies)(entity) {
                alerts.push(Alert {
                    id: new_id(),
                    kind: rule.kind,
                    severity: rule.severity.clone(),
                    entity_id: entity.id.clone(),
                    message: (rule.message)(entity),
                    timestamp: now,
                });
            }
        }
    }
    alerts
}
