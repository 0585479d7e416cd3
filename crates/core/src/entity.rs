//! Registry entities: devices, configurations, and automation repositories.
//!
//! An [`Entity`] is an identity plus a free-form attribute map. The registry
//! does not impose a schema beyond the per-kind required fields checked at
//! creation; everything else callers send is stored as-is. Kind-specific
//! defaults are seeded into the map when the entity is created so that
//! downstream consumers (alert rules, the overview aggregator) can rely on
//! the keys being present.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::{new_id, EntityId, Timestamp};

/// Free-form attribute map attached to every entity.
pub type Attributes = serde_json::Map<String, Value>;

/// Attribute keys holding percentages. Values are clamped to `[0, 100]`
/// whenever they are written, so out-of-range readings never land in the
/// registry or its history.
pub const PERCENTAGE_FIELDS: &[&str] = &["battery_level", "signal_strength"];

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The three kinds of entity the registry tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A managed network device (router, switch, access point, ...).
    Device,
    /// A network configuration document.
    Config,
    /// A git repository holding automation configs.
    Repository,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Device => "device",
            EntityKind::Config => "config",
            EntityKind::Repository => "repository",
        }
    }

    /// Capitalized label used in error messages ("Device with id x not found").
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Device => "Device",
            EntityKind::Config => "Config",
            EntityKind::Repository => "Repository",
        }
    }

    /// Attribute keys that must be present in a creation payload.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Device => &["name", "device_type", "location"],
            EntityKind::Config => &["name", "config_type", "vendor"],
            EntityKind::Repository => &["name", "url"],
        }
    }

    /// Seed kind-specific defaults into a creation payload.
    ///
    /// Keys the caller already supplied are left alone, with one exception:
    /// lifecycle status is server-owned for devices and configs. A device
    /// always enters the registry `offline` (it has not checked in yet) and
    /// a config always enters as a `draft`.
    pub fn seed(self, attrs: &mut Attributes) {
        match self {
            EntityKind::Device => {
                attrs.entry("battery_level").or_insert(Value::from(100));
                attrs.entry("signal_strength").or_insert(Value::from(0));
                attrs.entry("last_seen").or_insert(Value::Null);
                attrs.insert("status".to_string(), Value::from("offline"));
            }
            EntityKind::Config => {
                attrs.entry("version").or_insert(Value::from("1.0"));
                attrs.insert("status".to_string(), Value::from("draft"));
            }
            EntityKind::Repository => {
                attrs.entry("branch").or_insert(Value::from("main"));
                attrs
                    .entry("automation_path")
                    .or_insert(Value::from("network-configs"));
                attrs.entry("last_sync").or_insert(Value::Null);
                attrs.entry("status").or_insert(Value::from("active"));
            }
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation and clamping
// ---------------------------------------------------------------------------

/// Check a creation payload for the kind's required fields.
///
/// Only key presence is checked; values are free-form. The error message
/// lists every missing field so a caller can fix the payload in one go.
pub fn validate_create(kind: EntityKind, attributes: &Attributes) -> Result<(), CoreError> {
    let missing: Vec<&str> = kind
        .required_fields()
        .iter()
        .copied()
        .filter(|field| !attributes.contains_key(*field))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Clamp every percentage attribute in the map to `[0, 100]`.
///
/// Integer values stay integers and floats stay floats; non-numeric values
/// are left untouched.
pub fn clamp_percentages(attrs: &mut Attributes) {
    for key in PERCENTAGE_FIELDS {
        if let Some(clamped) = attrs.get(*key).and_then(clamp_percent) {
            attrs.insert((*key).to_string(), clamped);
        }
    }
}

fn clamp_percent(value: &Value) -> Option<Value> {
    if let Some(i) = value.as_i64() {
        Some(Value::from(i.clamp(0, 100)))
    } else if let Some(u) = value.as_u64() {
        // Only reachable for values above i64::MAX, which are necessarily > 100.
        Some(Value::from(u.min(100)))
    } else if let Some(f) = value.as_f64() {
        serde_json::Number::from_f64(f.clamp(0.0, 100.0)).map(Value::Number)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single registry entry.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// UUID assigned at creation.
    pub id: EntityId,
    /// What kind of thing this entry describes.
    pub kind: EntityKind,
    /// Free-form attributes, including the seeded per-kind defaults.
    pub attributes: Attributes,
    /// When the entity was created.
    pub created_at: Timestamp,
    /// When the entity was last mutated. Equal to `created_at` until the
    /// first update.
    pub updated_at: Timestamp,
}

impl Entity {
    /// Build a new entity from a creation payload: seed the kind defaults,
    /// clamp percentage fields, and stamp both timestamps from one clock
    /// reading.
    pub fn new(kind: EntityKind, mut attributes: Attributes) -> Self {
        kind.seed(&mut attributes);
        clamp_percentages(&mut attributes);
        let now = chrono::Utc::now();
        Self {
            id: new_id(),
            kind,
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fetch a string attribute, if present and a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Fetch a numeric attribute as f64, if present and numeric.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// The entity's `name` attribute, falling back to its id.
    pub fn display_name(&self) -> &str {
        self.attr_str("name").unwrap_or(&self.id)
    }
}
