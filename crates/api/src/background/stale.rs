//! Periodic staleness sweep over device check-ins.
//!
//! A device that reports metrics is marked `online`, but nothing marks it
//! `offline` again when it goes quiet. This task closes that gap: on a
//! fixed interval it flips every online device whose last check-in is
//! older than the staleness window back to `offline`, which in turn makes
//! the offline alert rule fire for it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use nethub_core::entity::{Attributes, EntityKind};
use nethub_registry::EntityStore;

/// Run the staleness sweep loop until `cancel` is triggered.
pub async fn run(
    store: Arc<EntityStore>,
    stale_after_secs: u64,
    check_interval_secs: u64,
    cancel: CancellationToken,
) {
    tracing::info!(
        stale_after_secs,
        check_interval_secs,
        "Staleness sweeper started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Staleness sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let flipped = sweep(&store, stale_after_secs).await;
                if flipped > 0 {
                    tracing::info!(flipped, "Staleness sweep marked devices offline");
                } else {
                    tracing::debug!("Staleness sweep found nothing stale");
                }
            }
        }
    }
}

/// One sweep pass. Returns how many devices were flipped to `offline`.
///
/// Devices that never reported (`last_seen` null) are left alone; they are
/// `offline` from creation anyway.
pub(crate) async fn sweep(store: &EntityStore, stale_after_secs: u64) -> usize {
    let cutoff = Utc::now() - chrono::Duration::seconds(stale_after_secs as i64);
    let mut flipped = 0;

    for device in store.list(Some(EntityKind::Device)).await {
        if !is_stale(&device.attributes, cutoff) {
            continue;
        }
        // Re-check inside the entity lock: a metric report may have landed
        // between the list above and this update, and a fresh report must
        // win over the sweep.
        let mut did_flip = false;
        store
            .update_with(&device.id, |attrs| {
                if is_stale(attrs, cutoff) {
                    attrs.insert("status".to_string(), json!("offline"));
                    did_flip = true;
                }
            })
            .await;
        if did_flip {
            tracing::info!(entity_id = %device.id, "Device went stale, marked offline");
            flipped += 1;
        }
    }

    flipped
}

fn is_stale(attrs: &Attributes, cutoff: DateTime<Utc>) -> bool {
    if attrs.get("status").and_then(Value::as_str) != Some("online") {
        return false;
    }
    let Some(last_seen) = attrs.get("last_seen").and_then(Value::as_str) else {
        return false;
    };
    match DateTime::parse_from_rfc3339(last_seen) {
        Ok(ts) => ts.with_timezone(&Utc) < cutoff,
        Err(_) => false,
    }
}
