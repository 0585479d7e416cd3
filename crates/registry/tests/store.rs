//! Integration tests for the in-memory entity store:
//! - Create / get / update / delete round trips
//! - Seeded defaults and percentage clamping through the store
//! - Bounded history semantics
//! - Insertion-ordered listing and kind filters
//! - Atomicity of concurrent read-modify-write updates

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::task::JoinSet;

use nethub_core::entity::{Attributes, EntityKind};
use nethub_registry::EntityStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn device_attrs(name: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("name".to_string(), json!(name));
    attrs.insert("device_type".to_string(), json!("router"));
    attrs.insert("location".to_string(), json!("dc-east"));
    attrs
}

fn patch(pairs: &[(&str, Value)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// CRUD round trips
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_returns_identical_entity() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("core-rtr-1"))
        .await;

    let fetched = store.get(&created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.kind, EntityKind::Device);
    assert_eq!(fetched.attributes, created.attributes);
    assert_eq!(fetched.created_at, created.created_at);
    assert_eq!(fetched.updated_at, created.updated_at);
    assert_eq!(created.created_at, created.updated_at);
}

#[tokio::test]
async fn create_seeds_device_defaults() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("core-rtr-1"))
        .await;

    assert_eq!(created.attributes["status"], json!("offline"));
    assert_eq!(created.attributes["battery_level"], json!(100));
    assert_eq!(created.attributes["signal_strength"], json!(0));
    assert_eq!(created.attributes["last_seen"], Value::Null);
}

#[tokio::test]
async fn get_unknown_id_returns_none() {
    let store = EntityStore::new();
    assert!(store.get("no-such-id").await.is_none());
}

#[tokio::test]
async fn update_merges_patch_and_keeps_other_keys() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("ap-3"))
        .await;

    let updated = store
        .update(
            &created.id,
            patch(&[("status", json!("online")), ("battery_level", json!(42))]),
        )
        .await
        .unwrap();

    assert_eq!(updated.attributes["status"], json!("online"));
    assert_eq!(updated.attributes["battery_level"], json!(42));
    // Untouched keys survive the merge.
    assert_eq!(updated.attributes["location"], json!("dc-east"));
    assert_eq!(updated.attributes["name"], json!("ap-3"));
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_clamps_percentage_fields() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("sensor-1"))
        .await;

    let updated = store
        .update(
            &created.id,
            patch(&[
                ("battery_level", json!(150)),
                ("signal_strength", json!(-5)),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(updated.attributes["battery_level"], json!(100));
    assert_eq!(updated.attributes["signal_strength"], json!(0));
}

#[tokio::test]
async fn update_unknown_id_returns_none() {
    let store = EntityStore::new();
    let result = store
        .update("no-such-id", patch(&[("status", json!("online"))]))
        .await;
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_removes_entity_and_history() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("ap-9"))
        .await;
    store
        .update(&created.id, patch(&[("status", json!("online"))]))
        .await
        .unwrap();

    assert!(store.delete(&created.id).await);
    assert!(store.get(&created.id).await.is_none());
    assert!(store.history(&created.id).await.is_none());
    // Second delete is a no-op.
    assert!(!store.delete(&created.id).await);
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_is_empty_after_creation() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("ap-1"))
        .await;
    assert!(store.history(&created.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_records_every_update_in_order() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("ap-1"))
        .await;

    for level in [90, 80, 70] {
        store
            .update(&created.id, patch(&[("battery_level", json!(level))]))
            .await
            .unwrap();
    }

    let history = store.history(&created.id).await.unwrap();
    assert_eq!(history.len(), 3);
    let levels: Vec<i64> = history
        .iter()
        .map(|e| e.snapshot["battery_level"].as_i64().unwrap())
        .collect();
    assert_eq!(levels, vec![90, 80, 70]);
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert!(history.iter().all(|e| e.entity_id == created.id));
}

#[tokio::test]
async fn history_snapshots_hold_clamped_values() {
    let store = EntityStore::new();
    let created = store
        .create(EntityKind::Device, device_attrs("sensor-2"))
        .await;
    store
        .update(&created.id, patch(&[("battery_level", json!(400))]))
        .await
        .unwrap();

    let history = store.history(&created.id).await.unwrap();
    assert_eq!(history[0].snapshot["battery_level"], json!(100));
}

#[tokio::test]
async fn history_evicts_oldest_beyond_cap() {
    let store = EntityStore::with_history_cap(3);
    let created = store
        .create(EntityKind::Device, device_attrs("ap-1"))
        .await;

    for level in [50, 40, 30, 20, 10] {
        store
            .update(&created.id, patch(&[("battery_level", json!(level))]))
            .await
            .unwrap();
    }

    let history = store.history(&created.id).await.unwrap();
    assert_eq!(history.len(), 3);
    let levels: Vec<i64> = history
        .iter()
        .map(|e| e.snapshot["battery_level"].as_i64().unwrap())
        .collect();
    assert_eq!(levels, vec![30, 20, 10]);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_preserves_creation_order_and_filters_by_kind() {
    let store = EntityStore::new();
    let d1 = store
        .create(EntityKind::Device, device_attrs("first"))
        .await;
    let c1 = store
        .create(
            EntityKind::Config,
            patch(&[
                ("name", json!("edge-acl")),
                ("config_type", json!("acl")),
                ("vendor", json!("cisco")),
            ]),
        )
        .await;
    let d2 = store
        .create(EntityKind::Device, device_attrs("second"))
        .await;

    let everything = store.list(None).await;
    let ids: Vec<&str> = everything.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![&d1.id, &c1.id, &d2.id]);

    let devices = store.list(Some(EntityKind::Device)).await;
    let ids: Vec<&str> = devices.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![&d1.id, &d2.id]);

    assert_eq!(store.count().await, 3);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// One hundred concurrent increments through `update_with` must all land:
/// the closure runs under the per-entity lock, so no increment can read a
/// stale value.
#[tokio::test]
async fn concurrent_increments_lose_no_updates() {
    let store = Arc::new(EntityStore::new());
    let created = store
        .create(EntityKind::Device, device_attrs("busy-device"))
        .await;

    let mut tasks = JoinSet::new();
    for _ in 0..100 {
        let store = Arc::clone(&store);
        let id = created.id.clone();
        tasks.spawn(async move {
            store
                .update_with(&id, |attrs| {
                    let current = attrs
                        .get("signal_strength")
                        .and_then(Value::as_i64)
                        .unwrap_or(0);
                    attrs.insert("signal_strength".to_string(), json!(current + 1));
                })
                .await
                .unwrap();
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }

    let final_state = store.get(&created.id).await.unwrap();
    assert_eq!(final_state.attributes["signal_strength"], json!(100));

    let history = store.history(&created.id).await.unwrap();
    assert_eq!(history.len(), 100);
}
