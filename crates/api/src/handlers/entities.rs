//! Kind-generic registry operations shared by the typed resource handlers.
//!
//! The store itself does not care what kind an entity is; these helpers
//! add the kind discipline the HTTP surface needs, so `/devices/{id}`
//! never serves a config and vice versa. An id of the wrong kind is
//! reported as `NotFound`, exactly like an unknown id.

use nethub_core::entity::{validate_create, Attributes, Entity, EntityKind};
use nethub_registry::HistoryEntry;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Validate a creation payload and insert the entity.
pub async fn create(
    state: &AppState,
    kind: EntityKind,
    attributes: Attributes,
) -> AppResult<Entity> {
    validate_create(kind, &attributes)?;
    let entity = state.store.create(kind, attributes).await;
    tracing::info!(entity_id = %entity.id, kind = %kind, "Entity created");
    Ok(entity)
}

/// Fetch an entity, requiring it to be of `kind`.
pub async fn find_of_kind(state: &AppState, kind: EntityKind, id: &str) -> AppResult<Entity> {
    state
        .store
        .get(id)
        .await
        .filter(|entity| entity.kind == kind)
        .ok_or_else(|| AppError::not_found(kind.label(), id))
}

/// List all entities of `kind` in creation order.
pub async fn list_of_kind(state: &AppState, kind: EntityKind) -> Vec<Entity> {
    state.store.list(Some(kind)).await
}

/// Merge a patch into an entity of `kind`.
pub async fn update_of_kind(
    state: &AppState,
    kind: EntityKind,
    id: &str,
    patch: Attributes,
) -> AppResult<Entity> {
    find_of_kind(state, kind, id).await?;
    state
        .store
        .update(id, patch)
        .await
        .ok_or_else(|| AppError::not_found(kind.label(), id))
}

/// Delete an entity of `kind`.
pub async fn delete_of_kind(state: &AppState, kind: EntityKind, id: &str) -> AppResult<()> {
    find_of_kind(state, kind, id).await?;
    if !state.store.delete(id).await {
        return Err(AppError::not_found(kind.label(), id));
    }
    tracing::info!(entity_id = %id, kind = %kind, "Entity deleted");
    Ok(())
}

/// Change history for an entity of `kind`, oldest first.
pub async fn history_of_kind(
    state: &AppState,
    kind: EntityKind,
    id: &str,
) -> AppResult<Vec<HistoryEntry>> {
    find_of_kind(state, kind, id).await?;
    state
        .store
        .history(id)
        .await
        .ok_or_else(|| AppError::not_found(kind.label(), id))
}
