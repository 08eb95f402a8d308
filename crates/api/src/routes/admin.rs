//! Admin catalog CRUD
//!
//! Every write is validated against the dense-order invariant before it
//! lands, and the in-memory catalog snapshot is refreshed afterwards so
//! resolvers see the new sequence immediately. Deleting a level from the
//! middle of the sequence is rejected for the same reason.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use common::models::Level;
use engine::Catalog;

use crate::error::{ApiError, ApiResult, OptionExt};
use crate::state::AppState;

/// List the raw catalog
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Level>>> {
    let levels = store::levels::list(state.store.as_ref()).await?;
    Ok(Json(levels))
}

/// Get one level definition
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Level>> {
    let level = store::levels::get(state.store.as_ref(), &id)
        .await?
        .not_found(format!("Level {id} not found"))?;
    Ok(Json(level))
}

/// Create a level
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(level): Json<Level>,
) -> ApiResult<(StatusCode, Json<Level>)> {
    let existing = store::levels::list(state.store.as_ref()).await?;
    if existing.iter().any(|l| l.id == level.id) {
        return Err(ApiError::Validation(format!(
            "Level {} already exists",
            level.id
        )));
    }

    let mut candidate = existing;
    candidate.push(level.clone());
    validate_and_install(&state, candidate, &level).await?;
    info!("Admin created level {} (order {})", level.id, level.order);
    Ok((StatusCode::CREATED, Json(level)))
}

/// Replace a level definition
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(level): Json<Level>,
) -> ApiResult<Json<Level>> {
    if level.id != id {
        return Err(ApiError::Validation(format!(
            "Level id {} does not match path {id}",
            level.id
        )));
    }
    let existing = store::levels::list(state.store.as_ref()).await?;
    if !existing.iter().any(|l| l.id == id) {
        return Err(ApiError::NotFound(format!("Level {id} not found")));
    }

    let candidate: Vec<Level> = existing
        .into_iter()
        .map(|l| if l.id == id { level.clone() } else { l })
        .collect();
    validate_and_install(&state, candidate, &level).await?;
    info!("Admin updated level {id}");
    Ok(Json(level))
}

/// Delete a level. Only the last level of the sequence can go; anything
/// else would leave a hole in the unlock order.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let existing = store::levels::list(state.store.as_ref()).await?;
    if !existing.iter().any(|l| l.id == id) {
        return Err(ApiError::NotFound(format!("Level {id} not found")));
    }

    let candidate: Vec<Level> = existing.into_iter().filter(|l| l.id != id).collect();
    let catalog = Catalog::new(candidate).map_err(ApiError::from)?;

    store::levels::remove(state.store.as_ref(), &id).await?;
    state.replace_catalog(Arc::new(catalog)).await;
    info!("Admin deleted level {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn validate_and_install(
    state: &AppState,
    candidate: Vec<Level>,
    level: &Level,
) -> ApiResult<()> {
    let catalog = Catalog::new(candidate).map_err(ApiError::from)?;
    store::levels::put(state.store.as_ref(), level).await?;
    state.replace_catalog(Arc::new(catalog)).await;
    Ok(())
}
