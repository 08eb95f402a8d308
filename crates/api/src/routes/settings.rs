//! User preference routes
//!
//! The preference struct is closed; a payload with unknown keys fails
//! deserialization and surfaces as 422 before reaching the store.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use common::models::UserPreferences;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserPreferences>> {
    let preferences = store::preferences::get(state.store.as_ref(), &user_id).await?;
    Ok(Json(preferences))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(preferences): Json<UserPreferences>,
) -> ApiResult<Json<UserPreferences>> {
    store::preferences::put(state.store.as_ref(), &user_id, &preferences).await?;
    Ok(Json(preferences))
}
