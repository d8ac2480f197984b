use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Serialize, Debug)]
pub struct ValueResponse {
    pub value: Value,
}

#[derive(Serialize, Debug)]
pub struct MutationResponse {
    pub success: bool,
    pub key: String,
}

impl MutationResponse {
    fn ok(key: String) -> Self {
        Self { success: true, key }
    }
}

pub async fn get_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>, ApiError> {
    match state.store.get(&key).await? {
        Some(value) => Ok(Json(ValueResponse { value })),
        None => Err(ApiError::NotFound("Key not found".into())),
    }
}

/// Upsert `{"value": ...}` under `key`. Any JSON is accepted as the value,
/// `null` included; a body without a `value` member is rejected.
pub async fn set_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<MutationResponse>, ApiError> {
    let Some(value) = extract_value(&body) else {
        warn!(op = "set", %key, "request body has no value");
        return Err(ApiError::BadRequest("Value is required".into()));
    };
    state.store.set(&key, value).await?;
    Ok(Json(MutationResponse::ok(key)))
}

pub async fn get_all(State(state): State<AppState>) -> Result<Json<Map<String, Value>>, ApiError> {
    Ok(Json(state.store.get_all().await?))
}

pub async fn delete_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    state.store.delete(&key).await?;
    Ok(Json(MutationResponse::ok(key)))
}

/// Pull the `value` member out of a JSON object body. Empty, malformed and
/// non-object bodies count as missing.
fn extract_value(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => fields.remove("value"),
        _ => None,
    }
}
