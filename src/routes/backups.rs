use crate::errors::ApiResult;
use crate::models::dtos::ingest::{IngestRequestDto, IngestResponseDto};
use crate::services::vault::YearListing;
use crate::state::AppState;
use askama::Template;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use chrono::Local;
use serde_json::{Value, json};

/// Latest configuration of a device, streamed back as plain text.
pub async fn view_latest(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> ApiResult<String> {
    state.vault.latest_content(&device).await
}

#[derive(Template)]
#[template(path = "history.html")]
struct HistoryTemplate {
    device: String,
    years: Vec<YearListing>,
}

/// Collapsible year/month/file listing of a device's backup history.
pub async fn history(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> ApiResult<Html<String>> {
    let years = state.vault.history(&device)?;
    let template = HistoryTemplate { device, years };
    Ok(Html(template.render()?))
}

/// One historical file, path-checked against the device directory.
pub async fn read_history_file(
    State(state): State<AppState>,
    Path((device, path)): Path<(String, String)>,
) -> ApiResult<String> {
    state.vault.read_history_file(&device, &path).await
}

/// Boolean freshness probe: does the device have a backup dated today? An
/// unknown device yields a structured failure instead of a plain boolean.
pub async fn monitor(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.vault.has_device(&device) {
        return Ok(Json(json!({
            "device": device,
            "status": "fail",
            "note": format!("No backup folder found for device '{device}'"),
        })));
    }
    let fresh = state
        .vault
        .has_backup_dated(&device, Local::now().date_naive())?;
    Ok(Json(Value::Bool(fresh)))
}

/// Retention pruning over every device directory, then back to the
/// dashboard.
pub async fn prune(State(state): State<AppState>) -> ApiResult<Redirect> {
    let removed = state.vault.prune_all().await?;
    tracing::info!("retention pruning removed {removed} backup files");
    Ok(Redirect::to("/"))
}

/// Ingests a configuration pushed by the daemon. Failures are reported in
/// the response envelope, never as a raw fault.
pub async fn save_config(
    State(state): State<AppState>,
    Json(payload): Json<IngestRequestDto>,
) -> (StatusCode, Json<IngestResponseDto>) {
    match state.vault.ingest(&payload.node, &payload.config).await {
        Ok(path) => {
            tracing::info!("saved config for '{}' at {:?}", payload.node, path);
            (StatusCode::OK, Json(IngestResponseDto::success()))
        }
        Err(err) => {
            tracing::error!("failed to save config for '{}': {err:#}", payload.node);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IngestResponseDto::error(err.to_string())),
            )
        }
    }
}
