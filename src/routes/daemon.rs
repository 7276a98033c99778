use crate::errors::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Redirect;

/// Fire-and-forget backup trigger for one device; the daemon's response is
/// ignored and the caller lands back on the dashboard.
pub async fn fetch_device(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> Redirect {
    if let Err(err) = state.daemon.trigger(&device).await {
        tracing::warn!("{err:#}");
    }
    Redirect::to("/")
}

/// Relays the daemon's reload response, or a gateway error with the reason
/// when the daemon cannot be reached.
pub async fn reload_nodes(State(state): State<AppState>) -> ApiResult<String> {
    state
        .daemon
        .reload()
        .await
        .map_err(ApiError::DaemonUnreachable)
}
