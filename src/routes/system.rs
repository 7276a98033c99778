use axum::response::IntoResponse;

pub async fn health() -> impl IntoResponse {
    axum::http::StatusCode::OK
}

pub async fn version() -> impl IntoResponse {
    format!("confboard_{}", env!("CARGO_PKG_VERSION"))
}
