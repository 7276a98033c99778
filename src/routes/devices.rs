use crate::errors::ApiResult;
use crate::models::dtos::device_form::{DeviceFormDto, EditDeviceFormDto};
use crate::state::AppState;
use axum::Form;
use axum::extract::{Path, State};
use axum::response::Redirect;

pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<DeviceFormDto>,
) -> ApiResult<Redirect> {
    let record = form.into_record();
    state.registry.append(&record).await?;
    tracing::info!("added device '{}' to the registry", record.name);
    Ok(Redirect::to("/"))
}

pub async fn edit(
    State(state): State<AppState>,
    Form(form): Form<EditDeviceFormDto>,
) -> ApiResult<Redirect> {
    let (original_name, record) = form.into_parts();
    state.registry.update(&original_name, &record).await?;
    tracing::info!("updated device '{}' to '{}'", original_name, record.name);
    Ok(Redirect::to("/"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(device): Path<String>,
) -> ApiResult<Redirect> {
    state.registry.delete(&device).await?;
    tracing::info!("deleted device '{}' from the registry", device);
    Ok(Redirect::to("/"))
}
