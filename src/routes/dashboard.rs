use crate::errors::ApiResult;
use crate::state::AppState;
use askama::Template;
use axum::extract::State;
use axum::response::Html;
use chrono::Local;
use std::path::Path;

pub struct DeviceRow {
    pub name: String,
    pub address: String,
    pub model: String,
    pub user: String,
    pub password: String,
    pub last_backup: Option<String>,
    pub fresh: bool,
}

pub struct MissingRow {
    pub name: String,
    pub address: String,
    pub note: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    devices: Vec<DeviceRow>,
    missing_today: Vec<MissingRow>,
    days_left: u32,
    models: Vec<String>,
}

const MISSING_NOTE: &str = "No configuration file generated today";

/// The status page: daemon-reported devices joined with registry metadata
/// and per-device backup freshness. A dead daemon degrades to an empty
/// device list rather than failing the page.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let nodes = match state.daemon.nodes().await {
        Ok(mut nodes) => {
            nodes.sort_by(|a, b| a.name.cmp(&b.name));
            nodes
        }
        Err(err) => {
            tracing::warn!("node listing unavailable: {err:#}");
            Vec::new()
        }
    };
    let registry = state.registry.list().await?;
    let today = Local::now().date_naive();

    let mut devices = Vec::with_capacity(nodes.len());
    let mut missing_today = Vec::new();
    for node in nodes {
        let meta = registry.get(&node.name);
        // registry metadata wins over what the daemon reports
        let address = meta
            .map(|record| record.address.clone())
            .or_else(|| node.ip.clone())
            .unwrap_or_else(|| "N/A".to_owned());
        let latest = state.vault.resolve_latest(&node.name)?;
        let fresh = latest
            .as_ref()
            .map(|backup| backup.taken_on(today))
            .unwrap_or(false);
        if !fresh {
            missing_today.push(MissingRow {
                name: node.name.clone(),
                address: address.clone(),
                note: MISSING_NOTE,
            });
        }
        devices.push(DeviceRow {
            name: node.name,
            address,
            model: meta.map(|record| record.model.clone()).unwrap_or_default(),
            user: meta.map(|record| record.user.clone()).unwrap_or_default(),
            password: meta
                .map(|record| record.password.clone())
                .unwrap_or_default(),
            last_backup: latest.map(|backup| backup.display_stamp()),
            fresh,
        });
    }

    let template = DashboardTemplate {
        devices,
        missing_today,
        days_left: crate::utils::days_left_in_month(today),
        models: model_catalog(state.config.storage.parse_models_dir().as_deref()),
    };
    Ok(Html(template.render()?))
}

/// Model names for the device forms, taken from the file stems of the
/// configured models directory. Degrades to an empty catalog.
fn model_catalog(dir: Option<&Path>) -> Vec<String> {
    let Some(dir) = dir else {
        return Vec::new();
    };
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("model catalog unavailable at {:?}: {err}", dir);
            return Vec::new();
        }
    };
    let mut models = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_owned)
        })
        .collect::<Vec<_>>();
    models.sort();
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_catalog_lists_file_stems_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ios.rb"), "").unwrap();
        std::fs::write(dir.path().join("junos.rb"), "").unwrap();
        std::fs::write(dir.path().join("asa.rb"), "").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        assert_eq!(
            model_catalog(Some(dir.path())),
            vec!["asa".to_owned(), "ios".to_owned(), "junos".to_owned()]
        );
    }

    #[test]
    fn test_model_catalog_degrades_to_empty() {
        assert!(model_catalog(None).is_empty());
        assert!(model_catalog(Some(Path::new("/nonexistent/models"))).is_empty());
    }
}
