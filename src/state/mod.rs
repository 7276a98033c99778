use crate::config::Config;
use crate::services::{DaemonClient, RegistryStore, VaultService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<RegistryStore>,
    pub vault: Arc<VaultService>,
    pub daemon: Arc<DaemonClient>,
}

impl AppState {
    pub fn build(config: Arc<Config>) -> anyhow::Result<Self> {
        let registry = Arc::new(RegistryStore::new(config.storage.parse_registry_path()));
        let vault = Arc::new(VaultService::connect(config.storage.parse_backup_root())?);
        let daemon = Arc::new(DaemonClient::new(&config.daemon)?);
        Ok(Self {
            config,
            registry,
            vault,
            daemon,
        })
    }
}
