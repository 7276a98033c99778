pub mod daemon;
pub mod registry;
pub mod vault;

pub use daemon::DaemonClient;
pub use registry::RegistryStore;
pub use vault::VaultService;
