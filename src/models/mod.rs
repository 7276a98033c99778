pub mod backup;
pub mod daemon;
pub mod device;
pub mod dtos;

pub use backup::LatestBackup;
pub use daemon::DaemonNode;
pub use device::DeviceRecord;
