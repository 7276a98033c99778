use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use std::time::SystemTime;

pub const BACKUP_EXTENSION: &str = ".txt";
/// Stamp embedded in backup file names; sorts lexicographically in
/// chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Descriptor of the most recent backup resolved for a device.
#[derive(Debug, Clone)]
pub struct LatestBackup {
    pub path: PathBuf,
    /// Raw timestamp portion of the file name, e.g. `2024-01-02_09-00-00`.
    pub stamp: String,
    pub modified: SystemTime,
}

impl LatestBackup {
    pub fn from_candidate(path: PathBuf, device: &str, modified: SystemTime) -> Self {
        let stamp = path
            .file_name()
            .and_then(|it| it.to_str())
            .and_then(|name| name.strip_prefix(device))
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix(BACKUP_EXTENSION))
            .unwrap_or_default()
            .to_owned();
        Self {
            path,
            stamp,
            modified,
        }
    }

    /// Date half of the stamp, when it parses.
    pub fn date(&self) -> Option<NaiveDate> {
        let (date, _) = self.stamp.split_once('_')?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// Whether the backup was taken on the given day, judged by the file
    /// name stamp rather than the modification time.
    pub fn taken_on(&self, day: NaiveDate) -> bool {
        self.date().map(|date| date == day).unwrap_or(false)
    }

    /// Human form for the dashboard; falls back to the raw stamp when it
    /// does not parse.
    pub fn display_stamp(&self) -> String {
        NaiveDateTime::parse_from_str(&self.stamp, TIMESTAMP_FORMAT)
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| self.stamp.clone())
    }
}
