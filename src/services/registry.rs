use crate::errors::{ApiError, InternalError};
use crate::models::DeviceRecord;
use crate::models::device::FIELD_DELIMITER;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;

/// The flat-file device registry. Every mutation rewrites the whole file;
/// there is no locking, so the last writer wins.
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// All records keyed by name. A missing file reads as an empty registry;
    /// malformed lines are skipped; on duplicate names the last line wins.
    pub async fn list(&self) -> anyhow::Result<BTreeMap<String, DeviceRecord>, ApiError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| InternalError::ReadFileError {
                        path: self.path.clone(),
                    })
                    .map_err(Into::into);
            }
        };
        let mut records = BTreeMap::new();
        for line in content.lines() {
            if let Some(record) = DeviceRecord::parse_line(line) {
                records.insert(record.name.clone(), record);
            }
        }
        Ok(records)
    }

    /// Appends a record. Duplicate names are permitted; a file that does not
    /// end with a newline is repaired before the new line is added.
    pub async fn append(&self, record: &DeviceRecord) -> anyhow::Result<(), ApiError> {
        record.validate()?;
        let mut content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| InternalError::ReadFileError {
                        path: self.path.clone(),
                    })
                    .map_err(Into::into);
            }
        };
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&record.to_line());
        content.push('\n');
        self.write(content).await
    }

    /// Replaces every line whose name-prefix matches `original_name` with
    /// the given record. A no-op when nothing matches; an error when the
    /// registry file itself is missing.
    pub async fn update(
        &self,
        original_name: &str,
        record: &DeviceRecord,
    ) -> anyhow::Result<(), ApiError> {
        record.validate()?;
        let content = self.read_required().await?;
        let prefix = format!("{original_name}{FIELD_DELIMITER}");
        let mut output = String::with_capacity(content.len());
        for line in content.split_inclusive('\n') {
            if line.trim().starts_with(&prefix) {
                output.push_str(&record.to_line());
                output.push('\n');
            } else {
                output.push_str(line);
            }
        }
        self.write(output).await
    }

    /// Drops every line whose name-prefix matches `name`, leaving all other
    /// lines untouched. A no-op when nothing matches.
    pub async fn delete(&self, name: &str) -> anyhow::Result<(), ApiError> {
        let content = self.read_required().await?;
        let prefix = format!("{name}{FIELD_DELIMITER}");
        let mut output = String::with_capacity(content.len());
        for line in content.split_inclusive('\n') {
            if line.starts_with(&prefix) {
                continue;
            }
            output.push_str(line);
        }
        self.write(output).await
    }

    async fn read_required(&self) -> anyhow::Result<String, ApiError> {
        fs::read_to_string(&self.path)
            .await
            .with_context(|| InternalError::ReadFileError {
                path: self.path.clone(),
            })
            .map_err(Into::into)
    }

    async fn write(&self, content: String) -> anyhow::Result<(), ApiError> {
        fs::write(&self.path, content)
            .await
            .with_context(|| InternalError::WriteFileError {
                path: self.path.clone(),
            })
            .map_err(Into::into)
    }
}
