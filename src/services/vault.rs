use crate::errors::{ApiError, InternalError};
use crate::models::LatestBackup;
use crate::models::backup::{BACKUP_EXTENSION, TIMESTAMP_FORMAT};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// Directory-backed store of timestamped configuration snapshots, laid out
/// as `<root>/<device>/<year>/<month>/<device>_<stamp>.txt`. Snapshots are
/// written once and never mutated; only retention pruning deletes them.
pub struct VaultService {
    root: PathBuf,
}

struct Candidate {
    path: PathBuf,
    modified: SystemTime,
}

/// One month directory of a device's history, files newest first.
pub struct MonthListing {
    pub month: String,
    pub files: Vec<String>,
}

pub struct YearListing {
    pub year: String,
    pub months: Vec<MonthListing>,
}

impl VaultService {
    pub fn connect(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).with_context(|| InternalError::CreateDirectoryError {
            path: root.clone(),
        })?;
        let root = root
            .canonicalize()
            .with_context(|| InternalError::AccessFileError { path: root.clone() })?;
        Ok(Self { root })
    }

    pub fn device_dir(&self, device: &str) -> PathBuf {
        self.root.join(device)
    }

    pub fn has_device(&self, device: &str) -> bool {
        self.device_dir(device).is_dir()
    }

    /// Latest backup for a device. Within one directory the greatest file
    /// name wins (the stamp sorts chronologically); across directories the
    /// greatest modification time wins. `None` when the device directory is
    /// missing or holds no matching file.
    pub fn resolve_latest(&self, device: &str) -> anyhow::Result<Option<LatestBackup>, ApiError> {
        let folder = self.device_dir(device);
        if !folder.is_dir() {
            return Ok(None);
        }
        let mut candidates = Vec::new();
        collect_directory_champions(&folder, device, &mut candidates)?;
        Ok(candidates
            .into_iter()
            .max_by_key(|candidate| candidate.modified)
            .map(|candidate| {
                LatestBackup::from_candidate(candidate.path, device, candidate.modified)
            }))
    }

    /// Whether the device has a backup whose file name is dated `day`.
    pub fn has_backup_dated(
        &self,
        device: &str,
        day: chrono::NaiveDate,
    ) -> anyhow::Result<bool, ApiError> {
        Ok(self
            .resolve_latest(device)?
            .map(|latest| latest.taken_on(day))
            .unwrap_or(false))
    }

    /// Content of the latest backup, for the plain-text view endpoint.
    pub async fn latest_content(&self, device: &str) -> anyhow::Result<String, ApiError> {
        if !self.has_device(device) {
            return Err(ApiError::DeviceNotFound(device.to_owned()));
        }
        let Some(latest) = self.resolve_latest(device)? else {
            return Err(ApiError::BackupMissing(device.to_owned()));
        };
        fs::read_to_string(&latest.path)
            .await
            .with_context(|| InternalError::ReadFileError {
                path: latest.path.clone(),
            })
            .map_err(Into::into)
    }

    /// Year to month to file tree for a device, newest first at every level.
    pub fn history(&self, device: &str) -> anyhow::Result<Vec<YearListing>, ApiError> {
        let folder = self.device_dir(device);
        if !folder.is_dir() {
            return Err(ApiError::DeviceNotFound(device.to_owned()));
        }
        let mut years = Vec::new();
        for (year, year_path) in subdirectories_newest_first(&folder)? {
            let mut months = Vec::new();
            for (month, month_path) in subdirectories_newest_first(&year_path)? {
                months.push(MonthListing {
                    month,
                    files: backup_files_newest_first(&month_path)?,
                });
            }
            years.push(YearListing { year, months });
        }
        Ok(years)
    }

    /// One historical file as text. The relative path is rejected before any
    /// read when it would escape the device's backup directory; the
    /// canonicalized forms also catch symlinked escapes the lexical check
    /// cannot see.
    pub async fn read_history_file(
        &self,
        device: &str,
        relpath: &str,
    ) -> anyhow::Result<String, ApiError> {
        let rel = Path::new(relpath);
        if rel.is_absolute()
            || rel
                .components()
                .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(ApiError::PathViolation);
        }
        let base = self.device_dir(device);
        if !base.is_dir() {
            return Err(ApiError::DeviceNotFound(device.to_owned()));
        }
        let base = base
            .canonicalize()
            .with_context(|| InternalError::AccessFileError {
                path: self.device_dir(device),
            })?;
        if !base.starts_with(&self.root) {
            return Err(ApiError::PathViolation);
        }
        let target = match base.join(rel).canonicalize() {
            Ok(path) => path,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::FileNotFound);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| InternalError::AccessFileError {
                        path: base.join(rel),
                    })
                    .map_err(Into::into);
            }
        };
        if !target.starts_with(&base) {
            return Err(ApiError::PathViolation);
        }
        fs::read_to_string(&target)
            .await
            .with_context(|| InternalError::ReadFileError {
                path: target.clone(),
            })
            .map_err(Into::into)
    }

    /// Writes a pushed configuration as a new timestamped snapshot, creating
    /// the `<device>/<year>/<month>` tree as needed. Returns the new path.
    pub async fn ingest(&self, device: &str, config: &str) -> anyhow::Result<PathBuf> {
        let now = chrono::Local::now();
        let dir = self
            .root
            .join(device)
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string());
        fs::create_dir_all(&dir)
            .await
            .with_context(|| InternalError::CreateDirectoryError { path: dir.clone() })?;
        let file_name = format!("{device}_{}{BACKUP_EXTENSION}", now.format(TIMESTAMP_FORMAT));
        let path = dir.join(file_name);
        fs::write(&path, config)
            .await
            .with_context(|| InternalError::WriteFileError { path: path.clone() })?;
        Ok(path)
    }

    /// Keeps only the newest backup file per month directory, for every
    /// device under the root. Destructive; a failure mid-walk leaves the
    /// tree partially pruned.
    pub async fn prune_all(&self) -> anyhow::Result<u64, ApiError> {
        let mut removed = 0u64;
        for (_, device_path) in subdirectories_newest_first(&self.root)? {
            for (_, year_path) in subdirectories_newest_first(&device_path)? {
                for (_, month_path) in subdirectories_newest_first(&year_path)? {
                    for name in backup_files_newest_first(&month_path)?.iter().skip(1) {
                        let path = month_path.join(name);
                        fs::remove_file(&path)
                            .await
                            .with_context(|| InternalError::DeleteFileError {
                                path: path.clone(),
                            })?;
                        removed += 1;
                    }
                }
            }
        }
        Ok(removed)
    }
}

/// Recursively walks `dir`, keeping per directory only the
/// lexicographically-greatest matching file name, and records that file's
/// path and modification time.
fn collect_directory_champions(
    dir: &Path,
    device: &str,
    out: &mut Vec<Candidate>,
) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir).with_context(|| InternalError::ReadDirectoryError {
        path: dir.to_owned(),
    })?;
    let mut subdirs = Vec::new();
    let mut champion: Option<String> = None;
    for entry in entries {
        let entry = entry.with_context(|| InternalError::ReadDirectoryError {
            path: dir.to_owned(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
            continue;
        }
        let Some(name) = path.file_name().and_then(|it| it.to_str()) else {
            continue;
        };
        if !is_backup_file(name, device) {
            continue;
        }
        if champion
            .as_deref()
            .map(|current| name > current)
            .unwrap_or(true)
        {
            champion = Some(name.to_owned());
        }
    }
    if let Some(name) = champion {
        let path = dir.join(name);
        let modified = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .with_context(|| InternalError::ReadMetadataError { path: path.clone() })?;
        out.push(Candidate { path, modified });
    }
    for subdir in subdirs {
        collect_directory_champions(&subdir, device, out)?;
    }
    Ok(())
}

fn is_backup_file(name: &str, device: &str) -> bool {
    let Some(rest) = name.strip_prefix(device) else {
        return false;
    };
    rest.starts_with('_') && rest.ends_with(BACKUP_EXTENSION)
}

/// Subdirectory names and paths, sorted descending. A missing directory
/// lists as empty.
fn subdirectories_newest_first(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| InternalError::ReadDirectoryError {
                path: dir.to_owned(),
            });
        }
    };
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| InternalError::ReadDirectoryError {
            path: dir.to_owned(),
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|it| it.to_str()) else {
            continue;
        };
        dirs.push((name.to_owned(), path));
    }
    dirs.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(dirs)
}

/// Backup file names in a month directory, sorted descending; the first
/// entry is the one retention pruning keeps.
fn backup_files_newest_first(dir: &Path) -> anyhow::Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).with_context(|| InternalError::ReadDirectoryError {
        path: dir.to_owned(),
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| InternalError::ReadDirectoryError {
            path: dir.to_owned(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|it| it.to_str()) else {
            continue;
        };
        if name.ends_with(BACKUP_EXTENSION) {
            files.push(name.to_owned());
        }
    }
    files.sort_by(|a, b| b.cmp(a));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn vault(dir: &tempfile::TempDir) -> VaultService {
        VaultService::connect(dir.path().join("backup_files")).unwrap()
    }

    fn write_backup(vault: &VaultService, device: &str, year: &str, month: &str, stamp: &str) {
        let dir = vault.device_dir(device).join(year).join(month);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{device}_{stamp}.txt")), "config").unwrap();
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[test]
    fn test_missing_or_empty_device_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        assert!(vault.resolve_latest("ghost").unwrap().is_none());

        std::fs::create_dir_all(vault.device_dir("r1")).unwrap();
        assert!(vault.resolve_latest("r1").unwrap().is_none());
    }

    #[test]
    fn test_other_devices_files_are_not_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        let month = vault.device_dir("r1").join("2024").join("01");
        std::fs::create_dir_all(&month).unwrap();
        std::fs::write(month.join("r2_2024-01-01_10-00-00.txt"), "config").unwrap();
        std::fs::write(month.join("r1_notes.md"), "notes").unwrap();
        assert!(vault.resolve_latest("r1").unwrap().is_none());
    }

    #[test]
    fn test_same_directory_prefers_greater_stamp_regardless_of_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        write_backup(&vault, "r1", "2024", "01", "2024-01-01_10-00-00");
        write_backup(&vault, "r1", "2024", "01", "2024-01-02_09-00-00");
        // make the older-named file the most recently touched one
        let month = vault.device_dir("r1").join("2024").join("01");
        set_mtime(
            &month.join("r1_2024-01-01_10-00-00.txt"),
            SystemTime::now() + Duration::from_secs(3600),
        );
        let latest = vault.resolve_latest("r1").unwrap().unwrap();
        assert_eq!(latest.stamp, "2024-01-02_09-00-00");
    }

    #[test]
    fn test_across_directories_prefers_greater_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        write_backup(&vault, "r1", "2024", "01", "2024-01-31_23-00-00");
        write_backup(&vault, "r1", "2024", "02", "2024-02-01_10-00-00");
        // the January file was touched last, so it wins despite its name
        let now = SystemTime::now();
        set_mtime(
            &vault
                .device_dir("r1")
                .join("2024")
                .join("01")
                .join("r1_2024-01-31_23-00-00.txt"),
            now + Duration::from_secs(3600),
        );
        set_mtime(
            &vault
                .device_dir("r1")
                .join("2024")
                .join("02")
                .join("r1_2024-02-01_10-00-00.txt"),
            now,
        );
        let latest = vault.resolve_latest("r1").unwrap().unwrap();
        assert_eq!(latest.stamp, "2024-01-31_23-00-00");
    }

    #[tokio::test]
    async fn test_latest_content_distinguishes_missing_device_and_missing_backup() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        assert!(matches!(
            vault.latest_content("ghost").await,
            Err(ApiError::DeviceNotFound(_))
        ));
        std::fs::create_dir_all(vault.device_dir("r1")).unwrap();
        assert!(matches!(
            vault.latest_content("r1").await,
            Err(ApiError::BackupMissing(_))
        ));
        write_backup(&vault, "r1", "2024", "01", "2024-01-01_10-00-00");
        assert_eq!(vault.latest_content("r1").await.unwrap(), "config");
    }

    #[test]
    fn test_history_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        write_backup(&vault, "r1", "2023", "12", "2023-12-31_10-00-00");
        write_backup(&vault, "r1", "2024", "01", "2024-01-01_10-00-00");
        write_backup(&vault, "r1", "2024", "01", "2024-01-02_10-00-00");
        let years = vault.history("r1").unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, "2024");
        assert_eq!(years[1].year, "2023");
        assert_eq!(years[0].months[0].month, "01");
        assert_eq!(
            years[0].months[0].files,
            vec![
                "r1_2024-01-02_10-00-00.txt".to_owned(),
                "r1_2024-01-01_10-00-00.txt".to_owned(),
            ]
        );
    }

    #[test]
    fn test_history_of_unknown_device_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            vault(&dir).history("ghost"),
            Err(ApiError::DeviceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_history_file_rejects_traversal_before_access() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        write_backup(&vault, "r1", "2024", "01", "2024-01-01_10-00-00");
        assert!(matches!(
            vault.read_history_file("r1", "../../etc/passwd").await,
            Err(ApiError::PathViolation)
        ));
        assert!(matches!(
            vault.read_history_file("r1", "/etc/passwd").await,
            Err(ApiError::PathViolation)
        ));
    }

    #[tokio::test]
    async fn test_read_history_file_reads_contained_paths() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        write_backup(&vault, "r1", "2024", "01", "2024-01-01_10-00-00");
        let content = vault
            .read_history_file("r1", "2024/01/r1_2024-01-01_10-00-00.txt")
            .await
            .unwrap();
        assert_eq!(content, "config");
        assert!(matches!(
            vault.read_history_file("r1", "2024/01/nope.txt").await,
            Err(ApiError::FileNotFound)
        ));
    }

    #[tokio::test]
    async fn test_ingest_creates_tree_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        let path = vault.ingest("new-device", "hostname new-device").await.unwrap();
        assert!(path.starts_with(vault.device_dir("new-device")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("new-device_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "hostname new-device"
        );
        // the snapshot is found by the resolver it was written for
        assert!(vault.resolve_latest("new-device").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_prune_keeps_single_newest_file_per_month() {
        let dir = tempfile::tempdir().unwrap();
        let vault = vault(&dir);
        for day in 1..=5 {
            write_backup(&vault, "r1", "2024", "01", &format!("2024-01-0{day}_10-00-00"));
        }
        write_backup(&vault, "r1", "2024", "02", "2024-02-01_10-00-00");
        let removed = vault.prune_all().await.unwrap();
        assert_eq!(removed, 4);
        let month = vault.device_dir("r1").join("2024").join("01");
        let files = backup_files_newest_first(&month).unwrap();
        assert_eq!(files, vec!["r1_2024-01-05_10-00-00.txt".to_owned()]);
        // the other month is untouched
        let month = vault.device_dir("r1").join("2024").join("02");
        assert_eq!(backup_files_newest_first(&month).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prune_on_empty_root_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(vault(&dir).prune_all().await.unwrap(), 0);
    }
}
