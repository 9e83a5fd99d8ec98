//! Without retention, every rotation leaves one more backup behind until the disk fills.
//! Runs after each rotation: count limit first, then age limit, then compression of
//! whatever survives.

use super::backup::{Backup, BackupNaming, COMPRESS_SUFFIX};
use crate::internal;
use chrono::{NaiveDateTime, TimeDelta};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// All limits default to off so nothing gets deleted without explicit opt-in.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct RetentionPolicy {
    pub max_backups: Option<usize>,
    pub max_age: Option<TimeDelta>,
    pub compress: bool,
}

impl RetentionPolicy {
    const fn is_noop(&self) -> bool {
        self.max_backups.is_none() && self.max_age.is_none() && !self.compress
    }
}

/// What a retention pass did, so the caller can report it.
#[derive(Debug, Default)]
pub(super) struct RetentionReport {
    pub removed: Vec<PathBuf>,
    pub compressed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Applies `policy` to the backups of one live file. `now` must be in the same zone
/// the backup names were written in.
pub(super) fn enforce(
    naming: &BackupNaming,
    policy: RetentionPolicy,
    now: NaiveDateTime,
) -> io::Result<RetentionReport> {
    let mut report = RetentionReport::default();
    if policy.is_noop() {
        return Ok(report);
    }

    let backups = naming.scan()?;
    let (mut keep, mut remove): (Vec<Backup>, Vec<Backup>) = match policy.max_backups {
        Some(n) if backups.len() > n => {
            let mut all = backups;
            let extra = all.split_off(n);
            (all, extra)
        }
        _ => (backups, Vec::new()),
    };

    if let Some(max_age) = policy.max_age {
        let cutoff = now - max_age;
        let (fresh, stale): (Vec<_>, Vec<_>) =
            keep.into_iter().partition(|b| b.rotated_at >= cutoff);
        keep = fresh;
        remove.extend(stale);
    }

    for backup in remove {
        internal::debug("RETENTION", &format!("Removing {}", backup.path.display()));
        match fs::remove_file(&backup.path) {
            Ok(()) => report.removed.push(backup.path),
            Err(e) => report.failed.push((backup.path, e.to_string())),
        }
    }

    if policy.compress {
        for backup in keep.iter().filter(|b| !b.compressed) {
            internal::debug(
                "RETENTION",
                &format!("Compressing {}", backup.path.display()),
            );
            match compress_file(&backup.path) {
                Ok(gz) => report.compressed.push(gz),
                Err(e) => report.failed.push((backup.path.clone(), e.to_string())),
            }
        }
    }

    Ok(report)
}

/// Writes `<path>.gz` then removes the original. A half-written `.gz` is removed on failure
/// so the next pass starts clean.
fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(COMPRESS_SUFFIX);
    let gz_path = PathBuf::from(gz_name);

    if let Err(e) = write_gzip(path, &gz_path) {
        let _ = fs::remove_file(&gz_path);
        return Err(e);
    }

    fs::remove_file(path)?;
    Ok(gz_path)
}

fn write_gzip(source: &Path, target: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(File::open(source)?);
    let writer = BufWriter::new(File::create(target)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read])?;
    }
    encoder.finish()?.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn seed(naming: &BackupNaming, stamps: &[NaiveDateTime]) -> Vec<PathBuf> {
        stamps
            .iter()
            .map(|at| {
                let path = naming.path_for(*at);
                fs::write(&path, format!("rotated at {at}\n")).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn noop_policy_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let naming = BackupNaming::new(&dir.path().join("app.log"));
        let paths = seed(&naming, &[ts(1, 0), ts(2, 0)]);

        let report = enforce(&naming, RetentionPolicy::default(), ts(30, 0)).unwrap();
        assert!(report.removed.is_empty());
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[test]
    fn max_backups_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let naming = BackupNaming::new(&dir.path().join("app.log"));
        let paths = seed(&naming, &[ts(1, 0), ts(2, 0), ts(3, 0)]);
        fs::write(dir.path().join("app.log"), "live\n").unwrap();

        let policy = RetentionPolicy {
            max_backups: Some(2),
            ..RetentionPolicy::default()
        };
        let report = enforce(&naming, policy, ts(3, 1)).unwrap();

        assert_eq!(report.removed, vec![paths[0].clone()]);
        assert!(paths[1].exists());
        assert!(paths[2].exists());
        assert!(dir.path().join("app.log").exists());
    }

    #[test]
    fn max_age_removes_stale_backups() {
        let dir = TempDir::new().unwrap();
        let naming = BackupNaming::new(&dir.path().join("app.log"));
        let paths = seed(&naming, &[ts(1, 0), ts(9, 0), ts(10, 0)]);

        let policy = RetentionPolicy {
            max_age: Some(TimeDelta::days(2)),
            ..RetentionPolicy::default()
        };
        let report = enforce(&naming, policy, ts(10, 12)).unwrap();

        assert_eq!(report.removed, vec![paths[0].clone()]);
        assert!(!paths[0].exists());
        assert!(paths[1].exists());
    }

    #[test]
    fn compress_replaces_backup_with_gzip() {
        let dir = TempDir::new().unwrap();
        let naming = BackupNaming::new(&dir.path().join("app.log"));
        let paths = seed(&naming, &[ts(1, 0)]);

        let policy = RetentionPolicy {
            compress: true,
            ..RetentionPolicy::default()
        };
        let report = enforce(&naming, policy, ts(1, 1)).unwrap();

        assert_eq!(report.compressed.len(), 1);
        assert!(!paths[0].exists());
        let gz = &report.compressed[0];
        assert!(gz.to_string_lossy().ends_with(".log.gz"));

        let mut content = String::new();
        GzDecoder::new(File::open(gz).unwrap())
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, format!("rotated at {}\n", ts(1, 0)));

        // Already-compressed backups are left alone on the next pass.
        let report = enforce(&naming, policy, ts(1, 2)).unwrap();
        assert!(report.compressed.is_empty());
        assert!(gz.exists());
    }
}
