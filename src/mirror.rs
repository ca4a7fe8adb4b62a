//! Additive recursive copies and backup naming.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::error::{IoContext, Result};

/// Prefix of backup directories created inside an installation root.
pub const BACKUP_PREFIX: &str = ".backup-";

/// Copy `src` (file or directory) to `dest`, recursively.
///
/// Intermediate directories are created as needed. Nothing at the destination is
/// deleted first: unrelated files survive, and files that no longer exist in
/// `src` are left behind.
pub fn copy_recursive(src: &Path, dest: &Path) -> Result<()> {
    let metadata = fs::metadata(src).at(src)?;

    if metadata.is_dir() {
        fs::create_dir_all(dest).at(dest)?;
        for entry in fs::read_dir(src).at(src)? {
            let entry = entry.at(src)?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::copy(src, dest).at(dest)?;
    }
    Ok(())
}

/// Copy every top-level entry of `src_dir` into `dest_dir`, skipping names for
/// which `skip` returns true.
pub fn copy_entries(src_dir: &Path, dest_dir: &Path, skip: impl Fn(&str) -> bool) -> Result<()> {
    let entries = fs::read_dir(src_dir).at(src_dir)?;
    fs::create_dir_all(dest_dir).at(dest_dir)?;
    for entry in entries {
        let entry = entry.at(src_dir)?;
        let name = entry.file_name();
        if skip(&name.to_string_lossy()) {
            continue;
        }
        copy_recursive(&entry.path(), &dest_dir.join(&name))?;
    }
    debug!("Copied entries of {:?} into {:?}", src_dir, dest_dir);
    Ok(())
}

/// High-resolution UTC timestamp for backup names.
pub fn backup_stamp() -> String {
    Utc::now().format("%Y%m%dT%H%M%S%.9fZ").to_string()
}

/// First path of the form `{dir}/{prefix}{stamp}{suffix}` that does not exist yet.
///
/// Two backups taken within the same clock tick get `-1`, `-2`, ... appended to the stamp.
pub fn unique_backup_path(dir: &Path, prefix: &str, suffix: &str) -> PathBuf {
    let stamp = backup_stamp();
    let mut candidate = dir.join(format!("{}{}{}", prefix, stamp, suffix));
    let mut n = 1;
    while candidate.symlink_metadata().is_ok() {
        candidate = dir.join(format!("{}{}-{}{}", prefix, stamp, n, suffix));
        n += 1;
    }
    candidate
}

/// Copy a single file to a timestamped sibling: `notes.md` becomes `notes.backup-<stamp>.md`.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let backup = unique_backup_path(dir, &format!("{}.backup-", stem), &suffix);
    fs::copy(path, &backup).at(&backup)?;
    debug!("Backed up {:?} to {:?}", path, backup);
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_is_additive() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dest = tmp.path().join("dest");
        fs::create_dir_all(src.join("nested/deeper")).unwrap();
        fs::write(src.join("a.md"), "new a").unwrap();
        fs::write(src.join("nested/deeper/b.md"), "b").unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("a.md"), "old a").unwrap();
        fs::write(dest.join("keep.md"), "mine").unwrap();

        copy_recursive(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.md")).unwrap(), "new a");
        assert_eq!(fs::read_to_string(dest.join("keep.md")).unwrap(), "mine");
        assert_eq!(fs::read_to_string(dest.join("nested/deeper/b.md")).unwrap(), "b");
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(copy_recursive(&tmp.path().join("nope"), &tmp.path().join("out")).is_err());
    }

    #[test]
    fn copy_entries_honours_skip() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join(".backup-1")).unwrap();
        fs::write(src.join("SKILL.md"), "x").unwrap();

        let dest = tmp.path().join("dest");
        copy_entries(&src, &dest, |name| name.starts_with(BACKUP_PREFIX)).unwrap();

        assert!(dest.join("SKILL.md").is_file());
        assert!(!dest.join(".backup-1").exists());
    }

    #[test]
    fn copy_entries_from_missing_source_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("dest");

        let err = copy_entries(&tmp.path().join("missing"), &dest, |_| false).unwrap_err();

        assert!(matches!(err, crate::Error::Io { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn file_backups_never_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("ui.md");
        fs::write(&file, "v1").unwrap();

        let first = backup_file(&file).unwrap();
        let second = backup_file(&file).unwrap();

        assert_ne!(first, second);
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ui.backup-"));
        assert!(name.ends_with(".md"));
        assert_eq!(fs::read_to_string(second).unwrap(), "v1");
    }
}
