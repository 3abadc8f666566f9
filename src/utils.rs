//! Shared helpers for paths, timestamps and best-effort file cleanup.
//!
//! These functions are reused across the CLI, TUI and repository.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::OffsetDateTime;

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Current UTC time truncated to whole milliseconds, the precision the
/// store persists.
pub fn now_millis() -> OffsetDateTime {
    // Infallible: the current time is always in range.
    from_epoch_millis(to_epoch_millis(OffsetDateTime::now_utc()))
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Milliseconds since the Unix epoch.
pub fn to_epoch_millis(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Inverse of [`to_epoch_millis`].
///
/// # Errors
///
/// Returns an error if the value is outside the representable range.
pub fn from_epoch_millis(millis: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .with_context(|| format!("timestamp out of range: {millis}"))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(at: OffsetDateTime) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    at.format(&format).unwrap_or_else(|_| "????-??-??".to_string())
}

/// Deletes a file, logging instead of failing.
///
/// Returns `true` if the file was removed. A missing file is not an error.
pub fn remove_file_best_effort(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed file");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove file");
            false
        }
    }
}

/// Copies a user-supplied image into `images_dir` and returns the new path.
///
/// Notes own their image and delete it with themselves, so they must never
/// point at the user's original file. Copies are named
/// `IMG_{epoch_millis}_{n}.{ext}`; the source is left untouched.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the copy cannot be
/// written.
pub fn import_image(source: &Path, images_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(images_dir).with_context(|| {
        format!("Failed to create image directory: {}", images_dir.display())
    })?;

    let mut input = File::open(source)
        .with_context(|| format!("Failed to open image: {}", source.display()))?;
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("jpg");
    let stamp = to_epoch_millis(now_millis());

    let mut attempt = 0u32;
    loop {
        let target = images_dir.join(format!("IMG_{stamp}_{attempt}.{extension}"));
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(mut output) => {
                if let Err(e) = io::copy(&mut input, &mut output) {
                    remove_file_best_effort(&target);
                    return Err(e).with_context(|| {
                        format!("Failed to copy image to {}", target.display())
                    });
                }
                tracing::debug!(
                    from = %source.display(),
                    to = %target.display(),
                    "imported image"
                );
                return Ok(target);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create image file: {}", target.display())
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_database_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("a").join("b").join("notes.db");

        ensure_database_directory(&db_path).unwrap();

        assert!(db_path.parent().unwrap().is_dir());
    }

    #[test]
    fn epoch_millis_roundtrip_is_exact_for_truncated_times() {
        let now = now_millis();
        let millis = to_epoch_millis(now);
        assert_eq!(from_epoch_millis(millis).unwrap(), now);
    }

    #[test]
    fn format_date_is_iso_like() {
        let at = from_epoch_millis(0).unwrap();
        assert_eq!(format_date(at), "1970-01-01");
    }

    #[test]
    fn remove_file_best_effort_reports_outcome() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        assert!(remove_file_best_effort(&path));
        assert!(!path.exists());
        // Already gone: swallowed.
        assert!(!remove_file_best_effort(&path));
        // A directory cannot be removed with remove_file: swallowed too.
        assert!(!remove_file_best_effort(dir.path()));
    }

    #[test]
    fn import_image_copies_into_owned_directory() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("my photo.png");
        std::fs::write(&source, b"png bytes").unwrap();
        let images = dir.path().join("data").join("images");

        let first = import_image(&source, &images).unwrap();
        let second = import_image(&source, &images).unwrap();

        assert_ne!(first, second);
        for copy in [&first, &second] {
            assert!(copy.starts_with(&images));
            assert_eq!(copy.extension().unwrap(), "png");
            assert_eq!(std::fs::read(copy).unwrap(), b"png bytes");
        }
        assert!(source.exists());
    }

    #[test]
    fn import_image_fails_for_missing_source() {
        let dir = tempdir().unwrap();
        let err = import_image(&dir.path().join("nope.jpg"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to open image"));
    }
}
