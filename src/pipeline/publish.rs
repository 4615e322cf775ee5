//! All-or-nothing publication of ETL artifacts
//!
//! Artifacts are written into a staging directory created inside the output
//! directory, then renamed into place once every file was written. Existing
//! targets are moved aside first; if any rename fails, the renamed files are
//! removed and the previous targets are put back.

use std::io;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use super::error::EtlError;
use super::loader::write_csv;

/// A frame waiting to be written under `file_name`
pub struct Artifact {
    pub file_name: &'static str,
    pub df: DataFrame,
}

impl Artifact {
    pub fn new(file_name: &'static str, df: DataFrame) -> Self {
        Self { file_name, df }
    }
}

/// A published target and, if it replaced a file, where the old file was kept
struct Placed {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// Write all artifacts to `output_dir`, or none of them.
///
/// Returns the final paths in artifact order.
pub fn publish_artifacts(
    output_dir: &Path,
    artifacts: &mut [Artifact],
) -> Result<Vec<PathBuf>, EtlError> {
    std::fs::create_dir_all(output_dir).map_err(|e| EtlError::io(output_dir, e))?;
    check_targets(output_dir, artifacts)?;

    let staging = tempfile::Builder::new()
        .prefix(".diabrisk-staging-")
        .tempdir_in(output_dir)
        .map_err(|e| EtlError::io(output_dir, e))?;

    for artifact in artifacts.iter_mut() {
        let staged = staging.path().join(artifact.file_name);
        write_csv(&mut artifact.df, &staged)?;
        debug!(file = artifact.file_name, rows = artifact.df.height(), "staged artifact");
    }

    let backups = staging.path().join("previous");
    std::fs::create_dir(&backups).map_err(|e| EtlError::io(&backups, e))?;

    let mut placed: Vec<Placed> = Vec::with_capacity(artifacts.len());
    for artifact in artifacts.iter() {
        let staged = staging.path().join(artifact.file_name);
        let target = output_dir.join(artifact.file_name);
        match place(&staged, &target, &backups.join(artifact.file_name)) {
            Ok(entry) => placed.push(entry),
            Err(e) => {
                roll_back(&placed);
                return Err(e);
            }
        }
    }

    Ok(placed.into_iter().map(|p| p.target).collect())
}

/// Fail before anything is renamed when a target cannot be replaced by a file.
fn check_targets(output_dir: &Path, artifacts: &[Artifact]) -> Result<(), EtlError> {
    for artifact in artifacts {
        let target = output_dir.join(artifact.file_name);
        match std::fs::symlink_metadata(&target) {
            Ok(meta) if meta.is_dir() => {
                return Err(EtlError::io(
                    &target,
                    io::Error::other("target exists and is a directory"),
                ));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(EtlError::io(&target, e)),
        }
    }
    Ok(())
}

/// Move an existing target aside, then rename the staged file into place.
fn place(staged: &Path, target: &Path, backup: &Path) -> Result<Placed, EtlError> {
    let backup = if target.exists() {
        std::fs::rename(target, backup).map_err(|e| EtlError::io(target, e))?;
        Some(backup.to_path_buf())
    } else {
        None
    };

    if let Err(e) = std::fs::rename(staged, target) {
        if let Some(previous) = &backup {
            restore(previous, target);
        }
        return Err(EtlError::io(target, e));
    }

    Ok(Placed {
        target: target.to_path_buf(),
        backup,
    })
}

fn roll_back(placed: &[Placed]) {
    for entry in placed.iter().rev() {
        if let Err(e) = std::fs::remove_file(&entry.target) {
            warn!(path = %entry.target.display(), error = %e, "could not remove published file");
        }
        if let Some(previous) = &entry.backup {
            restore(previous, &entry.target);
        }
    }
}

fn restore(previous: &Path, target: &Path) {
    if let Err(e) = std::fs::rename(previous, target) {
        warn!(path = %target.display(), error = %e, "could not restore previous file");
    }
}
