use super::error::LocalDbError;
use crate::{
    types::{Detail, PackageIndex, PackageRecord},
    utils::pacparse,
};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Repository label of installed packages
pub const LOCAL_REPO: &str = "local";
pub const DEFAULT_LOCAL_DB: &str = "/var/lib/pacman/local";
const SUPPORTED_ALPM_DB_VERSION: usize = 9;

/// Read the installed packages from a pacman local database (`<root>/*/desc`)
pub fn load_local(root: &Path) -> Result<PackageIndex, LocalDbError> {
    if !root.is_dir() {
        return Err(LocalDbError::Missing(root.to_owned()));
    }
    check_db_version(root)?;

    let io_err = |source| LocalDbError::Io {
        path: root.to_owned(),
        source,
    };
    let mut descs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let desc = entry.map_err(io_err)?.path().join("desc");
        if desc.is_file() {
            descs.push(desc);
        }
    }
    // Stable order, so the first of two entries with the same name wins
    descs.sort();

    let records: Vec<PackageRecord> = descs
        .par_iter()
        .filter_map(|path| match fs::read(path) {
            Ok(content) => Some(pacparse::parse_record(
                &String::from_utf8_lossy(&content),
                LOCAL_REPO,
                Detail::Short,
            )),
            Err(e) => {
                debug!("skipping {}: {e}", path.display());
                None
            }
        })
        .filter(|record| !record.name.is_empty())
        .collect();

    let mut pkgs = PackageIndex::with_capacity(records.len());
    for record in records {
        pkgs.entry(record.name.clone()).or_insert(record);
    }
    if pkgs.is_empty() {
        return Err(LocalDbError::Empty(root.to_owned()));
    }
    debug!(packages = pkgs.len(), "local database loaded");

    Ok(pkgs)
}

/// A missing version file is accepted, a wrong one is not
fn check_db_version(root: &Path) -> Result<(), LocalDbError> {
    let path = root.join("ALPM_DB_VERSION");
    if !path.exists() {
        debug!("no ALPM_DB_VERSION in {}", root.display());
        return Ok(());
    }
    let content = fs::read_to_string(&path).map_err(|source| LocalDbError::Io { path, source })?;
    let line = content.lines().next().unwrap_or_default().trim();
    let found: usize = line
        .parse()
        .map_err(|_| LocalDbError::BadVersionFile(line.to_owned()))?;
    if found != SUPPORTED_ALPM_DB_VERSION {
        return Err(LocalDbError::UnsupportedVersion {
            expected: SUPPORTED_ALPM_DB_VERSION,
            found,
        });
    }

    Ok(())
}
