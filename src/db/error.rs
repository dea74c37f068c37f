use std::{io, path::PathBuf};
use thiserror::Error;

/// Why a package database archive could not be decoded
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read archive header: {0}")]
    Header(#[source] io::Error),
    #[error("not a gzip or xz compressed archive (magic {magic:02x?})")]
    UnknownFormat { magic: Vec<u8> },
    #[error("corrupted archive: {0}")]
    Archive(#[source] io::Error),
    #[error("failed to read archive entry {path}: {source}")]
    Entry {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Recoverable problems met while loading the repositories of a branch.
///
/// None of them stop the load, they are handed back to the caller next to
/// the index.
#[derive(Error, Debug)]
pub enum LoadWarning {
    #[error("can't read file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("empty database file {}", .path.display())]
    EmptyDatabase { path: PathBuf },
    #[error("{branch}:{repo}: {source}")]
    Archive {
        branch: String,
        repo: String,
        #[source]
        source: ExtractError,
    },
    #[error("{branch}:{repo}: entry {entry} has no package name")]
    Unnamed {
        branch: String,
        repo: String,
        entry: String,
    },
    #[error("{branch}:{repo}: repository is empty or all packages are ignored")]
    NoPackages { branch: String, repo: String },
    #[error("repository {repo} is listed more than once")]
    RepeatedRepository { repo: String },
    #[error("ignore duplicate: {name} ({branch}.{repo}), keeping {branch}.{kept}")]
    Duplicate {
        name: String,
        branch: String,
        /// Repository whose record got dropped
        repo: String,
        kept: String,
    },
}

#[derive(Error, Debug)]
pub enum LocalDbError {
    #[error("pacman database {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed ALPM_DB_VERSION: {0:?}")]
    BadVersionFile(String),
    #[error("bad ALPM local database version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: usize, found: usize },
    #[error("pacman database {} is empty", .0.display())]
    Empty(PathBuf),
}
