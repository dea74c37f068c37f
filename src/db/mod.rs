//! Load the package databases of one branch into a single index
mod archive;
mod error;
mod local;

pub use archive::{Blocks, Compression, DbArchive, RawBlock};
pub use error::{ExtractError, LoadWarning, LocalDbError};
pub use local::{load_local, DEFAULT_LOCAL_DB, LOCAL_REPO};

use crate::{
    types::{Detail, PackageIndex, PackageRecord},
    utils::pacparse,
};
use rayon::{Scope, ThreadPoolBuilder};
use std::{
    collections::{hash_map::Entry, HashMap},
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::mpsc,
};
use tracing::{debug, trace};

/// Everything found in the databases of a branch
#[derive(Debug, Default)]
pub struct Loaded {
    pub packages: PackageIndex,
    pub warnings: Vec<LoadWarning>,
}

impl Loaded {
    pub fn warning_lines(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// The index and the warnings rendered as text
    pub fn into_parts(self) -> (PackageIndex, Vec<String>) {
        let lines = self.warning_lines();
        (self.packages, lines)
    }
}

/// What a worker found in one repository
struct RepoBatch {
    /// Position of the repository in the configured list
    position: usize,
    records: Vec<PackageRecord>,
    warnings: Vec<LoadWarning>,
}

/// `<dir>/<repo>.db`
pub fn db_path(dir: &Path, repo: &str) -> PathBuf {
    dir.join(format!("{repo}.db"))
}

/// Load `<dir>/<repo>.db` for every repo in `repos`, in parallel.
///
/// A package present in several repositories is taken from the one listed
/// first, every dropped copy shows up as a [`LoadWarning::Duplicate`].
/// Unreadable or broken databases only cost their own packages.
pub fn load_repositories<S: AsRef<str>>(
    dir: &Path,
    repos: &[S],
    branch: &str,
    detail: Detail,
) -> Loaded {
    let mut repeated = Vec::new();
    let mut unique: Vec<&str> = Vec::with_capacity(repos.len());
    for repo in repos.iter().map(AsRef::as_ref) {
        if unique.contains(&repo) {
            repeated.push(LoadWarning::RepeatedRepository {
                repo: repo.to_owned(),
            });
        } else {
            unique.push(repo);
        }
    }
    if unique.is_empty() {
        return Loaded {
            warnings: repeated,
            ..Default::default()
        };
    }

    debug!(branch, dir = %dir.display(), repos = unique.len(), "loading repositories");
    let pool = ThreadPoolBuilder::new()
        .num_threads(unique.len())
        .thread_name(|i| format!("mbc-db-{i}"))
        .build();
    let aggregator = match pool {
        Ok(pool) => pool.in_place_scope(|s| run_workers(s, dir, &unique, branch, detail)),
        Err(e) => {
            debug!("cannot build loader thread pool, loading sequentially: {e}");
            let mut aggregator = Aggregator::new(branch);
            for (position, repo) in unique.iter().enumerate() {
                aggregator.add(load_repo(dir, repo, branch, detail, position));
            }
            aggregator
        }
    };

    let mut loaded = aggregator.finish();
    repeated.append(&mut loaded.warnings);
    loaded.warnings = repeated;
    debug!(branch, packages = loaded.packages.len(), warnings = loaded.warnings.len(), "branch loaded");

    loaded
}

/// One worker per repository, the calling thread aggregates
fn run_workers<'scope>(
    s: &Scope<'scope>,
    dir: &'scope Path,
    repos: &'scope [&'scope str],
    branch: &'scope str,
    detail: Detail,
) -> Aggregator<'scope> {
    let (tx, rx) = mpsc::channel();
    for (position, &repo) in repos.iter().enumerate() {
        let tx = tx.clone();
        s.spawn(move |_| {
            let batch = load_repo(dir, repo, branch, detail, position);
            if tx.send(batch).is_err() {
                trace!(repo, "aggregator is gone, dropping batch");
            }
        });
    }
    // Only workers hold senders now, the loop ends when the last one is done
    drop(tx);

    let mut aggregator = Aggregator::new(branch);
    for batch in rx {
        aggregator.add(batch);
    }
    aggregator
}

fn load_repo(dir: &Path, repo: &str, branch: &str, detail: Detail, position: usize) -> RepoBatch {
    let failed = |warning| RepoBatch {
        position,
        records: Vec::new(),
        warnings: vec![warning],
    };

    let path = db_path(dir, repo);
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(source) => return failed(LoadWarning::Unreadable { path, source }),
    };
    match file.metadata() {
        Ok(meta) if meta.len() == 0 => return failed(LoadWarning::EmptyDatabase { path }),
        Ok(_) => (),
        Err(source) => return failed(LoadWarning::Unreadable { path, source }),
    }

    let entries = match read_entries(file, repo, detail) {
        Ok(entries) => entries,
        Err(source) => {
            return failed(LoadWarning::Archive {
                branch: branch.to_owned(),
                repo: repo.to_owned(),
                source,
            })
        }
    };

    let mut warnings = Vec::new();
    let mut records = Vec::with_capacity(entries.len());
    for (entry, record) in entries {
        if !record.name.is_empty() {
            records.push(record);
        } else if entry.ends_with("desc") {
            warnings.push(LoadWarning::Unnamed {
                branch: branch.to_owned(),
                repo: repo.to_owned(),
                entry,
            });
        } else {
            trace!(repo, %entry, "skipping entry without package name");
        }
    }
    if records.is_empty() {
        warnings.push(LoadWarning::NoPackages {
            branch: branch.to_owned(),
            repo: repo.to_owned(),
        });
    }
    debug!(branch, repo, packages = records.len(), "repository loaded");

    RepoBatch {
        position,
        records,
        warnings,
    }
}

/// (entry path, record) for every regular file, nothing at all on error
fn read_entries<R: Read>(
    reader: R,
    repo: &str,
    detail: Detail,
) -> Result<Vec<(String, PackageRecord)>, ExtractError> {
    let mut archive = DbArchive::new(reader)?;
    let blocks = archive.blocks()?;
    blocks
        .map(|block| {
            block.map(|b| {
                let record = pacparse::parse_record(&b.content, repo, detail);
                (b.path, record)
            })
        })
        .collect()
}

/// Parse a whole database stream (gzip or xz compressed tar).
///
/// Records without a name are kept, filtering them is up to the caller.
pub fn read_db<R: Read>(
    reader: R,
    repo: &str,
    detail: Detail,
) -> Result<Vec<PackageRecord>, ExtractError> {
    Ok(read_entries(reader, repo, detail)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// A record that lost against another one of the same name
struct Dropped {
    name: String,
    position: usize,
    repo: String,
}

/// Sole owner of the index while a branch is being loaded
struct Aggregator<'a> {
    branch: &'a str,
    /// name => (repository position, record)
    packages: HashMap<String, (usize, PackageRecord)>,
    /// (repository position, warnings of that repository)
    source_warnings: Vec<(usize, Vec<LoadWarning>)>,
    dropped: Vec<Dropped>,
}

impl<'a> Aggregator<'a> {
    fn new(branch: &'a str) -> Self {
        Aggregator {
            branch,
            packages: HashMap::new(),
            source_warnings: Vec::new(),
            dropped: Vec::new(),
        }
    }

    fn add(&mut self, batch: RepoBatch) {
        let position = batch.position;
        self.source_warnings.push((position, batch.warnings));

        for record in batch.records {
            match self.packages.entry(record.name.clone()) {
                Entry::Vacant(v) => {
                    v.insert((position, record));
                }
                Entry::Occupied(mut o) => {
                    // Lower position wins, the first seen wins inside one repository
                    let (dropped_position, dropped) = if position < o.get().0 {
                        o.insert((position, record))
                    } else {
                        (position, record)
                    };
                    self.dropped.push(Dropped {
                        name: dropped.name,
                        position: dropped_position,
                        repo: dropped.repo,
                    });
                }
            }
        }
    }

    fn finish(mut self) -> Loaded {
        // Arrival order is up to the scheduler, so sort everything
        self.source_warnings.sort_by_key(|(position, _)| *position);
        self.dropped
            .sort_by(|a, b| a.name.cmp(&b.name).then(a.position.cmp(&b.position)));

        let mut warnings: Vec<LoadWarning> = self
            .source_warnings
            .into_iter()
            .flat_map(|(_, w)| w)
            .collect();
        // The winner is only known once every batch is in
        for dropped in self.dropped {
            let kept = match self.packages.get(&dropped.name) {
                Some((_, record)) => record.repo.clone(),
                None => continue,
            };
            warnings.push(LoadWarning::Duplicate {
                name: dropped.name,
                branch: self.branch.to_owned(),
                repo: dropped.repo,
                kept,
            });
        }

        Loaded {
            packages: self
                .packages
                .into_iter()
                .map(|(name, (_, record))| (name, record))
                .collect(),
            warnings,
        }
    }
}
