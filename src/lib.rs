//! Read the pacman sync databases of Manjaro branches and compare package
//! versions across them.
//!
//! ```no_run
//! use mbc::{load_repositories, Detail};
//! use std::path::Path;
//!
//! let loaded = load_repositories(
//!     Path::new("/var/cache/mbc/stable/sync"),
//!     &["core", "extra"],
//!     "stable",
//!     Detail::Short,
//! );
//! for warning in &loaded.warnings {
//!     eprintln!("{warning}");
//! }
//! ```
pub mod config;
pub mod db;
pub mod types;
mod utils;

pub use config::Config;
pub use db::{load_local, load_repositories, read_db, LoadWarning, Loaded};
pub use types::{
    compare_versions, filter_only, sorted_names, vercmp, BranchFlags, Detail, PackageIndex,
    PackageRecord,
};
pub use utils::pacparse::parse_record;
