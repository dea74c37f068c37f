mod branch;
mod version;

pub use branch::BranchFlags;
pub use version::{compare_versions, rpmvercmp, vercmp, Evr};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{cmp::Ordering, collections::HashMap, fmt};

/// How much of a desc file ends up in a [`PackageRecord`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Detail {
    /// NAME, VERSION, BUILDDATE and PACKAGER
    #[default]
    Short,
    /// Also DESC and URL
    Long,
}

impl From<bool> for Detail {
    fn from(long: bool) -> Self {
        if long {
            Detail::Long
        } else {
            Detail::Short
        }
    }
}

/// One package of one repository in one branch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    /// Opaque `[epoch:]version[-release]`, compare with [`vercmp`]
    pub version: String,
    pub repo: String,
    pub build_date: Option<DateTime<Utc>>,
    pub packager: String,
    // Only filled with Detail::Long
    pub url: String,
    pub description: String,
}

/// Package name => record, at most one record per name
pub type PackageIndex = HashMap<String, PackageRecord>;

impl PackageRecord {
    pub fn cmp_version(&self, other: &PackageRecord) -> Ordering {
        vercmp(&self.version, &other.version)
    }

    /// Description cut down to at most `max` characters
    pub fn summary(&self, max: usize) -> String {
        if self.description.chars().count() <= max {
            return self.description.clone();
        }
        let mut res: String = self
            .description
            .chars()
            .take(max.saturating_sub(1))
            .collect();
        res.push('…');
        res
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, " Name:     {}", self.name)?;
        writeln!(f, " Version:  {}", self.version)?;
        write!(f, " Date:     ")?;
        match self.build_date {
            Some(date) => write!(f, "{}", date.format("%y-%m-%d %H:%M")),
            None => write!(f, "-"),
        }
    }
}

/// Keep the records of `all` whose name also appears in `wants`
pub fn filter_only(all: &PackageIndex, wants: &PackageIndex) -> PackageIndex {
    wants
        .keys()
        .filter_map(|name| all.get_key_value(name))
        .map(|(name, pkg)| (name.clone(), pkg.clone()))
        .collect()
}

/// Package names in byte order
pub fn sorted_names(index: &PackageIndex) -> Vec<&str> {
    let mut names: Vec<&str> = index.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
