use crate::{
    db::{load_repositories, Loaded},
    types::Detail,
};
use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const APP_NAME: &str = "manjaro-branch-check";
/// Upstream branch, always checked against
pub const UPSTREAM_BRANCH: &str = "archlinux";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Databases of a branch live in `<cache_dir>/<branch>/sync`
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_branches")]
    pub branches: Vec<String>,
    /// In precedence order
    pub repos: Vec<String>,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("Failed to parse config")?;
        config.check_sanity()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn check_sanity(&self) -> Result<()> {
        lazy_static! {
            static ref NAME: Regex = Regex::new("^[A-Za-z0-9._+-]+$").unwrap();
        }

        if self.repos.is_empty() {
            bail!("No repository configured");
        }
        for (i, repo) in self.repos.iter().enumerate() {
            if !NAME.is_match(repo) {
                bail!("Invalid character in repository name {:?}", repo);
            }
            if self.repos[..i].contains(repo) {
                bail!("Repository {} is listed more than once", repo);
            }
        }
        for branch in &self.branches {
            if !NAME.is_match(branch) {
                bail!("Invalid character in branch name {:?}", branch);
            }
        }
        Ok(())
    }

    /// Configured branches, then upstream
    pub fn all_branches(&self) -> Vec<&str> {
        let mut res: Vec<&str> = self.branches.iter().map(String::as_str).collect();
        if !res.contains(&UPSTREAM_BRANCH) {
            res.push(UPSTREAM_BRANCH);
        }
        res
    }

    pub fn sync_dir(&self, branch: &str) -> PathBuf {
        self.cache_dir.join(branch).join("sync")
    }

    pub fn load_branch(&self, branch: &str, detail: Detail) -> Loaded {
        load_repositories(&self.sync_dir(branch), &self.repos, branch, detail)
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

fn default_branches() -> Vec<String> {
    ["stable", "testing", "unstable"]
        .iter()
        .map(|b| b.to_string())
        .collect()
}
