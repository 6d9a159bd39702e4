//! Runtime configuration.
//!
//! The project root is taken from, in order:
//! - the `--root` command-line flag
//! - `DEVPLAN_PROJECT_ROOT`
//! - the current working directory

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const ROOT_ENV: &str = "DEVPLAN_PROJECT_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the `.cursor/devplan` tree is created under.
    pub project_root: PathBuf,
}

impl Config {
    /// Resolve configuration from an optional flag value and the environment.
    pub fn resolve(root_flag: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(root_flag, std::env::var_os(ROOT_ENV).map(PathBuf::from))
    }

    fn resolve_with(root_flag: Option<PathBuf>, root_env: Option<PathBuf>) -> Result<Self> {
        let project_root = match root_flag.or(root_env) {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        Ok(Self { project_root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_env() {
        let config = Config::resolve_with(
            Some(PathBuf::from("/from/flag")),
            Some(PathBuf::from("/from/env")),
        )
        .unwrap();
        assert_eq!(config.project_root, PathBuf::from("/from/flag"));
    }

    #[test]
    fn env_used_without_flag() {
        let config = Config::resolve_with(None, Some(PathBuf::from("/from/env"))).unwrap();
        assert_eq!(config.project_root, PathBuf::from("/from/env"));
    }

    #[test]
    fn falls_back_to_cwd() {
        let config = Config::resolve_with(None, None).unwrap();
        assert_eq!(config.project_root, std::env::current_dir().unwrap());
    }
}
