//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use northwind_app::{AppConfig, CONFIG_FILE_NAMES};

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective application configuration.
    pub config: AppConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                let config = AppConfig::load(&path)?;
                (config, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (AppConfig::load(&path)?, Some(path)),
                None => (AppConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Database file to use: the override, else `database.path`.
    pub fn db_path(&self, override_path: Option<&str>) -> PathBuf {
        self.resolve_path(override_path.unwrap_or(&self.config.database.path))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find the nearest config file, walking up from `start`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if let Some(found) = CONFIG_FILE_NAMES
            .iter()
            .map(|name| current.join(name))
            .find(|path| path.is_file())
        {
            return Some(found);
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("northwind-cli-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = scratch_dir("walk");
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("northwind.toml"), "[app]\ntitle = \"Test\"\n").unwrap();

        assert_eq!(find_config(&nested), Some(root.join("northwind.toml")));
        assert_eq!(find_config(&root), Some(root.join("northwind.toml")));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_find_config_prefers_toml() {
        let root = scratch_dir("prefer");
        std::fs::write(root.join("northwind.json"), "{}").unwrap();
        std::fs::write(root.join("northwind.toml"), "").unwrap();

        assert_eq!(find_config(&root), Some(root.join("northwind.toml")));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
