//! Filesystem infrastructure — implements `HostFs` against the real host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::HostFs;

/// Production `HostFs` using `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHostFs;

impl LocalHostFs {
    fn names(dir: &Path, dirs_only: bool) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in
            std::fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("cannot read {}", dir.display()))?;
            if dirs_only && !entry.path().is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

impl HostFs for LocalHostFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<String>> {
        Self::names(dir, true)
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<String>> {
        Self::names(dir, false)
    }

    fn enter_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::env::set_current_dir(dir)
            .with_context(|| format!("cannot change directory to {}", dir.display()))?;
        std::env::current_dir().context("cannot determine current directory")
    }
}
