//! Check binary resolution.
//!
//! Bare names are looked up in a `checks` directory next to the working
//! directory first, so custom checks can be deployed alongside the prober,
//! then on the search path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Directory (relative to the working directory) searched before `PATH`.
pub const CHECKS_DIR_NAME: &str = "checks";

/// Errors from binary resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no check specified")]
    NoCheck,

    #[error("file does not exist")]
    FileDoesNotExist { path: PathBuf },

    #[error("exec: \"{check}\": executable file not found in $PATH")]
    NotFound { check: String },
}

/// Maps configured check names to executable paths.
#[derive(Debug, Clone, Default)]
pub struct BinaryResolver {
    /// Directory searched first for bare names.
    checks_dir: Option<PathBuf>,
    /// `PATH`-style list of directories searched afterwards.
    search_path: Option<OsString>,
}

impl BinaryResolver {
    /// Create a resolver with explicit search locations.
    pub fn new(checks_dir: Option<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            checks_dir,
            search_path,
        }
    }

    /// Resolver using `<cwd>/checks` and the process `PATH`.
    pub fn from_env() -> Self {
        Self {
            checks_dir: std::env::current_dir()
                .ok()
                .map(|d| d.join(CHECKS_DIR_NAME)),
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Resolve a check identifier to a path on disk.
    pub fn resolve(&self, check: &str) -> Result<PathBuf, ResolveError> {
        if check.is_empty() {
            return Err(ResolveError::NoCheck);
        }

        let path = Path::new(check);
        if path.is_absolute() {
            if !path.exists() {
                return Err(ResolveError::FileDoesNotExist {
                    path: path.to_path_buf(),
                });
            }
            return Ok(path.to_path_buf());
        }

        if let Some(dir) = &self.checks_dir {
            let candidate = dir.join(path);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        self.look_path(check)
    }

    /// Search the configured path for an executable named `check`.
    ///
    /// Names containing a separator are checked directly instead.
    fn look_path(&self, check: &str) -> Result<PathBuf, ResolveError> {
        let not_found = || ResolveError::NotFound {
            check: check.to_string(),
        };

        if check.contains(std::path::MAIN_SEPARATOR) || check.contains('/') {
            let path = PathBuf::from(check);
            return if is_executable(&path) {
                Ok(path)
            } else {
                Err(not_found())
            };
        }

        let search_path = self.search_path.as_ref().ok_or_else(not_found)?;
        std::env::split_paths(search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(check))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(not_found)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
