use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const ROOT_ENV_VAR: &str = "TILERUN_ROOT";

/// Directories the game reads from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub maps_dir: PathBuf,
}

impl AppPaths {
    /// Paths under an already known root. The maps directory must exist.
    pub fn for_root(root: impl Into<PathBuf>) -> Result<Self, StartupError> {
        let root = root.into();
        let maps_dir = root.join("maps");
        if !maps_dir.is_dir() {
            return Err(StartupError::MapsDirMissing { path: maps_dir });
        }
        Ok(Self { root, maps_dir })
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{var} is not valid unicode: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("cannot locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("{var}={path} is not a tilerun checkout (needs Cargo.toml plus crates/ or maps/)")]
    InvalidEnvRoot { var: &'static str, path: PathBuf },
    #[error(
        "no tilerun checkout found above {searched}; set {var} to the directory holding maps/"
    )]
    RootNotFound { searched: PathBuf, var: &'static str },
    #[error("maps directory does not exist: {path}")]
    MapsDirMissing { path: PathBuf },
}

/// Finds the project root and its maps directory.
///
/// `TILERUN_ROOT` wins when set. Otherwise the directories above the
/// working directory are searched first, then those above the executable.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    AppPaths::for_root(resolve_root()?)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let root = canonical_or_raw(Path::new(&value));
            if looks_like_root(&root) {
                Ok(root)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    var: ROOT_ENV_VAR,
                    path: root,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            if let Some(root) = env::current_dir().ok().and_then(|cwd| find_root_above(&cwd)) {
                return Ok(root);
            }
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let searched = exe.parent().unwrap_or(&exe).to_path_buf();
            find_root_above(&searched).ok_or(StartupError::RootNotFound {
                searched,
                var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

/// Nearest ancestor of `start` (itself included) that looks like the root.
pub fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| looks_like_root(candidate))
        .map(canonical_or_raw)
}

fn looks_like_root(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && (path.join("crates").is_dir() || path.join("maps").is_dir())
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn checkout() -> TempDir {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").expect("cargo toml");
        fs::create_dir_all(temp.path().join("maps")).expect("maps");
        temp
    }

    #[test]
    fn maps_dir_alone_is_not_a_root() {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir_all(temp.path().join("maps")).expect("maps");
        assert!(!looks_like_root(temp.path()));
        assert_eq!(find_root_above(temp.path()), None);
    }

    #[test]
    fn root_is_found_from_a_nested_directory() {
        let temp = checkout();
        let nested = temp.path().join("target").join("debug");
        fs::create_dir_all(&nested).expect("nested");

        let root = find_root_above(&nested).expect("root");
        assert_eq!(root, canonical_or_raw(temp.path()));
    }

    #[test]
    fn app_paths_require_maps_dir() {
        let temp = TempDir::new().expect("tempdir");
        let err = AppPaths::for_root(temp.path()).expect_err("no maps dir");
        assert!(matches!(err, StartupError::MapsDirMissing { .. }));

        let temp = checkout();
        let paths = AppPaths::for_root(temp.path()).expect("paths");
        assert_eq!(paths.maps_dir, temp.path().join("maps"));
    }

    #[test]
    fn errors_name_the_env_var() {
        let err = StartupError::RootNotFound {
            searched: PathBuf::from("/tmp/bin"),
            var: ROOT_ENV_VAR,
        };
        assert!(err.to_string().contains("TILERUN_ROOT"));
    }
}
