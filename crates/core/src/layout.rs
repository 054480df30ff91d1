//! Deterministic on-disk path derivation (§4.1).
//!
//! `compile_dir` is wiped at the start of every `Compile`; `data_dir` and
//! `local_dir` are not. Cache directory creation is idempotent and uses
//! mode `0755`; `local_dir` is created lazily, the first time credentials
//! are written.

use orch_domain::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Creates `dir` (and its parents) with mode `0755` on Unix.
pub(crate) fn create_dir_0755(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        std::fs::set_permissions(dir, perms)?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub data_dir: PathBuf,
    pub local_dir: PathBuf,
    pub compile_dir: PathBuf,
}

impl Layout {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        local_dir: impl Into<PathBuf>,
        compile_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            local_dir: local_dir.into(),
            compile_dir: compile_dir.into(),
        }
    }

    /// `<dataDir>/cache/<id>`.
    pub fn cache_dir(&self, id: &str) -> PathBuf {
        self.data_dir.join("cache").join(id)
    }

    /// Creates and returns the per-vertex cache directory.
    pub fn ensure_cache_dir(&self, id: &str) -> Result<PathBuf> {
        let dir = self.cache_dir(id);
        create_dir_0755(&dir).map_err(|e| Error::CacheSetupFailed {
            id: id.to_string(),
            message: e.to_string(),
        })?;
        Ok(dir)
    }

    /// `<localDir>/creds`.
    pub fn creds_path(&self) -> PathBuf {
        self.local_dir.join("creds")
    }

    /// Creates `local_dir` if it doesn't already exist.
    pub fn ensure_local_dir(&self) -> Result<()> {
        create_dir_0755(&self.local_dir)?;
        Ok(())
    }

    /// `<compileDir>/app` for the root, `<compileDir>/dep-<id>` otherwise.
    pub fn app_dir(&self, is_root: bool, id: &str) -> PathBuf {
        if is_root {
            self.compile_dir.join("app")
        } else {
            self.compile_dir.join(format!("dep-{id}"))
        }
    }

    /// `<compileDir>/infra-<infraType>`.
    pub fn infra_dir(&self, infra_type: &str) -> PathBuf {
        self.compile_dir.join(format!("infra-{infra_type}"))
    }

    /// Erases `compile_dir` entirely (missing directory is not an error),
    /// then recreates it empty.
    pub fn clear_compile_dir(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.compile_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::CompileCleanupFailed(e.to_string())),
        }
        std::fs::create_dir_all(&self.compile_dir)
            .map_err(|e| Error::CompileCleanupFailed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_layout() -> (tempfile::TempDir, Layout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(
            dir.path().join("data"),
            dir.path().join("local"),
            dir.path().join("compile"),
        );
        (dir, layout)
    }

    #[test]
    fn cache_dir_is_keyed_by_id() {
        let (_tmp, layout) = temp_layout();
        assert_ne!(layout.cache_dir("R"), layout.cache_dir("D"));
    }

    #[test]
    fn ensure_cache_dir_is_idempotent() {
        let (_tmp, layout) = temp_layout();
        let first = layout.ensure_cache_dir("R").unwrap();
        let second = layout.ensure_cache_dir("R").unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn app_dir_distinguishes_root_from_dependency() {
        let (_tmp, layout) = temp_layout();
        let root_dir = layout.app_dir(true, "R");
        let dep_dir = layout.app_dir(false, "D");
        assert!(root_dir.ends_with("app"));
        assert!(dep_dir.ends_with("dep-D"));
        assert_ne!(root_dir, dep_dir);
    }

    #[test]
    fn clear_compile_dir_removes_stale_contents() {
        let (_tmp, layout) = temp_layout();
        std::fs::create_dir_all(&layout.compile_dir).unwrap();
        std::fs::write(layout.compile_dir.join("stale.txt"), b"x").unwrap();
        layout.clear_compile_dir().unwrap();
        assert!(!layout.compile_dir.join("stale.txt").exists());
        assert!(layout.compile_dir.is_dir());
    }

    #[test]
    fn clear_compile_dir_tolerates_missing_dir() {
        let (_tmp, layout) = temp_layout();
        layout.clear_compile_dir().unwrap();
        assert!(layout.compile_dir.is_dir());
    }
}
