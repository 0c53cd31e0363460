//! Scoped workspace directory for intermediate segment artifacts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

/// A directory holding segment artifacts for the duration of one run.
///
/// Creation fails if the path already exists: stale artifacts from an
/// earlier run would otherwise leak into this one. Dropping the guard
/// removes the tree, so failure paths clean up too; call [`cleanup`] on the
/// success path to surface removal errors instead of swallowing them.
///
/// [`cleanup`]: SplitWorkspace::cleanup
#[derive(Debug)]
pub struct SplitWorkspace {
    root: PathBuf,
    armed: bool,
}

impl SplitWorkspace {
    /// Create the workspace directory, failing fast if it already exists.
    pub fn create(root: &Path) -> Result<Self> {
        if root.exists() {
            return Err(PipelineError::Configuration(format!(
                "workspace '{}' already exists; remove it or pick another path",
                root.display()
            )));
        }
        fs::create_dir(root)?;
        debug!("created workspace {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            armed: true,
        })
    }

    /// Location of the workspace directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the workspace and everything in it.
    pub fn cleanup(mut self) -> io::Result<()> {
        self.armed = false;
        debug!("removing workspace {}", self.root.display());
        fs::remove_dir_all(&self.root)
    }
}

impl Drop for SplitWorkspace {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = fs::remove_dir_all(&self.root) {
                warn!("failed to remove workspace {}: {e}", self.root.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_cleanup_removes_directory() {
        let parent = tempfile::tempdir().unwrap();
        let path = parent.path().join("split");
        let ws = SplitWorkspace::create(&path).unwrap();
        assert!(path.is_dir());
        fs::write(ws.root().join("0.pdf"), b"stub").unwrap();
        ws.cleanup().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn existing_path_is_a_configuration_error() {
        let parent = tempfile::tempdir().unwrap();
        let path = parent.path().join("split");
        fs::create_dir(&path).unwrap();
        let err = SplitWorkspace::create(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn drop_removes_directory_on_failure_paths() {
        let parent = tempfile::tempdir().unwrap();
        let path = parent.path().join("split");
        {
            let ws = SplitWorkspace::create(&path).unwrap();
            fs::write(ws.root().join("1.pdf"), b"stub").unwrap();
            // dropped without cleanup(), as on an error return
        }
        assert!(!path.exists());
    }

    #[test]
    fn rerun_succeeds_after_cleanup() {
        let parent = tempfile::tempdir().unwrap();
        let path = parent.path().join("split");
        SplitWorkspace::create(&path).unwrap().cleanup().unwrap();
        let second = SplitWorkspace::create(&path).unwrap();
        second.cleanup().unwrap();
        assert!(!path.exists());
    }
}
