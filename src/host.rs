//! The compiler's two collaborators: temp folders and output mounts.
//!
//! [`compile`](crate::compile::compile) never decides where its files finally
//! live. It asks a [`DocsetHost`] for a scratch directory to render into, then
//! hands finished directories back with a mount name. A docset packager
//! implements the trait over its own container; [`DirectoryHost`] is the plain
//! filesystem version the CLI uses.

use crate::files;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub trait DocsetHost {
    /// Allocate an empty, writable directory owned by this invocation.
    fn create_temp_folder(&mut self) -> io::Result<PathBuf>;

    /// Merge `path` into the packaged output under `mount_name`.
    fn include_in_output(&mut self, path: &Path, mount_name: &str) -> io::Result<()>;
}

/// A directory merged into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub source: PathBuf,
    pub mount_name: String,
    pub files: usize,
}

/// Host that merges includes into `<output_dir>/<mount_name>/`.
///
/// Temp folders are removed when the host is dropped, so keep it alive until
/// everything has been included.
#[derive(Debug)]
pub struct DirectoryHost {
    output_dir: PathBuf,
    temp_dirs: Vec<TempDir>,
    includes: Vec<Include>,
}

impl DirectoryHost {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            temp_dirs: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Includes in the order they were merged.
    pub fn includes(&self) -> &[Include] {
        &self.includes
    }
}

impl DocsetHost for DirectoryHost {
    fn create_temp_folder(&mut self) -> io::Result<PathBuf> {
        let dir = tempfile::Builder::new().prefix("mdocset-").tempdir()?;
        let path = dir.path().to_path_buf();
        self.temp_dirs.push(dir);
        Ok(path)
    }

    fn include_in_output(&mut self, path: &Path, mount_name: &str) -> io::Result<()> {
        let dest = self.output_dir.join(mount_name);
        let files = files::copy_tree(path, &dest)?;
        tracing::info!(source = %path.display(), dest = %dest.display(), files, "Included directory");
        self.includes.push(Include {
            source: path.to_path_buf(),
            mount_name: mount_name.to_string(),
            files,
        });
        Ok(())
    }
}
