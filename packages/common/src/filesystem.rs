use crate::error::CommonError;
use crate::result::CommonResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File system abstraction used by the batch driver, so runs can be tested
/// without touching disk. Implementations are shared across worker threads.
pub trait FileSystem: Send + Sync {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> CommonResult<String>;

    fn write(&self, path: &Path, contents: &str) -> CommonResult<()>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> CommonResult<()>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        std::fs::read_to_string(path).map_err(|err| CommonError::io(path, err))
    }

    fn write(&self, path: &Path, contents: &str) -> CommonResult<()> {
        std::fs::write(path, contents).map_err(|err| CommonError::io(path, err))
    }

    fn create_dir_all(&self, path: &Path) -> CommonResult<()> {
        std::fs::create_dir_all(path).map_err(|err| CommonError::io(path, err))
    }
}

/// In-memory file system for testing
#[derive(Default)]
pub struct MockFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
    directories: Mutex<Vec<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
    }

    /// Contents of a file written (or added) so far
    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().ok()?.get(path).cloned()
    }

    pub fn directories(&self) -> Vec<PathBuf> {
        self.directories
            .lock()
            .map(|dirs| dirs.clone())
            .unwrap_or_default()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.file(path).is_some()
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        self.file(path)
            .ok_or_else(|| CommonError::FileNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, contents: &str) -> CommonResult<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| CommonError::from("mock file system lock poisoned"))?;
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> CommonResult<()> {
        let mut directories = self
            .directories
            .lock()
            .map_err(|_| CommonError::from("mock file system lock poisoned"))?;
        if !directories.iter().any(|dir| dir == path) {
            directories.push(path.to_path_buf());
        }
        Ok(())
    }
}
