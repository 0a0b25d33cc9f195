use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::BackendError;
use super::format::ConfigFormat;
use super::Backend;
use crate::value::RawMap;

/// Persists the root map to a file in one [`ConfigFormat`].
///
/// Saving writes a temporary file next to the target and persists it over the target,
/// so readers never observe a half-written file. A missing file loads as an empty map.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    format: ConfigFormat,
}

impl FileBackend {
    /// Backend for `path`, with the format taken from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let path = path.into();
        let format = ConfigFormat::from_path(&path)
            .ok_or_else(|| BackendError::UnsupportedConfigFormat(path.display().to_string()))?;
        Ok(Self { path, format })
    }

    pub fn with_format(path: impl Into<PathBuf>, format: ConfigFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Backend for FileBackend {
    fn name(&self) -> &str {
        self.format.extension()
    }

    fn save(&self, root: &RawMap) -> Result<(), BackendError> {
        let contents = self.format.encode(root)?;
        let dir = self.parent_dir();

        // Ensure parent directory exists
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|e| BackendError::io(e, "create_dir_all", dir))?;
        }

        // Create a named temporary file in the same directory as the target file
        let mut temp_file =
            NamedTempFile::new_in(dir).map_err(|e| BackendError::io(e, "create_temp_file", dir))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| BackendError::io(e, "write_to_temp_file", temp_file.path()))?;

        // Persist the temporary file, atomically replacing the target file
        temp_file
            .persist(&self.path)
            .map_err(|e| BackendError::io(e.error, "persist_temp_file", self.path.clone()))?;

        log::debug!("Saved {} configuration to {}", self.format, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<RawMap, BackendError> {
        if !self.path.exists() {
            log::debug!("No configuration at {}, starting empty", self.path.display());
            return Ok(RawMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| BackendError::io(e, "read_to_string", self.path.clone()))?;
        let root = self.format.decode(&contents)?;
        log::debug!("Loaded {} configuration from {}", self.format, self.path.display());
        Ok(root)
    }
}
