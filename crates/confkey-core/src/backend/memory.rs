use std::fmt;
use std::sync::{Mutex, MutexGuard};

use super::error::BackendError;
use super::format::ConfigFormat;
use super::Backend;
use crate::value::RawMap;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Keeps the last saved root map in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<RawMap>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose first `load` returns `root`.
    pub fn with_root(root: RawMap) -> Self {
        Self {
            stored: Mutex::new(root),
        }
    }

    /// Copy of the last saved map.
    pub fn snapshot(&self) -> RawMap {
        lock(&self.stored).clone()
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn save(&self, root: &RawMap) -> Result<(), BackendError> {
        *lock(&self.stored) = root.clone();
        Ok(())
    }

    fn load(&self) -> Result<RawMap, BackendError> {
        Ok(self.snapshot())
    }
}

type SaveFn = Box<dyn Fn(&RawMap) -> Result<(), BackendError> + Send + Sync>;
type LoadFn = Box<dyn Fn() -> Result<RawMap, BackendError> + Send + Sync>;

/// Delegates saving and loading to closures.
pub struct FunctionBackend {
    save: SaveFn,
    load: LoadFn,
}

impl FunctionBackend {
    pub fn new<S, L>(save: S, load: L) -> Self
    where
        S: Fn(&RawMap) -> Result<(), BackendError> + Send + Sync + 'static,
        L: Fn() -> Result<RawMap, BackendError> + Send + Sync + 'static,
    {
        Self {
            save: Box::new(save),
            load: Box::new(load),
        }
    }
}

impl fmt::Debug for FunctionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionBackend").finish_non_exhaustive()
    }
}

impl Backend for FunctionBackend {
    fn name(&self) -> &str {
        "function"
    }

    fn save(&self, root: &RawMap) -> Result<(), BackendError> {
        (self.save)(root)
    }

    fn load(&self) -> Result<RawMap, BackendError> {
        (self.load)()
    }
}

/// Encodes the root map into an in-memory text buffer.
#[derive(Debug)]
pub struct StringBackend {
    format: ConfigFormat,
    buffer: Mutex<String>,
}

impl StringBackend {
    pub fn new(format: ConfigFormat) -> Self {
        Self::with_contents(format, String::new())
    }

    /// Backend whose first `load` decodes `contents`.
    pub fn with_contents(format: ConfigFormat, contents: impl Into<String>) -> Self {
        Self {
            format,
            buffer: Mutex::new(contents.into()),
        }
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// Text written by the last save.
    pub fn contents(&self) -> String {
        lock(&self.buffer).clone()
    }
}

impl Backend for StringBackend {
    fn name(&self) -> &str {
        self.format.extension()
    }

    fn save(&self, root: &RawMap) -> Result<(), BackendError> {
        let encoded = self.format.encode(root)?;
        *lock(&self.buffer) = encoded;
        Ok(())
    }

    fn load(&self) -> Result<RawMap, BackendError> {
        self.format.decode(&lock(&self.buffer))
    }
}
