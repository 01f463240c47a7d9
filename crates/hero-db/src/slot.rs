//! Key-value slot backends.
//!
//! A slot backend stores opaque UTF-8 text under a string key. The gateway
//! in [`crate::gateway`] uses exactly one key; backends do not interpret
//! the text.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable text storage keyed by name.
///
/// The trait is object-safe so a gateway can hold `Box<dyn SlotBackend>`.
pub trait SlotBackend: Send + Sync {
    /// Read the text stored under `key`. `Ok(None)` when nothing is stored.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace whatever is stored under `key`.
    fn write(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> io::Result<()>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn SlotBackend) {}
};

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash mid-write never leaves a truncated slot behind.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotBackend for FileSlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp)?;
        f.write_all(value.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Memory backend
// ---------------------------------------------------------------------------

/// In-process backend. Nothing survives the process; used by tests and
/// `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::other("memory slot mutex poisoned"))
    }
}

impl SlotBackend for MemorySlot {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
