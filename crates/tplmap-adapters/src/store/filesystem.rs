//! Cache-directory source map store.
//!
//! One file per entry, named after the hex-encoded key so any template key
//! (slashes, colons, namespaces) maps to a flat, reversible filename:
//!
//! ```text
//! .tplmap-cache/
//! ├── 706167652f686f6d65.map.json   ← "page/home"
//! └── 6c61796f7574.map.json         ← "layout"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use tplmap_core::{
    application::{ApplicationError, ports::MapStore},
    domain::SourceMap,
    error::TplmapResult,
};

const SUFFIX: &str = ".map.json";

/// Stores serialized maps as files under a cache directory.
#[derive(Debug, Clone)]
pub struct FilesystemMapStore {
    dir: PathBuf,
}

impl FilesystemMapStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{SUFFIX}", encode_key(key)))
    }

    /// `true` if the entry exists and no template it depends on changed
    /// after it was written.
    ///
    /// Template filenames are checked as stored, so they should be absolute
    /// (as `DirectoryLoader` produces) for the answer to hold from any
    /// working directory. Unreadable entries and missing templates count as
    /// stale.
    #[instrument(skip(self))]
    pub fn is_fresh(&self, key: &str) -> TplmapResult<bool> {
        let entry = self.entry_path(key);
        let Some(written) = modified(&entry) else {
            return Ok(false);
        };
        let Some(data) = self.get(key)? else {
            return Ok(false);
        };

        let map = match SourceMap::deserialize(&data) {
            Ok(map) => map,
            Err(e) => {
                debug!(error = %e, "stored map unreadable, treating as stale");
                return Ok(false);
            }
        };

        for file in map.paths() {
            match modified(Path::new(file)) {
                Some(changed) if changed <= written => {}
                _ => {
                    debug!(file, "dependency changed since map was written");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn store_error(&self, key: &str, e: io::Error) -> ApplicationError {
        ApplicationError::StoreError {
            key: key.to_owned(),
            reason: format!("{} ({})", e, self.dir.display()),
        }
    }
}

impl MapStore for FilesystemMapStore {
    fn put(&self, key: &str, data: &str) -> TplmapResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| self.store_error(key, e))?;

        // Write-then-rename so concurrent readers never see a partial entry.
        let entry = self.entry_path(key);
        let staging = entry.with_extension("json.tmp");
        fs::write(&staging, data).map_err(|e| self.store_error(key, e))?;
        fs::rename(&staging, &entry).map_err(|e| self.store_error(key, e))?;

        debug!(key, file = %entry.display(), "map stored");
        Ok(())
    }

    fn get(&self, key: &str) -> TplmapResult<Option<String>> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.store_error(key, e).into()),
        }
    }

    fn remove(&self, key: &str) -> TplmapResult<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error(key, e).into()),
        }
    }

    fn keys(&self) -> TplmapResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ApplicationError::StoreError {
                key: String::new(),
                reason: format!("failed to list {}: {e}", self.dir.display()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let Some(encoded) = name.strip_suffix(SUFFIX) else {
                continue;
            };
            match decode_key(encoded) {
                Some(key) => keys.push(key),
                None => warn!(file = %entry.path().display(), "ignoring foreign file in map cache"),
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn encode_key(key: &str) -> String {
    key.bytes().map(|b| format!("{b:02x}")).collect()
}

fn decode_key(encoded: &str) -> Option<String> {
    if encoded.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..encoded.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(encoded.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}
