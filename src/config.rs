//! Construction parameters for a [`GraphStore`](crate::GraphStore).
//!
//! The defaults favour bulk-load throughput: rollback journal kept in memory,
//! no fsync, auto-commit after every mutating call.
//!
//! ```rust
//! use digraphdb::{GraphConfig, JournalMode};
//!
//! let cfg = GraphConfig::new("graph.db")
//!     .with_journal_mode(JournalMode::Wal)
//!     .with_compression(true);
//! assert!(cfg.compression);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::GraphError;

const DEFAULT_STATEMENT_CACHE: usize = 128;

/// Where the store lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    Memory,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::File(path) => write!(f, "{}", path.display()),
            StorageLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Value of `PRAGMA journal_mode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JournalMode {
    /// No journal at all. SQLite cannot roll back in this mode, so a failing
    /// statement inside a multi-statement write may leave it partially applied.
    Off,
    /// Classic rollback journal.
    Delete,
    Truncate,
    Persist,
    #[default]
    Memory,
    Wal,
}

impl JournalMode {
    pub fn as_pragma(self) -> &'static str {
        match self {
            JournalMode::Off => "OFF",
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
        }
    }
}

impl FromStr for JournalMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(JournalMode::Off),
            "delete" | "rollback" => Ok(JournalMode::Delete),
            "truncate" => Ok(JournalMode::Truncate),
            "persist" => Ok(JournalMode::Persist),
            "memory" => Ok(JournalMode::Memory),
            "wal" => Ok(JournalMode::Wal),
            other => Err(GraphError::invalid_input(format!(
                "unknown journal mode '{other}'"
            ))),
        }
    }
}

/// Value of `PRAGMA synchronous`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SynchronousMode {
    #[default]
    Off,
    Normal,
    Full,
}

impl SynchronousMode {
    pub fn as_pragma(self) -> &'static str {
        match self {
            SynchronousMode::Off => "OFF",
            SynchronousMode::Normal => "NORMAL",
            SynchronousMode::Full => "FULL",
        }
    }
}

impl FromStr for SynchronousMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(SynchronousMode::Off),
            "normal" | "1" => Ok(SynchronousMode::Normal),
            "full" | "2" => Ok(SynchronousMode::Full),
            other => Err(GraphError::invalid_input(format!(
                "unknown synchronous mode '{other}'"
            ))),
        }
    }
}

/// Complete configuration for opening a graph store.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    pub location: StorageLocation,

    /// Journal mode applied once when the connection opens.
    ///
    /// **Default:** [`JournalMode::Memory`]
    pub journal_mode: JournalMode,

    /// **Default:** [`SynchronousMode::Off`]
    pub synchronous: SynchronousMode,

    /// Compress attribute payloads with LZ4.
    ///
    /// Must match the setting used when the file was first populated; reading
    /// blobs with the other codec fails with
    /// [`GraphError::CodecError`].
    pub compression: bool,

    /// End every mutating call with a commit barrier.
    ///
    /// **Default:** `true`. When `false`, writes return as soon as they are
    /// queued and the caller decides when to [`commit`](crate::GraphStore::commit).
    pub auto_commit: bool,

    /// Capacity of the worker's prepared statement cache.
    pub statement_cache_capacity: usize,

    /// Additional PRAGMA settings applied after the built-in ones.
    pub pragma_settings: HashMap<String, String>,
}

impl GraphConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_location(StorageLocation::File(path.as_ref().to_path_buf()))
    }

    pub fn in_memory() -> Self {
        Self::with_location(StorageLocation::Memory)
    }

    fn with_location(location: StorageLocation) -> Self {
        Self {
            location,
            journal_mode: JournalMode::default(),
            synchronous: SynchronousMode::default(),
            compression: false,
            auto_commit: true,
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE,
            pragma_settings: HashMap::new(),
        }
    }

    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    pub fn with_synchronous(mut self, mode: SynchronousMode) -> Self {
        self.synchronous = mode;
        self
    }

    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    pub fn with_pragma<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.pragma_settings.insert(key.into(), value.into());
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}
