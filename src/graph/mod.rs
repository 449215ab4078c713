//! Directed graph API over the command queue.
//!
//! Every read goes back to the store; nothing is cached on this side of the
//! queue. Bulk iteration follows physical insertion order (rowid), and a full
//! attribute replace re-inserts the node row, which moves that node to the end
//! of [`GraphStore::nodes`]. Use [`GraphStore::nodes_by_key`] when a stable
//! order is needed.

mod adjacency;
mod edge_ops;
mod iteration;
mod node_ops;
mod streams;
mod types;

pub use adjacency::AdjacencyMap;
pub use streams::{BatchStream, EdgeStream, KeyStream, NodeStream};
pub use types::{BatchItem, BatchKind, Edge, Node, NodeKey, NodeRecord};

use std::path::Path;

use rusqlite::types::Value;

use crate::actor::{CommandQueue, RowStream, Statement};
use crate::codec::AttributeCodec;
use crate::config::{GraphConfig, StorageLocation};
use crate::errors::GraphError;
use crate::schema::ensure_schema;

use types::row_to_count;

/// Rows per multi-row `INSERT`, two bind values per edge row.
pub(crate) const MAX_ROWS_PER_INSERT: usize = 500;

pub struct GraphStore {
    queue: CommandQueue,
    codec: AttributeCodec,
    location: StorageLocation,
    auto_commit: bool,
}

impl GraphStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        Self::open_with_config(GraphConfig::new(path))
    }

    pub fn open_in_memory() -> Result<Self, GraphError> {
        Self::open_with_config(GraphConfig::in_memory())
    }

    /// Opens or creates the store. Existing data is kept.
    ///
    /// **Use when you need:**
    /// - compressed attribute payloads
    /// - a journal mode other than the in-memory rollback journal
    /// - to control commits yourself (`auto_commit = false`)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use digraphdb::{GraphConfig, GraphStore};
    ///
    /// let cfg = GraphConfig::in_memory()
    ///     .with_compression(true)
    ///     .with_auto_commit(false);
    /// let graph = GraphStore::open_with_config(cfg)?;
    /// graph.add_edge("a", "b")?;
    /// graph.add_edge("b", "c")?;
    /// graph.commit()?;
    /// assert_eq!(graph.n_edges()?, 2);
    /// # Ok::<(), digraphdb::GraphError>(())
    /// ```
    pub fn open_with_config(cfg: GraphConfig) -> Result<Self, GraphError> {
        let queue = CommandQueue::spawn(&cfg)?;
        ensure_schema(&queue)?;
        Ok(Self {
            queue,
            codec: AttributeCodec::new(cfg.compression),
            location: cfg.location,
            auto_commit: cfg.auto_commit,
        })
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    pub fn codec(&self) -> AttributeCodec {
        self.codec
    }

    /// Waits for all queued commands and commits. Surfaces the first queued
    /// write failure since the previous commit.
    pub fn commit(&self) -> Result<(), GraphError> {
        self.queue.commit()
    }

    /// Flushes pending writes and stops the worker. Idempotent.
    pub fn close(&self) -> Result<(), GraphError> {
        self.queue.close()
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    pub fn n_nodes(&self) -> Result<u64, GraphError> {
        row_to_count(self.query_one(Statement::new("SELECT n_nodes FROM count_nodes"))?)
    }

    pub fn n_edges(&self) -> Result<u64, GraphError> {
        row_to_count(self.query_one(Statement::new("SELECT n_edges FROM count_edges"))?)
    }

    /// Removes every node and edge, then commits.
    pub fn clear(&self) -> Result<(), GraphError> {
        self.queue.submit_batch(vec![
            Statement::new("DELETE FROM nodes"),
            Statement::new("DELETE FROM edges"),
        ])?;
        self.queue.commit()
    }

    pub(crate) fn write(&self, stmt: Statement) -> Result<(), GraphError> {
        self.queue.submit_write(stmt)?;
        self.finish_write()
    }

    pub(crate) fn write_batch(&self, stmts: Vec<Statement>) -> Result<(), GraphError> {
        self.queue.submit_batch(stmts)?;
        self.finish_write()
    }

    pub(crate) fn query(&self, stmt: Statement) -> Result<RowStream, GraphError> {
        self.queue.submit_read(stmt)
    }

    pub(crate) fn query_one(&self, stmt: Statement) -> Result<Option<Vec<Value>>, GraphError> {
        self.query(stmt)?.first()
    }

    fn finish_write(&self) -> Result<(), GraphError> {
        if self.auto_commit {
            self.queue.commit()
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("location", &self.location)
            .field("codec", &self.codec)
            .field("auto_commit", &self.auto_commit)
            .field("closed", &self.is_closed())
            .finish()
    }
}
