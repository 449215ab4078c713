//! Directed graph store on embedded SQLite.
//!
//! One worker thread owns the SQLite connection and executes commands from a
//! shared FIFO queue ([`actor::CommandQueue`]); [`GraphStore`] builds node,
//! edge and traversal operations on top of it and is safe to share between
//! threads. Run Criterion benchmarks with `cargo bench`.
//!
//! ```rust
//! use digraphdb::GraphStore;
//!
//! let graph = GraphStore::open_in_memory().unwrap();
//! graph.add_edge("a", "b").unwrap();
//! graph.add_edge("a", "c").unwrap();
//! assert_eq!(graph.n_nodes().unwrap(), 3);
//! assert_eq!(graph.degree("a").unwrap(), 2);
//! graph.close().unwrap();
//! ```

pub mod actor;
pub mod bench_utils;
pub mod codec;
pub mod config;
pub mod errors;
pub mod graph;
pub mod schema;

pub use crate::actor::{CommandQueue, RowStream, Statement};
pub use crate::codec::{AttrValue, AttributeCodec, Attributes};
pub use crate::config::{GraphConfig, JournalMode, StorageLocation, SynchronousMode};
pub use crate::errors::GraphError;
pub use crate::graph::{
    AdjacencyMap, BatchItem, BatchKind, BatchStream, Edge, EdgeStream, GraphStore, KeyStream, Node,
    NodeKey, NodeRecord, NodeStream,
};
