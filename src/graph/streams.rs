//! Typed views over [`RowStream`]. Each one is lazy and single-pass; call the
//! originating method again to restart.

use crate::actor::RowStream;
use crate::codec::AttributeCodec;
use crate::errors::GraphError;

use super::types::{BatchItem, BatchKind, Edge, NodeKey, NodeRecord, row_to_edge, row_to_key, row_to_record};

pub struct KeyStream {
    rows: RowStream,
}

impl KeyStream {
    pub(crate) fn new(rows: RowStream) -> Self {
        Self { rows }
    }
}

impl Iterator for KeyStream {
    type Item = Result<NodeKey, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| row.and_then(row_to_key))
    }
}

pub struct EdgeStream {
    rows: RowStream,
}

impl EdgeStream {
    pub(crate) fn new(rows: RowStream) -> Self {
        Self { rows }
    }
}

impl Iterator for EdgeStream {
    type Item = Result<Edge, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| row.and_then(row_to_edge))
    }
}

/// Nodes as [`NodeRecord`]s: attribute-less nodes come back as bare keys.
pub struct NodeStream {
    rows: RowStream,
    codec: AttributeCodec,
}

impl NodeStream {
    pub(crate) fn new(rows: RowStream, codec: AttributeCodec) -> Self {
        Self { rows, codec }
    }
}

impl Iterator for NodeStream {
    type Item = Result<NodeRecord, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        let codec = self.codec;
        self.rows.next().map(|row| row.and_then(|r| row_to_record(r, codec)))
    }
}

pub struct BatchStream {
    rows: RowStream,
    kind: BatchKind,
}

impl BatchStream {
    pub(crate) fn new(rows: RowStream, kind: BatchKind) -> Self {
        Self { rows, kind }
    }

    pub fn kind(&self) -> BatchKind {
        self.kind
    }
}

impl Iterator for BatchStream {
    type Item = Result<BatchItem, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };
        Some(match self.kind {
            BatchKind::Nodes => row_to_key(row).map(BatchItem::Node),
            BatchKind::Edges => row_to_edge(row).map(BatchItem::Edge),
        })
    }
}
