use super::GraphStore;
use super::streams::{BatchStream, EdgeStream, KeyStream, NodeStream};
use super::types::BatchKind;
use crate::actor::{RowStream, Statement};
use crate::errors::GraphError;

impl GraphStore {
    /// All nodes in insertion order.
    ///
    /// A node whose attributes were replaced sits where its latest write put it.
    pub fn nodes(&self) -> Result<NodeStream, GraphError> {
        let rows = self.query(Statement::new(
            "SELECT key, attributes FROM nodes ORDER BY rowid",
        ))?;
        Ok(NodeStream::new(rows, self.codec))
    }

    /// All nodes ordered by key: integers ascending, then text.
    pub fn nodes_by_key(&self) -> Result<NodeStream, GraphError> {
        let rows = self.query(Statement::new(
            "SELECT key, attributes FROM nodes ORDER BY key",
        ))?;
        Ok(NodeStream::new(rows, self.codec))
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Result<EdgeStream, GraphError> {
        let rows = self.query(Statement::new(
            "SELECT source, target FROM edges ORDER BY rowid",
        ))?;
        Ok(EdgeStream::new(rows))
    }

    /// Page `page` of node keys, `page_size` per page, in insertion order.
    pub fn batch_nodes(&self, page_size: usize, page: usize) -> Result<KeyStream, GraphError> {
        Ok(KeyStream::new(self.page(BatchKind::Nodes, page_size, page)?))
    }

    /// Page `page` of edges, `page_size` per page, in insertion order.
    pub fn batch_edges(&self, page_size: usize, page: usize) -> Result<EdgeStream, GraphError> {
        Ok(EdgeStream::new(self.page(BatchKind::Edges, page_size, page)?))
    }

    pub fn batch(&self, kind: BatchKind, page_size: usize, page: usize) -> Result<BatchStream, GraphError> {
        Ok(BatchStream::new(self.page(kind, page_size, page)?, kind))
    }

    fn page(&self, kind: BatchKind, page_size: usize, page: usize) -> Result<RowStream, GraphError> {
        if page_size == 0 {
            return Err(GraphError::invalid_input("page size must be positive"));
        }
        let offset = page
            .checked_mul(page_size)
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(|| GraphError::invalid_input("page offset out of range"))?;
        let limit = i64::try_from(page_size)
            .map_err(|_| GraphError::invalid_input("page size out of range"))?;
        let sql = match kind {
            BatchKind::Nodes => "SELECT key FROM nodes ORDER BY rowid LIMIT ?1 OFFSET ?2",
            BatchKind::Edges => "SELECT source, target FROM edges ORDER BY rowid LIMIT ?1 OFFSET ?2",
        };
        self.query(Statement::new(sql).bind(limit).bind(offset))
    }
}
