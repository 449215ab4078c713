use rusqlite::types::Value;

use super::node_ops::{distinct, insert_nodes_statements};
use super::types::{Edge, NodeKey};
use super::{GraphStore, MAX_ROWS_PER_INSERT};
use crate::actor::Statement;
use crate::errors::GraphError;

impl GraphStore {
    /// Adds `source -> target`, creating missing endpoints without attributes.
    /// Adding an existing edge is a no-op.
    pub fn add_edge<S, T>(&self, source: S, target: T) -> Result<(), GraphError>
    where
        S: Into<NodeKey>,
        T: Into<NodeKey>,
    {
        let (source, target) = (source.into(), target.into());
        self.write_batch(vec![
            Statement::new("INSERT OR IGNORE INTO nodes (key) VALUES (?1), (?2)")
                .bind(source.clone())
                .bind(target.clone()),
            Statement::new("INSERT OR IGNORE INTO edges (source, target) VALUES (?1, ?2)")
                .bind(source)
                .bind(target),
        ])
    }

    /// Bulk form of [`add_edge`](Self::add_edge): endpoints first, then edges.
    pub fn add_edges_from<I, S, T>(&self, pairs: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<NodeKey>,
        T: Into<NodeKey>,
    {
        let edges: Vec<Edge> = pairs
            .into_iter()
            .map(|(source, target)| Edge::new(source, target))
            .collect();
        if edges.is_empty() {
            return Ok(());
        }
        self.write_batch(insert_edges_statements(Vec::new(), &edges))
    }

    pub fn has_edge<S, T>(&self, source: S, target: T) -> Result<bool, GraphError>
    where
        S: Into<NodeKey>,
        T: Into<NodeKey>,
    {
        let row = self.query_one(
            Statement::new("SELECT 1 FROM edges WHERE source = ?1 AND target = ?2 LIMIT 1")
                .bind(source.into())
                .bind(target.into()),
        )?;
        Ok(row.is_some())
    }

    /// Fetches an edge, failing with `NotFound` if it is absent.
    pub fn edge<S, T>(&self, source: S, target: T) -> Result<Edge, GraphError>
    where
        S: Into<NodeKey>,
        T: Into<NodeKey>,
    {
        let edge = Edge::new(source, target);
        if self.has_edge(&edge.source, &edge.target)? {
            Ok(edge)
        } else {
            Err(GraphError::not_found(format!("edge {edge}")))
        }
    }

    /// Deletes exactly `source -> target`; missing edges are ignored.
    pub fn remove_edge<S, T>(&self, source: S, target: T) -> Result<(), GraphError>
    where
        S: Into<NodeKey>,
        T: Into<NodeKey>,
    {
        self.write(
            Statement::new("DELETE FROM edges WHERE source = ?1 AND target = ?2")
                .bind(source.into())
                .bind(target.into()),
        )
    }
}

/// `prefix` followed by endpoint inserts and then edge inserts, chunked.
pub(crate) fn insert_edges_statements(mut prefix: Vec<Statement>, edges: &[Edge]) -> Vec<Statement> {
    let endpoints = distinct(
        edges
            .iter()
            .flat_map(|edge| [edge.source.clone(), edge.target.clone()]),
    );
    prefix.extend(insert_nodes_statements(endpoints));
    prefix.extend(edges.chunks(MAX_ROWS_PER_INSERT).map(|chunk| {
        let placeholders = vec!["(?, ?)"; chunk.len()].join(", ");
        let params = chunk
            .iter()
            .flat_map(|edge| [Value::from(edge.source.clone()), Value::from(edge.target.clone())])
            .collect();
        Statement::with_params(
            format!("INSERT OR IGNORE INTO edges (source, target) VALUES {placeholders}"),
            params,
        )
    }));
    prefix
}
