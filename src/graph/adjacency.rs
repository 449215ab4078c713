//! Neighbor traversal, sampling and adjacency rewrites.
//!
//! Traversal never fails on unknown keys; it just yields nothing.

use ahash::AHashMap;

use super::edge_ops::insert_edges_statements;
use super::GraphStore;
use super::streams::{EdgeStream, KeyStream};
use super::types::{Edge, NodeKey, key_set_param, row_to_count, row_to_edge};
use crate::actor::Statement;
use crate::errors::GraphError;

/// Adjacency lists keyed by the queried node. Keys without edges are absent.
pub type AdjacencyMap = AHashMap<NodeKey, Vec<NodeKey>>;

#[derive(Clone, Copy)]
enum Direction {
    Outgoing,
    Incoming,
}

impl Direction {
    /// `(anchor column, far column)`
    fn columns(self) -> (&'static str, &'static str) {
        match self {
            Direction::Outgoing => ("source", "target"),
            Direction::Incoming => ("target", "source"),
        }
    }
}

impl GraphStore {
    /// Targets of edges leaving `source`, in no particular order.
    pub fn neighbors<K: Into<NodeKey>>(&self, source: K) -> Result<KeyStream, GraphError> {
        self.adjacent(Direction::Outgoing, source.into())
    }

    /// Sources of edges entering `target`, in no particular order.
    pub fn predecessors<K: Into<NodeKey>>(&self, target: K) -> Result<KeyStream, GraphError> {
        self.adjacent(Direction::Incoming, target.into())
    }

    /// One neighbor of `source` picked uniformly at random.
    pub fn random_neighbor<K: Into<NodeKey>>(&self, source: K) -> Result<NodeKey, GraphError> {
        let key = source.into();
        self.sample(Direction::Outgoing, key.clone(), 1)?
            .pop()
            .ok_or_else(|| GraphError::not_found(format!("neighbors of '{key}'")))
    }

    /// Up to `n` distinct neighbors of `source`, sampled without replacement.
    ///
    /// Always a `Vec`, even for `n == 1`; use [`random_neighbor`](Self::random_neighbor)
    /// to get a single key or `NotFound`.
    pub fn random_neighbors<K: Into<NodeKey>>(
        &self,
        source: K,
        n: usize,
    ) -> Result<Vec<NodeKey>, GraphError> {
        self.sample(Direction::Outgoing, source.into(), n)
    }

    /// One predecessor of `target` picked uniformly at random.
    pub fn random_predecessor<K: Into<NodeKey>>(&self, target: K) -> Result<NodeKey, GraphError> {
        let key = target.into();
        self.sample(Direction::Incoming, key.clone(), 1)?
            .pop()
            .ok_or_else(|| GraphError::not_found(format!("predecessors of '{key}'")))
    }

    /// Up to `n` distinct predecessors of `target`, sampled without replacement.
    ///
    /// See [`random_predecessor`](Self::random_predecessor) for the single-key form.
    pub fn random_predecessors<K: Into<NodeKey>>(
        &self,
        target: K,
        n: usize,
    ) -> Result<Vec<NodeKey>, GraphError> {
        self.sample(Direction::Incoming, target.into(), n)
    }

    /// Neighbors of every key in `sources`, fetched with one query.
    pub fn neighbors_from<I, K>(&self, sources: I) -> Result<AdjacencyMap, GraphError>
    where
        I: IntoIterator<Item = K>,
        K: Into<NodeKey>,
    {
        self.adjacent_from(Direction::Outgoing, collect_keys(sources))
    }

    /// Predecessors of every key in `targets`, fetched with one query.
    pub fn predecessors_from<I, K>(&self, targets: I) -> Result<AdjacencyMap, GraphError>
    where
        I: IntoIterator<Item = K>,
        K: Into<NodeKey>,
    {
        self.adjacent_from(Direction::Incoming, collect_keys(targets))
    }

    /// Replaces all out-edges of `source` with edges to `targets`.
    pub fn set_neighbors<K, I, T>(&self, source: K, targets: I) -> Result<(), GraphError>
    where
        K: Into<NodeKey>,
        I: IntoIterator<Item = T>,
        T: Into<NodeKey>,
    {
        let source = source.into();
        let edges: Vec<Edge> = targets
            .into_iter()
            .map(|target| Edge::new(source.clone(), target))
            .collect();
        self.replace_adjacency(Direction::Outgoing, source, &edges)
    }

    /// Replaces all in-edges of `target` with edges from `sources`.
    pub fn set_predecessors<K, I, S>(&self, target: K, sources: I) -> Result<(), GraphError>
    where
        K: Into<NodeKey>,
        I: IntoIterator<Item = S>,
        S: Into<NodeKey>,
    {
        let target = target.into();
        let edges: Vec<Edge> = sources
            .into_iter()
            .map(|source| Edge::new(source, target.clone()))
            .collect();
        self.replace_adjacency(Direction::Incoming, target, &edges)
    }

    /// Edges with both endpoints in `keys` (the induced subgraph).
    pub fn subgraph<I, K>(&self, keys: I) -> Result<EdgeStream, GraphError>
    where
        I: IntoIterator<Item = K>,
        K: Into<NodeKey>,
    {
        let keys = collect_keys(keys);
        let rows = self.query(
            Statement::new(
                "SELECT source, target FROM edges \
                 WHERE source IN (SELECT value FROM json_each(?1)) \
                 AND target IN (SELECT value FROM json_each(?1))",
            )
            .bind(key_set_param(&keys)?),
        )?;
        Ok(EdgeStream::new(rows))
    }

    /// Out-degree of `source`.
    pub fn degree<K: Into<NodeKey>>(&self, source: K) -> Result<u64, GraphError> {
        row_to_count(self.query_one(
            Statement::new("SELECT COUNT(target) FROM edges WHERE source = ?1").bind(source.into()),
        )?)
    }

    fn adjacent(&self, direction: Direction, key: NodeKey) -> Result<KeyStream, GraphError> {
        let (anchor, far) = direction.columns();
        let rows = self.query(
            Statement::new(format!("SELECT {far} FROM edges WHERE {anchor} = ?1")).bind(key),
        )?;
        Ok(KeyStream::new(rows))
    }

    fn sample(&self, direction: Direction, key: NodeKey, n: usize) -> Result<Vec<NodeKey>, GraphError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let (anchor, far) = direction.columns();
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = self.query(
            Statement::new(format!(
                "SELECT {far} FROM edges WHERE {anchor} = ?1 ORDER BY RANDOM() LIMIT ?2"
            ))
            .bind(key)
            .bind(limit),
        )?;
        KeyStream::new(rows).collect()
    }

    fn adjacent_from(&self, direction: Direction, keys: Vec<NodeKey>) -> Result<AdjacencyMap, GraphError> {
        let mut adjacency = AdjacencyMap::new();
        if keys.is_empty() {
            return Ok(adjacency);
        }
        let (anchor, far) = direction.columns();
        let rows = self.query(
            Statement::new(format!(
                "SELECT {anchor}, {far} FROM edges \
                 WHERE {anchor} IN (SELECT value FROM json_each(?1))"
            ))
            .bind(key_set_param(&keys)?),
        )?;
        for row in rows {
            // Columns come back as (anchor, far) in both directions.
            let Edge { source: queried, target: adjacent } = row_to_edge(row?)?;
            adjacency.entry(queried).or_default().push(adjacent);
        }
        Ok(adjacency)
    }

    fn replace_adjacency(
        &self,
        direction: Direction,
        anchor_key: NodeKey,
        edges: &[Edge],
    ) -> Result<(), GraphError> {
        let (anchor, _) = direction.columns();
        let delete = Statement::new(format!("DELETE FROM edges WHERE {anchor} = ?1")).bind(anchor_key);
        let stmts = if edges.is_empty() {
            vec![delete]
        } else {
            insert_edges_statements(vec![delete], edges)
        };
        self.write_batch(stmts)
    }
}

fn collect_keys<I, K>(keys: I) -> Vec<NodeKey>
where
    I: IntoIterator<Item = K>,
    K: Into<NodeKey>,
{
    keys.into_iter().map(Into::into).collect()
}
