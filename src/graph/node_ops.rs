use ahash::AHashSet;
use rusqlite::types::Value;

use super::types::{NodeKey, NodeRecord, row_to_record};
use super::{GraphStore, MAX_ROWS_PER_INSERT};
use crate::actor::Statement;
use crate::codec::Attributes;
use crate::errors::GraphError;

impl GraphStore {
    /// Inserts or updates a node.
    ///
    /// Empty `attributes` insert the key only if absent and leave an existing
    /// node untouched. Non-empty `attributes` replace the stored mapping
    /// wholesale; the row is re-inserted, so the node moves to the end of the
    /// insertion order.
    pub fn add_node<K: Into<NodeKey>>(&self, key: K, attributes: Attributes) -> Result<(), GraphError> {
        let key = key.into();
        if attributes.is_empty() {
            return self.write(
                Statement::new("INSERT OR IGNORE INTO nodes (key) VALUES (?1)").bind(key),
            );
        }
        let payload = self.codec.encode(&attributes)?;
        self.write(
            Statement::new("REPLACE INTO nodes (key, attributes) VALUES (?1, ?2)")
                .bind(key)
                .bind(payload),
        )
    }

    /// Inserts each key that is not already present. Existing attributes are kept.
    pub fn add_nodes_from<I, K>(&self, keys: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = K>,
        K: Into<NodeKey>,
    {
        let keys = distinct(keys.into_iter().map(Into::into));
        if keys.is_empty() {
            return Ok(());
        }
        self.write_batch(insert_nodes_statements(keys))
    }

    pub fn has_node<K: Into<NodeKey>>(&self, key: K) -> Result<bool, GraphError> {
        let row = self.query_one(
            Statement::new("SELECT 1 FROM nodes WHERE key = ?1 LIMIT 1").bind(key.into()),
        )?;
        Ok(row.is_some())
    }

    /// Fetches a node, failing with `NotFound` if it is absent.
    pub fn node<K: Into<NodeKey>>(&self, key: K) -> Result<NodeRecord, GraphError> {
        let key = key.into();
        let row = self.query_one(
            Statement::new("SELECT key, attributes FROM nodes WHERE key = ?1").bind(key.clone()),
        )?;
        match row {
            Some(row) => row_to_record(row, self.codec),
            None => Err(GraphError::not_found(format!("node '{key}'"))),
        }
    }

    /// Deletes the node together with every edge that touches it.
    pub fn remove_node<K: Into<NodeKey>>(&self, key: K) -> Result<(), GraphError> {
        let key = key.into();
        self.write_batch(vec![
            Statement::new("DELETE FROM edges WHERE source = ?1 OR target = ?1").bind(key.clone()),
            Statement::new("DELETE FROM nodes WHERE key = ?1").bind(key),
        ])
    }
}

/// Deduplicates while keeping first-seen order.
pub(crate) fn distinct<I: Iterator<Item = NodeKey>>(keys: I) -> Vec<NodeKey> {
    let mut seen = AHashSet::new();
    keys.filter(|key| seen.insert(key.clone())).collect()
}

pub(crate) fn insert_nodes_statements(keys: Vec<NodeKey>) -> Vec<Statement> {
    keys.chunks(MAX_ROWS_PER_INSERT)
        .map(|chunk| {
            let placeholders = vec!["(?)"; chunk.len()].join(", ");
            Statement::with_params(
                format!("INSERT OR IGNORE INTO nodes (key) VALUES {placeholders}"),
                chunk.iter().cloned().map(Value::from).collect(),
            )
        })
        .collect()
}
