use crate::actor::{CommandQueue, Statement};
use crate::errors::GraphError;

/// Key columns carry no declared type so integer and text keys stay distinct.
/// The foreign keys are declarative only; `PRAGMA foreign_keys` stays off and
/// the store cascades node removal itself.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS nodes (
        key        NOT NULL UNIQUE,
        attributes BLOB
    )"#,
    r#"CREATE TABLE IF NOT EXISTS edges (
        source NOT NULL,
        target NOT NULL,
        UNIQUE(source, target) ON CONFLICT IGNORE,
        FOREIGN KEY(source) REFERENCES nodes(key),
        FOREIGN KEY(target) REFERENCES nodes(key)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source)",
    "CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target)",
    "CREATE VIEW IF NOT EXISTS count_nodes(n_nodes) AS SELECT COUNT(*) FROM nodes",
    "CREATE VIEW IF NOT EXISTS count_edges(n_edges) AS SELECT COUNT(*) FROM edges",
];

pub fn bootstrap_statements() -> Vec<Statement> {
    SCHEMA.iter().map(|sql| Statement::new(*sql)).collect()
}

/// Creates any missing schema objects and waits for them to commit.
///
/// Safe to run against an existing store: nothing is dropped or cleared.
pub fn ensure_schema(queue: &CommandQueue) -> Result<(), GraphError> {
    for stmt in bootstrap_statements() {
        queue.submit_write(stmt)?;
    }
    queue.commit().map_err(|e| match e {
        GraphError::Closed => GraphError::Closed,
        other => GraphError::schema(other.to_string()),
    })
}
