//! The loop that owns the connection.

use std::sync::mpsc::{Receiver, Sender};

use rusqlite::{Connection, params_from_iter, types::Value};
use tracing::{debug, error, trace, warn};

use super::command::{Command, Reply, Statement};
use crate::config::{GraphConfig, StorageLocation};
use crate::errors::GraphError;

pub(crate) struct Worker {
    conn: Connection,
    /// First fire-and-forget failure since the last commit.
    deferred_error: Option<GraphError>,
    executed: u64,
}

impl Worker {
    pub(crate) fn open(cfg: &GraphConfig) -> Result<Self, GraphError> {
        let conn = match &cfg.location {
            StorageLocation::File(path) => Connection::open(path),
            StorageLocation::Memory => Connection::open_in_memory(),
        }
        .map_err(|e| GraphError::connection(e.to_string()))?;
        conn.set_prepared_statement_cache_capacity(cfg.statement_cache_capacity);

        let journal: String = conn
            .pragma_update_and_check(None, "journal_mode", cfg.journal_mode.as_pragma(), |row| {
                row.get(0)
            })
            .map_err(|e| GraphError::connection(format!("PRAGMA journal_mode: {e}")))?;
        conn.pragma_update(None, "synchronous", cfg.synchronous.as_pragma())
            .map_err(|e| GraphError::connection(format!("PRAGMA synchronous: {e}")))?;
        for (key, value) in &cfg.pragma_settings {
            let pragma_sql = format!("PRAGMA {key} = {value}");
            match conn.execute(&pragma_sql, []) {
                Ok(_) | Err(rusqlite::Error::ExecuteReturnedResults) => {}
                Err(e) => {
                    return Err(GraphError::connection(format!(
                        "PRAGMA {key} = {value}: {e}"
                    )));
                }
            }
        }
        debug!(location = %cfg.location, journal_mode = %journal, "graph worker connected");

        Ok(Self {
            conn,
            deferred_error: None,
            executed: 0,
        })
    }

    /// Drains commands in arrival order until `Close`.
    pub(crate) fn run(mut self, inbox: Receiver<Command>) {
        while let Ok(command) = inbox.recv() {
            self.executed += 1;
            match command {
                Command::Write(stmt) => {
                    if let Err(err) = self.write(&stmt) {
                        self.defer(err, &stmt.sql);
                    }
                }
                Command::WriteBatch(stmts) => {
                    if let Err(err) = self.write_batch(&stmts) {
                        let sql = stmts.first().map(|s| &*s.sql).unwrap_or("");
                        self.defer(err, sql);
                    }
                }
                Command::Read(stmt, reply) => {
                    let terminator = match self.read(&stmt, &reply) {
                        Ok(()) => Reply::End,
                        Err(err) => Reply::Failed(err),
                    };
                    let _ = reply.send(terminator);
                }
                Command::Commit(reply) => {
                    let outcome = self.commit();
                    let _ = reply.send(outcome);
                }
                Command::Close => break,
            }
        }
        self.shutdown(inbox);
    }

    fn write(&mut self, stmt: &Statement) -> Result<(), GraphError> {
        self.begin_if_idle()?;
        execute(&self.conn, stmt)
    }

    fn write_batch(&mut self, stmts: &[Statement]) -> Result<(), GraphError> {
        self.begin_if_idle()?;
        let sp = self
            .conn
            .savepoint()
            .map_err(|e| GraphError::backend(e.to_string()))?;
        for stmt in stmts {
            // Dropping the savepoint on error rolls the whole batch back.
            execute(&sp, stmt)?;
        }
        sp.commit().map_err(|e| GraphError::backend(e.to_string()))
    }

    fn read(&self, stmt: &Statement, reply: &Sender<Reply>) -> Result<(), GraphError> {
        let mut prepared = self
            .conn
            .prepare_cached(&stmt.sql)
            .map_err(|e| GraphError::backend(e.to_string()))?;
        let width = prepared.column_count();
        let mut rows = prepared
            .query(params_from_iter(stmt.params.iter()))
            .map_err(|e| GraphError::backend(e.to_string()))?;
        while let Some(row) = rows.next().map_err(|e| GraphError::backend(e.to_string()))? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(
                    row.get::<_, Value>(idx)
                        .map_err(|e| GraphError::backend(e.to_string()))?,
                );
            }
            if reply.send(Reply::Row(values)).is_err() {
                trace!(sql = %stmt.sql, "reader abandoned result stream");
                return Ok(());
            }
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), GraphError> {
        let committed = if self.conn.is_autocommit() {
            Ok(())
        } else {
            self.conn
                .execute_batch("COMMIT")
                .map_err(|e| GraphError::backend(e.to_string()))
        };
        match (self.deferred_error.take(), committed) {
            (Some(err), Ok(())) => Err(err),
            (Some(err), Err(commit_err)) => {
                warn!(error = %commit_err, "commit failed after an earlier write failure");
                Err(err)
            }
            (None, result) => result,
        }
    }

    fn begin_if_idle(&self) -> Result<(), GraphError> {
        if self.conn.is_autocommit() {
            self.conn
                .execute_batch("BEGIN")
                .map_err(|e| GraphError::backend(e.to_string()))?;
        }
        Ok(())
    }

    fn defer(&mut self, err: GraphError, sql: &str) {
        warn!(error = %err, sql = %sql, "queued write failed");
        if self.deferred_error.is_none() {
            self.deferred_error = Some(err);
        }
    }

    fn shutdown(mut self, inbox: Receiver<Command>) {
        if let Some(err) = self.deferred_error.take() {
            warn!(error = %err, "discarding unreported write failure at close");
        }
        if let Err(err) = self.commit() {
            error!(error = %err, "final commit failed");
        }
        // Anything still queued raced with close; dropping it disconnects any waiting caller.
        for late in inbox.try_iter() {
            warn!(kind = late.kind(), "command submitted after close was dropped");
        }
        debug!(executed = self.executed, "graph worker stopped");
    }
}

fn execute(conn: &Connection, stmt: &Statement) -> Result<(), GraphError> {
    let mut prepared = conn
        .prepare_cached(&stmt.sql)
        .map_err(|e| GraphError::backend(e.to_string()))?;
    prepared
        .execute(params_from_iter(stmt.params.iter()))
        .map_err(|e| GraphError::backend(e.to_string()))?;
    Ok(())
}
