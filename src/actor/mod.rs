//! Serialized access to a single storage connection.
//!
//! [`CommandQueue`] spawns one worker thread that owns the connection and
//! drains a shared FIFO inbox. Any number of threads may submit through the
//! same handle; commands run strictly in the order they entered the inbox, so
//! a write queued before a read is always visible to that read.
//!
//! Writes are fire-and-forget. A failing write is logged and remembered by the
//! worker, and the next [`CommandQueue::commit`] reports it.

mod command;
mod stream;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

pub use command::Statement;
pub use stream::RowStream;

use command::Command;
use worker::Worker;

use crate::config::GraphConfig;
use crate::errors::GraphError;

#[derive(Debug)]
pub struct CommandQueue {
    inbox: Sender<Command>,
    closed: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CommandQueue {
    /// Opens the connection on a fresh worker thread.
    ///
    /// Connection and PRAGMA failures are reported here, before any command
    /// can be queued.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use digraphdb::{CommandQueue, GraphConfig, Statement};
    /// use rusqlite::types::Value;
    ///
    /// let queue = CommandQueue::spawn(&GraphConfig::in_memory())?;
    /// queue.submit_write(Statement::new("CREATE TABLE t (v INTEGER)"))?;
    /// queue.submit_write(Statement::new("INSERT INTO t (v) VALUES (?1)").bind(5i64))?;
    /// queue.commit()?;
    ///
    /// let rows = queue.submit_read(Statement::new("SELECT v FROM t"))?.collect_rows()?;
    /// assert_eq!(rows, vec![vec![Value::Integer(5)]]);
    /// queue.close()?;
    /// # Ok::<(), digraphdb::GraphError>(())
    /// ```
    pub fn spawn(cfg: &GraphConfig) -> Result<Self, GraphError> {
        let (inbox, commands) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let worker_cfg = cfg.clone();
        let handle = thread::Builder::new()
            .name("digraphdb-worker".to_string())
            .spawn(move || match Worker::open(&worker_cfg) {
                Ok(worker) => {
                    let _ = ready_tx.send(Ok(()));
                    worker.run(commands);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                }
            })
            .map_err(|e| GraphError::connection(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                inbox,
                closed: AtomicBool::new(false),
                worker: Mutex::new(Some(handle)),
            }),
            Ok(Err(err)) => {
                let _ = handle.join();
                Err(err)
            }
            Err(_) => {
                let _ = handle.join();
                Err(GraphError::connection("worker exited during startup"))
            }
        }
    }

    /// Queues a write and returns without waiting for it to run.
    pub fn submit_write(&self, stmt: Statement) -> Result<(), GraphError> {
        self.send(Command::Write(stmt))
    }

    /// Queues statements that apply together or not at all.
    pub fn submit_batch(&self, stmts: Vec<Statement>) -> Result<(), GraphError> {
        if stmts.is_empty() {
            return Ok(());
        }
        self.send(Command::WriteBatch(stmts))
    }

    /// Queues a query; rows stream back as the worker produces them.
    pub fn submit_read(&self, stmt: Statement) -> Result<RowStream, GraphError> {
        let (reply, rows) = mpsc::channel();
        self.send(Command::Read(stmt, reply))?;
        Ok(RowStream::new(rows))
    }

    /// Blocks until every previously queued command has run and the
    /// transaction is committed.
    ///
    /// Returns the first write failure recorded since the last commit, if any.
    pub fn commit(&self) -> Result<(), GraphError> {
        let (reply, outcome) = mpsc::sync_channel(1);
        self.send(Command::Commit(reply))?;
        outcome.recv().map_err(|_| GraphError::Closed)?
    }

    /// Stops the worker after the queue drains and the final commit ran.
    ///
    /// Concurrent callers all block until the worker has exited; calls after
    /// that are no-ops.
    pub fn close(&self) -> Result<(), GraphError> {
        let mut worker = self.worker.lock();
        let Some(handle) = worker.take() else {
            return Ok(());
        };
        self.closed.store(true, Ordering::SeqCst);
        // Send only fails if the worker already exited; the join still reaps it.
        let _ = self.inbox.send(Command::Close);
        handle
            .join()
            .map_err(|_| GraphError::backend("graph worker panicked"))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn send(&self, command: Command) -> Result<(), GraphError> {
        if self.is_closed() {
            return Err(GraphError::Closed);
        }
        self.inbox.send(command).map_err(|_| GraphError::Closed)
    }
}

impl Drop for CommandQueue {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
