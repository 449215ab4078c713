use std::sync::mpsc::Receiver;

use rusqlite::types::Value;

use super::command::Reply;
use crate::errors::GraphError;

/// Lazy, single-pass sequence of result rows for one read command.
///
/// Rows arrive as the worker produces them. The sequence ends on the worker's
/// end marker; a failed query yields its error once and then ends. Dropping
/// the stream early is fine: the worker never waits on a reader.
pub struct RowStream {
    rx: Receiver<Reply>,
    done: bool,
}

impl RowStream {
    pub(crate) fn new(rx: Receiver<Reply>) -> Self {
        Self { rx, done: false }
    }

    /// Consumes the stream and returns the first row, if any.
    pub fn first(mut self) -> Result<Option<Vec<Value>>, GraphError> {
        self.next().transpose()
    }

    /// Drains the stream into a vector, stopping at the first error.
    pub fn collect_rows(self) -> Result<Vec<Vec<Value>>, GraphError> {
        self.collect()
    }
}

impl Iterator for RowStream {
    type Item = Result<Vec<Value>, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.rx.recv() {
            Ok(Reply::Row(row)) => Some(Ok(row)),
            Ok(Reply::End) => {
                self.done = true;
                None
            }
            Ok(Reply::Failed(err)) => {
                self.done = true;
                Some(Err(err))
            }
            // Worker dropped the channel without a terminator: the queue was shut down.
            Err(_) => {
                self.done = true;
                Some(Err(GraphError::Closed))
            }
        }
    }
}
