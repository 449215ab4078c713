use std::borrow::Cow;
use std::sync::mpsc::{Sender, SyncSender};

use rusqlite::types::Value;

use crate::errors::GraphError;

/// One parameterized SQL statement with owned bind values.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: Cow<'static, str>,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new<S: Into<Cow<'static, str>>>(sql: S) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params<S: Into<Cow<'static, str>>>(sql: S, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn bind<V: Into<Value>>(mut self, value: V) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Messages pushed on a read's private result channel.
#[derive(Debug)]
pub(crate) enum Reply {
    Row(Vec<Value>),
    End,
    Failed(GraphError),
}

pub(crate) enum Command {
    Write(Statement),
    /// Statements applied all-or-nothing under one savepoint.
    WriteBatch(Vec<Statement>),
    Read(Statement, Sender<Reply>),
    Commit(SyncSender<Result<(), GraphError>>),
    Close,
}

impl Command {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Command::Write(_) => "write",
            Command::WriteBatch(_) => "write_batch",
            Command::Read(..) => "read",
            Command::Commit(_) => "commit",
            Command::Close => "close",
        }
    }
}
