use digraphdb::{CommandQueue, GraphConfig, GraphError, Statement};
use rusqlite::types::Value;

fn queue_with_table() -> CommandQueue {
    let queue = CommandQueue::spawn(&GraphConfig::in_memory()).expect("queue");
    queue
        .submit_write(Statement::new("CREATE TABLE items (value INTEGER NOT NULL)"))
        .expect("submit");
    queue.commit().expect("commit");
    queue
}

fn count_items(queue: &CommandQueue) -> i64 {
    let row = queue
        .submit_read(Statement::new("SELECT COUNT(*) FROM items"))
        .expect("read")
        .first()
        .expect("row")
        .expect("count row");
    match row[0] {
        Value::Integer(n) => n,
        ref other => panic!("unexpected count {other:?}"),
    }
}

#[test]
fn test_read_sees_earlier_write_without_commit() {
    let queue = queue_with_table();
    queue
        .submit_write(Statement::new("INSERT INTO items (value) VALUES (?1)").bind(7i64))
        .expect("write");
    let rows = queue
        .submit_read(Statement::new("SELECT value FROM items"))
        .expect("read")
        .collect_rows()
        .expect("rows");
    assert_eq!(rows, vec![vec![Value::Integer(7)]]);
}

#[test]
fn test_rows_stream_in_statement_order() {
    let queue = queue_with_table();
    for value in 0..50i64 {
        queue
            .submit_write(Statement::new("INSERT INTO items (value) VALUES (?1)").bind(value))
            .expect("write");
    }
    let values: Vec<i64> = queue
        .submit_read(Statement::new("SELECT value FROM items ORDER BY value"))
        .expect("read")
        .map(|row| match row.expect("row")[0] {
            Value::Integer(n) => n,
            _ => panic!("integer column"),
        })
        .collect();
    assert_eq!(values, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_failed_read_yields_error_then_ends() {
    let queue = queue_with_table();
    let mut rows = queue
        .submit_read(Statement::new("SELEC value FROM items"))
        .expect("read");
    assert!(matches!(rows.next(), Some(Err(GraphError::BackendError(_)))));
    assert!(rows.next().is_none());
    assert_eq!(count_items(&queue), 0);
}

#[test]
fn test_failed_write_surfaces_on_next_commit_only() {
    let queue = queue_with_table();
    queue
        .submit_write(Statement::new("INSERT INTO missing (value) VALUES (1)"))
        .expect("queued");
    queue
        .submit_write(Statement::new("INSERT INTO items (value) VALUES (2)"))
        .expect("queued");
    let err = queue.commit().expect_err("deferred failure");
    assert!(matches!(err, GraphError::BackendError(_)));
    // Worker kept going and the error was cleared.
    assert_eq!(count_items(&queue), 1);
    queue.commit().expect("clean commit");
}

#[test]
fn test_first_failure_wins() {
    let queue = queue_with_table();
    queue
        .submit_write(Statement::new("INSERT INTO first_missing (value) VALUES (1)"))
        .expect("queued");
    queue
        .submit_write(Statement::new("INSERT INTO second_missing (value) VALUES (1)"))
        .expect("queued");
    match queue.commit() {
        Err(GraphError::BackendError(msg)) => assert!(msg.contains("first_missing"), "{msg}"),
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[test]
fn test_batch_is_all_or_nothing() {
    let queue = queue_with_table();
    queue
        .submit_batch(vec![
            Statement::new("INSERT INTO items (value) VALUES (1)"),
            Statement::new("INSERT INTO items (value) VALUES (NULL)"),
        ])
        .expect("queued");
    assert!(queue.commit().is_err());
    assert_eq!(count_items(&queue), 0);

    queue
        .submit_batch(vec![
            Statement::new("INSERT INTO items (value) VALUES (1)"),
            Statement::new("INSERT INTO items (value) VALUES (2)"),
        ])
        .expect("queued");
    queue.commit().expect("commit");
    assert_eq!(count_items(&queue), 2);
}

#[test]
fn test_abandoned_stream_does_not_stall_worker() {
    let queue = queue_with_table();
    queue
        .submit_write(Statement::new(
            "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 5000) \
             INSERT INTO items (value) SELECT x FROM n",
        ))
        .expect("bulk insert");
    let mut rows = queue
        .submit_read(Statement::new("SELECT value FROM items"))
        .expect("read");
    assert!(rows.next().is_some());
    drop(rows);
    assert_eq!(count_items(&queue), 5000);
    queue.commit().expect("commit");
}

#[test]
fn test_close_is_idempotent_and_rejects_new_work() {
    let queue = queue_with_table();
    queue
        .submit_write(Statement::new("INSERT INTO items (value) VALUES (1)"))
        .expect("queued");
    queue.close().expect("close");
    queue.close().expect("second close");
    assert!(queue.is_closed());
    assert_eq!(
        queue.submit_write(Statement::new("INSERT INTO items (value) VALUES (2)")),
        Err(GraphError::Closed)
    );
    assert!(matches!(
        queue.submit_read(Statement::new("SELECT 1")),
        Err(GraphError::Closed)
    ));
    assert_eq!(queue.commit(), Err(GraphError::Closed));
}

#[test]
fn test_close_succeeds_despite_unreported_failure() {
    let queue = queue_with_table();
    queue
        .submit_write(Statement::new("INSERT INTO missing (value) VALUES (1)"))
        .expect("queued");
    queue.close().expect("close drains and succeeds");
}

#[test]
fn test_spawn_reports_connection_errors() {
    let cfg = GraphConfig::new("/nonexistent-dir-for-digraphdb/graph.db");
    let err = CommandQueue::spawn(&cfg).expect_err("cannot open");
    assert!(matches!(err, GraphError::ConnectionError(_)));
}

#[test]
fn test_spawn_rejects_bad_pragma() {
    let cfg = GraphConfig::in_memory().with_pragma("journal_size_limit", "not a number at all");
    let err = CommandQueue::spawn(&cfg).expect_err("bad pragma");
    assert!(matches!(err, GraphError::ConnectionError(_)));
}
