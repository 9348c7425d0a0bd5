//! Tests for the connection wrapper and transaction helper.

use super::*;

fn count(db: &SchemaDb, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn open_memory_bootstraps_head_table() {
    let db = SchemaDb::open_memory().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM stratum.ledger_head"), 0);
}

#[test]
fn open_file_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stratum.duckdb");
    assert!(!path.exists());
    let _db = SchemaDb::open(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn open_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stratum.duckdb");
    {
        let db1 = SchemaDb::open(&path).unwrap();
        db1.conn()
            .execute("INSERT INTO stratum.ledger_head (revision) VALUES ('abc')", [])
            .unwrap();
    }
    let db2 = SchemaDb::open(&path).unwrap();
    assert_eq!(count(&db2, "SELECT COUNT(*) FROM stratum.ledger_head"), 1);
}

#[test]
fn transaction_commits_on_ok() {
    let db = SchemaDb::open_memory().unwrap();
    db.transaction(|conn| {
        conn.execute("CREATE TABLE t (id INTEGER)", [])
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        conn.execute("INSERT INTO t VALUES (1)", [])
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(())
    })
    .unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 1);
}

#[test]
fn transaction_rolls_back_on_err() {
    let db = SchemaDb::open_memory().unwrap();
    db.conn().execute("CREATE TABLE t (id INTEGER)", []).unwrap();

    let result: DbResult<()> = db.transaction(|conn| {
        conn.execute("INSERT INTO t VALUES (1)", [])
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Err(DbError::ExecutionError("forced failure".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM t"), 0);
}
