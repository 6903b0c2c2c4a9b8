use roles_board_core::db::migrations::latest_version;
use roles_board_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "blobs");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("roles_board.sqlite3");

    let conn_first = open_db(&path).expect("first open");
    conn_first
        .execute(
            "INSERT INTO blobs (key, value) VALUES ('roles_board_v1', '[]');",
            [],
        )
        .expect("insert board blob");
    drop(conn_first);

    let conn_second = open_db(&path).expect("second open");
    assert_eq!(schema_version(&conn_second), latest_version());
    let value: String = conn_second
        .query_row(
            "SELECT value FROM blobs WHERE key = 'roles_board_v1';",
            [],
            |row| row.get(0),
        )
        .expect("board blob should survive reopen");
    assert_eq!(value, "[]");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).expect("open raw connection");
    conn.execute_batch("PRAGMA user_version = 999;")
        .expect("bump user_version");
    drop(conn);

    match open_db(&path).expect_err("newer schema must be rejected") {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_database_in_missing_directory_names_the_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("missing").join("roles_board.sqlite3");

    match open_db(&path).expect_err("missing parent directory must fail") {
        DbError::Open { path: failed, .. } => {
            assert_eq!(failed, path);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("read user_version")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .expect("query sqlite_master");
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
