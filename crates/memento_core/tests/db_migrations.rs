use memento_core::db::migrations::latest_version;
use memento_core::db::{open_db, open_db_in_memory, DbError};
use memento_core::{RepoError, SqliteObjectiveRepository, SqliteScheduleRepository};
use rusqlite::Connection;

const TABLES: [&str; 5] = [
    "users",
    "necessity_blocks",
    "objectives",
    "schedule_allocations",
    "affirmations",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn reopening_file_database_keeps_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memento.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "objectives");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteObjectiveRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn repository_rejects_missing_table_at_current_version() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let err = SqliteScheduleRepository::try_new(&conn)
        .err()
        .expect("missing table must be rejected");
    assert!(matches!(
        err,
        RepoError::MissingRequiredTable("schedule_allocations")
    ));
}

#[test]
fn schema_rejects_second_allocation_for_same_cell() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO schedule_allocations (uuid, slot_type, day_of_week, hour_slot)
         VALUES ('a', 'purpose', 2, 10);",
        [],
    )
    .unwrap();

    let duplicate = conn.execute(
        "INSERT INTO schedule_allocations (uuid, slot_type, day_of_week, hour_slot)
         VALUES ('b', 'purpose', 2, 10);",
        [],
    );
    assert!(duplicate.is_err());
}

#[test]
fn schema_rejects_necessity_cell_without_block() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO schedule_allocations (uuid, slot_type, day_of_week, hour_slot)
         VALUES ('a', 'necessity', 0, 0);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
