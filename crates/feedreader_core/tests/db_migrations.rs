use feedreader_core::config::StoreConfig;
use feedreader_core::db::migrations::{current_user_version, latest_version};
use feedreader_core::db::{open_db, open_db_in_memory, DbError};
use feedreader_core::schema;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_entry_table() {
    let conn = open_db_in_memory(&StoreConfig::default()).unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_eq!(
        column_names(&conn),
        vec!["_id".to_string(), "title".to_string(), "subtitle".to_string()]
    );
}

#[test]
fn opening_same_file_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(schema::DEFAULT_DB_FILE_NAME);

    let first = open_db(&path, &StoreConfig::default()).unwrap();
    first
        .execute("INSERT INTO entry (title) VALUES ('kept');", [])
        .unwrap();
    drop(first);

    let second = open_db(&path, &StoreConfig::default()).unwrap();
    assert_eq!(current_user_version(&second).unwrap(), latest_version());
    assert_eq!(row_count(&second), 1);
}

#[test]
fn version_bump_drops_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bump.db");

    let conn = open_db(&path, &StoreConfig::default()).unwrap();
    conn.execute("INSERT INTO entry (title) VALUES ('old');", [])
        .unwrap();
    drop(conn);

    let bumped = StoreConfig {
        schema_version: latest_version() + 1,
        ..StoreConfig::default()
    };
    let conn = open_db(&path, &bumped).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version() + 1);
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn newer_schema_version_is_rejected_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE entry (_id INTEGER PRIMARY KEY, title TEXT, subtitle TEXT);
         INSERT INTO entry (title) VALUES ('future');
         PRAGMA user_version = 999;",
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path, &StoreConfig::default()).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), 999);
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn missing_parent_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("entries.db");

    let err = open_db(&path, &StoreConfig::default()).unwrap_err();
    assert!(matches!(err, DbError::Unavailable(_)), "unexpected error: {err}");
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(entry);").unwrap();
    stmt.query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM entry;", [], |row| row.get(0))
        .unwrap()
}
