use rental_catalog_core::db::migrations::latest_version;
use rental_catalog_core::db::{open_db, open_db_in_memory, share, DbError};
use rental_catalog_core::{CatalogFacade, ErrorKind, RepoError, SqliteRepository, User};
use rusqlite::Connection;

const CATALOG_TABLES: [&str; 5] = ["users", "places", "reviews", "amenities", "place_amenities"];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in CATALOG_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "users");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
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
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = share(Connection::open_in_memory().unwrap());

    let err = SqliteRepository::<User>::try_new(conn.clone())
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));

    let facade_err = CatalogFacade::sqlite(conn)
        .err()
        .expect("facade must refuse unmigrated connection");
    assert_eq!(facade_err.kind(), ErrorKind::Storage);
}

#[test]
fn catalog_survives_reopen_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let user_id = {
        let facade = CatalogFacade::sqlite(share(open_db(&path).unwrap())).unwrap();
        let user = facade
            .create_user(rental_catalog_core::NewUser {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
                ..Default::default()
            })
            .unwrap();
        rental_catalog_core::Entity::id(&user)
    };

    let facade = CatalogFacade::sqlite(share(open_db(&path).unwrap())).unwrap();
    let loaded = facade.get_user(user_id).unwrap().unwrap();
    assert_eq!(loaded.email(), "grace@example.com");
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
