use serde_json::json;
use storefront_catalog::{Field, FieldType, MigrationBatch, MigrationHistory, MigrationStep};
use storefront_db::*;
use tempfile::TempDir;

fn index_exists(conn: &rusqlite::Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1)",
        [name],
        |row| row.get(0),
    )
    .unwrap()
}

fn price_history() -> MigrationHistory {
    MigrationHistory::new(vec![MigrationBatch::new(vec![
        MigrationStep::field_added(Field::Price, FieldType::Number, json!(0)),
        MigrationStep::field_added(Field::Vendor, FieldType::Text, json!("default")),
        MigrationStep::index_added(Field::Price, "price_idx"),
        MigrationStep::index_added(Field::Vendor, "vendor_idx"),
    ])])
    .unwrap()
}

#[test]
fn create_schema_in_memory() {
    let history = MigrationHistory::default();
    let conn = open_memory(&history).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), history.version());
}

#[test]
fn all_tables_exist() {
    let conn = open_memory(&MigrationHistory::default()).unwrap();
    for table in ["schema_version", "products", "product_indexes"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn indexes_match_history() {
    let history = MigrationHistory::default();
    let conn = open_memory(&history).unwrap();
    let registered: Vec<String> = list_indexes(&conn)
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    let declared: Vec<String> = history.indexes_at(history.version()).into_keys().collect();
    assert_eq!(registered, declared);
    for name in &declared {
        assert!(index_exists(&conn, name), "index '{}' should exist", name);
    }
}

#[test]
fn reopening_at_same_version_is_a_no_op() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    let history = MigrationHistory::default();
    drop(open_database(&path, &history).unwrap());

    let mut conn = open_database(&path, &history).unwrap();
    assert_eq!(upgrade(&mut conn, &history).unwrap(), history.version());
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, i64::from(history.version()));
}

#[test]
fn upgrade_applies_only_pending_batches() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    let v1 = price_history();
    drop(open_database(&path, &v1).unwrap());

    let mut batches = v1.batches().to_vec();
    batches.push(MigrationBatch::new(vec![
        MigrationStep::field_added(Field::Stock, FieldType::Number, json!(0)),
        MigrationStep::index_added(Field::Stock, "stock_idx"),
        MigrationStep::index_removed("vendor_idx"),
    ]));
    let v2 = MigrationHistory::new(batches).unwrap();

    let conn = open_database(&path, &v2).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 2);
    assert!(index_exists(&conn, "price_idx"));
    assert!(index_exists(&conn, "stock_idx"));
    assert!(!index_exists(&conn, "vendor_idx"));
    assert_eq!(index_for_field(&conn, Field::Vendor).unwrap(), None);
}

#[test]
fn newer_database_is_refused() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    drop(open_database(&path, &MigrationHistory::default()).unwrap());

    let err = open_database(&path, &price_history()).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::VersionAhead { expected: 1, found: 4 }
    ));
}

#[test]
fn failed_step_rolls_back_whole_upgrade() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    drop(open_database(&path, &price_history()).unwrap());

    // A history whose version 1 never declared vendor_idx, so version 2
    // tries to create it again on this database.
    let diverged = MigrationHistory::new(vec![
        MigrationBatch::new(vec![
            MigrationStep::field_added(Field::Price, FieldType::Number, json!(0)),
            MigrationStep::field_added(Field::Vendor, FieldType::Text, json!("default")),
            MigrationStep::field_added(Field::Color, FieldType::Text, json!("default")),
            MigrationStep::index_added(Field::Price, "price_idx"),
        ]),
        MigrationBatch::new(vec![
            MigrationStep::index_added(Field::Color, "color_idx"),
            MigrationStep::index_added(Field::Vendor, "vendor_idx"),
            MigrationStep::field_added(Field::Stock, FieldType::Number, json!(0)),
        ]),
    ])
    .unwrap();

    let err = open_database(&path, &diverged).unwrap_err();
    assert!(matches!(err, SchemaError::MigrationFailed { version: 2, .. }));

    let conn = open_database(&path, &price_history()).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 1);
    assert!(!index_exists(&conn, "color_idx"));
    assert_eq!(index_for_field(&conn, Field::Color).unwrap(), None);
}

#[test]
fn removing_missing_index_fails_migration() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    let bare = MigrationHistory::new(vec![MigrationBatch::new(vec![
        MigrationStep::field_added(Field::Price, FieldType::Number, json!(0)),
    ])])
    .unwrap();
    drop(open_database(&path, &bare).unwrap());

    let diverged = MigrationHistory::new(vec![
        MigrationBatch::new(vec![
            MigrationStep::field_added(Field::Price, FieldType::Number, json!(0)),
            MigrationStep::index_added(Field::Price, "price_idx"),
        ]),
        MigrationBatch::new(vec![MigrationStep::index_removed("price_idx")]),
    ])
    .unwrap();

    let err = open_database(&path, &diverged).unwrap_err();
    assert!(matches!(err, SchemaError::MigrationFailed { version: 2, .. }));
    let conn = open_database(&path, &bare).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 1);
}

#[test]
fn field_added_backfills_existing_documents() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    let v1 = price_history();
    let conn = open_database(&path, &v1).unwrap();
    conn.execute(
        "INSERT INTO products (name, data) VALUES ('Old card', '{\"name\":\"Old card\",\"price\":5}')",
        [],
    )
    .unwrap();
    drop(conn);

    let mut batches = v1.batches().to_vec();
    batches.push(MigrationBatch::new(vec![
        MigrationStep::field_added(Field::Fans, FieldType::Text, json!("1")),
        MigrationStep::field_added(Field::Price, FieldType::Number, json!(0)),
    ]));
    let v2 = MigrationHistory::new(batches).unwrap();

    let conn = open_database(&path, &v2).unwrap();
    let (fans, price): (String, i64) = conn
        .query_row(
            "SELECT json_extract(data, '$.fans'), json_extract(data, '$.price') FROM products",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(fans, "1");
    assert_eq!(price, 5, "existing values are not overwritten");
}
