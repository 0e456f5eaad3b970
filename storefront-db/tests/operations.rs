use chrono::NaiveDate;
use storefront_catalog::*;
use storefront_db::*;

fn card(name: &str, vendor: &str, price: f64) -> Product {
    Product {
        name: name.to_string(),
        price,
        vendor: vendor.to_string(),
        memory: Memory::Gigabytes(8),
        color: "black".to_string(),
        stock: 3,
        image: PLACEHOLDER_IMAGE.to_string(),
        date: NaiveDate::from_ymd_opt(2022, 7, 13).unwrap(),
        fans: "2".to_string(),
    }
}

#[test]
fn seed_inserts_every_product() {
    let mut conn = open_memory(&MigrationHistory::default()).unwrap();
    let stats = seed_products(&mut conn, &default_products()).unwrap();
    assert_eq!(stats.inserted, 25);
    assert_eq!(stats.cleared, 0);
    assert_eq!(count_products(&conn).unwrap(), 25);
}

#[test]
fn reseeding_replaces_instead_of_accumulating() {
    let mut conn = open_memory(&MigrationHistory::default()).unwrap();
    seed_products(&mut conn, &[card("A", "X", 10.0), card("B", "X", 50.0)]).unwrap();
    let stats = seed_products(&mut conn, &[card("C", "Y", 10.0)]).unwrap();
    assert_eq!(stats.cleared, 2);

    let names: Vec<_> = list_all(&conn).unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["C"]);
}

#[test]
fn duplicate_names_fail_and_roll_back() {
    let mut conn = open_memory(&MigrationHistory::default()).unwrap();
    seed_products(&mut conn, &[card("A", "X", 10.0)]).unwrap();

    let err = seed_products(&mut conn, &[card("B", "X", 1.0), card("B", "Y", 2.0)]).unwrap_err();
    assert!(matches!(err, OperationError::DuplicateKey(ref name) if name == "B"));

    let names: Vec<_> = list_all(&conn).unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["A"], "failed seed must not clear the store");
}

#[test]
fn stored_document_round_trips() {
    let conn = open_memory(&MigrationHistory::default()).unwrap();
    let product = card("Palit GeForce RTX 2060 Dual", "Palit", 34999.0);
    insert_product(&conn, &product).unwrap();

    let all = list_all(&conn).unwrap();
    assert_eq!(all, vec![product]);
}

#[test]
fn non_finite_price_is_rejected() {
    let mut conn = open_memory(&MigrationHistory::default()).unwrap();
    seed_products(&mut conn, &[card("A", "X", 10.0)]).unwrap();

    let err = seed_products(&mut conn, &[card("B", "X", f64::NAN)]).unwrap_err();
    assert!(matches!(err, OperationError::InvalidRecord(ref name) if name == "B"));
    assert!(matches!(
        insert_product(&conn, &card("C", "X", f64::INFINITY)),
        Err(OperationError::InvalidRecord(_))
    ));

    let names: Vec<_> = list_all(&conn).unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["A"]);
}

#[test]
fn other_constraint_failures_are_not_duplicates() {
    let conn = open_memory(&MigrationHistory::default()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER block_insert BEFORE INSERT ON products
         WHEN NEW.name = 'Blocked'
         BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
    )
    .unwrap();

    let err = insert_product(&conn, &card("Blocked", "X", 1.0)).unwrap_err();
    assert!(matches!(err, OperationError::Sqlite(_)), "got {err:?}");
}
