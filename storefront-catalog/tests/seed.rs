use std::collections::HashSet;
use std::fs;

use storefront_catalog::*;
use tempfile::TempDir;

#[test]
fn default_products_have_unique_names() {
    let products = default_products();
    assert_eq!(products.len(), 25);
    let names: HashSet<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.len(), products.len());
}

#[test]
fn load_products_from_yaml() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("seed.yaml");
    fs::write(
        &path,
        r#"
- name: "MSI GeForce 210"
  price: 3399
  vendor: MSI
  memory: 1
  color: black
  stock: 87
  image: assets/images/products/210msi.png
  date: "2018-02-27"
  fans: "1"
- name: "Legacy card"
  price: 100
  vendor: Noname
  memory: default
  color: green
  stock: 0
  image: assets/images/placeholder.png
  date: "2010-01-01"
  fans: passive
"#,
    )
    .unwrap();

    let products = load_seed_file(&path).unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].memory, Memory::Gigabytes(1));
    assert_eq!(products[0].price, 3399.0);
    assert_eq!(products[1].memory, Memory::Label("default".to_string()));
}

#[test]
fn missing_seed_file_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nope.yaml");
    let err = load_seed_file(&path).unwrap_err();
    assert!(matches!(err, SeedError::Io { .. }));
    assert!(err.to_string().contains("nope.yaml"));
}

#[test]
fn malformed_seed_file_is_a_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.yaml");
    fs::write(&path, "- name: [unclosed").unwrap();
    assert!(matches!(load_seed_file(&path), Err(SeedError::Parse { .. })));
}
