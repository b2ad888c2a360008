//! Order placement transaction tests
//!
//! Each test runs against a fresh embedded database in a temp directory.

use std::collections::BTreeMap;

use essence_server::PlacementError;
use essence_server::db::DbService;
use essence_server::db::models::{LineItemDraft, OrderDraft, Product, ProductDraft};
use essence_server::db::repository::{OrderRepository, ProductRepository};
use essence_server::orders::PlacementService;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn setup() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("shop.db").to_string_lossy())
        .await
        .unwrap();
    (tmp, service.client)
}

async fn seed_product(db: &Surreal<Db>, name: &str, stocks: &[(&str, i64)]) -> String {
    let draft = ProductDraft {
        name: Some(name.to_string()),
        category: Some("floral".to_string()),
        price: Some(50.0),
        price_per_10_ml: Some(10.0),
        size_stocks: Some(
            stocks
                .iter()
                .map(|(size, qty)| (size.to_string(), *qty))
                .collect::<BTreeMap<_, _>>(),
        ),
        ..Default::default()
    };
    let product = Product::from_draft(&draft).unwrap();
    let created = ProductRepository::new(db.clone())
        .create(product)
        .await
        .unwrap();
    created.id.unwrap().to_string()
}

fn line_item(product_id: &str, name: &str, quantity: i64, size: &str) -> LineItemDraft {
    LineItemDraft {
        id: Some(product_id.to_string()),
        name: Some(name.to_string()),
        quantity: Some(quantity),
        price: Some(50.0),
        size: Some(size.to_string()),
    }
}

fn order_draft(order_number: &str, items: Vec<LineItemDraft>) -> OrderDraft {
    let item_count: i64 = items.iter().filter_map(|i| i.quantity).sum();
    OrderDraft {
        order_number: Some(order_number.to_string()),
        customer_name: Some("Ada".to_string()),
        email: Some("ada@example.com".to_string()),
        shipping_address: Some("1 Main St".to_string()),
        date: Some("2026-08-23".to_string()),
        subtotal: Some(100.0),
        tax: Some(10.0),
        shipping: Some(5.0),
        item_count: Some(item_count),
        discount_amount: Some(0.0),
        total: Some(115.0),
        items: Some(items),
        ..Default::default()
    }
}

async fn fetch_product(db: &Surreal<Db>, id: &str) -> Product {
    ProductRepository::new(db.clone())
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn placement_decrements_stock_and_derives_in_stock() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let pid = seed_product(&db, "Noir", &[("30ml", 2), ("50ml", 0)]).await;

    let order = placement
        .place_order(&order_draft("X1", vec![line_item(&pid, "Noir", 2, "30ml")]))
        .await
        .unwrap();
    assert_eq!(order.order_number, "X1");
    assert!(order.id.is_some());

    let product = fetch_product(&db, &pid).await;
    assert_eq!(product.size_stocks.get("30ml"), Some(&0));
    assert_eq!(product.size_stocks.get("50ml"), Some(&0));
    assert!(!product.in_stock);

    // Everything is now sold out, the next request must fail
    let err = placement
        .place_order(&order_draft("X2", vec![line_item(&pid, "Noir", 1, "30ml")]))
        .await
        .unwrap_err();
    match err {
        PlacementError::InsufficientStock {
            available,
            requested,
            size,
            ..
        } => {
            assert_eq!(available, 0);
            assert_eq!(requested, 1);
            assert_eq!(size, "30ml");
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Failed placement left no order behind
    let orders = OrderRepository::new(db.clone());
    assert!(orders.find_by_order_number("X2").await.unwrap().is_none());
}

#[tokio::test]
async fn reservation_touches_only_the_requested_size() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let pid = seed_product(&db, "Noir", &[("30ml", 2), ("50ml", 3), ("100ml", 1)]).await;

    // The size key arrives as a parameter; the read must resolve it against
    // the live map and the decrement must hit that entry and nothing else
    placement
        .place_order(&order_draft("KEYED1", vec![line_item(&pid, "Noir", 1, "50ml")]))
        .await
        .unwrap();

    let product = fetch_product(&db, &pid).await;
    assert_eq!(product.size_stocks.get("30ml"), Some(&2));
    assert_eq!(product.size_stocks.get("50ml"), Some(&2));
    assert_eq!(product.size_stocks.get("100ml"), Some(&1));
    assert!(product.in_stock);
}

#[tokio::test]
async fn failure_on_later_item_rolls_back_earlier_reservations() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let first = seed_product(&db, "Noir", &[("30ml", 10)]).await;
    let second = seed_product(&db, "Blanc", &[("50ml", 1)]).await;

    let draft = order_draft(
        "ROLL1",
        vec![
            line_item(&first, "Noir", 3, "30ml"),
            line_item(&second, "Blanc", 2, "50ml"),
        ],
    );
    let err = placement.place_order(&draft).await.unwrap_err();
    assert!(matches!(err, PlacementError::InsufficientStock { .. }));

    // Item 1's reservation was undone along with the order insert
    let noir = fetch_product(&db, &first).await;
    assert_eq!(noir.size_stocks.get("30ml"), Some(&10));
    let blanc = fetch_product(&db, &second).await;
    assert_eq!(blanc.size_stocks.get("50ml"), Some(&1));

    let orders = OrderRepository::new(db.clone());
    assert!(orders.find_by_order_number("ROLL1").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_product_aborts_placement() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let real = seed_product(&db, "Noir", &[("30ml", 5)]).await;

    let draft = order_draft(
        "GHOST1",
        vec![
            line_item(&real, "Noir", 1, "30ml"),
            line_item("product:ghost", "Ghost", 1, "30ml"),
        ],
    );
    let err = placement.place_order(&draft).await.unwrap_err();
    match err {
        PlacementError::ProductNotFound(id) => assert_eq!(id, "ghost"),
        other => panic!("expected ProductNotFound, got {other:?}"),
    }

    let noir = fetch_product(&db, &real).await;
    assert_eq!(noir.size_stocks.get("30ml"), Some(&5));
}

#[tokio::test]
async fn missing_size_counts_as_zero_stock() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let pid = seed_product(&db, "Noir", &[("30ml", 5)]).await;

    let err = placement
        .place_order(&order_draft("SZ1", vec![line_item(&pid, "Noir", 1, "100ml")]))
        .await
        .unwrap_err();
    match err {
        PlacementError::InsufficientStock { available, .. } => assert_eq!(available, 0),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_order_number_rejected() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let pid = seed_product(&db, "Noir", &[("30ml", 10)]).await;

    placement
        .place_order(&order_draft("DUP0", vec![line_item(&pid, "Noir", 1, "30ml")]))
        .await
        .unwrap();

    let err = placement
        .place_order(&order_draft("DUP0", vec![line_item(&pid, "Noir", 1, "30ml")]))
        .await
        .unwrap_err();
    assert!(matches!(err, PlacementError::DuplicateOrderNumber));

    // Only the winner's reservation was applied
    let noir = fetch_product(&db, &pid).await;
    assert_eq!(noir.size_stocks.get("30ml"), Some(&9));
}

#[tokio::test]
async fn repeated_line_items_reserve_cumulatively() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());
    let pid = seed_product(&db, "Noir", &[("30ml", 3)]).await;

    // 2 + 2 exceeds the 3 on hand even though each item alone fits
    let err = placement
        .place_order(&order_draft(
            "CUM1",
            vec![
                line_item(&pid, "Noir", 2, "30ml"),
                line_item(&pid, "Noir", 2, "30ml"),
            ],
        ))
        .await
        .unwrap_err();
    match err {
        PlacementError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 1);
            assert_eq!(requested, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(fetch_product(&db, &pid).await.size_stocks.get("30ml"), Some(&3));

    // 2 + 1 fits exactly
    placement
        .place_order(&order_draft(
            "CUM2",
            vec![
                line_item(&pid, "Noir", 2, "30ml"),
                line_item(&pid, "Noir", 1, "30ml"),
            ],
        ))
        .await
        .unwrap();
    let noir = fetch_product(&db, &pid).await;
    assert_eq!(noir.size_stocks.get("30ml"), Some(&0));
    assert!(!noir.in_stock);
}

#[tokio::test]
async fn empty_items_fail_validation_without_writes() {
    let (_tmp, db) = setup().await;
    let placement = PlacementService::new(db.clone());

    let err = placement
        .place_order(&order_draft("EMPTY1", vec![]))
        .await
        .unwrap_err();
    match err {
        PlacementError::Validation(errors) => {
            assert!(errors.contains(&"Order must contain at least one item.".to_string()));
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    let orders = OrderRepository::new(db.clone());
    assert!(orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_placements_never_oversell() {
    let (_tmp, db) = setup().await;
    let pid = seed_product(&db, "Noir", &[("30ml", 2)]).await;

    let mut handles = Vec::new();
    for n in 0..4 {
        let placement = PlacementService::new(db.clone());
        let pid = pid.clone();
        handles.push(tokio::spawn(async move {
            placement
                .place_order(&order_draft(
                    &format!("RACE{n}"),
                    vec![line_item(&pid, "Noir", 1, "30ml")],
                ))
                .await
        }));
    }

    let mut successes = 0;
    let mut insufficient = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(PlacementError::InsufficientStock { .. }) => insufficient += 1,
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }
    assert_eq!(successes, 2);
    assert_eq!(insufficient, 2);

    let noir = fetch_product(&db, &pid).await;
    assert_eq!(noir.size_stocks.get("30ml"), Some(&0));
    assert!(!noir.in_stock);

    let orders = OrderRepository::new(db.clone()).find_all().await.unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn concurrent_duplicate_order_numbers_admit_exactly_one() {
    let (_tmp, db) = setup().await;
    let first = seed_product(&db, "Noir", &[("30ml", 10)]).await;
    let second = seed_product(&db, "Blanc", &[("30ml", 10)]).await;

    let mut handles = Vec::new();
    for pid in [first.clone(), second.clone()] {
        let placement = PlacementService::new(db.clone());
        handles.push(tokio::spawn(async move {
            placement
                .place_order(&order_draft("DUP1", vec![line_item(&pid, "Any", 1, "30ml")]))
                .await
        }));
    }

    let mut successes = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(PlacementError::DuplicateOrderNumber) => duplicates += 1,
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);

    let orders = OrderRepository::new(db.clone()).find_all().await.unwrap();
    assert_eq!(orders.len(), 1);
}
