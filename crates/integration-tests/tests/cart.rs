//! Cart synchronization tests: every mutation answers with the
//! re-fetched authoritative cart.

#![allow(clippy::unwrap_used)]

use basil_client::{AddToCart, StoreClient, cart_subtotal};
use basil_core::Credentials;
use basil_integration_tests::TestStore;

async fn logged_in_client(store: &TestStore, username: &str) -> StoreClient {
    store.seed_user(username, "hunter2!!");
    let client = store.client();
    client
        .session()
        .login(&Credentials::new(username, "hunter2!!").unwrap())
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn add_item_returns_refetched_cart() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    let outcome = client.cart().add_item(basil, 3).await.unwrap();

    let AddToCart::Added(items) = outcome else {
        panic!("expected item to be added");
    };
    assert_eq!(items.len(), 1);
    let line = items.first().unwrap();
    assert_eq!(line.product.id, basil);
    assert_eq!(line.quantity, 3);
    assert_eq!(line.line_total().to_string(), "7.47");
    assert_eq!(cart_subtotal(&items).to_string(), "7.47");
}

#[tokio::test]
async fn adding_same_product_twice_increments_one_line() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    client.cart().add_item(basil, 1).await.unwrap();
    let outcome = client.cart().add_item(basil, 2).await.unwrap();

    let AddToCart::Added(items) = outcome else {
        panic!("expected item to be added");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().quantity, 3);
}

#[tokio::test]
async fn add_item_without_login_prompts_for_login() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);

    let client = store.client();
    let outcome = client.cart().add_item(basil, 1).await.unwrap();

    assert!(matches!(outcome, AddToCart::LoginRequired));
    // Nothing was written server-side
    assert_eq!(store.cart_lines_for("shopper42"), 0);
}

#[tokio::test]
async fn update_quantity_replaces_line_quantity() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    let AddToCart::Added(items) = client.cart().add_item(basil, 1).await.unwrap() else {
        panic!("expected item to be added");
    };
    let line = items.first().unwrap().id;

    let items = client.cart().update_quantity(line, 5).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().quantity, 5);
}

#[tokio::test]
async fn update_quantity_to_zero_removes_the_line() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    let AddToCart::Added(items) = client.cart().add_item(basil, 1).await.unwrap() else {
        panic!("expected item to be added");
    };
    let line = items.first().unwrap().id;

    let items = client.cart().update_quantity(line, 0).await.unwrap();

    assert!(items.is_empty());
    assert_eq!(store.cart_lines_for("shopper42"), 0);
}

#[tokio::test]
async fn remove_item_is_idempotent() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    let AddToCart::Added(items) = client.cart().add_item(basil, 1).await.unwrap() else {
        panic!("expected item to be added");
    };
    let line = items.first().unwrap().id;

    assert!(client.cart().remove_item(line).await.unwrap().is_empty());
    // Removing an already-removed line still counts as success
    assert!(client.cart().remove_item(line).await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_cart_degrades_to_empty_when_server_unreachable() {
    let client = TestStore::unreachable_client();
    assert!(client.cart().fetch_cart().await.is_empty());
}

#[tokio::test]
async fn fetch_cart_degrades_to_empty_without_login() {
    let store = TestStore::start().await;
    let client = store.client();
    assert!(client.cart().fetch_cart().await.is_empty());
}

#[tokio::test]
async fn carts_are_per_user() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);

    let first = logged_in_client(&store, "shopper42").await;
    first.cart().add_item(basil, 2).await.unwrap();

    let second = logged_in_client(&store, "shopper43").await;
    assert!(second.cart().fetch_cart().await.is_empty());
}
