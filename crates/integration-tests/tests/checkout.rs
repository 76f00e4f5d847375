//! Checkout tests: addresses, order placement, and order history.

#![allow(clippy::unwrap_used)]

use basil_client::{AddToCart, ApiError, NewAddress, PaymentMethod, StoreClient};
use basil_core::{Credentials, OrderStatus, PaymentStatus};
use basil_integration_tests::TestStore;

fn market_street() -> NewAddress {
    NewAddress {
        line1: "1 Market St".to_owned(),
        city: "Springfield".to_owned(),
        state: "OR".to_owned(),
        postal_code: "97477".to_owned(),
        phone: "555-0100".to_owned(),
    }
}

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
async fn create_address_and_list_it_back() {
    let store = TestStore::start().await;
    let client = logged_in_client(&store, "shopper42").await;

    let created = client.checkout().create_address(&market_street()).await.unwrap();
    assert_eq!(created.line1, "1 Market St");
    assert_eq!(created.postal_code, "97477");

    let addresses = client.checkout().list_addresses().await.unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses.first().unwrap().id, created.id);
}

#[tokio::test]
async fn list_addresses_requires_login() {
    let store = TestStore::start().await;
    let client = store.client();

    let err = client.checkout().list_addresses().await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));
}

#[tokio::test]
async fn placing_an_order_consumes_the_cart() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    let AddToCart::Added(_) = client.cart().add_item(basil, 3).await.unwrap() else {
        panic!("expected item to be added");
    };
    let address = client.checkout().create_address(&market_street()).await.unwrap();

    let placed = client
        .checkout()
        .place_order(address.id, PaymentMethod::Cod)
        .await
        .unwrap();
    assert!(!placed.message.is_empty());

    // The server-held cart is gone; a re-fetch confirms it
    assert!(client.cart().fetch_cart().await.is_empty());

    let orders = client.checkout().list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = orders.first().unwrap();
    assert_eq!(order.id, placed.order_id);
    assert_eq!(order.total_amount.to_string(), "7.47");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items.first().unwrap().product_name, "Basil bunch");
}

#[tokio::test]
async fn paypal_orders_are_recorded_as_paid() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let client = logged_in_client(&store, "shopper42").await;

    client.cart().add_item(basil, 1).await.unwrap();
    let address = client.checkout().create_address(&market_street()).await.unwrap();

    client
        .checkout()
        .place_order(address.id, PaymentMethod::Paypal)
        .await
        .unwrap();

    let orders = client.checkout().list_orders().await.unwrap();
    assert_eq!(
        orders.first().unwrap().payment_status,
        PaymentStatus::Paid
    );
}

#[tokio::test]
async fn placing_with_empty_cart_surfaces_server_message() {
    let store = TestStore::start().await;
    let client = logged_in_client(&store, "shopper42").await;

    let address = client.checkout().create_address(&market_street()).await.unwrap();
    let err = client
        .checkout()
        .place_order(address.id, PaymentMethod::Cod)
        .await
        .unwrap_err();

    match err {
        ApiError::Rejected(message) => assert_eq!(message, "Cart empty"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn order_history_is_newest_first() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let salt = store.seed_product("Sea salt", "0.99", 40);
    let client = logged_in_client(&store, "shopper42").await;

    let address = client.checkout().create_address(&market_street()).await.unwrap();

    client.cart().add_item(basil, 1).await.unwrap();
    let first = client
        .checkout()
        .place_order(address.id, PaymentMethod::Cod)
        .await
        .unwrap();

    client.cart().add_item(salt, 1).await.unwrap();
    let second = client
        .checkout()
        .place_order(address.id, PaymentMethod::Cod)
        .await
        .unwrap();

    let orders = client.checkout().list_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders.first().unwrap().id, second.order_id);
    assert_eq!(orders.last().unwrap().id, first.order_id);
}
