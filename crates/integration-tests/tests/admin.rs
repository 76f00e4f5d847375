//! Back-office tests: product CRUD with cache invalidation, order and
//! customer management, and the sales report.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use basil_client::{ApiError, AuthError, OrderUpdate, PaymentMethod, ProductInput, StoreClient};
use basil_core::{Credentials, OrderStatus, PaymentStatus, Price};
use basil_integration_tests::TestStore;

async fn admin_client(store: &TestStore) -> StoreClient {
    store.seed_admin("grocer", "keeper-of-keys");
    let client = store.client();
    client
        .session()
        .login(&Credentials::new("grocer", "keeper-of-keys").unwrap())
        .await
        .unwrap();
    client
}

async fn customer_client(store: &TestStore, username: &str) -> StoreClient {
    store.seed_user(username, "hunter2!!");
    let client = store.client();
    client
        .session()
        .login(&Credentials::new(username, "hunter2!!").unwrap())
        .await
        .unwrap();
    client
}

fn basil_input() -> ProductInput {
    ProductInput {
        name: "Basil bunch".to_owned(),
        price: Price::new(Decimal::new(249, 2)),
        stock: 100,
        description: "Fresh basil".to_owned(),
        category: None,
        image_url: None,
    }
}

#[tokio::test]
async fn admin_endpoints_are_gated() {
    let store = TestStore::start().await;
    let client = customer_client(&store, "shopper42").await;

    let err = client.admin().list_orders().await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));

    let err = client.admin().create_product(&basil_input()).await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));
}

#[tokio::test]
async fn created_product_reaches_the_catalog_listing() {
    let store = TestStore::start().await;
    let client = admin_client(&store).await;

    // Warm the catalog cache before the mutation
    assert!(client.catalog().list_products().await.is_empty());

    let created = client.admin().create_product(&basil_input()).await.unwrap();
    assert_eq!(created.name, "Basil bunch");
    assert_eq!(created.price.to_string(), "2.49");

    // The mutation invalidated the cached listing
    let products = client.catalog().list_products().await;
    assert_eq!(products.len(), 1);
    assert_eq!(products.first().unwrap().id, created.id);
}

#[tokio::test]
async fn updated_product_replaces_the_cached_detail() {
    let store = TestStore::start().await;
    let client = admin_client(&store).await;

    let created = client.admin().create_product(&basil_input()).await.unwrap();
    // Warm the per-product cache
    assert_eq!(
        client.catalog().get_product(created.id).await.unwrap().price.to_string(),
        "2.49"
    );

    let mut input = basil_input();
    input.price = Price::new(Decimal::new(299, 2));
    client.admin().update_product(created.id, &input).await.unwrap();

    let fetched = client.catalog().get_product(created.id).await.unwrap();
    assert_eq!(fetched.price.to_string(), "2.99");
}

#[tokio::test]
async fn deleted_product_vanishes_from_the_catalog() {
    let store = TestStore::start().await;
    let client = admin_client(&store).await;

    let created = client.admin().create_product(&basil_input()).await.unwrap();
    client.catalog().get_product(created.id).await.unwrap();

    client.admin().delete_product(created.id).await.unwrap();

    let err = client.catalog().get_product(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn deleting_unknown_product_is_not_found() {
    let store = TestStore::start().await;
    let client = admin_client(&store).await;

    let err = client
        .admin()
        .delete_product(basil_core::ProductId::new(9999))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn admin_sees_and_updates_customer_orders() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);

    let shopper = customer_client(&store, "shopper42").await;
    shopper.cart().add_item(basil, 2).await.unwrap();
    let address = shopper
        .checkout()
        .create_address(&basil_client::NewAddress {
            line1: "1 Market St".to_owned(),
            city: "Springfield".to_owned(),
            state: "OR".to_owned(),
            postal_code: "97477".to_owned(),
            phone: "555-0100".to_owned(),
        })
        .await
        .unwrap();
    let placed = shopper
        .checkout()
        .place_order(address.id, PaymentMethod::Cod)
        .await
        .unwrap();

    let admin = admin_client(&store).await;
    let orders = admin.admin().list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = orders.first().unwrap();
    assert_eq!(order.id, placed.order_id);
    assert_eq!(order.user.username, "shopper42");

    admin
        .admin()
        .update_order(
            placed.order_id,
            &OrderUpdate {
                status: OrderStatus::Shipped,
                payment_status: PaymentStatus::Paid,
            },
        )
        .await
        .unwrap();

    let orders = admin.admin().list_orders().await.unwrap();
    let order = orders.first().unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    // The customer sees the new status in their own history too
    let history = shopper.checkout().list_orders().await.unwrap();
    assert_eq!(history.first().unwrap().status, OrderStatus::Shipped);
}

#[tokio::test]
async fn deactivated_customer_cannot_log_in() {
    let store = TestStore::start().await;
    store.seed_user("shopper42", "hunter2!!");

    let admin = admin_client(&store).await;
    let customers = admin.admin().list_customers().await.unwrap();
    let shopper = customers
        .iter()
        .find(|c| c.username == "shopper42")
        .unwrap();
    assert!(shopper.is_active);
    assert!(!shopper.is_staff);

    let active = admin
        .admin()
        .set_customer_active(shopper.id, false)
        .await
        .unwrap();
    assert!(!active);

    let client = store.client();
    let err = client
        .session()
        .login(&Credentials::new("shopper42", "hunter2!!").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn sales_report_aggregates_sold_items() {
    let store = TestStore::start().await;
    let basil = store.seed_product("Basil bunch", "2.49", 100);
    let salt = store.seed_product("Sea salt", "0.99", 40);

    let shopper = customer_client(&store, "shopper42").await;
    let address = shopper
        .checkout()
        .create_address(&basil_client::NewAddress {
            line1: "1 Market St".to_owned(),
            city: "Springfield".to_owned(),
            state: "OR".to_owned(),
            postal_code: "97477".to_owned(),
            phone: "555-0100".to_owned(),
        })
        .await
        .unwrap();

    shopper.cart().add_item(basil, 3).await.unwrap();
    shopper.cart().add_item(salt, 1).await.unwrap();
    shopper
        .checkout()
        .place_order(address.id, PaymentMethod::Cod)
        .await
        .unwrap();

    let admin = admin_client(&store).await;
    let report = admin.admin().sales_report().await.unwrap();

    assert_eq!(report.len(), 2);
    // Ordered by units sold, most first
    let top = report.first().unwrap();
    assert_eq!(top.product_id, basil);
    assert_eq!(top.total_quantity, 3);
    assert_eq!(top.total_revenue.to_string(), "7.47");
    assert_eq!(report.last().unwrap().product_id, salt);
}
