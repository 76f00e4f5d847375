//! Integration test support for the Basil storefront client.
//!
//! [`TestStore`] runs an in-process stub of the storefront API on a
//! loopback port: session-cookie auth with CSRF double-submit, catalog,
//! per-user carts, addresses, orders, and the admin surface, all backed
//! by in-memory state. Tests point a real [`basil_client::StoreClient`]
//! at it and drive the full HTTP path, cookies included.
//!
//! ```rust,ignore
//! let store = TestStore::start().await;
//! store.seed_user("shopper42", "hunter2!!");
//!
//! let client = store.client();
//! client.session().login(&Credentials::new("shopper42", "hunter2!!")?).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

use basil_client::{StoreClient, StoreConfig};
use basil_core::{CustomerId, ProductId};

const SESSION_COOKIE: &str = "sessionid";
const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

// =============================================================================
// In-memory records
// =============================================================================

#[derive(Debug, Clone)]
struct UserRecord {
    id: i32,
    username: String,
    password: String,
    is_admin: bool,
    is_active: bool,
}

#[derive(Debug, Clone)]
struct ProductRecord {
    id: i32,
    name: String,
    price: Decimal,
    stock: i64,
    description: String,
    category: Option<i32>,
    image_url: Option<String>,
}

#[derive(Debug, Clone)]
struct CategoryRecord {
    id: i32,
    name: String,
}

#[derive(Debug, Clone)]
struct CartLine {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i64,
}

#[derive(Debug, Clone)]
struct AddressRecord {
    id: i32,
    user_id: i32,
    line1: String,
    city: String,
    state: String,
    postal_code: String,
    phone: String,
}

#[derive(Debug, Clone)]
struct OrderLine {
    id: i32,
    product_id: Option<i32>,
    product_name: String,
    unit_price: Decimal,
    quantity: i64,
}

#[derive(Debug, Clone)]
struct OrderRecord {
    id: i32,
    user_id: i32,
    address_id: i32,
    items: Vec<OrderLine>,
    total: Decimal,
    status: String,
    payment_status: String,
}

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<UserRecord>,
    /// Session token -> user id.
    sessions: HashMap<String, i32>,
    products: Vec<ProductRecord>,
    categories: Vec<CategoryRecord>,
    cart: Vec<CartLine>,
    addresses: Vec<AddressRecord>,
    orders: Vec<OrderRecord>,
    next_id: i32,
}

impl StoreState {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<StoreState>>;

// =============================================================================
// Harness
// =============================================================================

/// An in-process stub storefront bound to a loopback port.
///
/// State is shared with the spawned server task, so seed helpers and
/// assertions on server-side state work while requests are flowing.
pub struct TestStore {
    state: Shared,
    addr: SocketAddr,
}

impl TestStore {
    /// Start the stub server on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the loopback listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(StoreState::default()));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self { state, addr }
    }

    /// Base URL the stub is reachable at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// A real client pointed at this stub.
    ///
    /// Each call builds a fresh client with its own cookie jar, so two
    /// clients model two independent browsers.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> StoreClient {
        let config = StoreConfig::for_base_url(&self.base_url()).expect("stub base url");
        StoreClient::new(&config).expect("client for stub")
    }

    /// A client pointed at a port nothing listens on.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn unreachable_client() -> StoreClient {
        let config = StoreConfig::for_base_url("http://127.0.0.1:9/").expect("discard base url");
        StoreClient::new(&config).expect("client for closed port")
    }

    /// Seed a customer account.
    pub fn seed_user(&self, username: &str, password: &str) -> CustomerId {
        self.seed_account(username, password, false)
    }

    /// Seed an administrator account.
    pub fn seed_admin(&self, username: &str, password: &str) -> CustomerId {
        self.seed_account(username, password, true)
    }

    fn seed_account(&self, username: &str, password: &str, is_admin: bool) -> CustomerId {
        let mut store = self.lock();
        let id = store.allocate_id();
        store.users.push(UserRecord {
            id,
            username: username.to_owned(),
            password: password.to_owned(),
            is_admin,
            is_active: true,
        });
        CustomerId::new(id)
    }

    /// Seed a product.
    ///
    /// # Panics
    ///
    /// Panics if `price` is not a valid decimal.
    pub fn seed_product(&self, name: &str, price: &str, stock: i64) -> ProductId {
        let mut store = self.lock();
        let id = store.allocate_id();
        store.products.push(ProductRecord {
            id,
            name: name.to_owned(),
            price: Decimal::from_str(price).expect("seed price"),
            stock,
            description: String::new(),
            category: None,
            image_url: None,
        });
        ProductId::new(id)
    }

    /// Seed a category.
    pub fn seed_category(&self, name: &str) -> i32 {
        let mut store = self.lock();
        let id = store.allocate_id();
        store.categories.push(CategoryRecord {
            id,
            name: name.to_owned(),
        });
        id
    }

    /// Number of cart lines the server holds for a user.
    #[must_use]
    pub fn cart_lines_for(&self, username: &str) -> usize {
        let store = self.lock();
        let Some(user) = store.users.iter().find(|u| u.username == username) else {
            return 0;
        };
        store.cart.iter().filter(|l| l.user_id == user.id).count()
    }

    /// Number of live server-side sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Number of orders the server holds.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("stub state mutex poisoned")
    }
}

// =============================================================================
// Router and shared handler plumbing
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/check-auth/", get(check_auth))
        .route("/login/", post(login))
        .route("/signup/", post(signup))
        .route("/logout/", post(logout))
        .route("/products/", get(list_products))
        .route("/products/{id}/", get(get_product))
        .route("/categories/", get(list_categories))
        .route("/cart/", get(get_cart).post(add_cart_item))
        .route("/cart/{id}/", patch(update_cart_item).delete(remove_cart_item))
        .route("/addresses/", get(list_addresses).post(create_address))
        .route("/orders/", get(list_orders))
        .route("/orders/place/", post(place_order))
        .route("/admin/products/", post(admin_create_product))
        .route(
            "/admin/products/{id}/",
            put(admin_update_product).delete(admin_delete_product),
        )
        .route("/admin/orders/", get(admin_list_orders))
        .route("/admin/orders/{id}/", put(admin_update_order))
        .route("/admin/customers/", get(admin_list_customers))
        .route("/admin/customers/{id}/", put(admin_update_customer))
        .route("/admin/reports/sales/", get(admin_sales_report))
        .with_state(state)
}

fn respond(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn set_cookie(mut response: Response, name: &str, value: &str) -> Response {
    let cookie = format!("{name}={value}; Path=/");
    response.headers_mut().append(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).expect("cookie header"),
    );
    response
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

/// Double-submit CSRF check, applied to every state-changing endpoint
/// except login and signup.
fn check_csrf(headers: &HeaderMap) -> Result<(), Response> {
    let Some(cookie) = cookie_value(headers, CSRF_COOKIE) else {
        return Err(respond(
            StatusCode::FORBIDDEN,
            json!({"detail": "CSRF cookie not set."}),
        ));
    };

    let header_token = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
    if header_token == Some(cookie.as_str()) {
        Ok(())
    } else {
        Err(respond(
            StatusCode::FORBIDDEN,
            json!({"detail": "CSRF token missing or incorrect."}),
        ))
    }
}

fn authed_user(store: &StoreState, headers: &HeaderMap) -> Option<UserRecord> {
    let token = cookie_value(headers, SESSION_COOKIE)?;
    let user_id = *store.sessions.get(&token)?;
    store.users.iter().find(|u| u.id == user_id).cloned()
}

fn require_user(store: &StoreState, headers: &HeaderMap) -> Result<UserRecord, Response> {
    authed_user(store, headers).ok_or_else(|| {
        respond(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Authentication credentials were not provided."}),
        )
    })
}

fn require_admin(store: &StoreState, headers: &HeaderMap) -> Result<UserRecord, Response> {
    let user = require_user(store, headers)?;
    if user.is_admin {
        Ok(user)
    } else {
        Err(respond(
            StatusCode::FORBIDDEN,
            json!({"detail": "You do not have permission to perform this action."}),
        ))
    }
}

fn not_found() -> Response {
    respond(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
}

fn price_string(amount: &Decimal) -> String {
    format!("{amount:.2}")
}

fn product_json(store: &StoreState, product: &ProductRecord) -> Value {
    let category_name = product.category.and_then(|id| {
        store
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    });
    json!({
        "id": product.id,
        "name": product.name,
        "price": price_string(&product.price),
        "stock": product.stock,
        "description": product.description,
        "category": product.category,
        "category_name": category_name,
        "image_url": product.image_url,
    })
}

fn cart_line_json(store: &StoreState, line: &CartLine) -> Option<Value> {
    let product = store.products.iter().find(|p| p.id == line.product_id)?;
    Some(json!({
        "id": line.id,
        "product": product_json(store, product),
        "quantity": line.quantity,
    }))
}

fn address_json(address: &AddressRecord) -> Value {
    json!({
        "id": address.id,
        "line1": address.line1,
        "city": address.city,
        "state": address.state,
        "postal_code": address.postal_code,
        "phone": address.phone,
    })
}

fn order_json(store: &StoreState, order: &OrderRecord) -> Value {
    let user = store
        .users
        .iter()
        .find(|u| u.id == order.user_id)
        .map_or_else(
            || json!({"id": order.user_id, "username": "deleted"}),
            |u| json!({"id": u.id, "username": u.username}),
        );
    let address = store
        .addresses
        .iter()
        .find(|a| a.id == order.address_id)
        .map_or(Value::Null, address_json);
    let items: Vec<Value> = order
        .items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "product": item.product_id,
                "product_name": item.product_name,
                "unit_price": price_string(&item.unit_price),
                "quantity": item.quantity,
                "subtotal": price_string(&(item.unit_price * Decimal::from(item.quantity))),
            })
        })
        .collect();

    json!({
        "id": order.id,
        "user": user,
        "address": address,
        "items": items,
        "total_amount": price_string(&order.total),
        "status": order.status,
        "payment_status": order.payment_status,
    })
}

fn str_field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

// =============================================================================
// Auth endpoints
// =============================================================================

async fn check_auth(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    let body = authed_user(&store, &headers).map_or_else(
        || json!({"authenticated": false}),
        |user| {
            json!({
                "authenticated": true,
                "username": user.username,
                "is_admin": user.is_admin,
            })
        },
    );
    drop(store);

    let response = respond(StatusCode::OK, body);
    if cookie_value(&headers, CSRF_COOKIE).is_none() {
        set_cookie(response, CSRF_COOKIE, &Uuid::new_v4().to_string())
    } else {
        response
    }
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let username = str_field(&body, "username");
    let password = str_field(&body, "password");

    let mut store = state.lock().expect("stub state mutex poisoned");
    let matched = store
        .users
        .iter()
        .find(|u| u.username == username && u.password == password && u.is_active)
        .cloned();

    let Some(user) = matched else {
        return respond(
            StatusCode::UNAUTHORIZED,
            json!({"error": "Invalid credentials"}),
        );
    };

    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user.id);
    drop(store);

    let mut response = respond(StatusCode::OK, json!({"message": "Login successful"}));
    response = set_cookie(response, SESSION_COOKIE, &token);
    if cookie_value(&headers, CSRF_COOKIE).is_none() {
        response = set_cookie(response, CSRF_COOKIE, &Uuid::new_v4().to_string());
    }
    response
}

async fn signup(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let username = str_field(&body, "username");
    let password = str_field(&body, "password");
    let confirm = str_field(&body, "confirmPassword");

    if password != confirm {
        return respond(
            StatusCode::BAD_REQUEST,
            json!({"error": "Passwords do not match"}),
        );
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if store.users.iter().any(|u| u.username == username) {
        return respond(
            StatusCode::BAD_REQUEST,
            json!({"error": "Username already exists"}),
        );
    }

    let id = store.allocate_id();
    store.users.push(UserRecord {
        id,
        username,
        password,
        is_admin: false,
        is_active: true,
    });

    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), id);
    drop(store);

    let mut response = respond(StatusCode::CREATED, json!({"message": "Account created"}));
    response = set_cookie(response, SESSION_COOKIE, &token);
    if cookie_value(&headers, CSRF_COOKIE).is_none() {
        response = set_cookie(response, CSRF_COOKIE, &Uuid::new_v4().to_string());
    }
    response
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        store.sessions.remove(&token);
    }

    respond(StatusCode::OK, json!({"message": "Logged out"}))
}

// =============================================================================
// Catalog endpoints
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    let products: Vec<Value> = store
        .products
        .iter()
        .map(|p| product_json(&store, p))
        .collect();
    respond(StatusCode::OK, Value::Array(products))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    store.products.iter().find(|p| p.id == id).map_or_else(
        not_found,
        |product| respond(StatusCode::OK, product_json(&store, product)),
    )
}

async fn list_categories(State(state): State<Shared>) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    let categories: Vec<Value> = store
        .categories
        .iter()
        .map(|c| json!({"id": c.id, "name": c.name}))
        .collect();
    respond(StatusCode::OK, Value::Array(categories))
}

// =============================================================================
// Cart endpoints
// =============================================================================

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let lines: Vec<Value> = store
        .cart
        .iter()
        .filter(|l| l.user_id == user.id)
        .filter_map(|l| cart_line_json(&store, l))
        .collect();
    respond(StatusCode::OK, Value::Array(lines))
}

async fn add_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let product_id = body.get("product_id").and_then(Value::as_i64).unwrap_or(0);
    let quantity = body.get("quantity").and_then(Value::as_i64).unwrap_or(1);
    #[allow(clippy::cast_possible_truncation)]
    let product_id = product_id as i32;

    if !store.products.iter().any(|p| p.id == product_id) {
        return not_found();
    }

    let existing = store
        .cart
        .iter()
        .position(|l| l.user_id == user.id && l.product_id == product_id);

    let line_id = match existing {
        Some(index) => {
            let line = store.cart.get_mut(index).expect("cart index in range");
            line.quantity += quantity;
            line.id
        }
        None => {
            let id = store.allocate_id();
            store.cart.push(CartLine {
                id,
                user_id: user.id,
                product_id,
                quantity,
            });
            id
        }
    };

    let line = store
        .cart
        .iter()
        .find(|l| l.id == line_id)
        .cloned()
        .expect("cart line just inserted");
    let body = cart_line_json(&store, &line).expect("cart line product exists");
    respond(StatusCode::CREATED, body)
}

async fn update_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let quantity = body.get("quantity").and_then(Value::as_i64).unwrap_or(1);
    let Some(line) = store
        .cart
        .iter_mut()
        .find(|l| l.id == id && l.user_id == user.id)
    else {
        return not_found();
    };

    line.quantity = quantity;
    let line = line.clone();
    let body = cart_line_json(&store, &line).expect("cart line product exists");
    respond(StatusCode::OK, body)
}

async fn remove_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let before = store.cart.len();
    store.cart.retain(|l| !(l.id == id && l.user_id == user.id));
    if store.cart.len() == before {
        return not_found();
    }

    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Checkout endpoints
// =============================================================================

async fn list_addresses(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let addresses: Vec<Value> = store
        .addresses
        .iter()
        .filter(|a| a.user_id == user.id)
        .map(address_json)
        .collect();
    respond(StatusCode::OK, Value::Array(addresses))
}

async fn create_address(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let id = store.allocate_id();
    let address = AddressRecord {
        id,
        user_id: user.id,
        line1: str_field(&body, "line1"),
        city: str_field(&body, "city"),
        state: str_field(&body, "state"),
        postal_code: str_field(&body, "postal_code"),
        phone: str_field(&body, "phone"),
    };
    let json = address_json(&address);
    store.addresses.push(address);
    respond(StatusCode::CREATED, json)
}

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let address_id = body.get("address_id").and_then(Value::as_i64).unwrap_or(0);
    #[allow(clippy::cast_possible_truncation)]
    let address_id = address_id as i32;
    let payment = str_field(&body, "payment");

    if !store
        .addresses
        .iter()
        .any(|a| a.id == address_id && a.user_id == user.id)
    {
        return not_found();
    }

    let lines: Vec<CartLine> = store
        .cart
        .iter()
        .filter(|l| l.user_id == user.id)
        .cloned()
        .collect();
    if lines.is_empty() {
        return respond(StatusCode::BAD_REQUEST, json!({"error": "Cart empty"}));
    }

    let mut items = Vec::new();
    let mut total = Decimal::ZERO;
    for line in &lines {
        let Some(product) = store.products.iter().find(|p| p.id == line.product_id) else {
            continue;
        };
        total += product.price * Decimal::from(line.quantity);
        items.push(OrderLine {
            id: 0,
            product_id: Some(product.id),
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity: line.quantity,
        });
    }
    for item in &mut items {
        item.id = store.allocate_id();
    }

    let order_id = store.allocate_id();
    let payment_status = if payment == "paypal" { "paid" } else { "unpaid" };
    store.orders.push(OrderRecord {
        id: order_id,
        user_id: user.id,
        address_id,
        items,
        total,
        status: "pending".to_owned(),
        payment_status: payment_status.to_owned(),
    });
    store.cart.retain(|l| l.user_id != user.id);

    respond(
        StatusCode::CREATED,
        json!({"message": "Order placed successfully", "order_id": order_id}),
    )
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    let user = match require_user(&store, &headers) {
        Ok(user) => user,
        Err(denied) => return denied,
    };

    let orders: Vec<Value> = store
        .orders
        .iter()
        .filter(|o| o.user_id == user.id)
        .rev()
        .map(|o| order_json(&store, o))
        .collect();
    respond(StatusCode::OK, Value::Array(orders))
}

// =============================================================================
// Admin endpoints
// =============================================================================

fn product_from_input(body: &Value, id: i32) -> ProductRecord {
    #[allow(clippy::cast_possible_truncation)]
    let category = body
        .get("category")
        .and_then(Value::as_i64)
        .map(|c| c as i32);
    ProductRecord {
        id,
        name: str_field(body, "name"),
        price: body
            .get("price")
            .and_then(Value::as_str)
            .and_then(|s| Decimal::from_str(s).ok())
            .unwrap_or_default(),
        stock: body.get("stock").and_then(Value::as_i64).unwrap_or(0),
        description: str_field(body, "description"),
        category,
        image_url: body
            .get("image_url")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
    }
}

async fn admin_create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let id = store.allocate_id();
    let product = product_from_input(&body, id);
    let json = product_json(&store, &product);
    store.products.push(product);
    respond(StatusCode::CREATED, json)
}

async fn admin_update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let Some(index) = store.products.iter().position(|p| p.id == id) else {
        return not_found();
    };

    let product = product_from_input(&body, id);
    let json = product_json(&store, &product);
    if let Some(slot) = store.products.get_mut(index) {
        *slot = product;
    }
    respond(StatusCode::OK, json)
}

async fn admin_delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let before = store.products.len();
    store.products.retain(|p| p.id != id);
    if store.products.len() == before {
        return not_found();
    }

    StatusCode::NO_CONTENT.into_response()
}

async fn admin_list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let orders: Vec<Value> = store
        .orders
        .iter()
        .rev()
        .map(|o| order_json(&store, o))
        .collect();
    respond(StatusCode::OK, Value::Array(orders))
}

async fn admin_update_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let status = str_field(&body, "status");
    let payment_status = str_field(&body, "payment_status");
    let Some(order) = store.orders.iter_mut().find(|o| o.id == id) else {
        return not_found();
    };

    order.status = status;
    order.payment_status = payment_status;
    respond(StatusCode::OK, json!({"success": true}))
}

async fn admin_list_customers(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let customers: Vec<Value> = store
        .users
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "username": u.username,
                "is_active": u.is_active,
                "is_staff": u.is_admin,
            })
        })
        .collect();
    respond(StatusCode::OK, Value::Array(customers))
}

async fn admin_update_customer(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = check_csrf(&headers) {
        return denied;
    }

    let mut store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    let is_active = body.get("is_active").and_then(Value::as_bool).unwrap_or(true);
    let Some(user) = store.users.iter_mut().find(|u| u.id == id) else {
        return not_found();
    };

    user.is_active = is_active;
    respond(
        StatusCode::OK,
        json!({"id": user.id, "is_active": user.is_active}),
    )
}

async fn admin_sales_report(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let store = state.lock().expect("stub state mutex poisoned");
    if let Err(denied) = require_admin(&store, &headers) {
        return denied;
    }

    // Group sold items by product, ordered by units sold.
    let mut by_product: HashMap<i32, (String, i64, Decimal)> = HashMap::new();
    for order in &store.orders {
        for item in &order.items {
            let Some(product_id) = item.product_id else {
                continue;
            };
            let entry = by_product
                .entry(product_id)
                .or_insert_with(|| (item.product_name.clone(), 0, Decimal::ZERO));
            entry.1 += item.quantity;
            entry.2 += item.unit_price * Decimal::from(item.quantity);
        }
    }

    let mut rows: Vec<(i32, String, i64, Decimal)> = by_product
        .into_iter()
        .map(|(id, (name, quantity, revenue))| (id, name, quantity, revenue))
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2));

    let body: Vec<Value> = rows
        .into_iter()
        .map(|(id, name, quantity, revenue)| {
            json!({
                "product__id": id,
                "product_name": name,
                "total_quantity": quantity,
                "total_revenue": price_string(&revenue),
            })
        })
        .collect();
    respond(StatusCode::OK, Value::Array(body))
}
