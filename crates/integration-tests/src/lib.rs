//! Test harness for the Sunbird client.
//!
//! [`StubBackend`] is an in-process axum server speaking the Sunbird wire
//! contract (`{success, message, data}` envelope, bearer authentication,
//! refresh endpoint) with call counters and failure toggles, so tests can
//! assert the refresh and atomicity laws precisely. [`client_stack`]
//! builds a client wired to it over in-memory storage.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use sunbird_client::storage::MemoryStorage;
use sunbird_client::{ClientConfig, HttpGateway, Session, SessionManager};
use sunbird_client::types::UserProfile;

/// Shared state behind the stub backend.
pub struct BackendState {
    /// The access token the backend currently accepts.
    pub access_token: Mutex<String>,
    /// The refresh token the backend currently accepts.
    pub refresh_token: Mutex<String>,
    /// Monotonic counter for minted token pairs.
    token_serial: AtomicUsize,

    /// Number of calls to `POST /auth/refresh`.
    pub refresh_calls: AtomicUsize,
    /// Number of calls to `POST /orders`.
    pub order_creates: AtomicUsize,
    /// Number of calls to `GET /products`.
    pub product_list_calls: AtomicUsize,

    /// When set, `POST /auth/refresh` fails unconditionally.
    pub fail_refresh: AtomicBool,
    /// When set, `POST /orders` fails with a server error.
    pub fail_order_create: AtomicBool,

    /// Orders created so far, as wire JSON.
    pub orders: Mutex<Vec<Value>>,
    /// The product catalog, as wire JSON.
    pub products: Mutex<Vec<Value>>,
}

impl BackendState {
    fn new() -> Self {
        Self {
            access_token: Mutex::new("access-0".to_owned()),
            refresh_token: Mutex::new("refresh-0".to_owned()),
            token_serial: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            order_creates: AtomicUsize::new(0),
            product_list_calls: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
            fail_order_create: AtomicBool::new(false),
            orders: Mutex::new(Vec::new()),
            products: Mutex::new(vec![
                product_json(1, "Teapot", 100.0),
                product_json(2, "Mug", 50.0),
                product_json(3, "Tray", 25.0),
            ]),
        }
    }

    fn mint_tokens(&self) -> (String, String) {
        let serial = self.token_serial.fetch_add(1, Ordering::SeqCst) + 1;
        let access = format!("access-{serial}");
        let refresh = format!("refresh-{serial}");
        *lock(&self.access_token) = access.clone();
        *lock(&self.refresh_token) = refresh.clone();
        (access, refresh)
    }
}

fn product_json(id: i32, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "imageUrl": null,
        "price": price,
        "discountPercentage": null,
        "description": null,
        "categoryId": 1,
        "categoryName": "Kitchen",
        "quantityAvailable": 100,
        "lowStockThreshold": 5,
    })
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// The stub backend: an axum server on an ephemeral port.
pub struct StubBackend {
    pub state: Arc<BackendState>,
    addr: SocketAddr,
}

impl StubBackend {
    /// Bind and spawn the backend.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound (test environment only).
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::new());

        let app = Router::new()
            .route("/auth/google", post(auth_google))
            .route("/auth/refresh", post(auth_refresh))
            .route("/auth/logout", post(auth_logout))
            .route("/profile", get(get_profile))
            .route("/products", get(list_products).post(create_product))
            .route("/orders", post(create_order))
            .route("/orders/my", get(my_orders))
            .route("/orders/{id}", get(get_order))
            .route("/admin/orders/{id}/status", put(update_order_status))
            .route("/admin/users", get(list_users))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub backend");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("stub backend crashed");
        });

        Self { state, addr }
    }

    /// Base URL the client should point at.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// The access token the backend currently accepts.
    #[must_use]
    pub fn current_access_token(&self) -> String {
        lock(&self.state.access_token).clone()
    }

    /// The refresh token the backend currently accepts.
    #[must_use]
    pub fn current_refresh_token(&self) -> String {
        lock(&self.state.refresh_token).clone()
    }

    /// Rotate the backend-side token pair without telling the client,
    /// making every client-held access token stale.
    pub fn expire_client_tokens(&self) {
        *lock(&self.state.access_token) = "server-rotated-access".to_owned();
    }

    /// Number of refresh calls observed.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// Number of order-creation calls observed.
    #[must_use]
    pub fn order_creates(&self) -> usize {
        self.state.order_creates.load(Ordering::SeqCst)
    }

    /// Number of product-listing calls observed.
    #[must_use]
    pub fn product_list_calls(&self) -> usize {
        self.state.product_list_calls.load(Ordering::SeqCst)
    }

    /// Make the refresh endpoint fail unconditionally.
    pub fn fail_refresh(&self) {
        self.state.fail_refresh.store(true, Ordering::SeqCst);
    }

    /// Make order creation fail with a server error.
    pub fn fail_order_create(&self, fail: bool) {
        self.state.fail_order_create.store(fail, Ordering::SeqCst);
    }
}

/// The profile every stub session belongs to.
#[must_use]
pub fn test_profile() -> UserProfile {
    serde_json::from_value(profile_json()).expect("test profile is valid")
}

fn profile_json() -> Value {
    json!({
        "id": 1,
        "email": "shopper@example.com",
        "name": "Test Shopper",
        "role": "ADMIN",
        "profileCompleted": true,
    })
}

/// Client wired to the stub backend over in-memory storage, with a
/// session holding the given tokens.
///
/// # Panics
///
/// Panics on wiring failures (test environment only).
#[must_use]
pub fn client_stack(
    base_url: &str,
    access_token: &str,
    refresh_token: &str,
) -> (Arc<MemoryStorage>, Arc<SessionManager>, HttpGateway) {
    let storage = Arc::new(MemoryStorage::new());
    let session =
        Arc::new(SessionManager::load(storage.clone()).expect("memory storage never fails"));
    session
        .set(Session {
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.to_owned(),
            user: test_profile(),
        })
        .expect("memory storage never fails");

    let config = ClientConfig::new(base_url, std::env::temp_dir()).expect("stub url is valid");
    let gateway = HttpGateway::new(&config, session.clone()).expect("client builds");

    (storage, session, gateway)
}

/// Client wired to the stub backend with no session at all.
///
/// # Panics
///
/// Panics on wiring failures (test environment only).
#[must_use]
pub fn anonymous_stack(base_url: &str) -> (Arc<MemoryStorage>, Arc<SessionManager>, HttpGateway) {
    let storage = Arc::new(MemoryStorage::new());
    let session =
        Arc::new(SessionManager::load(storage.clone()).expect("memory storage never fails"));
    let config = ClientConfig::new(base_url, std::env::temp_dir()).expect("stub url is valid");
    let gateway = HttpGateway::new(&config, session.clone()).expect("client builds");
    (storage, session, gateway)
}

// =============================================================================
// Handlers
// =============================================================================

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "message": "", "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message, "data": null })),
    )
        .into_response()
}

fn authorized(state: &BackendState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", lock(&state.access_token));
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn auth_google(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    if body.get("idToken").and_then(Value::as_str).is_none() {
        return fail(StatusCode::BAD_REQUEST, "idToken is required");
    }

    let (access, refresh) = state.mint_tokens();
    ok(json!({
        "accessToken": access,
        "refreshToken": refresh,
        "user": profile_json(),
    }))
}

async fn auth_refresh(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    // Slow the exchange down a little so concurrent 401 handlers overlap.
    tokio::time::sleep(std::time::Duration::from_millis(25)).await;

    if state.fail_refresh.load(Ordering::SeqCst) {
        return fail(StatusCode::UNAUTHORIZED, "refresh token revoked");
    }

    let presented = body.get("refreshToken").and_then(Value::as_str);
    if presented != Some(lock(&state.refresh_token).as_str()) {
        return fail(StatusCode::UNAUTHORIZED, "invalid refresh token");
    }

    let (access, refresh) = state.mint_tokens();
    ok(json!({ "accessToken": access, "refreshToken": refresh }))
}

async fn auth_logout() -> Response {
    ok(Value::Null)
}

async fn get_profile(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }
    ok(profile_json())
}

async fn list_products(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Response {
    state.product_list_calls.fetch_add(1, Ordering::SeqCst);

    let products = lock(&state.products).clone();
    let filtered: Vec<Value> = match params.get("search") {
        Some(needle) => products
            .into_iter()
            .filter(|p| {
                p.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase()))
            })
            .collect(),
        None => products,
    };

    let total = filtered.len();
    ok(json!({
        "content": filtered,
        "totalElements": total,
        "totalPages": 1,
        "size": total,
        "number": 0,
    }))
}

async fn create_product(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let mut products = lock(&state.products);
    let id = products.len() as i32 + 1;
    let mut created = product_json(
        id,
        body.get("name").and_then(Value::as_str).unwrap_or("unnamed"),
        body.get("price").and_then(Value::as_f64).unwrap_or(0.0),
    );
    if let Some(obj) = created.as_object_mut()
        && let Some(qty) = body.get("quantityAvailable")
    {
        obj.insert("quantityAvailable".to_owned(), qty.clone());
    }
    products.push(created.clone());
    ok(created)
}

async fn create_order(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    if state.fail_order_create.load(Ordering::SeqCst) {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "order rejected by backend");
    }

    let Some(requested) = body.get("items").and_then(Value::as_array) else {
        return fail(StatusCode::BAD_REQUEST, "items are required");
    };
    if requested.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "order must contain items");
    }

    let products = lock(&state.products).clone();
    let mut total = 0.0;
    let mut items = Vec::new();
    for line in requested {
        let product_id = line.get("productId").and_then(Value::as_i64).unwrap_or(0);
        let quantity = line.get("quantity").and_then(Value::as_u64).unwrap_or(0);
        let product = products
            .iter()
            .find(|p| p.get("id").and_then(Value::as_i64) == Some(product_id));
        let Some(product) = product else {
            return fail(StatusCode::BAD_REQUEST, "unknown product in order");
        };

        let price = product.get("price").and_then(Value::as_f64).unwrap_or(0.0);
        total += price * quantity as f64;
        items.push(json!({
            "productId": product_id,
            "productName": product.get("name"),
            "quantity": quantity,
            "priceAtPurchase": price,
            "lineTotal": price * quantity as f64,
        }));
    }

    state.order_creates.fetch_add(1, Ordering::SeqCst);

    let mut orders = lock(&state.orders);
    let id = orders.len() as i32 + 1;
    let order = json!({
        "id": id,
        "status": "PENDING",
        "totalAmount": total,
        "shippingAddress": body.get("shippingAddress"),
        "createdAt": chrono::Utc::now().to_rfc3339(),
        "items": items,
    });
    orders.push(order.clone());
    ok(order)
}

async fn my_orders(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let orders = lock(&state.orders).clone();
    let total = orders.len();
    ok(json!({
        "content": orders,
        "totalElements": total,
        "totalPages": 1,
        "size": total,
        "number": 0,
    }))
}

async fn get_order(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let orders = lock(&state.orders);
    match orders
        .iter()
        .find(|o| o.get("id").and_then(Value::as_i64) == Some(id))
    {
        Some(order) => ok(order.clone()),
        None => fail(StatusCode::NOT_FOUND, "order not found"),
    }
}

async fn update_order_status(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let Some(status) = body.get("status").and_then(Value::as_str) else {
        return fail(StatusCode::BAD_REQUEST, "status is required");
    };

    let mut orders = lock(&state.orders);
    let order = orders
        .iter_mut()
        .find(|o| o.get("id").and_then(Value::as_i64) == Some(id));
    match order {
        Some(order) => {
            if let Some(obj) = order.as_object_mut() {
                obj.insert("status".to_owned(), json!(status));
            }
            ok(Value::Null)
        }
        None => fail(StatusCode::NOT_FOUND, "order not found"),
    }
}

async fn list_users(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return fail(StatusCode::UNAUTHORIZED, "unauthorized");
    }
    ok(json!([profile_json()]))
}
