//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check (in main)
//! GET  /health/ready               - Readiness check (in main)
//!
//! # Users
//! POST   /api/users/login          - Login, returns user + token
//! POST   /api/users                - Register
//! GET    /api/users/profile        - Own profile (auth)
//! PUT    /api/users/profile        - Update own profile (auth)
//! GET    /api/users                - List users (admin)
//! DELETE /api/users/{id}           - Delete user (admin)
//!
//! # Products
//! GET    /api/products             - Paged listing (?keyword=&pageNumber=)
//! GET    /api/products/top         - Highest rated
//! GET    /api/products/{id}        - Detail with reviews
//! POST   /api/products             - Create placeholder (admin)
//! PUT    /api/products/{id}        - Update (admin)
//! DELETE /api/products/{id}        - Delete (admin)
//! POST   /api/products/{id}/reviews - Add review (auth, one per user)
//!
//! # Orders
//! POST /api/orders                 - Create from cart (auth)
//! GET  /api/orders                 - All orders (admin)
//! GET  /api/orders/myorders        - Own orders (auth)
//! GET  /api/orders/{id}            - Detail (owner or admin)
//! PUT  /api/orders/{id}/pay        - Confirm payment (owner or admin)
//! PUT  /api/orders/{id}/deliver    - Confirm delivery (admin)
//!
//! # Misc
//! POST /api/upload                 - Store an image (admin, multipart)
//! GET  /api/config/paypal          - Payment provider client id
//! GET  /uploads/*                  - Static files (in main)
//! ```

pub mod orders;
pub mod products;
pub mod upload;
pub mod users;

use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::register).get(users::list))
        .route("/login", post(users::login))
        .route(
            "/profile",
            get(users::profile).put(users::update_profile),
        )
        .route("/{id}", axum::routing::delete(users::delete))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/top", get(products::top))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/reviews", post(products::add_review))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list_all))
        .route("/myorders", get(orders::my_orders))
        .route("/{id}", get(orders::show))
        .route("/{id}/pay", put(orders::pay))
        .route("/{id}/deliver", put(orders::deliver))
}

/// `GET /api/config/paypal` - The payment provider client id for the UI.
async fn paypal_config(State(state): State<AppState>) -> String {
    state
        .config()
        .paypal_client_id
        .clone()
        .unwrap_or_default()
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/products", product_routes())
        .nest("/api/orders", order_routes())
        .route("/api/upload", post(upload::upload))
        .route("/api/config/paypal", get(paypal_config))
}
