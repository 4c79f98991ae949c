//! Domain models for the storefront backend.
//!
//! These are validated domain objects, separate from request/response
//! payloads. They serialize with camelCase field names, which is the wire
//! format the storefront UI consumes.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem, OrderSummary, PaymentResult};
pub use product::{Product, ProductDetail, ProductPage, Review};
pub use user::User;
