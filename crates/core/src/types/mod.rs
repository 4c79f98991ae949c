//! Core types for Velour.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod rating;

pub use address::ShippingAddress;
pub use email::{Email, EmailError};
pub use id::*;
pub use rating::{Rating, RatingError};
