//! Shipping address type.

use serde::{Deserialize, Serialize};

/// A shipping address as entered at checkout.
///
/// Shared between the client-side store (where it is saved before checkout)
/// and the order model (where it is persisted with the order). Field-level
/// validation happens at the service boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street address.
    pub address: String,
    /// City name.
    pub city: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
}

impl ShippingAddress {
    /// Whether every field carries a non-blank value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ![&self.address, &self.city, &self.postal_code, &self.country]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ShippingAddress {
        ShippingAddress {
            address: "12 Mulberry Lane".to_owned(),
            city: "Portland".to_owned(),
            postal_code: "97201".to_owned(),
            country: "USA".to_owned(),
        }
    }

    #[test]
    fn test_complete_address() {
        assert!(sample().is_complete());
    }

    #[test]
    fn test_blank_field_is_incomplete() {
        let mut address = sample();
        address.city = "   ".to_owned();
        assert!(!address.is_complete());
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert!(json.contains("\"postalCode\""));
    }
}
