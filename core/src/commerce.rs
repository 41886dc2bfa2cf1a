//! Records read from, and written to, the upstream commerce platform.
//!
//! All read-side records decode leniently (see [`crate::lenient`]): every field
//! is optional and a field with an unexpected JSON type is treated as absent.
//! Callers past the client layer only ever see these typed records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// Identifier of an upstream record. The platform uses integers, but some
/// payloads carry them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier
    Number(i64),
    /// Textual identifier
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Candidate total fields, in resolution order.
///
/// The same key set appears on the order itself and inside its nested `totals` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderAmounts {
    /// `total`, verbatim; see [`OrderAmounts::total_number`]
    #[serde(default)]
    pub total: Option<Value>,
    /// `total_price`
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_price: Option<f64>,
    /// `grand_total`
    #[serde(default, deserialize_with = "lenient::number")]
    pub grand_total: Option<f64>,
    /// `amount`
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
}

impl OrderAmounts {
    /// The `total` field as a number, if it is a number or a numeric string.
    #[must_use]
    pub fn total_number(&self) -> Option<f64> {
        self.total.as_ref().and_then(lenient::number_from_value)
    }

    /// First candidate that carried a number, in `total`, `total_price`,
    /// `grand_total`, `amount` order.
    #[must_use]
    pub fn first(&self) -> Option<f64> {
        self.total_number()
            .or(self.total_price)
            .or(self.grand_total)
            .or(self.amount)
    }
}

/// Customer attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Customer {
    /// Display name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

/// A single order line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineItem {
    /// Unit price
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    /// Quantity ordered
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
}

impl LineItem {
    /// `price × quantity`, with a missing price counting as 0 and a missing quantity as 1.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price.unwrap_or(0.0) * self.quantity.unwrap_or(1.0)
    }
}

/// An order as reported by the commerce platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Order {
    /// Order identifier
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    /// Free-text status (`pending`, `paid`, `shipped`, ...)
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    /// Creation timestamp, verbatim
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: Option<String>,
    /// Total candidates carried on the order itself
    #[serde(flatten)]
    pub amounts: OrderAmounts,
    /// Nested `totals` object, if any
    #[serde(default, deserialize_with = "lenient::object")]
    pub totals: Option<OrderAmounts>,
    /// Customer details
    #[serde(default, deserialize_with = "lenient::object")]
    pub customer: Option<Customer>,
    /// Order lines
    #[serde(default, deserialize_with = "lenient::list")]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Status trimmed and lower-cased, for comparisons.
    #[must_use]
    pub fn normalized_status(&self) -> Option<String> {
        self.status.as_deref().map(|s| s.trim().to_ascii_lowercase())
    }

    /// Resolve the order total.
    ///
    /// Resolution order: the first numeric candidate on the order, then the
    /// first numeric candidate inside `totals`, then the sum of line-item subtotals.
    #[must_use]
    pub fn resolved_total(&self) -> f64 {
        self.amounts
            .first()
            .or_else(|| self.totals.as_ref().and_then(OrderAmounts::first))
            .unwrap_or_else(|| {
                self.line_items
                    .iter()
                    .fold(0.0, |acc, item| acc + item.subtotal())
            })
    }
}

/// A product as reported by the commerce platform.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Product {
    /// Product identifier
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    /// Product name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// Status (`active`, `disabled`, ...)
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    /// Raw stock count (older schema)
    #[serde(default, deserialize_with = "lenient::number")]
    pub stock: Option<f64>,
    /// Stock notification flag (current schema)
    #[serde(default, deserialize_with = "lenient::flag")]
    pub stock_notification: Option<bool>,
}

/// Store descriptor.
///
/// The platform exposes no store endpoint, so this is static configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Store display name
    pub name: String,
    /// ISO currency code
    pub currency: String,
    /// IANA timezone name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Category {
    /// Category identifier
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    /// Category name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// URL slug
    #[serde(default, deserialize_with = "lenient::text")]
    pub permalink: Option<String>,
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    /// Category name
    pub name: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCategory {
    /// Category with a name only.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Payload for creating or updating a product. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductInput {
    /// Product name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Stock count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stock keeping unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Filters for listing orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Only orders with this status
    pub status: Option<String>,
    /// Page size
    pub limit: Option<u32>,
}

impl OrderQuery {
    /// Query the most recent `limit` orders regardless of status.
    #[must_use]
    pub const fn limit(limit: u32) -> Self {
        Self {
            status: None,
            limit: Some(limit),
        }
    }
}

/// Paging for listing products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Page size
    pub limit: Option<u32>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl ProductQuery {
    /// First page of `limit` products.
    #[must_use]
    pub const fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            page: None,
        }
    }
}
