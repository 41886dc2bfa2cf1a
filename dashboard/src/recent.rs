//! Recent orders formatted for display.

use serde::Serialize;
use serde_json::Value;
use vendor_portal_core::commerce::{Order, RecordId};

/// How many recent orders the dashboard shows.
pub const RECENT_ORDER_LIMIT: u32 = 5;

/// One row of the recent-orders table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOrder {
    /// Order identifier, `null` if the platform sent none
    pub id: Option<RecordId>,
    /// Customer display name
    pub customer: String,
    /// The order's own `total` field exactly as sent, `0` if absent
    pub total: Value,
    /// Status as sent by the platform
    pub status: String,
    /// `created_at`, unmodified
    pub date: String,
    /// Number of line items
    pub items_count: usize,
}

impl From<&Order> for RecentOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            customer: order
                .customer
                .as_ref()
                .and_then(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            total: order.amounts.total.clone().unwrap_or_else(|| Value::from(0)),
            status: order
                .status
                .clone()
                .unwrap_or_else(|| "pending".to_string()),
            date: order.created_at.clone().unwrap_or_default(),
            items_count: order.line_items.len(),
        }
    }
}

/// Format orders for the recent-orders table, preserving order.
#[must_use]
pub fn format_recent(orders: &[Order]) -> Vec<RecentOrder> {
    orders.iter().map(RecentOrder::from).collect()
}
