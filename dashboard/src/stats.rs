//! Order and product statistics.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use vendor_portal_core::commerce::{Order, Product};

use crate::dates::{parse_order_date, within};

/// Statuses whose orders count as revenue.
pub const REVENUE_STATUSES: [&str; 4] = ["completed", "shipped", "delivered", "paid"];

/// Order statistics block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    /// Pending orders created in the last 24 hours
    pub new_orders: usize,
    /// Orders in the fetched batch. Bounded by the fetch limit, so this is an
    /// approximation of the store's real total.
    pub total_orders: usize,
    /// Revenue from fulfilled orders in the last 30 days
    pub monthly_revenue: f64,
    /// Currency of `monthly_revenue`
    pub currency: String,
}

impl OrderStats {
    /// Zero-valued block used when orders cannot be fetched.
    #[must_use]
    pub fn empty(currency: impl Into<String>) -> Self {
        Self {
            new_orders: 0,
            total_orders: 0,
            monthly_revenue: 0.0,
            currency: currency.into(),
        }
    }
}

/// Product statistics block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductStats {
    /// Products in the fetched batch
    pub total_products: usize,
    /// Products with status `active`
    pub active_products: usize,
    /// Products flagged for stock notification
    pub low_stock_alerts: usize,
}

/// Whether a normalized status counts as revenue.
#[must_use]
pub fn is_revenue_status(status: &str) -> bool {
    REVENUE_STATUSES.contains(&status)
}

/// Round to cents.
#[must_use]
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Compute order statistics relative to `now`.
#[must_use]
pub fn order_stats(orders: &[Order], now: DateTime<Utc>, currency: &str) -> OrderStats {
    let day = TimeDelta::hours(24);
    let month = TimeDelta::days(30);

    let mut new_orders = 0;
    let mut revenue = 0.0;

    for order in orders {
        let Some(status) = order.normalized_status() else {
            continue;
        };
        let Some(created) = order.created_at.as_deref().and_then(parse_order_date) else {
            continue;
        };

        if status == "pending" && within(created, now, day) {
            new_orders += 1;
        }
        if is_revenue_status(&status) && within(created, now, month) {
            revenue += order.resolved_total();
        }
    }

    OrderStats {
        new_orders,
        total_orders: orders.len(),
        monthly_revenue: round_currency(revenue),
        currency: currency.to_string(),
    }
}

/// Compute product statistics.
#[must_use]
pub fn product_stats(products: &[Product]) -> ProductStats {
    ProductStats {
        total_products: products.len(),
        active_products: products
            .iter()
            .filter(|p| p.status.as_deref() == Some("active"))
            .count(),
        low_stock_alerts: products
            .iter()
            .filter(|p| p.stock_notification == Some(true))
            .count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn orders(value: serde_json::Value) -> Vec<Order> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn counts_recent_pending_orders() {
        let batch = orders(json!([
            {"status": "Pending ", "created_at": "2025-03-10 08:00:00 UTC"},
            {"status": "pending", "created_at": "2025-03-08 08:00:00"},
            {"status": "pending"},
            {"status": "paid", "created_at": "2025-03-10 09:00:00"}
        ]));
        let stats = order_stats(&batch, now(), "EUR");
        assert_eq!(stats.new_orders, 1);
        assert_eq!(stats.total_orders, 4);
    }

    #[test]
    fn revenue_uses_resolved_totals_within_thirty_days() {
        let batch = orders(json!([
            {"status": "completed", "created_at": "2025-03-01 10:00:00", "total": "10.10"},
            {"status": "SHIPPED", "created_at": "2025-02-20T10:00:00Z",
             "line_items": [{"price": 10, "quantity": 2}, {"price": 5}]},
            {"status": "delivered", "created_at": "2025-01-01 10:00:00", "total": 1000},
            {"status": "refunded", "created_at": "2025-03-01 10:00:00", "total": 1000},
            {"status": "paid", "created_at": "not a date", "total": 1000}
        ]));
        let stats = order_stats(&batch, now(), "EUR");
        assert_eq!(stats.monthly_revenue, 35.1);
        assert_eq!(stats.currency, "EUR");
    }

    #[test]
    fn unknown_status_only_counts_toward_total() {
        let batch = orders(json!([
            {"status": "on-hold", "created_at": "2025-03-10 10:00:00", "total": 50}
        ]));
        let stats = order_stats(&batch, now(), "EUR");
        assert_eq!(
            stats,
            OrderStats {
                new_orders: 0,
                total_orders: 1,
                monthly_revenue: 0.0,
                currency: "EUR".to_string(),
            }
        );
    }

    #[test]
    fn product_counts() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {"status": "active", "stock_notification": true},
            {"status": "active", "stock_notification": "false"},
            {"status": "Active"},
            {"status": "disabled", "stock_notification": 1}
        ]))
        .unwrap();
        assert_eq!(
            product_stats(&products),
            ProductStats {
                total_products: 4,
                active_products: 2,
                low_stock_alerts: 2,
            }
        );
    }

    #[test]
    fn rounding_to_cents() {
        assert_eq!(round_currency(0.1 + 0.2), 0.3);
        assert_eq!(round_currency(10.005_1), 10.01);
    }
}
