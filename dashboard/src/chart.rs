//! Sales-by-period series.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vendor_portal_core::commerce::Order;

use crate::dates::{parse_order_date, within};
use crate::period::Period;
use crate::stats::{is_revenue_status, round_currency};

/// One bucket of the sales chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPoint {
    /// Bucket label
    pub date: String,
    /// Revenue in the bucket, rounded to cents
    pub sales: f64,
}

/// Bucket fulfilled orders inside the period's window.
///
/// Each order contributes its own `total` field (missing counts as 0), not the
/// resolved total used by [`crate::stats::order_stats`]. Buckets come out in
/// ascending key order; empty buckets are not emitted.
#[must_use]
pub fn sales_chart(orders: &[Order], period: Period, now: DateTime<Utc>) -> Vec<SalesPoint> {
    let window = period.window();
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();

    for order in orders {
        if !order
            .normalized_status()
            .is_some_and(|status| is_revenue_status(&status))
        {
            continue;
        }
        let Some(created) = order.created_at.as_deref().and_then(parse_order_date) else {
            continue;
        };
        if !within(created, now, window) {
            continue;
        }
        *buckets.entry(period.bucket_key(created)).or_insert(0.0) +=
            order.amounts.total_number().unwrap_or(0.0);
    }

    buckets
        .into_iter()
        .map(|(date, sales)| SalesPoint {
            date,
            sales: round_currency(sales),
        })
        .collect()
}
