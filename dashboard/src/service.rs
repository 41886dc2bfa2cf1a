//! The dashboard aggregation service.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vendor_portal_core::commerce::{OrderQuery, ProductQuery, StoreInfo};
use vendor_portal_core::environment::Clock;
use vendor_portal_core::upstream::CommerceApi;

use crate::chart::{SalesPoint, sales_chart};
use crate::error::DashboardError;
use crate::period::Period;
use crate::quick_actions::{QUICK_ACTIONS, QuickAction};
use crate::recent::{RECENT_ORDER_LIMIT, RecentOrder, format_recent};
use crate::stats::{OrderStats, ProductStats, order_stats, product_stats};

/// Orders fetched for the statistics block.
pub const STATS_ORDER_LIMIT: u32 = 100;

/// Products fetched for the statistics block.
pub const STATS_PRODUCT_LIMIT: u32 = 50;

/// Non-critical parts of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    /// `stats.orders`
    Orders,
    /// `stats.products`
    Products,
    /// `recent_orders`
    RecentOrders,
    /// `sales_chart`
    SalesChart,
}

impl SectionName {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::RecentOrders => "recent_orders",
            Self::SalesChart => "sales_chart",
        }
    }
}

/// Outcome of one non-critical branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    /// Computed from a successful upstream call
    Fresh(T),
    /// Upstream call failed; `value` is the zero-valued fallback
    Degraded {
        /// Fallback value
        value: T,
        /// Why the section degraded
        reason: String,
    },
}

impl<T> Section<T> {
    /// Build a section from a branch result, substituting `fallback` on error.
    ///
    /// Degradation is logged and counted.
    pub fn resolve<E: Display>(
        name: SectionName,
        result: Result<T, E>,
        fallback: impl FnOnce() -> T,
    ) -> Self {
        match result {
            Ok(value) => Self::Fresh(value),
            Err(error) => {
                tracing::warn!(
                    section = name.as_str(),
                    error = %error,
                    "Dashboard section degraded"
                );
                metrics::counter!("dashboard.section.degraded", "section" => name.as_str())
                    .increment(1);
                Self::Degraded {
                    value: fallback(),
                    reason: error.to_string(),
                }
            }
        }
    }

    /// Whether the fallback was used.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The section's value, fresh or fallback.
    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }
}

/// Statistics blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Order statistics
    pub orders: OrderStats,
    /// Product statistics
    pub products: ProductStats,
}

/// The dashboard document returned to the frontend.
///
/// Built fresh on every request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Always `true` on a successful build
    pub success: bool,
    /// When the snapshot was assembled
    pub timestamp: DateTime<Utc>,
    /// Chart period used
    pub period: Period,
    /// Store descriptor
    pub store_info: StoreInfo,
    /// Statistics
    pub stats: DashboardStats,
    /// Latest orders
    pub recent_orders: Vec<RecentOrder>,
    /// Sales series for `period`
    pub sales_chart: Vec<SalesPoint>,
    /// Static shortcuts
    pub quick_actions: Vec<QuickAction>,
    /// Sections that fell back to zero values
    pub degraded_sections: Vec<SectionName>,
}

/// Aggregates upstream data into a [`DashboardSnapshot`].
#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn CommerceApi>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Create a service over a commerce API and a clock.
    #[must_use]
    pub fn new(api: Arc<dyn CommerceApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Build the dashboard.
    ///
    /// The five upstream calls run concurrently and all of them settle before
    /// the snapshot is assembled. Only the store-info call is critical.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreInfo`] if the store descriptor cannot be fetched.
    pub async fn snapshot(&self, period: Period) -> Result<DashboardSnapshot, DashboardError> {
        let now = self.clock.now();
        let api = self.api.as_ref();

        let (orders, products, recent, store, chart) = tokio::join!(
            api.list_orders(OrderQuery::limit(STATS_ORDER_LIMIT)),
            api.list_products(ProductQuery::limit(STATS_PRODUCT_LIMIT)),
            api.list_orders(OrderQuery::limit(RECENT_ORDER_LIMIT)),
            api.store_info(),
            api.list_orders(OrderQuery::limit(period.fetch_limit())),
        );

        let store_info = store.map_err(|error| {
            tracing::error!(error = %error, "Store info failed, aborting dashboard");
            DashboardError::StoreInfo(error)
        })?;
        let currency = store_info.currency.clone();

        let orders = Section::resolve(
            SectionName::Orders,
            orders.map(|batch| order_stats(&batch, now, &currency)),
            || OrderStats::empty(currency.clone()),
        );
        let products = Section::resolve(
            SectionName::Products,
            products.map(|batch| product_stats(&batch)),
            ProductStats::default,
        );
        let recent = Section::resolve(
            SectionName::RecentOrders,
            recent.map(|batch| format_recent(&batch)),
            Vec::new,
        );
        let chart = Section::resolve(
            SectionName::SalesChart,
            chart.map(|batch| sales_chart(&batch, period, now)),
            Vec::new,
        );

        let degraded_sections = [
            (SectionName::Orders, orders.is_degraded()),
            (SectionName::Products, products.is_degraded()),
            (SectionName::RecentOrders, recent.is_degraded()),
            (SectionName::SalesChart, chart.is_degraded()),
        ]
        .into_iter()
        .filter_map(|(name, degraded)| degraded.then_some(name))
        .collect();

        tracing::debug!(period = %period, "Dashboard snapshot assembled");

        Ok(DashboardSnapshot {
            success: true,
            timestamp: self.clock.now(),
            period,
            store_info,
            stats: DashboardStats {
                orders: orders.into_value(),
                products: products.into_value(),
            },
            recent_orders: recent.into_value(),
            sales_chart: chart.into_value(),
            quick_actions: QUICK_ACTIONS.to_vec(),
            degraded_sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_fallback_on_error() {
        let section: Section<u32> =
            Section::resolve(SectionName::Orders, Err::<u32, _>("boom"), || 0);
        assert!(section.is_degraded());
        assert_eq!(
            section,
            Section::Degraded {
                value: 0,
                reason: "boom".to_string()
            }
        );

        let fresh = Section::resolve(SectionName::Orders, Ok::<_, &str>(7), || 0);
        assert!(!fresh.is_degraded());
        assert_eq!(fresh.into_value(), 7);
    }
}
