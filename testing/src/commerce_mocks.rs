//! Scripted commerce platform for tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only happens if a test already panicked

use std::sync::{Arc, Mutex};
use std::time::Duration;

use vendor_portal_core::commerce::{
    Category, NewCategory, Order, OrderQuery, Product, ProductQuery, RecordId, StoreInfo,
};
use vendor_portal_core::upstream::{CommerceApi, UpstreamError, UpstreamFuture};

/// A call made against [`StubCommerceApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubCall {
    /// `list_orders`
    ListOrders(OrderQuery),
    /// `list_products`
    ListProducts(ProductQuery),
    /// `store_info`
    StoreInfo,
    /// `create_category`
    CreateCategory(String),
}

/// Which `list_orders` calls an injected failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderFailure {
    Every,
    Limit(u32),
    /// Zero-based position among `list_orders` calls
    Nth(usize),
}

impl OrderFailure {
    fn matches(self, query: &OrderQuery, position: usize) -> bool {
        match self {
            Self::Every => true,
            Self::Limit(limit) => query.limit == Some(limit),
            Self::Nth(n) => position == n,
        }
    }
}

#[derive(Debug, Default)]
struct StubState {
    orders: Vec<Order>,
    products: Vec<Product>,
    store: Option<StoreInfo>,
    order_failures: Vec<(OrderFailure, UpstreamError)>,
    products_failure: Option<UpstreamError>,
    store_failure: Option<UpstreamError>,
    category_failure: Option<UpstreamError>,
    latency: Option<Duration>,
    calls: Vec<StubCall>,
}

/// In-memory [`CommerceApi`] with per-call failure injection.
///
/// List calls return the configured records truncated to the query limit.
/// Every call is recorded and can be inspected with [`StubCommerceApi::calls`].
///
/// # Example
///
/// ```
/// use vendor_portal_testing::StubCommerceApi;
/// use vendor_portal_core::upstream::UpstreamError;
///
/// // Only the 200-order monthly chart fetch fails; other order fetches succeed.
/// let api = StubCommerceApi::new().fail_orders_with_limit(200, UpstreamError::Timeout);
///
/// // The dashboard issues its order fetches as stats, recent, chart.
/// let api = StubCommerceApi::new().fail_nth_orders_call(2, UpstreamError::Timeout);
/// # let _ = api;
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubCommerceApi {
    state: Arc<Mutex<StubState>>,
}

impl StubCommerceApi {
    /// Empty store with the default descriptor (`Test Store`, EUR).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these orders.
    #[must_use]
    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.state.lock().unwrap().orders = orders;
        self
    }

    /// Serve these products.
    #[must_use]
    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.state.lock().unwrap().products = products;
        self
    }

    /// Report this store descriptor.
    #[must_use]
    pub fn with_store(self, store: StoreInfo) -> Self {
        self.state.lock().unwrap().store = Some(store);
        self
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state.lock().unwrap().latency = Some(latency);
        self
    }

    /// Fail every `list_orders` call.
    #[must_use]
    pub fn fail_orders(self, error: UpstreamError) -> Self {
        self.state
            .lock()
            .unwrap()
            .order_failures
            .push((OrderFailure::Every, error));
        self
    }

    /// Fail `list_orders` calls whose limit equals `limit`.
    #[must_use]
    pub fn fail_orders_with_limit(self, limit: u32, error: UpstreamError) -> Self {
        self.state
            .lock()
            .unwrap()
            .order_failures
            .push((OrderFailure::Limit(limit), error));
        self
    }

    /// Fail only the `n`th `list_orders` call, counting from zero.
    ///
    /// Distinguishes fetches that share a limit, such as the statistics and
    /// daily chart fetches.
    #[must_use]
    pub fn fail_nth_orders_call(self, n: usize, error: UpstreamError) -> Self {
        self.state
            .lock()
            .unwrap()
            .order_failures
            .push((OrderFailure::Nth(n), error));
        self
    }

    /// Fail every `list_products` call.
    #[must_use]
    pub fn fail_products(self, error: UpstreamError) -> Self {
        self.state.lock().unwrap().products_failure = Some(error);
        self
    }

    /// Fail `store_info`.
    #[must_use]
    pub fn fail_store_info(self, error: UpstreamError) -> Self {
        self.state.lock().unwrap().store_failure = Some(error);
        self
    }

    /// Fail `create_category`.
    #[must_use]
    pub fn fail_create_category(self, error: UpstreamError) -> Self {
        self.state.lock().unwrap().category_failure = Some(error);
        self
    }

    /// Calls received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<StubCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Names passed to `create_category`.
    #[must_use]
    pub fn created_categories(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StubCall::CreateCategory(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StubCall) -> Option<Duration> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.latency
    }

    async fn pause(latency: Option<Duration>) {
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn limited<T: Clone>(items: &[T], limit: Option<u32>) -> Vec<T> {
    let limit = limit.map_or(items.len(), |l| l as usize);
    items.iter().take(limit).cloned().collect()
}

impl CommerceApi for StubCommerceApi {
    fn list_orders(&self, query: OrderQuery) -> UpstreamFuture<'_, Vec<Order>> {
        let position = self
            .calls()
            .iter()
            .filter(|call| matches!(call, StubCall::ListOrders(_)))
            .count();
        let latency = self.record(StubCall::ListOrders(query.clone()));
        let result = {
            let state = self.state.lock().unwrap();
            let failure = state
                .order_failures
                .iter()
                .find(|(failure, _)| failure.matches(&query, position))
                .map(|(_, error)| error.clone());
            match failure {
                Some(error) => Err(error),
                None => {
                    let matching: Vec<Order> = state
                        .orders
                        .iter()
                        .filter(|order| query.status.is_none() || order.status == query.status)
                        .cloned()
                        .collect();
                    Ok(limited(&matching, query.limit))
                }
            }
        };
        Box::pin(async move {
            Self::pause(latency).await;
            result
        })
    }

    fn list_products(&self, query: ProductQuery) -> UpstreamFuture<'_, Vec<Product>> {
        let latency = self.record(StubCall::ListProducts(query));
        let result = {
            let state = self.state.lock().unwrap();
            match &state.products_failure {
                Some(error) => Err(error.clone()),
                None => Ok(limited(&state.products, query.limit)),
            }
        };
        Box::pin(async move {
            Self::pause(latency).await;
            result
        })
    }

    fn store_info(&self) -> UpstreamFuture<'_, StoreInfo> {
        let latency = self.record(StubCall::StoreInfo);
        let result = {
            let state = self.state.lock().unwrap();
            match &state.store_failure {
                Some(error) => Err(error.clone()),
                None => Ok(state.store.clone().unwrap_or_else(|| StoreInfo {
                    name: "Test Store".to_string(),
                    currency: "EUR".to_string(),
                    timezone: Some("UTC".to_string()),
                })),
            }
        };
        Box::pin(async move {
            Self::pause(latency).await;
            result
        })
    }

    fn create_category(&self, category: NewCategory) -> UpstreamFuture<'_, Category> {
        let latency = self.record(StubCall::CreateCategory(category.name.clone()));
        let result = {
            let state = self.state.lock().unwrap();
            match &state.category_failure {
                Some(error) => Err(error.clone()),
                None => Ok(Category {
                    id: Some(RecordId::Number(1)),
                    permalink: Some(category.name.to_lowercase().replace(' ', "-")),
                    name: Some(category.name),
                }),
            }
        };
        Box::pin(async move {
            Self::pause(latency).await;
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn limit_specific_failures() {
        let api = StubCommerceApi::new()
            .with_orders(vec![Order::default(); 10])
            .fail_orders_with_limit(100, UpstreamError::Timeout);

        assert_eq!(
            api.list_orders(OrderQuery::limit(100)).await,
            Err(UpstreamError::Timeout)
        );
        assert_eq!(api.list_orders(OrderQuery::limit(5)).await.unwrap().len(), 5);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn positional_failures_hit_one_call() {
        let api = StubCommerceApi::new()
            .with_orders(vec![Order::default(); 3])
            .fail_nth_orders_call(1, UpstreamError::Timeout);

        assert!(api.list_orders(OrderQuery::limit(100)).await.is_ok());
        assert_eq!(
            api.list_orders(OrderQuery::limit(100)).await,
            Err(UpstreamError::Timeout)
        );
        assert_eq!(api.list_orders(OrderQuery::limit(100)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn records_category_names() {
        let api = StubCommerceApi::new();
        let created = api
            .create_category(NewCategory::named("Cork Studio"))
            .await
            .unwrap();
        assert_eq!(created.permalink.as_deref(), Some("cork-studio"));
        assert_eq!(api.created_categories(), vec!["Cork Studio".to_string()]);
    }
}
