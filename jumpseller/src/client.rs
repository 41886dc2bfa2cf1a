//! Jumpseller API client implementation

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use vendor_portal_core::commerce::{
    Category, NewCategory, Order, OrderQuery, Product, ProductInput, ProductQuery, StoreInfo,
};
use vendor_portal_core::upstream::{CommerceApi, HealthFuture, UpstreamError, UpstreamFuture};

use crate::config::JumpsellerConfig;
use crate::normalize;

/// Jumpseller API client
#[derive(Clone)]
pub struct JumpsellerClient {
    client: Client,
    base_url: String,
    auth: HeaderValue,
    store: StoreInfo,
}

impl std::fmt::Debug for JumpsellerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JumpsellerClient")
            .field("base_url", &self.base_url)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl JumpsellerClient {
    /// Create a client from configuration.
    ///
    /// The Basic authorization header is computed once here.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Transport`] if the HTTP client cannot be built
    /// or the credentials cannot form a header value.
    pub fn new(config: JumpsellerConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let credentials = STANDARD.encode(format!("{}:{}", config.login, config.auth_token));
        let mut auth = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        auth.set_sensitive(true);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
            store: config.store,
        })
    }

    /// API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request to `{base_url}/{endpoint}.json`.
    ///
    /// Returns `None` for responses without a body (204).
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Option<Value>, UpstreamError> {
        let url = format!("{}/{endpoint}.json", self.base_url);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(AUTHORIZATION, self.auth.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        tracing::info!(
            method = %method,
            endpoint,
            status = status.as_u16(),
            "Jumpseller request"
        );

        match status {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::UNAUTHORIZED => Err(UpstreamError::Unauthorized),
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
            status if status.is_success() => {
                let bytes = response.bytes().await.map_err(transport_error)?;
                if bytes.is_empty() {
                    return Ok(None);
                }
                serde_json::from_slice(&bytes)
                    .map(Some)
                    .map_err(|e| UpstreamError::ResponseParseFailed(e.to_string()))
            }
            status => {
                let body = response
                    .bytes()
                    .await
                    .ok()
                    .and_then(|bytes| serde_json::from_slice(&bytes).ok());
                if body.is_none() {
                    tracing::debug!(endpoint, "Error response carried no JSON body");
                }
                Err(UpstreamError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    /// List orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>, UpstreamError> {
        let mut params = Vec::new();
        if let Some(status) = query.status {
            params.push(("status", status));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        let body = self.request(Method::GET, "orders", &params, None).await?;
        Ok(normalize::collection(body, "orders", "order"))
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::NotFound`] for an unknown id.
    pub async fn get_order(&self, id: i64) -> Result<Order, UpstreamError> {
        let body = self
            .request(Method::GET, &format!("orders/{id}"), &[], None)
            .await?;
        normalize::resource(body, "order")
    }

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn update_order_status(&self, id: i64, status: &str) -> Result<Order, UpstreamError> {
        let payload = json!({ "order": { "status": status } });
        let body = self
            .request(Method::PUT, &format!("orders/{id}"), &[], Some(payload))
            .await?;
        normalize::resource(body, "order")
    }

    /// List products.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, UpstreamError> {
        let mut params = Vec::new();
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        let body = self.request(Method::GET, "products", &params, None).await?;
        Ok(normalize::collection(body, "products", "product"))
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::NotFound`] for an unknown id.
    pub async fn get_product(&self, id: i64) -> Result<Product, UpstreamError> {
        let body = self
            .request(Method::GET, &format!("products/{id}"), &[], None)
            .await?;
        normalize::resource(body, "product")
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn create_product(&self, product: &ProductInput) -> Result<Product, UpstreamError> {
        let body = self
            .request(Method::POST, "products", &[], Some(wrap("product", product)?))
            .await?;
        normalize::resource(body, "product")
    }

    /// Update a product. Only the fields set in `product` are sent.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn update_product(
        &self,
        id: i64,
        product: &ProductInput,
    ) -> Result<Product, UpstreamError> {
        let body = self
            .request(
                Method::PUT,
                &format!("products/{id}"),
                &[],
                Some(wrap("product", product)?),
            )
            .await?;
        normalize::resource(body, "product")
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::NotFound`] for an unknown id.
    pub async fn delete_product(&self, id: i64) -> Result<(), UpstreamError> {
        self.request(Method::DELETE, &format!("products/{id}"), &[], None)
            .await?;
        Ok(())
    }

    /// List categories.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn list_categories(&self) -> Result<Vec<Category>, UpstreamError> {
        let body = self.request(Method::GET, "categories", &[], None).await?;
        Ok(normalize::collection(body, "categories", "category"))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures or non-2xx responses.
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, UpstreamError> {
        let body = self
            .request(Method::POST, "categories", &[], Some(wrap("category", category)?))
            .await?;
        normalize::resource(body, "category")
    }

    /// The configured store descriptor.
    #[must_use]
    pub fn store_info(&self) -> StoreInfo {
        self.store.clone()
    }

    /// Whether the credentials work, by listing a single product.
    pub async fn health_check(&self) -> bool {
        match self.list_products(ProductQuery::limit(1)).await {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, "Jumpseller health check failed");
                false
            }
        }
    }
}

impl CommerceApi for JumpsellerClient {
    fn list_orders(&self, query: OrderQuery) -> UpstreamFuture<'_, Vec<Order>> {
        Box::pin(Self::list_orders(self, query))
    }

    fn list_products(&self, query: ProductQuery) -> UpstreamFuture<'_, Vec<Product>> {
        Box::pin(Self::list_products(self, query))
    }

    fn store_info(&self) -> UpstreamFuture<'_, StoreInfo> {
        let store = Self::store_info(self);
        Box::pin(async move { Ok(store) })
    }

    fn create_category(&self, category: NewCategory) -> UpstreamFuture<'_, Category> {
        Box::pin(async move { Self::create_category(self, &category).await })
    }

    fn health_check(&self) -> HealthFuture<'_> {
        Box::pin(Self::health_check(self))
    }
}

fn wrap<T: serde::Serialize>(key: &str, payload: &T) -> Result<Value, UpstreamError> {
    let inner = serde_json::to_value(payload)
        .map_err(|e| UpstreamError::Transport(format!("Failed to encode request: {e}")))?;
    Ok(json!({ key: inner }))
}

fn transport_error(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Transport(error.to_string())
    }
}
