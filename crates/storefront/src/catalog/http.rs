//! HTTP catalog client.
//!
//! Talks JSON to a catalog service exposing `GET stock/{id}` and
//! `GET products/{id}`. Product metadata is cached with `moka` for the
//! configured TTL; stock levels always go to the network.

use std::sync::Arc;

use cartstore_core::{Product, ProductId, StockInfo};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// Maximum number of bytes of an error body kept for diagnostics.
const ERROR_BODY_LIMIT: usize = 200;

/// Body of `GET stock/{id}`.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: i64,
}

/// Client for the catalog HTTP API.
///
/// Cheaply cloneable; clones share the connection pool and cache.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    /// `None` when the configured TTL is zero.
    products: Option<Cache<ProductId, Product>>,
}

impl HttpCatalog {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        // A product added again within the TTL reuses the metadata captured
        // the first time, so price or title changes show up only after expiry.
        // A zero TTL disables the cache and fetches on every first add.
        let products = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(HttpCatalogInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                products,
            }),
        })
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Invalidate cached metadata for a product.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        if let Some(products) = &self.inner.products {
            products.invalidate(&product_id).await;
        }
    }
}

impl Catalog for HttpCatalog {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, CatalogError> {
        let stock: StockResponse = self.get_json(&format!("stock/{product_id}")).await?;
        debug!(amount = stock.amount, "Fetched stock level");
        Ok(StockInfo::new(product_id, stock.amount))
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        if let Some(products) = &self.inner.products
            && let Some(product) = products.get(&product_id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{product_id}")).await?;
        if product.id != product_id {
            return Err(CatalogError::UnexpectedProduct {
                requested: product_id,
                returned: product.id,
            });
        }

        if let Some(products) = &self.inner.products {
            products.insert(product_id, product.clone()).await;
        }

        Ok(product)
    }
}
