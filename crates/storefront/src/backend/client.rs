//! Backend REST client implementation.
//!
//! Uses `reqwest` for HTTP. Caches product lookups using `moka` (60-second TTL).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use keystand_core::{Product, ProductId, Settings};
use moka::future::Cache;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use super::{BackendError, ErrorBody};
use crate::config::BackendConfig;

/// Media type asking the backend for a single JSON object instead of an array.
/// Zero matching rows yields `406 Not Acceptable`.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Product cache lifetime.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Source of product records.
///
/// Implemented by [`BackendClient`]; the payment page only depends on this
/// single operation's success/failure contract.
pub trait ProductLookup: Send + Sync {
    /// Fetch one product by id.
    fn product_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, BackendError>> + Send;
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the hosted backend's REST interface.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    rest_endpoint: String,
    api_key: SecretString,
    products: Cache<ProductId, Product>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        let rest_endpoint = format!("{}/rest/v1", config.url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                rest_endpoint,
                api_key: config.anon_key.clone(),
                products,
            }),
        })
    }

    /// Start a GET request against a table.
    fn get(&self, table: &str) -> reqwest::RequestBuilder {
        let key = self.inner.api_key.expose_secret();
        self.inner
            .client
            .get(format!("{}/{table}", self.inner.rest_endpoint))
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Send a request and decode a successful JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let error_body = ErrorBody::parse(&body);
            error!(
                status = %status,
                code = ?error_body.code,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message: error_body.message.unwrap_or_default(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no product has this id, or another
    /// `BackendError` if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, BackendError> {
        if let Some(product) = self.inner.products.get(id).await {
            debug!("Product cache hit");
            return Ok(product);
        }

        let request = self
            .get("products")
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .header(ACCEPT, SINGLE_OBJECT);

        let product: Product = match self.fetch(request).await {
            Ok(product) => product,
            Err(BackendError::Rejected { status: 406, .. }) => {
                return Err(BackendError::NotFound(id.clone()));
            }
            Err(BackendError::Parse(e)) if e.is_eof() => {
                return Err(BackendError::NotFound(id.clone()));
            }
            Err(e) => return Err(e),
        };

        self.inner
            .products
            .insert(id.clone(), product.clone())
            .await;

        Ok(product)
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let request = self
            .get("products")
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let products: Vec<Product> = self.fetch(request).await?;
        debug!(count = products.len(), "Fetched product list");

        for product in &products {
            self.inner
                .products
                .insert(product.id.clone(), product.clone())
                .await;
        }

        Ok(products)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Get the merchant settings row.
    ///
    /// A missing row yields default settings.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<Settings, BackendError> {
        let request = self
            .get("settings")
            .query(&[("select", "*"), ("limit", "1")]);

        let rows: Vec<Settings> = self.fetch(request).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

impl ProductLookup for BackendClient {
    fn product_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, BackendError>> + Send {
        self.get_product_by_id(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const KEY: &str = "test-anon-key";

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&BackendConfig {
            url: Url::parse(&server.uri()).unwrap(),
            anon_key: SecretString::from(KEY),
        })
        .unwrap()
    }

    fn product_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Pro License",
            "price": 19.99,
            "description": null,
            "image_url": null,
            "barcode_image_url": "https://cdn.example.com/qr.png"
        })
    }

    #[tokio::test]
    async fn test_get_product_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("id", "eq.p-1"))
            .and(header("apikey", KEY))
            .and(header("authorization", "Bearer test-anon-key"))
            .and(header("accept", SINGLE_OBJECT))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p-1")))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let product = client
            .get_product_by_id(&ProductId::parse("p-1").unwrap())
            .await
            .unwrap();

        assert_eq!(product.title, "Pro License");
        assert_eq!(product.price.to_string(), "19.99");
        assert!(product.accepts_barcode_payment());
    }

    #[tokio::test]
    async fn test_get_product_by_id_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p-1")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let id = ProductId::parse("p-1").unwrap();
        client.get_product_by_id(&id).await.unwrap();
        client.get_product_by_id(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_product_not_acceptable_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_product_by_id(&ProductId::parse("missing").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::NotFound(ref id) if id.as_str() == "missing"));
    }

    #[tokio::test]
    async fn test_get_product_empty_body_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_product_by_id(&ProductId::parse("gone").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::NotFound(_)));
        assert_eq!(err.to_string(), "Product not found.");
    }

    #[tokio::test]
    async fn test_rejected_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_product_by_id(&ProductId::parse("p-1").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Rejected { status: 401, .. }));
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, BackendError::RateLimited(12)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[tokio::test]
    async fn test_list_products_warms_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("order", "created_at.desc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([product_json("p-1"), product_json("p-2")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let products = client.list_products().await.unwrap();
        assert_eq!(products.len(), 2);

        // Served from cache; the mock above only allows one request.
        let cached = client
            .get_product_by_id(&ProductId::parse("p-2").unwrap())
            .await
            .unwrap();
        assert_eq!(cached.id.as_str(), "p-2");
    }

    #[tokio::test]
    async fn test_get_settings_first_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/settings"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "whatsapp_url": "https://wa.me/?phone=15551234567", "store_name": "Key Bazaar"}
            ])))
            .mount(&server)
            .await;

        let settings = client_for(&server).get_settings().await.unwrap();
        assert_eq!(
            settings.whatsapp_url(),
            Some("https://wa.me/?phone=15551234567")
        );
        assert_eq!(settings.store_name(), "Key Bazaar");
    }

    #[tokio::test]
    async fn test_get_settings_no_rows_is_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let settings = client_for(&server).get_settings().await.unwrap();
        assert_eq!(settings, Settings::default());
    }
}
