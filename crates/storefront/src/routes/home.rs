//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use keystand_core::Product;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
    /// Link to the barcode payment page, only for eligible products.
    pub pay_url: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            price: product.price.display(),
            image_url: product
                .image_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .map(String::from),
            pay_url: product
                .accepts_barcode_payment()
                .then(|| format!("/pay/{}", urlencoding::encode(product.id.as_str()))),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub store_name: String,
    pub products: Vec<ProductCardView>,
}

/// Display the product listing.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<HomeTemplate> {
    let products = state.backend().list_products().await?;
    let settings = state.settings().snapshot();

    Ok(HomeTemplate {
        store_name: settings.settings.store_name().to_string(),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use keystand_core::{Price, ProductId};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::routes::test_support::{get, merchant_settings, state_for};

    #[test]
    fn test_card_links_only_eligible_products() {
        let mut product = Product {
            id: ProductId::parse("a b").unwrap(),
            title: "Office Key".to_string(),
            price: Price::from_cents(2000),
            description: Some("  ".to_string()),
            image_url: None,
            barcode_image_url: Some("https://cdn.example.com/qr.png".to_string()),
        };

        let card = ProductCardView::from(&product);
        assert_eq!(card.price, "$20.00");
        assert_eq!(card.pay_url.as_deref(), Some("/pay/a%20b"));
        assert!(card.description.is_none());

        product.barcode_image_url = None;
        assert!(ProductCardView::from(&product).pay_url.is_none());
    }

    #[tokio::test]
    async fn test_home_lists_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "p-1", "title": "Pro License", "price": 19.99,
                 "barcode_image_url": "https://cdn.example.com/qr.png"},
                {"id": "p-2", "title": "Basic License", "price": 5}
            ])))
            .mount(&server)
            .await;

        let (status, body) = get(state_for(&server, merchant_settings()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Key Bazaar"));
        assert!(body.contains("Pro License"));
        assert!(body.contains("$19.99"));
        assert!(body.contains("href=\"/pay/p-1\""));
        assert!(body.contains("Basic License"));
        assert!(!body.contains("/pay/p-2"));
    }

    #[tokio::test]
    async fn test_home_backend_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (status, body) = get(state_for(&server, merchant_settings()), "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, "External service error");
    }
}
