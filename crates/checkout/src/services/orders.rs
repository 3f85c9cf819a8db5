//! Order placement against the backend checkout API.

use std::sync::Arc;

use async_trait::async_trait;
use checkout_core::{Purchase, PurchaseResponse};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::{CheckoutConfig, OrderApiConfig};
use crate::services::{authorize, body_excerpt};

const PURCHASE_PATH: &str = "checkout/purchase";

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API rejected the purchase.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OrderError {
    /// Human-readable message for the shopper.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(err) => err.to_string(),
            Self::Parse(message) => format!("Unexpected response from the order service: {message}"),
        }
    }

    /// Whether the failure lies with the transport or the backend rather
    /// than with the submitted data.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500,
            Self::Http(_) | Self::Parse(_) => true,
        }
    }
}

/// Places orders with the backend.
#[async_trait]
pub trait OrderSubmission: Send + Sync {
    /// Submit a purchase and return the backend's tracking number.
    async fn place_order(&self, purchase: &Purchase) -> Result<PurchaseResponse, OrderError>;
}

/// Error body returned by the backend (Spring Boot's default shape).
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pick the most useful human-readable message out of an error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .message
                .filter(|m| !m.is_empty())
                .or(parsed.error)
        })
        .unwrap_or_else(|| body_excerpt(body, 200))
}

/// Order client backed by the backend's `POST /checkout/purchase` endpoint.
#[derive(Clone)]
pub struct HttpOrderClient {
    inner: Arc<HttpOrderClientInner>,
}

struct HttpOrderClientInner {
    client: reqwest::Client,
    api: OrderApiConfig,
}

impl HttpOrderClient {
    /// Create a new order client.
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            inner: Arc::new(HttpOrderClientInner {
                client: reqwest::Client::new(),
                api: config.api.clone(),
            }),
        }
    }
}

#[async_trait]
impl OrderSubmission for HttpOrderClient {
    #[instrument(skip(self, purchase), fields(items = purchase.order_items.len()))]
    async fn place_order(&self, purchase: &Purchase) -> Result<PurchaseResponse, OrderError> {
        let url = self
            .inner
            .api
            .endpoint(PURCHASE_PATH)
            .map_err(|e| OrderError::Parse(format!("Invalid endpoint URL: {e}")))?;

        let request = authorize(self.inner.client.post(url), &self.inner.api).json(purchase);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body_excerpt(&body, 500),
                "Order API rejected purchase"
            );
            return Err(OrderError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_excerpt(&body, 500),
                "Failed to parse order API response"
            );
            OrderError::Parse(e.to_string())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use checkout_core::{Address, Customer, Order};

    use super::*;
    use crate::services::stub_server::StubServer;

    fn purchase() -> Purchase {
        let address = Address {
            street: "Via Roma 1".to_string(),
            city: "Roma".to_string(),
            region: "Lazio".to_string(),
            country: "Italy".to_string(),
            zip_code: "00184".to_string(),
        };
        Purchase {
            customer: Customer {
                first_name: "Mario".to_string(),
                last_name: "Rossi".to_string(),
                email: "mario.rossi@example.it".to_string(),
            },
            shipping_address: address.clone(),
            billing_address: address,
            order: Order::default(),
            order_items: Vec::new(),
        }
    }

    fn client_for(server: &StubServer) -> HttpOrderClient {
        HttpOrderClient::new(&CheckoutConfig::new(server.base_url()))
    }

    #[tokio::test]
    async fn test_place_order_returns_tracking_number() {
        let server = StubServer::start(200, r#"{"orderTrackingNumber":"TRK123"}"#).await;
        let client = client_for(&server);

        let response = client.place_order(&purchase()).await.unwrap();

        assert_eq!(response.order_tracking_number, "TRK123");
        assert_eq!(
            server.requests(),
            vec!["POST /api/checkout/purchase HTTP/1.1"]
        );
    }

    #[tokio::test]
    async fn test_place_order_maps_rejection_to_api_error() {
        let server = StubServer::start(
            400,
            r#"{"status":400,"error":"Bad Request","message":"Cart is empty"}"#,
        )
        .await;
        let client = client_for(&server);

        let err = client.place_order(&purchase()).await.unwrap_err();

        assert!(matches!(
            err,
            OrderError::Api { status: 400, ref message } if message == "Cart is empty"
        ));
        assert!(!err.is_server_side());
    }

    #[tokio::test]
    async fn test_place_order_rejects_unexpected_body() {
        let server = StubServer::start(200, r#"{"unexpected":true}"#).await;
        let client = client_for(&server);

        let err = client.place_order(&purchase()).await.unwrap_err();

        assert!(matches!(err, OrderError::Parse(_)));
    }

    #[test]
    fn test_extract_error_message_prefers_message_field() {
        let body = r#"{"status":400,"error":"Bad Request","message":"Cart is empty"}"#;
        assert_eq!(extract_error_message(body), "Cart is empty");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_error_field() {
        let body = r#"{"status":500,"error":"Internal Server Error","message":""}"#;
        assert_eq!(extract_error_message(body), "Internal Server Error");
    }

    #[test]
    fn test_extract_error_message_uses_raw_body() {
        assert_eq!(extract_error_message("gateway down"), "gateway down");
    }

    #[test]
    fn test_order_error_classification() {
        let client_side = OrderError::Api {
            status: 422,
            message: "Invalid zip".to_string(),
        };
        assert!(!client_side.is_server_side());
        assert_eq!(client_side.message(), "Invalid zip");

        assert!(OrderError::Parse("eof".to_string()).is_server_side());
    }
}
