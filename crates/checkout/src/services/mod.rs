//! Clients for the checkout's backend collaborators.
//!
//! # Services
//!
//! - `reference` - Card expiry ranges, countries and regions
//! - `orders` - Order placement
//!
//! Each collaborator is a trait so the controller can run against the HTTP
//! clients in production and against in-memory fakes in tests.

pub mod orders;
pub mod reference;

pub use orders::{HttpOrderClient, OrderError, OrderSubmission};
pub use reference::{HttpReferenceDataClient, ReferenceData, ReferenceDataError};

use secrecy::ExposeSecret;

use crate::config::OrderApiConfig;

/// Attach the backend bearer token, if one is configured.
pub(crate) fn authorize(
    request: reqwest::RequestBuilder,
    api: &OrderApiConfig,
) -> reqwest::RequestBuilder {
    match &api.token {
        Some(token) => request.bearer_auth(token.expose_secret()),
        None => request,
    }
}

/// Truncate a response body for logging.
pub(crate) fn body_excerpt(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

/// Loopback HTTP server answering every request with one canned response.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod stub_server {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use url::Url;

    pub(crate) struct StubServer {
        base_url: Url,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubServer {
        /// Bind to an ephemeral port and serve `status` with a JSON `body`.
        pub(crate) async fn start(status: u16, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let requests = Arc::new(Mutex::new(Vec::new()));

            let seen = Arc::clone(&requests);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let (read_half, mut write_half) = stream.into_split();
                    let mut reader = BufReader::new(read_half);

                    let mut request_line = String::new();
                    if reader.read_line(&mut request_line).await.is_err() {
                        continue;
                    }
                    let mut content_length = 0;
                    loop {
                        let mut header = String::new();
                        match reader.read_line(&mut header).await {
                            Ok(0) | Err(_) => break,
                            Ok(_) if header == "\r\n" => break,
                            Ok(_) => {
                                let lower = header.to_ascii_lowercase();
                                if let Some(value) = lower.strip_prefix("content-length:") {
                                    content_length = value.trim().parse().unwrap_or(0);
                                }
                            }
                        }
                    }
                    let mut request_body = vec![0; content_length];
                    let _ = reader.read_exact(&mut request_body).await;
                    seen.lock().unwrap().push(request_line.trim_end().to_string());

                    let response = format!(
                        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = write_half.write_all(response.as_bytes()).await;
                    let _ = write_half.shutdown().await;
                }
            });

            Self {
                base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
                requests,
            }
        }

        /// Base URL to configure the client under test with.
        pub(crate) fn base_url(&self) -> Url {
            self.base_url.clone()
        }

        /// Request lines received so far, e.g. `GET /api/countries HTTP/1.1`.
        pub(crate) fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }
}
