use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::backend::OrderBackend;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ChatRequest, ChatResponse, ErrorDetail, HealthStatus, Menu, OrderConfirmation, SessionEnded,
    SessionId, SessionStart,
};

/// Environment variable consulted when no base URL is given.
pub const BASE_URL_ENV: &str = "NOPICKLES_BASE_URL";

pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the NoPickles ordering service.
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl OrderClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the
    /// `NOPICKLES_BASE_URL` environment variable; failing both, the service is
    /// assumed to listen on `http://127.0.0.1:8000/`.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The URL every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Start a new ordering session.
    pub async fn start_session(&self) -> Result<SessionStart> {
        let url = self.endpoint("api/session/start")?;
        self.execute(self.client.post(url)).await
    }

    /// Send a customer message within a session.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.endpoint("api/chat")?;
        self.execute(self.client.post(url).json(request)).await
    }

    /// Finalize the order attached to `session_id`.
    ///
    /// The session id travels as a query parameter; the request has no body.
    pub async fn complete_order(&self, session_id: &SessionId) -> Result<OrderConfirmation> {
        let mut url = self.endpoint("api/order/complete")?;
        url.query_pairs_mut()
            .append_pair("session_id", session_id.as_str());
        self.execute(self.client.post(url)).await
    }

    /// End a session without completing its order.
    pub async fn end_session(&self, session_id: &SessionId) -> Result<SessionEnded> {
        let mut url = self.endpoint("api/session")?;
        url.path_segments_mut()
            .map_err(|_| Error::url("base URL cannot hold a path", None))?
            .push(session_id.as_str());
        self.execute(self.client.delete(url)).await
    }

    /// Fetch the menu, grouped by category.
    pub async fn menu(&self) -> Result<Menu> {
        let url = self.endpoint("api/menu")?;
        self.execute(self.client.get(url)).await
    }

    /// Ask the service whether it is up.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("api/health")?;
        self.execute(self.client.get(url)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.execute_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    async fn execute_inner<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Process a non-success response and convert it to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        match response.text().await {
            Ok(body) => error_from_status(status_code, &body),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }
}

#[async_trait::async_trait]
impl OrderBackend for OrderClient {
    async fn start_session(&self) -> Result<SessionStart> {
        OrderClient::start_session(self).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        OrderClient::chat(self, &request).await
    }

    async fn complete_order(&self, session_id: &SessionId) -> Result<OrderConfirmation> {
        OrderClient::complete_order(self, session_id).await
    }

    async fn end_session(&self, session_id: &SessionId) -> Result<SessionEnded> {
        OrderClient::end_session(self, session_id).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Parse a base URL, making sure relative joins keep its full path.
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(
            "base URL must not be empty",
            Some("base_url".to_string()),
        ));
    }
    let mut url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{trimmed} cannot be a base URL"), None));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Map a non-success status and its body to an [`Error`].
fn error_from_status(status_code: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorDetail>(body)
        .map(|detail| detail.message())
        .unwrap_or_else(|_| body.to_string());
    match status_code {
        400 => Error::bad_request(message),
        404 => Error::not_found(message),
        _ => Error::api(status_code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = OrderClient::new(Some("http://localhost:8000".to_string())).unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);

        let client = OrderClient::with_options(
            Some("https://kiosk.example.com/store/7".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.base_url.as_str(), "https://kiosk.example.com/store/7/");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn endpoints_keep_base_path() {
        let client = OrderClient::new(Some("https://kiosk.example.com/store/7/".to_string())).unwrap();
        assert_eq!(
            client.endpoint("api/chat").unwrap().as_str(),
            "https://kiosk.example.com/store/7/api/chat"
        );
    }

    #[test]
    fn bad_base_urls() {
        assert!(matches!(
            OrderClient::new(Some("   ".to_string())),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            OrderClient::new(Some("not a url".to_string())),
            Err(Error::Url { .. })
        ));
        assert!(matches!(
            OrderClient::new(Some("mailto:kiosk@example.com".to_string())),
            Err(Error::Url { .. })
        ));
    }

    #[test]
    fn error_mapping() {
        let err = error_from_status(404, r#"{"detail":"Session not found"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Session not found");

        let err = error_from_status(400, r#"{"detail":"Cannot complete an empty order"}"#);
        assert!(err.is_bad_request());

        let err = error_from_status(502, "upstream unavailable");
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.to_string(), "API error (502): upstream unavailable");
    }
}
