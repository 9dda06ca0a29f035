//! HTTP client for the 3Commas public API.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Scope, ThreeCommasApi};
use crate::config::{ApiConfig, DEFAULT_BASE_URL};
use crate::domain::{Account, Bot, Deal};

/// Path prefix of every public endpoint. Part of the signed payload.
const API_PREFIX: &str = "/public/api";

/// 3Commas API error.
#[derive(Debug, Error)]
#[error("3commas api error {status} ({code}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Configuration for creating a new Client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub request_timeout: Duration,
    pub retries: u32,
    pub retry_status_codes: Vec<u16>,
}

impl ClientConfig {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            api_secret,
            request_timeout: Duration::from_secs(10),
            retries: 1,
            retry_status_codes: vec![StatusCode::BAD_GATEWAY.as_u16()],
        }
    }
}

impl From<&ApiConfig> for ClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.api_key.clone(),
            api_secret: api.api_secret.clone(),
            request_timeout: api.request_timeout,
            retries: api.retries,
            retry_status_codes: api.retry_status_codes.clone(),
        }
    }
}

/// HTTP client for the 3Commas API.
/// Handles request signing, the fixed retry policy and error decoding.
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
}

impl Client {
    /// Creates a new 3Commas API client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Creates a new client from the `api` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(ClientConfig::from(api))
    }

    /// Sends a signed GET request and returns the raw body.
    ///
    /// Retries up to `retries` extra times when the response status is one
    /// of `retry_status_codes`.
    pub async fn request(&self, endpoint: &str, params: &BTreeMap<&str, String>) -> Result<Vec<u8>> {
        let path = signed_path(endpoint, params);
        let url = format!("{}{}", self.config.base_url, path);
        let signature = sign(&self.config.api_secret, &path);

        let mut headers = HeaderMap::new();
        headers.insert(
            "APIKEY",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|_| ClientError::InvalidHeader("APIKEY"))?,
        );
        headers.insert(
            "Signature",
            HeaderValue::from_str(&signature).map_err(|_| ClientError::InvalidHeader("Signature"))?,
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(endpoint = %endpoint, attempt, "sending request");

            let response = self
                .http_client
                .get(&url)
                .headers(headers.clone())
                .send()
                .await?;

            let status = response.status();
            let body = response.bytes().await?;

            if status.is_success() {
                return Ok(body.to_vec());
            }

            if self.should_retry(status, attempt) {
                warn!(endpoint = %endpoint, status = status.as_u16(), attempt, "retrying request");
                continue;
            }

            return Err(parse_error_response(status, &body));
        }
    }

    /// True when `status` is retryable and attempts are left.
    fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        attempt <= self.config.retries && self.config.retry_status_codes.contains(&status.as_u16())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &BTreeMap<&str, String>,
    ) -> Result<T> {
        let body = self.request(endpoint, params).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ThreeCommasApi for Client {
    async fn list_bots(&self, limit: u32, offset: u32) -> Result<Vec<Bot>> {
        let mut params = BTreeMap::new();
        params.insert("limit", limit.to_string());
        params.insert("offset", offset.to_string());
        self.get_json("/ver1/bots", &params).await
    }

    async fn show_bot(&self, bot_id: u64) -> Result<Bot> {
        self.get_json(&format!("/ver1/bots/{}/show", bot_id), &BTreeMap::new())
            .await
    }

    async fn list_deals(
        &self,
        bot_id: Option<u64>,
        offset: u32,
        limit: u32,
        scope: Scope,
    ) -> Result<Vec<Deal>> {
        let mut params = BTreeMap::new();
        if let Some(bot_id) = bot_id {
            params.insert("bot_id", bot_id.to_string());
        }
        params.insert("offset", offset.to_string());
        params.insert("limit", limit.to_string());
        params.insert("scope", scope.to_string());
        self.get_json("/ver1/deals", &params).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get_json("/ver1/accounts", &BTreeMap::new()).await
    }
}

/// Builds `/public/api{endpoint}?k=v&...` with keys in ASCII order.
fn signed_path(endpoint: &str, params: &BTreeMap<&str, String>) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}{}", API_PREFIX, endpoint)
    } else {
        format!("{}{}?{}", API_PREFIX, endpoint, query)
    }
}

/// HMAC-SHA256 of the payload, lowercase hex.
fn sign(secret: &str, payload: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Creates a ClientError from an error response.
fn parse_error_response(status: StatusCode, body: &[u8]) -> ClientError {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<String>,
        error_description: Option<String>,
    }

    let api_err = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(resp) => ApiError {
            status: status.as_u16(),
            code: resp.error.clone().unwrap_or_else(|| status.to_string()),
            message: resp
                .error_description
                .or(resp.error)
                .unwrap_or_else(|| String::from_utf8_lossy(body).to_string()),
        },
        Err(_) => ApiError {
            status: status.as_u16(),
            code: status.to_string(),
            message: String::from_utf8_lossy(body).to_string(),
        },
    };

    warn!(status = api_err.status, code = %api_err.code, message = %api_err.message, "api error");

    ClientError::Api(api_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_known_vector() {
        // RFC 4231, test case 2.
        assert_eq!(
            sign("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_is_lowercase_hex() {
        let signature = sign("secret", "/public/api/ver1/accounts");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(signature, sign("secret", "/public/api/ver1/accounts"));
    }

    #[test]
    fn test_signed_path_sorts_params() {
        let mut params = BTreeMap::new();
        params.insert("scope", "finished".to_string());
        params.insert("offset", "1000".to_string());
        params.insert("limit", "1000".to_string());
        params.insert("bot_id", "42".to_string());

        assert_eq!(
            signed_path("/ver1/deals", &params),
            "/public/api/ver1/deals?bot_id=42&limit=1000&offset=1000&scope=finished"
        );
    }

    #[test]
    fn test_signed_path_without_params() {
        assert_eq!(signed_path("/ver1/accounts", &BTreeMap::new()), "/public/api/ver1/accounts");
    }

    #[test]
    fn test_signed_path_encodes_values() {
        let mut params = BTreeMap::new();
        params.insert("name", "a b&c".to_string());
        assert_eq!(signed_path("/ver1/bots", &params), "/public/api/ver1/bots?name=a%20b%26c");
    }

    #[test]
    fn test_parse_error_response_with_description() {
        let body = br#"{"error":"signature_invalid","error_description":"Provided signature is invalid"}"#;
        match parse_error_response(StatusCode::UNAUTHORIZED, body) {
            ClientError::Api(err) => {
                assert_eq!(err.status, 401);
                assert_eq!(err.code, "signature_invalid");
                assert_eq!(err.message, "Provided signature is invalid");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_response_plain_body() {
        match parse_error_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>") {
            ClientError::Api(err) => {
                assert_eq!(err.status, 502);
                assert_eq!(err.message, "<html>bad gateway</html>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_should_retry_once_on_bad_gateway() {
        let client = Client::new(ClientConfig::new("k".into(), "s".into())).unwrap();
        assert!(client.should_retry(StatusCode::BAD_GATEWAY, 1));
        assert!(!client.should_retry(StatusCode::BAD_GATEWAY, 2));
        assert!(!client.should_retry(StatusCode::TOO_MANY_REQUESTS, 1));
    }

    #[test]
    fn test_client_config_from_api_config() {
        let api = ApiConfig {
            base_url: "http://localhost:9000/".to_string(),
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
            ..ApiConfig::default()
        };
        let config = ClientConfig::from(&api);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.retries, 1);
        assert_eq!(config.retry_status_codes, vec![502]);
    }
}
