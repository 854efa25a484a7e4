// src/delivery/client.rs
//! HTTP client for the delivery-management API.
//!
//! Authentication happens once: `connect` exchanges the configured
//! credentials for a token and bakes it into the client's default headers,
//! so the read and write calls of a run share the same session.

use super::{CompletionResult, Delivery};
use crate::config::DeliveryApiConfig;
use crate::error::{AppError, DeliveryErrorCode};
use crate::pipeline::DeliverySource;
use crate::types::Cuid;
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Standard `{ "data": ... }` envelope the delivery API wraps payloads in.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Debug, Serialize)]
struct CompleteRequest<'a> {
    cuids: &'a [Cuid],
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: String,
    message: String,
}

/// Authenticated client for the delivery API.
pub struct DeliveryHttpClient {
    client: Client,
    base_url: String,
}

impl DeliveryHttpClient {
    /// Exchanges credentials for a token and returns an authenticated client.
    ///
    /// A 401/403 at login maps to `AppError::Auth`; transport failures map to
    /// `AppError::Network`.
    pub async fn connect(config: &DeliveryApiConfig) -> Result<Self, AppError> {
        let url = format!("{}/auth/login", config.base_url);
        log::debug!("POST {}", url);

        let login_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let response = login_client
            .post(&url)
            .json(&LoginRequest {
                email: &config.email,
                password: &config.password,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Auth(format!(
                "login failed for {} ({})",
                config.email, status
            )));
        }
        let body = read_success_body(response).await?;
        let envelope: Envelope<LoginData> = serde_json::from_str(&body)?;

        Self::with_token(&config.base_url, &envelope.data.token)
    }

    /// Builds a client around a pre-issued token.
    pub fn with_token(base_url: &str, token: &str) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        let bearer = format!("Bearer {}", token);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&bearer).map_err(|err| {
                AppError::MalformedResponse(format!(
                    "login token is not a valid header value: {}",
                    err
                ))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Makes a GET request to the specified endpoint.
    async fn get(&self, endpoint: &str) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl DeliverySource for DeliveryHttpClient {
    async fn in_transit(&self) -> Result<Vec<Delivery>, AppError> {
        let response = self.get("deliveries?status=in_transit").await?;
        let body = read_success_body(response).await?;
        let envelope: Envelope<Vec<Delivery>> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    async fn complete(&self, cuids: &[Cuid]) -> Result<Vec<CompletionResult>, AppError> {
        if cuids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .post("deliveries/complete", &CompleteRequest { cuids })
            .await?;
        let body = read_success_body(response).await?;
        let envelope: Envelope<Vec<CompletionResult>> = serde_json::from_str(&body)?;

        // Best-effort completion: the API may acknowledge fewer than asked.
        if envelope.data.len() < cuids.len() {
            log::warn!(
                "Delivery API confirmed {} of {} completions",
                envelope.data.len(),
                cuids.len()
            );
        }
        Ok(envelope.data)
    }
}

/// Returns the body of a 2xx response, or maps the error body into the
/// application error vocabulary.
async fn read_success_body(response: Response) -> Result<String, AppError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let code = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => {
            let code = DeliveryErrorCode::from_api_response(&parsed.error.code);
            if code.is_auth() {
                return Err(AppError::Auth(parsed.error.message));
            }
            return Err(AppError::ApiService {
                code,
                message: parsed.error.message,
                status,
            });
        }
        Err(_) => DeliveryErrorCode::from_http_status(status.as_u16()),
    };

    if code.is_auth() {
        return Err(AppError::Auth(format!("API returned {}", status)));
    }
    Err(AppError::ApiService {
        code,
        message: truncate(&body, 200),
        status,
    })
}

fn truncate(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < limit)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    }
}
