// API client for interacting with the DestinyPal backend
use async_trait::async_trait;
use leptos::{provide_context, use_context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Identity backend: sign-in, password recovery and 2FA.
#[async_trait(?Send)]
pub trait AuthService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError>;
    async fn logout(&self) -> Result<MessageResponse, ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn request_password_reset(&self, request: &PasswordResetRequest) -> Result<MessageResponse, ApiError>;
    async fn confirm_password_reset(&self, request: &PasswordResetConfirm) -> Result<MessageResponse, ApiError>;
    async fn verify_two_factor(&self, code: &str) -> Result<MessageResponse, ApiError>;
}

/// Data backend used by the sponsor dashboard.
#[async_trait(?Send)]
pub trait DataApi {
    async fn list_students(&self, page: u32) -> Result<PaginatedResponse<Student>, ApiError>;
    async fn my_sponsorships(&self) -> Result<Vec<SponsorshipDetail>, ApiError>;
    async fn my_donations(&self) -> Result<PaginatedResponse<Donation>, ApiError>;
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    #[cfg(feature = "ssr")]
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            #[cfg(feature = "ssr")]
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(Method::Get, path, None).await?;
        decode(&text)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let text = self.send(Method::Post, path, Some(body)).await?;
        decode(&text)
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(Method::Post, path, None).await?;
        decode(&text)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(?method, %url, "api request");

        #[cfg(feature = "ssr")]
        {
            let request = match method {
                Method::Get => self.client.get(&url),
                Method::Post => self.client.post(&url),
            };
            let request = match &body {
                Some(body) => request.json(body),
                None => request,
            };

            let response = request
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            check_status(status.as_u16(), status.is_success(), text)
        }

        #[cfg(not(feature = "ssr"))]
        {
            use gloo_net::http::Request;
            use web_sys::RequestCredentials;

            let builder = match method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
            }
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json");

            let request = match &body {
                Some(body) => builder
                    .json(body)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?,
                None => builder
                    .build()
                    .map_err(|e| ApiError::Network(e.to_string()))?,
            };

            let response = request
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;

            check_status(response.status(), response.ok(), text)
        }
    }
}

#[async_trait(?Send)]
impl AuthService for ApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.post("/auth/login", credentials).await
    }

    async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.post_empty("/auth/logout").await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    async fn request_password_reset(&self, request: &PasswordResetRequest) -> Result<MessageResponse, ApiError> {
        self.post("/auth/password-reset/request", request).await
    }

    async fn confirm_password_reset(&self, request: &PasswordResetConfirm) -> Result<MessageResponse, ApiError> {
        self.post("/auth/password-reset/confirm", request).await
    }

    async fn verify_two_factor(&self, code: &str) -> Result<MessageResponse, ApiError> {
        self.post("/auth/2fa/verify", &serde_json::json!({ "code": code })).await
    }
}

#[async_trait(?Send)]
impl DataApi for ApiClient {
    async fn list_students(&self, page: u32) -> Result<PaginatedResponse<Student>, ApiError> {
        self.get(&format!("/students?page={}", page)).await
    }

    async fn my_sponsorships(&self) -> Result<Vec<SponsorshipDetail>, ApiError> {
        self.get("/sponsors/me/sponsorships").await
    }

    async fn my_donations(&self) -> Result<PaginatedResponse<Donation>, ApiError> {
        self.get("/donations/me").await
    }
}

fn check_status(status: u16, ok: bool, body: String) -> Result<String, ApiError> {
    if ok {
        return Ok(body);
    }

    let data = serde_json::from_str(&body).unwrap_or(Value::String(body));
    Err(ApiError::Http {
        status,
        message: extract_error_message(&data, "An error occurred"),
    })
}

/// Empty bodies decode as `{}`.
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "{}" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Human readable message from a backend error body.
///
/// Understands validation error lists (`{"detail": [{"msg": ...}]}`) and
/// plain `detail`, `message` or `error` strings.
pub fn extract_error_message(data: &Value, fallback: &str) -> String {
    match data {
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("detail") {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Object(err) => err.get("msg").and_then(Value::as_str),
                        Value::String(msg) => Some(msg.as_str()),
                        _ => None,
                    })
                    .filter(|msg| !msg.is_empty())
                    .collect();
                if !messages.is_empty() {
                    return messages.join(", ");
                }
            }

            ["detail", "message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .unwrap_or(fallback)
                .to_string()
        }
        Value::String(msg) if !msg.is_empty() => msg.clone(),
        _ => fallback.to_string(),
    }
}

pub fn provide_api_client(config: &Config) -> ApiClient {
    let client = ApiClient::new(config.api_base_url.clone());
    provide_context(client.clone());
    client
}

/// Client from context, or one for the default config if none was provided.
pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(Config::default().api_base_url))
}
