//! Shared HTTP client with per-request interceptors.
//!
//! Interceptors run right before a request is sent, so anything they read
//! (such as the admin token) is resolved per call rather than captured when
//! the client is built.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::AuthState;
use crate::error::ApiError;

/// Header carrying the admin token
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Hook applied to every outgoing request
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Attaches the current admin token, or nothing when logged out.
pub struct AdminTokenInterceptor {
    auth: Arc<AuthState>,
}

impl AdminTokenInterceptor {
    pub fn new(auth: Arc<AuthState>) -> Self {
        Self { auth }
    }
}

impl RequestInterceptor for AdminTokenInterceptor {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => request.header(ADMIN_TOKEN_HEADER, token),
            None => request,
        }
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl ApiClient {
    /// Plain client with the JSON content type default and no interceptors.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            interceptors: Vec::new(),
        })
    }

    /// Client that sends the admin token held by `auth` on every request.
    pub fn with_auth(base_url: &str, auth: Arc<AuthState>) -> Result<Self, ApiError> {
        Ok(Self::new(base_url)?.with_interceptor(Arc::new(AdminTokenInterceptor::new(auth))))
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        decode(response).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let builder = self
            .interceptors
            .iter()
            .fold(builder, |builder, interceptor| interceptor.intercept(builder));

        let request = builder.build().map_err(|e| {
            if e.is_builder() {
                ApiError::InvalidUrl(e.to_string())
            } else {
                ApiError::from(e)
            }
        })?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(
            %method,
            %path,
            token = request.headers().contains_key(ADMIN_TOKEN_HEADER),
            "sending request"
        );

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!(%method, %path, status = status.as_u16(), %message, "request rejected");

        if status == reqwest::StatusCode::NOT_FOUND {
            Err(ApiError::NotFound(if message.is_empty() { path } else { message }))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(ApiError::from)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pull a readable message out of an error body: the JSON `message` or
/// `error` field when present, the raw text otherwise.
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(Value::String(msg)) = map.get(field) {
                return msg.clone();
            }
        }
    }
    body.trim().to_string()
}
