//! REST API Client
//!
//! Typed bindings to the backend, organized by domain.

mod auth;
mod projects;
mod tasks;
mod token_store;
mod transport;

#[cfg(test)]
pub mod mock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::RecordId;

pub use token_store::{LocalStorageTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{Body, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

/// Characters escaped in an id path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client used by the running app
pub type BrowserApi = ApiClient<ReqwestTransport, LocalStorageTokenStore>;

pub fn browser_client(config: &AppConfig) -> BrowserApi {
    ApiClient::new(
        ReqwestTransport::for_browser(),
        LocalStorageTokenStore::new(&config.access_token_key, &config.refresh_token_key),
        &config.api_base,
    )
}

/// Whether a request carries the stored access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    None,
    Bearer,
}

pub struct ApiClient<T, S> {
    transport: T,
    tokens: S,
    base: String,
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub fn new(transport: T, tokens: S, base: impl Into<String>) -> Self {
        Self {
            transport,
            tokens,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn segment(id: &RecordId) -> String {
        utf8_percent_encode(id.as_str(), PATH_SEGMENT).to_string()
    }

    fn json_body<P: Serialize + ?Sized>(payload: &P) -> ApiResult<Body> {
        serde_json::to_value(payload)
            .map(Body::Json)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send with an explicit bearer token; non-2xx and transport failures
    /// become `ApiError::Request` with the backend message or `fallback`.
    async fn send_with(
        &self,
        method: Method,
        path: &str,
        bearer: Option<String>,
        body: Body,
        fallback: &str,
    ) -> ApiResult<HttpResponse> {
        let request = HttpRequest {
            method,
            url: self.url(path),
            bearer,
            body,
        };
        tracing::debug!("{} {}", method.as_str(), request.url);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", method.as_str(), path, e);
                return Err(ApiError::request(None, fallback));
            }
        };
        if !response.is_success() {
            tracing::warn!("{} {} -> {}", method.as_str(), path, response.status);
            return Err(ApiError::from_response(response.status, &response.body, fallback));
        }
        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Body,
        fallback: &str,
    ) -> ApiResult<HttpResponse> {
        let bearer = match auth {
            Auth::None => None,
            Auth::Bearer => Some(
                self.tokens
                    .access_token()
                    .ok_or_else(|| ApiError::request(None, "Not authenticated"))?,
            ),
        };
        self.send_with(method, path, bearer, body, fallback).await
    }

    async fn fetch_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Body,
        fallback: &str,
    ) -> ApiResult<R> {
        let response = self.send(method, path, auth, body, fallback).await?;
        decode(&response)
    }
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> ApiResult<R> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
