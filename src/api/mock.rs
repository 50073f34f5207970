//! Canned-response transport for tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiClient, HttpRequest, HttpResponse, MemoryTokenStore, Transport};
use crate::error::{ApiError, ApiResult};

#[derive(Default)]
struct MockState {
    responses: VecDeque<ApiResult<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

/// Replays queued responses in order and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.respond_raw(status, &body.to_string())
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.inner.borrow_mut().responses.push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    /// Queue a transport-level failure
    pub fn fail(&self, message: &str) -> &Self {
        self.inner
            .borrow_mut()
            .responses
            .push_back(Err(ApiError::request(None, message)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.inner.borrow().requests.last().cloned()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut state = self.inner.borrow_mut();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::request(None, "no canned response")))
    }
}

/// Client over `mock` and `tokens` with the default `/api/v1` base
pub fn client(mock: &MockTransport, tokens: &MemoryTokenStore) -> ApiClient<MockTransport, MemoryTokenStore> {
    ApiClient::new(mock.clone(), tokens.clone(), "/api/v1")
}
