//! Token Storage
//!
//! Access and refresh tokens live under fixed keys and are always cleared
//! together.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ApiError, ApiResult};
use crate::models::TokenPair;

pub trait TokenStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store(&self, tokens: &TokenPair) -> ApiResult<()>;
    /// Replace only the access token (after a refresh)
    fn store_access_token(&self, token: &str) -> ApiResult<()>;
    fn clear(&self);
}

/// Browser `localStorage` store
#[derive(Debug, Clone)]
pub struct LocalStorageTokenStore {
    access_key: String,
    refresh_key: String,
}

impl LocalStorageTokenStore {
    pub fn new(access_key: impl Into<String>, refresh_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            refresh_key: refresh_key.into(),
        }
    }

    fn storage(&self) -> ApiResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| ApiError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| ApiError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| ApiError::Storage("localStorage disabled".to_string()))
    }

    fn get(&self, key: &str) -> Option<String> {
        self.storage()
            .ok()?
            .get_item(key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| ApiError::Storage(format!("{:?}", e)))
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn access_token(&self) -> Option<String> {
        self.get(&self.access_key)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(&self.refresh_key)
    }

    fn store(&self, tokens: &TokenPair) -> ApiResult<()> {
        self.set(&self.access_key, &tokens.access_token)?;
        self.set(&self.refresh_key, &tokens.refresh_token)
    }

    fn store_access_token(&self, token: &str) -> ApiResult<()> {
        self.set(&self.access_key, token)
    }

    fn clear(&self) {
        if let Ok(storage) = self.storage() {
            let _ = storage.remove_item(&self.access_key);
            let _ = storage.remove_item(&self.refresh_key);
        }
    }
}

#[derive(Debug, Default)]
struct StoredTokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// In-memory store; clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Rc<RefCell<StoredTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.borrow_mut();
            inner.access = Some(access.to_string());
            inner.refresh = Some(refresh.to_string());
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        let inner = self.inner.borrow();
        inner.access.is_none() && inner.refresh.is_none()
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.inner.borrow().access.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.borrow().refresh.clone()
    }

    fn store(&self, tokens: &TokenPair) -> ApiResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.access = Some(tokens.access_token.clone());
        inner.refresh = Some(tokens.refresh_token.clone());
        Ok(())
    }

    fn store_access_token(&self, token: &str) -> ApiResult<()> {
        self.inner.borrow_mut().access = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.inner.borrow_mut() = StoredTokens::default();
    }
}
