//! Auth Endpoints

use super::{ApiClient, Auth, Body, Method, TokenStore, Transport};
use crate::error::{ApiError, ApiResult};
use crate::models::{AccessToken, Credentials, TokenPair, User};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    /// OAuth2 password login; the returned pair is persisted before returning.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenPair> {
        let form = Body::Form(vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        let tokens: TokenPair = self
            .fetch_json(Method::Post, "/auth/login", Auth::None, form, "Login failed")
            .await?;
        self.tokens.store(&tokens)?;
        tracing::info!("logged in as {}", email);
        Ok(tokens)
    }

    pub async fn register(&self, email: &str, password: &str) -> ApiResult<User> {
        let body = Self::json_body(&Credentials { email, password })?;
        self.fetch_json(Method::Post, "/auth/register", Auth::None, body, "Registration failed")
            .await
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.fetch_json(Method::Get, "/auth/me", Auth::Bearer, Body::Empty, "Failed to fetch user")
            .await
    }

    /// Exchange the refresh token for a new access token. Nothing calls this
    /// automatically; expiry is noticed on the next failed request.
    pub async fn refresh_access_token(&self) -> ApiResult<AccessToken> {
        let refresh = self
            .tokens
            .refresh_token()
            .ok_or_else(|| ApiError::request(None, "Not authenticated"))?;
        let response = self
            .send_with(
                Method::Post,
                "/auth/refresh",
                Some(refresh),
                Body::Empty,
                "Failed to refresh token",
            )
            .await?;
        let token: AccessToken = super::decode(&response)?;
        self.tokens.store_access_token(&token.access_token)?;
        Ok(token)
    }

    /// Local only; the backend has no revocation endpoint.
    pub fn logout(&self) {
        self.tokens.clear();
        tracing::info!("logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{client, MockTransport};
    use super::super::MemoryTokenStore;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_posts_form_and_stores_tokens() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            json!({"access_token": "acc", "refresh_token": "ref", "token_type": "bearer"}),
        );
        let tokens = MemoryTokenStore::new();
        let api = client(&mock, &tokens);

        api.login("me@example.com", "secret").await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "/api/v1/auth/login");
        assert_eq!(request.bearer, None);
        assert_eq!(
            request.body,
            Body::Form(vec![
                ("username".to_string(), "me@example.com".to_string()),
                ("password".to_string(), "secret".to_string()),
            ])
        );
        assert_eq!(tokens.access_token().as_deref(), Some("acc"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("ref"));
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_store_empty() {
        let mock = MockTransport::new();
        mock.respond(401, json!({"detail": "Incorrect email or password"}));
        let tokens = MemoryTokenStore::new();
        let api = client(&mock, &tokens);

        let err = api.login("me@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.message(), "Incorrect email or password");
        assert!(tokens.is_empty());
    }

    #[tokio::test]
    async fn test_register_sends_json() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            json!({"id": 3, "email": "new@example.com", "is_active": true, "is_superuser": false}),
        );
        let api = client(&mock, &MemoryTokenStore::new());

        let user = api.register("new@example.com", "pw").await.unwrap();
        assert_eq!(user.email, "new@example.com");
        assert_eq!(
            mock.last_request().unwrap().body,
            Body::Json(json!({"email": "new@example.com", "password": "pw"}))
        );
    }

    #[tokio::test]
    async fn test_current_user_sends_bearer() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"id": 1, "email": "me@example.com", "is_active": true, "is_superuser": false}));
        let api = client(&mock, &MemoryTokenStore::with_tokens("acc", "ref"));

        let user = api.current_user().await.unwrap();
        assert_eq!(user.id.as_str(), "1");
        let request = mock.last_request().unwrap();
        assert_eq!(request.url, "/api/v1/auth/me");
        assert_eq!(request.bearer.as_deref(), Some("acc"));
    }

    #[tokio::test]
    async fn test_refresh_uses_refresh_token_and_keeps_it() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"access_token": "acc2", "token_type": "bearer"}));
        let tokens = MemoryTokenStore::with_tokens("acc", "ref");
        let api = client(&mock, &tokens);

        api.refresh_access_token().await.unwrap();

        assert_eq!(mock.last_request().unwrap().bearer.as_deref(), Some("ref"));
        assert_eq!(tokens.access_token().as_deref(), Some("acc2"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("ref"));
    }

    #[test]
    fn test_logout_clears_both_tokens() {
        let mock = MockTransport::new();
        let tokens = MemoryTokenStore::with_tokens("acc", "ref");
        client(&mock, &tokens).logout();
        assert!(tokens.is_empty());
        assert_eq!(mock.request_count(), 0);
    }
}
