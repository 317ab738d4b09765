use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::dto::TokenResponse;
use crate::profiles::repo::Profile;

/// Client-side identity. The token lives in this value and nowhere else;
/// every authenticated call takes the session explicitly instead of
/// reading ambient storage.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn authenticated(token: String) -> Self {
        Self { token: Some(token) }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// User as returned by GET /api/auth (no password hash on the wire).
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("build api http client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/users", self.base_url))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .context("register request")?;
        let body: TokenResponse = check(resp).await?.json().await.context("register body")?;
        Ok(body.token)
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/auth", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("login request")?;
        let body: TokenResponse = check(resp).await?.json().await.context("login body")?;
        Ok(body.token)
    }

    pub async fn current_user(&self, session: &Session) -> anyhow::Result<CurrentUser> {
        let token = require_token(session)?;
        let resp = self
            .http
            .get(format!("{}/api/auth", self.base_url))
            .header("x-auth-token", token)
            .send()
            .await
            .context("current user request")?;
        check(resp).await?.json().await.context("current user body")
    }

    pub async fn own_profile(&self, session: &Session) -> anyhow::Result<Profile> {
        let token = require_token(session)?;
        let resp = self
            .http
            .get(format!("{}/api/profile/me", self.base_url))
            .header("x-auth-token", token)
            .send()
            .await
            .context("own profile request")?;
        check(resp).await?.json().await.context("own profile body")
    }
}

fn require_token(session: &Session) -> anyhow::Result<&str> {
    session
        .token()
        .ok_or_else(|| anyhow::anyhow!("session is not authenticated"))
}

async fn check(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    anyhow::bail!("server responded with {status}: {body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn authenticated_session_exposes_its_token() {
        let session = Session::authenticated("abc.def.ghi".into());
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn authenticated_calls_fail_fast_without_a_token() {
        let client = ApiClient::new("http://localhost:4000").expect("client");
        let err = client.current_user(&Session::default()).await.unwrap_err();
        assert!(err.to_string().contains("not authenticated"));
    }
}
