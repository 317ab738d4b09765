use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GithubConfig;

const USER_AGENT: &str = concat!("devconnect/", env!("CARGO_PKG_VERSION"));

/// Subset of the upstream repository payload that the API exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubRepo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub private: bool,
}

#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Five oldest repositories of the given user. Any upstream failure,
    /// including a non-200 status, surfaces as an error; callers map it to
    /// a single not-found response.
    async fn list_repos(&self, username: &str) -> anyhow::Result<Vec<GithubRepo>>;
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(cfg: &GithubConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .context("build github http client")?;
        Ok(Self {
            http,
            base_url: cfg.api_base.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
        })
    }
}

/// GitHub logins are ASCII alphanumerics and hyphens. Anything else cannot
/// exist upstream, so it is rejected before a request is made.
pub(crate) fn is_valid_login(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 39
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn list_repos(&self, username: &str) -> anyhow::Result<Vec<GithubRepo>> {
        if !is_valid_login(username) {
            anyhow::bail!("not a valid github login: {username:?}");
        }

        let url = format!("{}/users/{}/repos", self.base_url, username);
        let mut req = self.http.get(&url).query(&[
            ("per_page", "5"),
            ("sort", "created"),
            ("direction", "asc"),
        ]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.context("github request failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("github responded with {status}");
        }

        let repos: Vec<GithubRepo> = resp.json().await.context("decode github response")?;
        debug!(%username, count = repos.len(), "github repos fetched");
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_logins() {
        assert!(is_valid_login("octocat"));
        assert!(is_valid_login("rust-lang"));
        assert!(is_valid_login("a1-b2"));
    }

    #[test]
    fn rejects_impossible_logins() {
        assert!(!is_valid_login(""));
        assert!(!is_valid_login("no spaces"));
        assert!(!is_valid_login("path/../traversal"));
        assert!(!is_valid_login("name?query=1"));
        assert!(!is_valid_login(&"x".repeat(40)));
    }

    #[test]
    fn repo_payload_tolerates_missing_optional_fields() {
        let raw = serde_json::json!([{
            "id": 1,
            "name": "demo",
            "full_name": "octocat/demo",
            "html_url": "https://github.com/octocat/demo"
        }]);
        let repos: Vec<GithubRepo> = serde_json::from_value(raw).expect("parse");
        assert_eq!(repos[0].name, "demo");
        assert_eq!(repos[0].stargazers_count, 0);
        assert!(repos[0].description.is_none());
    }
}
