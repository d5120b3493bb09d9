//! GitHub-backed upstream: raw.githubusercontent.com for file bodies, the REST
//! API for directory listings and recursive trees.

use crate::config::UpstreamConfig;
use crate::error::BuildError;
use crate::upstream::contract::UpstreamSource;
use crate::upstream::types::{repo_path, ContentEntry, RawFetch, TreeListing};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Raw-content URL for `path` on the configured branch.
pub fn raw_url(config: &UpstreamConfig, path: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        config.raw_base.trim_end_matches('/'),
        config.owner,
        config.repo,
        config.branch,
        repo_path(path)
    )
}

/// Contents API URL listing `path` on the configured branch.
pub fn contents_url(config: &UpstreamConfig, path: &str) -> String {
    format!(
        "{}/repos/{}/{}/contents/{}?ref={}",
        config.api_base.trim_end_matches('/'),
        config.owner,
        config.repo,
        repo_path(path),
        config.branch
    )
}

/// Git trees API URL for a recursive listing of `sha`.
pub fn tree_url(config: &UpstreamConfig, sha: &str) -> String {
    format!(
        "{}/repos/{}/{}/git/trees/{}?recursive=1",
        config.api_base.trim_end_matches('/'),
        config.owner,
        config.repo,
        sha
    )
}

/// Parse a contents API response. A file path yields an object, not an array.
pub fn parse_contents(path: &str, body: &str) -> Result<Vec<ContentEntry>, BuildError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| BuildError::json(format!("listing of {}", path), e))?;
    if !value.is_array() {
        return Err(BuildError::Upstream(format!(
            "{} is not a directory upstream",
            path
        )));
    }
    serde_json::from_value(value).map_err(|e| BuildError::json(format!("listing of {}", path), e))
}

/// Parse a git trees API response.
pub fn parse_tree(sha: &str, body: &str) -> Result<TreeListing, BuildError> {
    serde_json::from_str(body).map_err(|e| BuildError::json(format!("tree {}", sha), e))
}

pub struct GitHubClient {
    http: reqwest::Client,
    config: UpstreamConfig,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client, reading the API token from `config.token_env`.
    pub fn from_env(config: &UpstreamConfig) -> Result<Self, BuildError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::debug!(
                token_env = %config.token_env,
                "No API token set; using unauthenticated rate limits"
            );
        }
        Self::new(config, token)
    }

    pub fn new(config: &UpstreamConfig, token: Option<String>) -> Result<Self, BuildError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|source| BuildError::Network {
            url: config.api_base.clone(),
            source,
        })?;
        Ok(Self {
            http,
            config: config.clone(),
            token,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn api_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url).header(reqwest::header::ACCEPT, GITHUB_ACCEPT);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, BuildError> {
        request.send().await.map_err(|source| BuildError::Network {
            url: url.to_string(),
            source,
        })
    }

    /// GET an API url and return its body, failing on non-success status.
    async fn api_get_text(&self, url: &str) -> Result<String, BuildError> {
        let response = self.send(self.api_request(url), url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|source| BuildError::Network {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl UpstreamSource for GitHubClient {
    fn label(&self) -> String {
        format!(
            "github:{}/{}@{}",
            self.config.owner, self.config.repo, self.config.branch
        )
    }

    async fn fetch_raw(&self, path: &str) -> Result<RawFetch, BuildError> {
        let url = raw_url(&self.config, path);
        let response = self.send(self.http.get(&url), &url).await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(RawFetch::Unavailable {
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| BuildError::Network { url, source })?;
        Ok(RawFetch::Found(bytes.to_vec()))
    }

    async fn download(&self, path: &str, dest: &Path) -> Result<u64, BuildError> {
        let url = raw_url(&self.config, path);
        let response = self.send(self.http.get(&url), &url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| BuildError::io(dest, e))?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| BuildError::Network {
                url: url.clone(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| BuildError::io(dest, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| BuildError::io(dest, e))?;

        tracing::debug!(%url, dest = %dest.display(), bytes = written, "Downloaded");
        Ok(written)
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<ContentEntry>, BuildError> {
        let url = contents_url(&self.config, path);
        let body = self.api_get_text(&url).await?;
        parse_contents(path, &body)
    }

    async fn fetch_tree(&self, sha: &str) -> Result<TreeListing, BuildError> {
        let url = tree_url(&self.config, sha);
        let body = self.api_get_text(&url).await?;
        parse_tree(sha, &body)
    }
}
