use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::{GitGoodError, Result};
use crate::model::{Issue, IssueQuery, RateLimit, SearchRequest, SearchResponse};
use crate::query;

/// The three GitHub calls the front end needs. Passed around as a trait
/// object so the session can be driven by a fake in tests.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn search_repositories(&self, request: &SearchRequest) -> Result<SearchResponse>;

    async fn repository_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssueQuery,
    ) -> Result<Vec<Issue>>;

    async fn rate_limit(&self) -> Result<RateLimit>;
}

/// Talks to the GitGood proxy, never to GitHub directly.
#[derive(Debug, Clone)]
pub struct GitGoodClient {
    client: Client,
    api_url: String,
}

impl GitGoodClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent("gitgood-cli").build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T, P>(&self, path: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.api_url, path);
        debug!("Requesting URL: {}", url);

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = GitGoodError::from_response(status.as_u16(), &body);
            error!("Request to {} failed: {}", path, err);
            return Err(err);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GitHubApi for GitGoodClient {
    async fn search_repositories(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let params = query::search_params(request, Utc::now().date_naive());
        let response: SearchResponse = self
            .get_json("/api/github/search/repositories", &params)
            .await?;
        info!(
            "Search returned {} of {} repositories (page {})",
            response.items.len(),
            response.total_count,
            request.page
        );
        Ok(response)
    }

    async fn repository_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssueQuery,
    ) -> Result<Vec<Issue>> {
        let path = format!(
            "/api/github/repos/{}/{}/issues",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        let issues: Vec<Issue> = self.get_json(&path, &query.to_params()).await?;
        debug!("Fetched {} issues for {}/{}", issues.len(), owner, repo);
        Ok(issues)
    }

    async fn rate_limit(&self) -> Result<RateLimit> {
        let no_params: [(&str, &str); 0] = [];
        self.get_json("/api/rate-limit", &no_params).await
    }
}

/// Splits "owner/repo" into its parts.
pub fn parse_full_name(full_name: &str) -> Result<(&str, &str)> {
    match full_name.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(GitGoodError::InvalidRepository(full_name.to_string())),
    }
}
