//! Stateless pass-through to the GitHub REST API.
//!
//! Three GET routes forward their query string unchanged, attach the server's
//! token and relay the upstream status and body verbatim. A call that never
//! gets a response turns into a 500 with `{"error": ...}`.

use actix_web::http::header::{HeaderValue, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use reqwest::{Client, Url};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::config::ProxyConfig;
use crate::error::{GitGoodError, Result};

const USER_AGENT: &str = "gitgood-proxy";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Authenticated handle on the upstream API. One per server, shared by all workers.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// What came back from upstream, ready to be relayed.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Upstream {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(
            client,
            &config.upstream_url,
            config.github_token.clone(),
        ))
    }

    pub fn with_client(client: Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// GET `path` upstream with `query` appended exactly as received.
    pub async fn get(&self, path: &str, query: &str) -> Result<UpstreamReply> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| GitGoodError::Config(format!("bad upstream URL: {}", e)))?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }

        debug!("Requesting URL: {}", url);
        let mut request = self
            .client
            .get(url)
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(remaining) = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!("Upstream rate limit remaining: {}", remaining);
        }

        let body = response.bytes().await?;
        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }

    async fn relay(&self, path: &str, query: &str) -> HttpResponse {
        match self.get(path, query).await {
            Ok(reply) => {
                if reply.status >= 400 {
                    warn!("Upstream {} answered {}", path, reply.status);
                }
                relay_reply(reply)
            }
            Err(e) => {
                error!("Upstream call to {} failed: {}", path, e);
                HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
            }
        }
    }
}

fn relay_reply(reply: UpstreamReply) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = reply
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, content_type))
        .body(reply.body)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "GitHub API proxy is running",
    }))
}

async fn rate_limit(upstream: web::Data<Upstream>) -> HttpResponse {
    upstream.relay("/rate_limit", "").await
}

async fn search_repositories(req: HttpRequest, upstream: web::Data<Upstream>) -> HttpResponse {
    upstream
        .relay("/search/repositories", req.query_string())
        .await
}

async fn repository_issues(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    upstream: web::Data<Upstream>,
) -> HttpResponse {
    let (owner, repo) = path.into_inner();
    let upstream_path = format!(
        "/repos/{}/{}/issues",
        urlencoding::encode(&owner),
        urlencoding::encode(&repo)
    );
    upstream.relay(&upstream_path, req.query_string()).await
}

/// Registers the proxy routes. Expects `web::Data<Upstream>` in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health))
        .route("/api/rate-limit", web::get().to(rate_limit))
        .route(
            "/api/github/search/repositories",
            web::get().to(search_repositories),
        )
        .route(
            "/api/github/repos/{owner}/{repo}/issues",
            web::get().to(repository_issues),
        );
}

pub async fn run_server(config: ProxyConfig) -> Result<()> {
    let upstream = web::Data::new(Upstream::new(&config)?);
    let address = config.bind_address();
    info!("Server running on {}:{}", address.0, address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(upstream.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .configure(routes)
    })
    .bind(address)?
    .run()
    .await?;
    Ok(())
}
