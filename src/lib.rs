//! # GitGood
//!
//! Helps newcomers find beginner-friendly open source repositories and issues
//! through the GitHub search API.
//!
//! ## Main Components
//!
//! - [`proxy`]: stateless HTTP proxy that injects the server's GitHub token
//! - [`query`]: turns a [`SearchRequest`] into GitHub qualifier syntax
//! - [`language`]: heuristic English-text filter for repository descriptions
//! - [`SearchSession`]: search, paging, filter changes and per-repository issue loading
//! - [`GitGoodClient`]: the [`GitHubApi`] implementation that talks to the proxy
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gitgood_lib::{ClientConfig, GitGoodClient, SearchRequest, SearchSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = GitGoodClient::new(&ClientConfig::resolve(None))?;
//!     let session = SearchSession::new(Arc::new(client));
//!
//!     session.search(SearchRequest::new("cli").language("rust")).await;
//!     for card in session.snapshot().await.cards {
//!         println!("{}", card.repository.full_name);
//!     }
//!     Ok(())
//! }
//! ```

mod args;
pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod language;
pub mod model;
pub mod pagination;
pub mod proxy;
pub mod query;
pub mod report;
pub mod scoring;
pub mod session;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Command};
pub use crate::client::{GitGoodClient, GitHubApi};
pub use crate::config::{ClientConfig, ProxyConfig};
pub use crate::error::{GitGoodError, Result};
pub use crate::filters::{Difficulty, FilterSelection, Timeframe};
pub use crate::model::{Issue, IssueQuery, Repository, SearchRequest, SearchResponse};
pub use crate::session::{SearchOutcome, SearchSession};
