use clap::{Parser, Subcommand};

use crate::filters::{Difficulty, Timeframe};
use crate::model::{SortField, SortOrder, DEFAULT_PER_PAGE};

/// GitGood: find beginner-friendly open source repositories and issues.
///
/// Run `serve` to start the GitHub API proxy, then point the other commands
/// at it with `--api-url` or `API_URL`.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Search GitHub for beginner-friendly projects through a small token-holding proxy, with language, organization, topic, difficulty and timeframe filters."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the GitHub API proxy.
    Serve {
        /// Interface to bind. Falls back to HOST, then 0.0.0.0.
        #[clap(long)]
        host: Option<String>,

        /// Port to listen on. Falls back to PORT, then 3001.
        #[clap(short, long)]
        port: Option<u16>,

        /// GitHub API token. Falls back to GITHUB_TOKEN.
        #[clap(short, long)]
        token: Option<String>,

        /// Upstream API origin. Falls back to GITHUB_API_URL.
        #[clap(long)]
        upstream: Option<String>,
    },

    /// Search repositories through the proxy.
    Search {
        /// Free-text term; `owner/repo` also matches by name within that owner.
        #[clap(num_args = 0..)]
        term: Vec<String>,

        /// Language filter, e.g. rust or Python.
        #[clap(short, long)]
        language: Option<String>,

        /// Restrict to an organization.
        #[clap(short, long)]
        org: Option<String>,

        /// Restrict to a topic.
        #[clap(long)]
        topic: Option<String>,

        #[clap(short, long, value_enum)]
        difficulty: Option<Difficulty>,

        /// Only repositories pushed to within this window.
        #[clap(long, value_enum)]
        since: Option<Timeframe>,

        #[clap(long, value_enum, default_value_t = SortField::Stars)]
        sort: SortField,

        #[clap(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,

        /// Results per page.
        #[clap(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,

        #[clap(long, default_value = "1")]
        page: u32,

        /// Also load open issues for every repository shown.
        #[clap(short, long)]
        issues: bool,

        /// Proxy origin. Falls back to API_URL, then http://localhost:3001.
        #[clap(long)]
        api_url: Option<String>,
    },

    /// List open issues of one repository.
    Issues {
        /// Repository as owner/repo.
        repository: String,

        /// Comma-separated label names.
        #[clap(long)]
        labels: Option<String>,

        #[clap(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,

        #[clap(long)]
        api_url: Option<String>,
    },

    /// Show the remaining GitHub API budget of the proxy's token.
    RateLimit {
        #[clap(long)]
        api_url: Option<String>,
    },
}
