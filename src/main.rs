use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info};

use gitgood_lib::client::parse_full_name;
use gitgood_lib::{
    proxy, report, Args, ClientConfig, Command, FilterSelection, GitGoodClient, GitHubApi,
    IssueQuery, ProxyConfig, SearchOutcome, SearchRequest, SearchSession,
};

fn spinner(message: String) -> Result<ProgressBar, Box<dyn Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize the tracing logger
    tracing_subscriber::fmt::init();

    dotenv().ok();

    let args = Args::parse();
    match args.command {
        Command::Serve {
            host,
            port,
            token,
            upstream,
        } => {
            let config = ProxyConfig::resolve(
                host.as_deref(),
                port,
                token.as_deref(),
                upstream.as_deref(),
            )?;
            proxy::run_server(config).await?;
        }

        Command::Search {
            term,
            language,
            org,
            topic,
            difficulty,
            since,
            sort,
            order,
            per_page,
            page,
            issues,
            api_url,
        } => {
            let client = GitGoodClient::new(&ClientConfig::resolve(api_url.as_deref()))?;
            let session = SearchSession::new(Arc::new(client));

            let filters = FilterSelection {
                difficulty,
                language,
                timeframe: since,
            };
            session.set_filters(filters).await;

            let mut request = SearchRequest::new(term.join(" "))
                .sort(sort, order)
                .per_page(per_page)
                .page(page);
            request.organization = org;
            request.topic = topic;

            let pb = spinner("Loading repositories...".to_string())?;
            let outcome = session.search(request).await;
            pb.finish_and_clear();

            match outcome {
                SearchOutcome::Skipped => {
                    println!("Search for repositories to get started: give a term or a filter.");
                    return Ok(());
                }
                SearchOutcome::Failed(message) => {
                    error!("Search failed: {}", message);
                    return Err(message.into());
                }
                SearchOutcome::Superseded => return Ok(()),
                SearchOutcome::Applied { shown, hidden } => {
                    info!("{} repositories shown, {} hidden", shown, hidden);
                }
            }

            if issues {
                let ids: Vec<u64> = session
                    .snapshot()
                    .await
                    .cards
                    .iter()
                    .map(|c| c.repository.id)
                    .collect();
                let pb = spinner(format!("Loading issues for {} repositories...", ids.len()))?;
                join_all(ids.into_iter().map(|id| session.expand(id))).await;
                pb.finish_and_clear();
            }

            let state = session.snapshot().await;
            if let Some(line) = report::filters(&state.filters) {
                println!("{}\n", line);
            }
            if state.cards.is_empty() {
                println!("No repositories found.");
            }
            let now = Utc::now();
            for card in &state.cards {
                println!("{}\n", report::card(card, now));
            }
            if let Some(pagination) = session.pagination().await {
                println!("{}", report::pagination(&pagination));
            }
        }

        Command::Issues {
            repository,
            labels,
            per_page,
            api_url,
        } => {
            let (owner, repo) = parse_full_name(&repository)?;
            let client = GitGoodClient::new(&ClientConfig::resolve(api_url.as_deref()))?;
            let query = IssueQuery {
                labels,
                per_page,
                ..IssueQuery::default()
            };

            let pb = spinner(format!("Loading issues for {}...", repository))?;
            let result = client.repository_issues(owner, repo, &query).await;
            pb.finish_and_clear();

            let issues = result.map_err(|e| {
                error!("Error fetching issues for {}: {}", repository, e);
                e.user_message("issues")
            })?;
            let issues: Vec<_> = issues.iter().filter(|i| !i.is_pull_request()).collect();
            if issues.is_empty() {
                println!("No open issues in {}", repository);
            }
            for issue in issues {
                println!("{}\n", report::issue(issue));
            }
        }

        Command::RateLimit { api_url } => {
            let client = GitGoodClient::new(&ClientConfig::resolve(api_url.as_deref()))?;
            let limit = client.rate_limit().await.map_err(|e| {
                error!("Error fetching rate limit: {}", e);
                e.user_message("rate limit info")
            })?;
            println!("{}", report::rate_limit(&limit));
        }
    }

    Ok(())
}
