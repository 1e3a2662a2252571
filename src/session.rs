//! Search orchestration for one user session: submitting searches, paging,
//! re-running on filter changes and loading issues per repository card.
//!
//! Every search takes a new generation number. When a response comes back
//! after a newer search has started it is dropped without touching state, so
//! the latest submission always wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::GitHubApi;
use crate::filters::{Difficulty, FilterSelection};
use crate::language;
use crate::model::{Issue, IssueQuery, Repository, SearchRequest};
use crate::pagination::Pagination;
use crate::query;

#[derive(Debug, Clone, PartialEq)]
pub enum IssueState {
    NotLoaded,
    Loading,
    Loaded(Vec<Issue>),
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryCard {
    pub repository: Repository,
    pub expanded: bool,
    pub issues: IssueState,
}

impl RepositoryCard {
    fn new(repository: Repository) -> Self {
        Self {
            repository,
            expanded: false,
            issues: IssueState::NotLoaded,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub filters: FilterSelection,
    /// Last submitted request, before filters were merged in.
    pub last_request: Option<SearchRequest>,
    pub cards: Vec<RepositoryCard>,
    pub total_count: u64,
    /// Results hidden by the English-text filter on the current page.
    pub hidden_count: usize,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { shown: usize, hidden: usize },
    Failed(String),
    /// A newer search started while this one was in flight.
    Superseded,
    /// Nothing to search for; no request was sent.
    Skipped,
}

pub struct SearchSession {
    api: Arc<dyn GitHubApi>,
    state: Mutex<SessionState>,
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(api: Arc<dyn GitHubApi>) -> Self {
        Self {
            api,
            state: Mutex::new(SessionState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn search(&self, request: SearchRequest) -> SearchOutcome {
        let filters = self.state.lock().await.filters.clone();
        let merged = merge_filters(&request, &filters);
        if !query::has_criteria(&merged) {
            debug!("Search skipped, no term or filters");
            return SearchOutcome::Skipped;
        }

        let generation = {
            let mut state = self.state.lock().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
            state.last_request = Some(request);
            generation
        };

        let result = self.api.search_repositories(&merged).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping results of superseded search #{}", generation);
            return SearchOutcome::Superseded;
        }
        state.loading = false;

        match result {
            Ok(mut response) => {
                let hidden = language::retain_english(&mut response);
                let shown = response.items.len();
                info!(
                    "Search #{} shows {} repositories ({} hidden as non-English)",
                    generation, shown, hidden
                );
                state.total_count = response.total_count;
                state.hidden_count = hidden;
                state.cards = response.items.into_iter().map(RepositoryCard::new).collect();
                SearchOutcome::Applied { shown, hidden }
            }
            Err(e) => {
                warn!("Search #{} failed: {}", generation, e);
                let message = e.user_message("repositories");
                state.error = Some(message.clone());
                state.cards.clear();
                state.total_count = 0;
                state.hidden_count = 0;
                SearchOutcome::Failed(message)
            }
        }
    }

    /// Replaces the filter selection and re-runs the last search, from page 1.
    pub async fn set_filters(&self, filters: FilterSelection) -> SearchOutcome {
        let last = {
            let mut state = self.state.lock().await;
            state.filters = filters;
            state.last_request.clone()
        };
        match last {
            Some(request) => self.search(request.page(1)).await,
            None => SearchOutcome::Skipped,
        }
    }

    pub async fn clear_filters(&self) -> SearchOutcome {
        self.set_filters(FilterSelection::default()).await
    }

    /// Re-runs the last search with the same filters on another page.
    pub async fn go_to_page(&self, page: u32) -> SearchOutcome {
        let last = self.state.lock().await.last_request.clone();
        match last {
            Some(request) if page >= 1 => self.search(request.page(page)).await,
            _ => SearchOutcome::Skipped,
        }
    }

    pub async fn pagination(&self) -> Option<Pagination> {
        let state = self.state.lock().await;
        state
            .last_request
            .as_ref()
            .map(|r| Pagination::new(r.page, r.per_page, state.total_count))
    }

    /// Expands a card and loads its issues unless they are already loaded or
    /// loading. Returns the card's issue state afterwards.
    pub async fn expand(&self, repo_id: u64) -> Option<IssueState> {
        let (full_name, issue_query, generation) = {
            let mut state = self.state.lock().await;
            let generation = self.generation.load(Ordering::SeqCst);
            let issue_query = issue_query_for(&state.filters);
            let card = state.cards.iter_mut().find(|c| c.repository.id == repo_id)?;
            card.expanded = true;
            match card.issues {
                IssueState::Loaded(_) | IssueState::Loading => return Some(card.issues.clone()),
                IssueState::NotLoaded | IssueState::Errored(_) => {
                    card.issues = IssueState::Loading;
                }
            }
            (card.repository.full_name.clone(), issue_query, generation)
        };

        let result = match full_name.split_once('/') {
            Some((owner, repo)) => self.api.repository_issues(owner, repo, &issue_query).await,
            None => Err(crate::error::GitGoodError::InvalidRepository(full_name.clone())),
        };

        let mut state = self.state.lock().await;
        // The card may be gone if a new search replaced the results meanwhile.
        let card = state.cards.iter_mut().find(|c| c.repository.id == repo_id)?;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping issues for {} fetched before a newer search", full_name);
            if card.issues == IssueState::Loading {
                card.issues = IssueState::NotLoaded;
            }
            return Some(card.issues.clone());
        }
        card.issues = match result {
            Ok(issues) => {
                let issues: Vec<Issue> =
                    issues.into_iter().filter(|i| !i.is_pull_request()).collect();
                debug!("Loaded {} issues for {}", issues.len(), full_name);
                IssueState::Loaded(issues)
            }
            Err(e) => {
                warn!("Error fetching issues for {}: {}", full_name, e);
                IssueState::Errored(e.user_message("issues"))
            }
        };
        Some(card.issues.clone())
    }

    pub async fn collapse(&self, repo_id: u64) {
        let mut state = self.state.lock().await;
        if let Some(card) = state.cards.iter_mut().find(|c| c.repository.id == repo_id) {
            card.expanded = false;
        }
    }
}

/// Fills unset request fields from the session filters.
fn merge_filters(request: &SearchRequest, filters: &FilterSelection) -> SearchRequest {
    let mut merged = request.clone();
    if merged.language.is_none() {
        merged.language = filters.language.clone();
    }
    if merged.difficulty_level.is_none() {
        merged.difficulty_level = filters.difficulty.map(|d| d.to_string());
    }
    if merged.timeframe.is_none() {
        merged.timeframe = filters.timeframe;
    }
    merged
}

fn issue_query_for(filters: &FilterSelection) -> IssueQuery {
    let labels = match filters.difficulty {
        Some(Difficulty::Beginner) => Some("good first issue".to_string()),
        _ => None,
    };
    IssueQuery {
        labels,
        ..IssueQuery::default()
    }
}
