//! Plain-text rendering of session state for the terminal.

use chrono::{DateTime, Utc};

use crate::filters::FilterSelection;
use crate::model::{Issue, RateLimit};
use crate::pagination::Pagination;
use crate::scoring::FriendlinessScores;
use crate::session::{IssueState, RepositoryCard};

pub fn card(card: &RepositoryCard, now: DateTime<Utc>) -> String {
    let repo = &card.repository;
    let mut out = format!("{}\n    ⭐ {}", repo.full_name, repo.star_count);
    if let Some(language) = &repo.language {
        out.push_str(&format!(" • {}", language));
    }
    if let Some(level) = repo.difficulty() {
        out.push_str(&format!(" • {}", level));
    }
    let scores = FriendlinessScores::for_repository(repo, now);
    out.push_str(&format!(
        " • friendliness {:.1}/5 ({})",
        scores.overall(),
        scores.label()
    ));
    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("\n    {}", description));
    }
    out.push_str(&format!("\n    {}", repo.html_url));

    if card.expanded {
        match &card.issues {
            IssueState::NotLoaded => {}
            IssueState::Loading => out.push_str("\n    loading issues..."),
            IssueState::Errored(message) => out.push_str(&format!("\n    {}", message)),
            IssueState::Loaded(issues) if issues.is_empty() => {
                out.push_str("\n    no open issues")
            }
            IssueState::Loaded(issues) => {
                for i in issues {
                    out.push_str(&format!("\n    - {}", issue(i).replace('\n', "\n      ")));
                }
            }
        }
    }
    out
}

pub fn issue(issue: &Issue) -> String {
    let mut out = issue.title.clone();
    if !issue.labels.is_empty() {
        let labels: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        out.push_str(&format!(" [{}]", labels.join(", ")));
    }
    out.push_str(&format!("\n{}", issue.html_url));
    let summary = issue.summary();
    if !summary.is_empty() {
        out.push_str(&format!("\n{}", summary));
    }
    out
}

pub fn filters(filters: &FilterSelection) -> Option<String> {
    if filters.is_empty() {
        None
    } else {
        Some(format!("Active filters: {}", filters.chips().join(" ")))
    }
}

pub fn pagination(p: &Pagination) -> String {
    let strip: Vec<String> = p
        .page_items()
        .iter()
        .map(|item| match item {
            crate::pagination::PageItem::Page(n) if *n == p.current_page => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect();
    if strip.is_empty() {
        format!("Showing {}", p.range_label())
    } else {
        format!("Showing {}   {}", p.range_label(), strip.join(" "))
    }
}

pub fn rate_limit(limit: &RateLimit) -> String {
    let core = &limit.resources.core;
    let reset = core
        .reset_time_local()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Remaining: {} / {} ({:.0}%, {})\nResets at: {}",
        core.remaining,
        core.limit,
        core.remaining_percentage(),
        core.status(),
        reset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Difficulty;
    use crate::model::Repository;

    fn sample_card(expanded: bool, issues: IssueState) -> RepositoryCard {
        RepositoryCard {
            repository: Repository {
                id: 1,
                full_name: "octo/hello".into(),
                description: Some("Hello world".into()),
                html_url: "https://github.com/octo/hello".into(),
                star_count: 5,
                language: Some("Rust".into()),
                topics: vec!["good-first-issue".into()],
                forks_count: 0,
                open_issues_count: 0,
                watchers_count: 0,
                created_at: None,
                updated_at: None,
                pushed_at: None,
            },
            expanded,
            issues,
        }
    }

    #[test]
    fn renders_collapsed_card() {
        let text = card(&sample_card(false, IssueState::NotLoaded), Utc::now());
        assert!(text.starts_with("octo/hello\n    ⭐ 5 • Rust • beginner • friendliness"));
        assert!(text.contains("Hello world"));
        assert!(!text.contains("issues"));
    }

    #[test]
    fn renders_issue_error_when_expanded() {
        let text = card(
            &sample_card(true, IssueState::Errored("Failed to fetch issues".into())),
            Utc::now(),
        );
        assert!(text.ends_with("Failed to fetch issues"));
    }

    #[test]
    fn marks_current_page() {
        let text = pagination(&Pagination::new(2, 10, 25));
        assert_eq!(text, "Showing 11–20 of 25   1 [2] 3");
    }

    #[test]
    fn lists_active_filters() {
        assert_eq!(filters(&FilterSelection::default()), None);
        let selection = FilterSelection {
            difficulty: Some(Difficulty::Intermediate),
            ..FilterSelection::default()
        };
        assert_eq!(
            filters(&selection).as_deref(),
            Some("Active filters: [difficulty: Intermediate (blue)]")
        );
    }
}
