//! Read-only projections of GitHub API payloads plus the request types the
//! client builds. Nothing here is persisted.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filters::{Difficulty, Timeframe};

pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    #[default]
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Stars => "stars",
            SortField::Forks => "forks",
            SortField::HelpWantedIssues => "help-wanted-issues",
            SortField::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One search submission. Built fresh each time and not mutated once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_term: String,
    pub language: Option<String>,
    pub organization: Option<String>,
    pub topic: Option<String>,
    pub difficulty_level: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub sort: SortField,
    pub order: SortOrder,
    pub per_page: u32,
    pub page: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            language: None,
            organization: None,
            topic: None,
            difficulty_level: None,
            timeframe: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl SearchRequest {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn difficulty(mut self, level: impl Into<String>) -> Self {
        self.difficulty_level = Some(level.into());
        self
    }

    pub fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }
}

/// Query parameters for the repository issues endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    pub state: String,
    pub sort: String,
    pub direction: String,
    pub per_page: u32,
    pub labels: Option<String>,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            state: "open".to_string(),
            sort: "updated".to_string(),
            direction: "desc".to_string(),
            per_page: DEFAULT_PER_PAGE,
            labels: None,
        }
    }
}

impl IssueQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("state", self.state.clone()),
            ("sort", self.sort.clone()),
            ("direction", self.direction.clone()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(labels) = &self.labels {
            params.push(("labels", labels.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<Repository>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(rename = "stargazers_count", default)]
    pub star_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    pub created_at: Option<DateTime<chrono::Utc>>,
    pub updated_at: Option<DateTime<chrono::Utc>>,
    pub pushed_at: Option<DateTime<chrono::Utc>>,
}

impl Repository {
    /// Splits `full_name` into `(owner, repo)`.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        self.full_name.split_once('/')
    }

    pub fn has_beginner_topic(&self) -> bool {
        self.topics
            .iter()
            .any(|t| Difficulty::BEGINNER_TOPICS.contains(&t.as_str()))
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        let has = |names: &[&str]| self.topics.iter().any(|t| names.contains(&t.as_str()));
        if self.has_beginner_topic() {
            Some(Difficulty::Beginner)
        } else if has(&["intermediate", "medium"]) {
            Some(Difficulty::Intermediate)
        } else if has(&["advanced", "hard"]) {
            Some(Difficulty::Advanced)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueUser {
    pub login: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub html_url: String,
    pub created_at: DateTime<chrono::Utc>,
    pub updated_at: DateTime<chrono::Utc>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub body: Option<String>,
    pub user: Option<IssueUser>,
    /// Present when the "issue" is really a pull request.
    pub pull_request: Option<serde_json::Value>,
}

const BEGINNER_LABELS: &[&str] = &[
    "good first issue",
    "good-first-issue",
    "first-timers-only",
    "beginner",
    "easy",
    "starter",
];
const INTERMEDIATE_LABELS: &[&str] = &["intermediate", "medium", "help wanted"];
const ADVANCED_LABELS: &[&str] = &["advanced", "hard", "complex"];

const SUMMARY_LIMIT: usize = 150;

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Difficulty guessed from label names, checked beginner first.
    pub fn difficulty(&self) -> Option<Difficulty> {
        let names: Vec<String> = self.labels.iter().map(|l| l.name.to_lowercase()).collect();
        let matches = |wanted: &[&str]| {
            wanted
                .iter()
                .any(|w| names.iter().any(|name| name.contains(w)))
        };
        if matches(BEGINNER_LABELS) {
            Some(Difficulty::Beginner)
        } else if matches(INTERMEDIATE_LABELS) {
            Some(Difficulty::Intermediate)
        } else if matches(ADVANCED_LABELS) {
            Some(Difficulty::Advanced)
        } else {
            None
        }
    }

    /// Plain-text excerpt of the body, at most 150 characters.
    pub fn summary(&self) -> String {
        let Some(body) = self.body.as_deref() else {
            return String::new();
        };
        let plain: String = body
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .filter(|c| !matches!(c, '#' | '*' | '_' | '`' | '~'))
            .collect();
        let plain = plain.trim();
        if plain.chars().count() > SUMMARY_LIMIT {
            let cut: String = plain.chars().take(SUMMARY_LIMIT - 3).collect();
            format!("{}...", cut)
        } else {
            plain.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    pub limit: u64,
    pub remaining: u64,
    /// Unix timestamp (seconds) when the window resets.
    pub reset: i64,
    #[serde(default)]
    pub used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitWindow,
    pub search: Option<RateLimitWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    Healthy,
    Low,
    Critical,
}

impl fmt::Display for RateLimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RateLimitStatus::Healthy => "healthy",
            RateLimitStatus::Low => "low",
            RateLimitStatus::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl RateLimitWindow {
    pub fn remaining_percentage(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.limit as f64 * 100.0
    }

    pub fn status(&self) -> RateLimitStatus {
        let pct = self.remaining_percentage();
        if pct > 50.0 {
            RateLimitStatus::Healthy
        } else if pct > 25.0 {
            RateLimitStatus::Low
        } else {
            RateLimitStatus::Critical
        }
    }

    pub fn reset_time<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.reset, 0).single()
    }

    pub fn reset_time_local(&self) -> Option<DateTime<Local>> {
        self.reset_time(&Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issue(labels: &[&str], body: Option<&str>) -> Issue {
        Issue {
            id: 1,
            title: "t".into(),
            html_url: "https://github.com/o/r/issues/1".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            labels: labels
                .iter()
                .enumerate()
                .map(|(i, n)| Label {
                    id: i as u64,
                    name: n.to_string(),
                    color: "7057ff".into(),
                })
                .collect(),
            body: body.map(str::to_string),
            user: None,
            pull_request: None,
        }
    }

    #[test]
    fn deserializes_search_payload() {
        let json = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"id": 1, "full_name": "o/a", "description": null, "html_url": "https://github.com/o/a",
                 "stargazers_count": 12, "language": "Rust", "topics": ["good-first-issue"],
                 "pushed_at": "2024-01-01T00:00:00Z"},
                {"id": 2, "full_name": "o/b", "description": "b", "html_url": "https://github.com/o/b",
                 "stargazers_count": 3, "language": null}
            ]
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total_count, 2);
        assert_eq!(resp.items[0].star_count, 12);
        assert_eq!(resp.items[0].difficulty(), Some(Difficulty::Beginner));
        assert!(resp.items[1].topics.is_empty());
        assert_eq!(resp.items[1].difficulty(), None);
        assert_eq!(resp.items[0].owner_and_name(), Some(("o", "a")));
    }

    #[test]
    fn issue_difficulty_prefers_beginner_labels() {
        assert_eq!(
            issue(&["Hard", "Good First Issue"], None).difficulty(),
            Some(Difficulty::Beginner)
        );
        assert_eq!(
            issue(&["status: help wanted"], None).difficulty(),
            Some(Difficulty::Intermediate)
        );
        assert_eq!(issue(&["needs triage"], None).difficulty(), None);
    }

    #[test]
    fn summary_strips_markdown_and_truncates() {
        let i = issue(&[], Some("## Bug\r\n\r\nThe `parser`   *fails*\non ~input~"));
        assert_eq!(i.summary(), "Bug The parser fails on input");

        let long = "word ".repeat(60);
        let s = issue(&[], Some(&long)).summary();
        assert_eq!(s.chars().count(), 150);
        assert!(s.ends_with("..."));

        assert_eq!(issue(&[], None).summary(), "");
    }

    #[test]
    fn issue_params_include_labels_only_when_set() {
        let mut q = IssueQuery::default();
        assert!(!q.to_params().iter().any(|(k, _)| *k == "labels"));
        q.labels = Some("good first issue".into());
        assert!(q
            .to_params()
            .contains(&("labels", "good first issue".to_string())));
    }

    #[test]
    fn rate_limit_bands() {
        let window = |remaining| RateLimitWindow {
            limit: 5000,
            remaining,
            reset: 1_700_000_000,
            used: 5000 - remaining,
        };
        assert_eq!(window(4000).status(), RateLimitStatus::Healthy);
        assert_eq!(window(2000).status(), RateLimitStatus::Low);
        assert_eq!(window(1250).status(), RateLimitStatus::Critical);
        assert_eq!(
            window(0).reset_time(&Utc).map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }
}
