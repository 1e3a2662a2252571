//! Beginner-friendliness estimate for a repository, built only from what the
//! search payload already carries.

use chrono::{DateTime, Utc};

use crate::model::Repository;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoMetrics {
    pub has_readme: bool,
    pub readme_length: Option<usize>,
    pub has_contributing: bool,
    pub has_code_of_conduct: bool,
    pub has_beginner_label: bool,
    pub open_issues_count: Option<u64>,
    pub last_commit: Option<DateTime<Utc>>,
    pub issues_with_comments: Option<u64>,
    pub total_issues: Option<u64>,
    /// Average hours until the first response on an issue.
    pub response_time_hours: Option<f64>,
    pub stars: u64,
    pub forks: u64,
}

impl RepoMetrics {
    pub fn from_repository(repo: &Repository) -> Self {
        Self {
            // not visible in search results, assume present
            has_readme: true,
            has_beginner_label: repo.has_beginner_topic(),
            open_issues_count: Some(repo.open_issues_count),
            last_commit: repo.pushed_at.or(repo.updated_at),
            stars: repo.star_count,
            forks: repo.forks_count,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriendlinessScores {
    pub documentation: f64,
    pub activity: f64,
    pub community: f64,
    pub issues: f64,
}

impl FriendlinessScores {
    pub fn calculate(metrics: &RepoMetrics, now: DateTime<Utc>) -> Self {
        Self {
            documentation: documentation_score(metrics),
            activity: activity_score(metrics, now),
            community: community_score(metrics),
            issues: issues_score(metrics),
        }
    }

    pub fn for_repository(repo: &Repository, now: DateTime<Utc>) -> Self {
        Self::calculate(&RepoMetrics::from_repository(repo), now)
    }

    /// Weighted average rounded to the nearest half point.
    pub fn overall(&self) -> f64 {
        let weighted = self.documentation * 0.35
            + self.activity * 0.25
            + self.community * 0.25
            + self.issues * 0.15;
        (weighted * 2.0).round() / 2.0
    }

    pub fn label(&self) -> &'static str {
        let overall = self.overall();
        if overall >= 4.0 {
            "Excellent"
        } else if overall >= 3.0 {
            "Good"
        } else if overall >= 2.0 {
            "Fair"
        } else {
            "Needs work"
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 5.0)
}

fn documentation_score(m: &RepoMetrics) -> f64 {
    let mut score: f64 = 0.0;
    if m.has_readme {
        score += 2.0;
        if m.readme_length.is_some_and(|len| len > 1000) {
            score += 1.0;
        }
    }
    if m.has_contributing {
        score += 1.0;
    }
    if m.has_code_of_conduct {
        score += 1.0;
    }
    score.min(5.0)
}

fn activity_score(m: &RepoMetrics, now: DateTime<Utc>) -> f64 {
    let mut score = 2.5;
    if let Some(last) = m.last_commit {
        let days = (now - last).num_days();
        score += match days {
            d if d < 7 => 1.5,
            d if d < 30 => 1.0,
            d if d < 90 => 0.5,
            d if d > 365 => -1.5,
            d if d > 180 => -1.0,
            _ => 0.0,
        };
    }
    if m.stars > 1000 {
        score += 0.5;
    }
    if m.forks > 100 {
        score += 0.5;
    }
    clamp_score(score)
}

fn community_score(m: &RepoMetrics) -> f64 {
    let mut score = 2.5;
    if let Some(hours) = m.response_time_hours {
        if hours < 24.0 {
            score += 1.5;
        } else if hours < 72.0 {
            score += 0.5;
        } else if hours > 168.0 {
            score -= 1.0;
        }
    }
    if let (Some(commented), Some(total)) = (m.issues_with_comments, m.total_issues) {
        if total > 0 {
            let rate = commented as f64 / total as f64;
            if rate > 0.9 {
                score += 1.0;
            } else if rate > 0.7 {
                score += 0.5;
            } else if rate < 0.3 {
                score -= 0.5;
            }
        }
    }
    if m.stars > 5000 {
        score += 0.5;
    }
    clamp_score(score)
}

fn issues_score(m: &RepoMetrics) -> f64 {
    let mut score = 2.5;
    if m.has_beginner_label {
        score += 1.5;
    }
    if let Some(open) = m.open_issues_count {
        if open > 5 && open < 500 {
            score += 1.0;
        } else if open > 1000 {
            score -= 0.5;
        }
    }
    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn active_beginner_repository_scores_high() {
        let now = Utc::now();
        let metrics = RepoMetrics {
            has_readme: true,
            readme_length: Some(4000),
            has_contributing: true,
            has_code_of_conduct: true,
            has_beginner_label: true,
            open_issues_count: Some(40),
            last_commit: Some(now - Duration::days(2)),
            issues_with_comments: Some(95),
            total_issues: Some(100),
            response_time_hours: Some(6.0),
            stars: 12_000,
            forks: 900,
        };
        let scores = FriendlinessScores::calculate(&metrics, now);
        assert_eq!(scores.documentation, 5.0);
        assert_eq!(scores.activity, 5.0);
        assert_eq!(scores.community, 5.0);
        assert_eq!(scores.issues, 5.0);
        assert_eq!(scores.overall(), 5.0);
        assert_eq!(scores.label(), "Excellent");
    }

    #[test]
    fn stale_repository_loses_activity() {
        let now = Utc::now();
        let metrics = RepoMetrics {
            last_commit: Some(now - Duration::days(400)),
            open_issues_count: Some(2000),
            total_issues: Some(10),
            issues_with_comments: Some(1),
            response_time_hours: Some(200.0),
            ..RepoMetrics::default()
        };
        let scores = FriendlinessScores::calculate(&metrics, now);
        assert_eq!(scores.documentation, 0.0);
        assert_eq!(scores.activity, 1.0);
        assert_eq!(scores.community, 1.0);
        assert_eq!(scores.issues, 2.0);
        // 0 + 0.25 + 0.25 + 0.3 = 0.8 -> 1.0
        assert_eq!(scores.overall(), 1.0);
        assert_eq!(scores.label(), "Needs work");
    }

    #[test]
    fn metrics_from_search_result() {
        let repo: Repository = serde_json::from_str(
            r#"{"id": 9, "full_name": "o/r", "description": null, "html_url": "u",
                "stargazers_count": 1500, "language": "Go", "topics": ["beginner-friendly"],
                "open_issues_count": 12, "forks_count": 30,
                "updated_at": "2024-05-01T00:00:00Z", "pushed_at": "2024-05-20T00:00:00Z"}"#,
        )
        .unwrap();
        let metrics = RepoMetrics::from_repository(&repo);
        assert!(metrics.has_readme);
        assert!(metrics.has_beginner_label);
        assert_eq!(metrics.last_commit, repo.pushed_at);
        assert_eq!(metrics.open_issues_count, Some(12));
    }
}
