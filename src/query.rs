//! Translates a [`SearchRequest`] into GitHub's `qualifier:value` search syntax.
//!
//! Qualifiers are only appended when their key does not already occur in the
//! query built so far, so a term like `parser language:go` keeps its own
//! language. The check is a plain substring match on the accumulated string.

use chrono::{NaiveDate, Utc};

use crate::filters::Difficulty;
use crate::model::SearchRequest;

/// True when the request carries anything worth sending. Callers skip the
/// request entirely when this is false.
pub fn has_criteria(request: &SearchRequest) -> bool {
    let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    !request.search_term.trim().is_empty()
        || set(&request.language)
        || set(&request.organization)
        || set(&request.topic)
        || set(&request.difficulty_level)
        || request.timeframe.is_some()
}

pub fn build_query(request: &SearchRequest) -> String {
    build_query_on(request, Utc::now().date_naive())
}

/// Same as [`build_query`] with an explicit date for timeframe qualifiers.
pub fn build_query_on(request: &SearchRequest, today: NaiveDate) -> String {
    let mut query = free_text_clause(request.search_term.trim());

    append_unique(&mut query, "language:", request.language.as_deref());
    append_unique(&mut query, "org:", request.organization.as_deref());
    append_unique(&mut query, "topic:", request.topic.as_deref());

    if let Some(level) = request.difficulty_level.as_deref().map(str::trim) {
        if !level.is_empty() {
            let clause = difficulty_clause(level);
            let key = format!("topic:{}", level.to_lowercase());
            if !query.contains(&key) {
                push_clause(&mut query, &clause);
            }
        }
    }

    if let Some(timeframe) = request.timeframe {
        if !query.contains("pushed:") {
            let since = timeframe.since(today).format("%Y-%m-%d");
            push_clause(&mut query, &format!("pushed:>={}", since));
        }
    }

    query
}

/// Full set of query parameters sent to the repository search endpoint.
pub fn search_params(request: &SearchRequest, today: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("q", build_query_on(request, today)),
        ("sort", request.sort.as_str().to_string()),
        ("order", request.order.as_str().to_string()),
        ("per_page", request.per_page.to_string()),
        ("page", request.page.to_string()),
    ]
}

fn free_text_clause(term: &str) -> String {
    if term.is_empty() {
        return String::new();
    }
    match term.split_once('/') {
        Some((owner, name)) if !owner.trim().is_empty() && !name.trim().is_empty() => {
            format!(
                "{} OR ({} in:name user:{})",
                term,
                name.trim(),
                owner.trim()
            )
        }
        _ => format!("{} in:name,description", term),
    }
}

fn difficulty_clause(level: &str) -> String {
    match level.parse::<Difficulty>() {
        Ok(Difficulty::Beginner) => {
            let alternatives: Vec<String> = Difficulty::BEGINNER_TOPICS
                .iter()
                .map(|t| format!("topic:{}", t))
                .collect();
            format!("({})", alternatives.join(" OR "))
        }
        Ok(other) => format!("topic:{}", other),
        Err(_) => format!("topic:{}", level),
    }
}

fn append_unique(query: &mut String, key: &str, value: Option<&str>) {
    let Some(value) = value.map(str::trim) else {
        return;
    };
    if value.is_empty() || query.contains(key) {
        return;
    }
    push_clause(query, &format!("{}{}", key, value));
}

fn push_clause(query: &mut String, clause: &str) {
    if !query.is_empty() {
        query.push(' ');
    }
    query.push_str(clause);
}
