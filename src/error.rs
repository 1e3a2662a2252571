//! Error type shared by the proxy, the client and the CLI.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitGoodError>;

#[derive(Debug, Error)]
pub enum GitGoodError {
    /// Transport failure: no response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response arrived with a non-success status.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),
}

impl GitGoodError {
    /// Builds an `Api` error from a status and the raw response body, pulling
    /// GitHub's `message` (or the proxy's `error`) field out when the body is JSON.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());
        GitGoodError::Api { status, message }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.to_string().to_lowercase().contains("rate limit")
    }

    /// Message shown to the user. `what` names the thing being fetched,
    /// e.g. "repositories".
    pub fn user_message(&self, what: &str) -> String {
        if self.is_rate_limited() {
            "GitHub API rate limit exceeded. Please try again later.".to_string()
        } else {
            format!("Failed to fetch {}", what)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_github_message() {
        let err = GitGoodError::from_response(
            403,
            r#"{"message":"API rate limit exceeded for 1.2.3.4.","documentation_url":"x"}"#,
        );
        assert!(err.is_rate_limited());
        assert_eq!(
            err.user_message("repositories"),
            "GitHub API rate limit exceeded. Please try again later."
        );
    }

    #[test]
    fn falls_back_to_raw_body() {
        let err = GitGoodError::from_response(502, "Bad Gateway\n");
        match &err {
            GitGoodError::Api { status, message } => {
                assert_eq!(*status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_rate_limited());
        assert_eq!(err.user_message("issues"), "Failed to fetch issues");
    }

    #[test]
    fn reads_proxy_error_field() {
        let err = GitGoodError::from_response(500, r#"{"error":"connection refused"}"#);
        assert_eq!(err.to_string(), "GitHub API error (500): connection refused");
    }
}
