//! Errors from the upstream agent boundary.

/// Result type for upstream agent calls.
pub type AgentResult<T> = Result<T, AgentError>;

/// What went wrong talking to the agent API. `Display` is user-safe: the
/// upstream body is carried for logging but never rendered.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("agent returned HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        /// Raw upstream body, for the log only.
        body: String,
    },
}

impl AgentError {
    /// Full detail for the log, including any upstream body. Never shown to
    /// the end user.
    pub fn detail(&self) -> String {
        match self {
            Self::Transport(e) => e.to_string(),
            Self::Status { status, body } if !body.is_empty() => {
                format!("HTTP {}: {}", status, body)
            }
            Self::Status { status, .. } => format!("HTTP {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_never_includes_the_body() {
        let err = AgentError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "secret upstream stack trace".to_string(),
        };
        let shown = err.to_string();
        assert!(shown.contains("503"));
        assert!(!shown.contains("stack trace"));
    }

    #[test]
    fn detail_keeps_the_body_for_the_log() {
        let err = AgentError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "upstream trace".to_string(),
        };
        assert!(err.detail().contains("upstream trace"));
    }
}
