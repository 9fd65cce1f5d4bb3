use std::fmt;

/// Longest response body excerpt kept in a [`FetchError::Status`] message
const BODY_EXCERPT_LEN: usize = 200;

/// Admin API fetch error
///
/// Every variant is fatal for the run: nothing is retried and no output is
/// written. Scheduling the next attempt is left to whatever runs the generator.
#[derive(Debug)]
pub enum FetchError {
    /// The API answered with a non-success HTTP status
    Status {
        /// HTTP status code
        status: u16,
        /// Start of the response body, for diagnostics
        body: String,
    },
    /// The request never produced a response (DNS, connect, TLS, timeout)
    Transport(reqwest::Error),
    /// The response body was not the JSON shape we asked for
    Decode(String),
    /// The API answered with GraphQL errors and no data
    GraphQl(Vec<String>),
}

impl FetchError {
    pub(crate) fn status(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(BODY_EXCERPT_LEN) {
            Some((idx, _)) => format!("{}…", &body[..idx]),
            None => body.to_string(),
        };
        FetchError::Status { status, body }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status { status, body } if body.is_empty() => {
                write!(f, "API error: {status}")
            }
            FetchError::Status { status, body } => write!(f, "API error: {status} ({body})"),
            FetchError::Transport(err) => write!(f, "API request failed: {err}"),
            FetchError::Decode(msg) => write!(f, "unexpected API response: {msg}"),
            FetchError::GraphQl(messages) => {
                write!(f, "API returned errors: {}", messages.join("; "))
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = FetchError::status(401, "");
        assert_eq!(err.to_string(), "API error: 401");

        let err = FetchError::status(503, "upstream unavailable");
        assert_eq!(err.to_string(), "API error: 503 (upstream unavailable)");
    }

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(BODY_EXCERPT_LEN * 2);
        match FetchError::status(500, &body) {
            FetchError::Status { body, .. } => {
                assert_eq!(body.chars().count(), BODY_EXCERPT_LEN + 1);
                assert!(body.ends_with('…'));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_graphql_display_joins_messages() {
        let err = FetchError::GraphQl(vec!["Access denied".into(), "Throttled".into()]);
        assert_eq!(err.to_string(), "API returned errors: Access denied; Throttled");
    }
}
