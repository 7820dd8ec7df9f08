//! Request identifiers.

use std::fmt;

/// Header carrying the request identifier in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Unique identifier for a request, used to correlate log entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new request ID (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reuse a caller-supplied ID, or generate one when it is missing or blank.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if !id.is_empty() => Self::from_string(id),
            _ => Self::generate(),
        }
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A `request` span carrying this ID; entries logged inside it are correlated.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("request", request_id = %self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_is_reused() {
        let id = RequestId::from_header(Some("abc-123"));
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn test_blank_header_generates() {
        let id = RequestId::from_header(Some("  "));
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());

        let other = RequestId::from_header(None);
        assert_ne!(id, other);
    }
}
