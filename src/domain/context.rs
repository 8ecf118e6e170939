//! Operation Context
//!
//! Metadata about the current request, used for log correlation.

use uuid::Uuid;

/// Context for an operation, attached to every ledger call's span.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    /// Short fingerprint of the API key used for this request
    pub api_key: Option<String>,

    /// Correlation ID for request tracing
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with API key fingerprint
    pub fn with_api_key(mut self, fingerprint: impl Into<String>) -> Self {
        self.api_key = Some(fingerprint.into());
        self
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Span wrapping a single ledger operation
    pub fn span(&self, operation: &'static str) -> tracing::Span {
        tracing::info_span!(
            "ledger",
            operation,
            correlation_id = ?self.correlation_id,
            api_key = ?self.api_key,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();

        let context = OperationContext::new()
            .with_api_key("ab12cd34")
            .with_correlation_id(correlation_id);

        assert_eq!(context.api_key.as_deref(), Some("ab12cd34"));
        assert_eq!(context.correlation_id, Some(correlation_id));
    }
}
