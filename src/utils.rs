use anyhow::Error;
use tracing::span::Span;

/// Extension trait for reporting an error inside a tracing span.
pub trait LogError {
    fn log_error(&self, error: Error);
}

impl LogError for Span {
    fn log_error(&self, error: Error) {
        self.in_scope(|| {
            tracing::error!("Error: {error:?}");
        });
    }
}
