//! Failure logging at the service boundary.

use tracing::error;

use storefront_core::result::AppResult;

/// Log an error result once and hand it back untouched.
pub(crate) trait LogFailure {
    fn log_failure(self, component: &'static str, operation: &'static str) -> Self;
}

impl<T> LogFailure for AppResult<T> {
    fn log_failure(self, component: &'static str, operation: &'static str) -> Self {
        if let Err(err) = &self {
            error!(component, operation, kind = %err.kind, error = %err.message, "Operation failed");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::error::{AppError, ErrorKind};

    use super::*;

    #[test]
    fn test_error_passes_through_unchanged() {
        let result: AppResult<()> = Err(AppError::validation("bad reference"));
        let err = result.log_failure("OrderService", "add_order").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "bad reference");
    }

    #[test]
    fn test_ok_passes_through() {
        let result: AppResult<i64> = Ok(4);
        assert_eq!(result.log_failure("CustomerService", "add_customer").ok(), Some(4));
    }
}
