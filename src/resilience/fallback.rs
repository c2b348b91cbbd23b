//! Route fallback on "not found".
//!
//! Some backend builds expose a resource under a different path name
//! (`/car` vs `/cars`, `service-history` vs `service-records`). The fallback
//! tries the primary route and, only when it answers 404, the secondary one.
//! Every other outcome of the primary, success or failure, is returned as is.
//! This is not a retry policy: transient failures are never repeated.

use std::future::Future;

/// Errors that can tell whether they mean "this route does not exist".
pub trait NotFound {
    fn is_not_found(&self) -> bool;
}

/// Run `primary`; on a not-found error run `secondary` once and return its
/// result.
///
/// `secondary` is only constructed when needed.
pub async fn with_not_found_fallback<T, E, P, S, SF>(
    label: &str,
    primary: P,
    secondary: S,
) -> Result<T, E>
where
    E: NotFound,
    P: Future<Output = Result<T, E>>,
    S: FnOnce() -> SF,
    SF: Future<Output = Result<T, E>>,
{
    match primary.await {
        Err(err) if err.is_not_found() => {
            tracing::debug!(operation = %label, "Primary route not found, trying fallback route");
            secondary().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Missing,
        Broken(u16),
    }

    impl NotFound for TestError {
        fn is_not_found(&self) -> bool {
            matches!(self, TestError::Missing)
        }
    }

    #[tokio::test]
    async fn test_success_skips_secondary() {
        let calls = Cell::new(0);
        let counter = &calls;
        let result: Result<u32, TestError> = with_not_found_fallback(
            "test",
            async { Ok(1) },
            move || async move {
                counter.set(counter.get() + 1);
                Ok(2)
            },
        )
        .await;
        assert_eq!(result, Ok(1));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_not_found_uses_secondary() {
        let result: Result<u32, TestError> =
            with_not_found_fallback("test", async { Err(TestError::Missing) }, || async { Ok(2) })
                .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn test_other_error_short_circuits() {
        let calls = Cell::new(0);
        let counter = &calls;
        let result: Result<u32, TestError> = with_not_found_fallback(
            "test",
            async { Err(TestError::Broken(500)) },
            move || async move {
                counter.set(counter.get() + 1);
                Ok(2)
            },
        )
        .await;
        assert_eq!(result, Err(TestError::Broken(500)));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_secondary_failure_propagates() {
        let result: Result<u32, TestError> = with_not_found_fallback(
            "test",
            async { Err(TestError::Missing) },
            || async { Err(TestError::Missing) },
        )
        .await;
        assert_eq!(result, Err(TestError::Missing));
    }
}
