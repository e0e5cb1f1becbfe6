//! Unit tests for the upstream retry policy

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use confluex::error::ProviderError;
use confluex::services::RetryPolicy;

fn unavailable() -> ProviderError {
    ProviderError::Status {
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}

#[test]
fn test_transient_classification() {
    assert!(unavailable().is_transient());
    assert!(ProviderError::Status { status: 429, body: String::new() }.is_transient());
    assert!(!ProviderError::Status { status: 404, body: String::new() }.is_transient());
    assert!(!ProviderError::Status { status: 400, body: String::new() }.is_transient());
    assert!(!ProviderError::Malformed("bad".to_string()).is_transient());
}

#[test]
fn test_attempts_are_at_least_one() {
    assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    assert_eq!(RetryPolicy::none().max_attempts(), 1);
    assert_eq!(RetryPolicy::default().max_attempts(), 3);
}

#[tokio::test]
async fn test_transient_failure_is_retried_until_success() {
    let policy = RetryPolicy::new(3, Duration::from_millis(1));
    let attempts = AtomicUsize::new(0);
    let attempts = &attempts;

    let result = policy
        .run("klines", || async move {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(unavailable())
            } else {
                Ok(n)
            }
        })
        .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let policy = RetryPolicy::new(3, Duration::from_millis(1));
    let attempts = AtomicUsize::new(0);
    let attempts = &attempts;

    let result: Result<(), ProviderError> = policy
        .run("klines", || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

    assert!(matches!(result, Err(ProviderError::Status { status: 503, .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() {
    let policy = RetryPolicy::new(5, Duration::from_millis(1));
    let attempts = AtomicUsize::new(0);
    let attempts = &attempts;

    let result: Result<(), ProviderError> = policy
        .run("exchangeInfo", || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Status {
                status: 404,
                body: "Not Found".to_string(),
            })
        })
        .await;

    assert!(matches!(result, Err(ProviderError::Status { status: 404, .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
