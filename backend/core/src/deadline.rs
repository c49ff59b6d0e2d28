use std::future::Future;
use std::time::Duration;

use crate::error::ProviderError;

/// Run a provider call, optionally bounded by `deadline`.
///
/// An elapsed deadline is reported as an execution failure: the backend was
/// reached but did not finish.
pub async fn call_with_deadline<T, F>(deadline: Option<Duration>, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(ProviderError::Execution(format!(
                "provider call timed out after {}ms",
                limit.as_millis()
            )))
        }),
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_without_deadline() {
        let result = call_with_deadline(None, async { Ok::<_, ProviderError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn elapsed_deadline_is_execution_failure() {
        let result = call_with_deadline(Some(Duration::from_millis(10)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ProviderError>(())
        })
        .await;
        assert!(matches!(result, Err(ProviderError::Execution(_))));
    }
}
