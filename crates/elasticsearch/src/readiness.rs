//! Advisory readiness probe for the inference endpoint

use propsearch_core::SearchBackend;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Sample text sent to the inference endpoint
pub const PROBE_INPUT: &str = "wake up";

/// Issue a single inference request and report whether it succeeded
///
/// Never retries. Failures are logged as warnings; the result is advisory
/// and never stops the server from starting.
pub async fn check_endpoint(
    backend: &dyn SearchBackend,
    endpoint_id: &str,
    timeout_secs: u64,
) -> bool {
    debug!("Checking inference endpoint '{endpoint_id}' (timeout {timeout_secs}s)");

    match backend
        .run_inference(endpoint_id, PROBE_INPUT, timeout_secs)
        .await
    {
        Ok(()) => {
            info!("Inference endpoint '{endpoint_id}' is ready");
            true
        }
        Err(e) => {
            warn!("Inference endpoint '{endpoint_id}' is not ready: {e}");
            warn!("  Searches that rely on it may fail until the model is deployed.");
            false
        }
    }
}

/// Run [`check_endpoint`] in the background so tool registration is not delayed
pub fn spawn_readiness_probe(
    backend: Arc<dyn SearchBackend>,
    endpoint_id: String,
    timeout_secs: u64,
) -> JoinHandle<bool> {
    tokio::spawn(async move { check_endpoint(backend.as_ref(), &endpoint_id, timeout_secs).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use propsearch_core::error::{Error, Result};
    use propsearch_core::{SearchParams, SearchResponse, StoredTemplate};
    use std::sync::Mutex;

    /// Backend whose inference call succeeds or fails on demand and records calls
    struct ProbeBackend {
        fail: bool,
        calls: Mutex<Vec<(String, String, u64)>>,
    }

    impl ProbeBackend {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for ProbeBackend {
        async fn search_template(
            &self,
            _index: &str,
            _template_id: &str,
            _params: &SearchParams,
        ) -> Result<SearchResponse> {
            unreachable!("probe never searches")
        }

        async fn get_stored_template(&self, _template_id: &str) -> Result<StoredTemplate> {
            unreachable!("probe never fetches templates")
        }

        async fn run_inference(
            &self,
            inference_id: &str,
            input: &str,
            timeout_secs: u64,
        ) -> Result<()> {
            self.calls.lock().unwrap().push((
                inference_id.to_string(),
                input.to_string(),
                timeout_secs,
            ));
            if self.fail {
                Err(Error::backend("model not deployed"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_check_endpoint_success() {
        let backend = ProbeBackend::new(false);
        assert!(check_endpoint(&backend, ".elser-2-elasticsearch", 30).await);
        assert_eq!(
            *backend.calls.lock().unwrap(),
            vec![(
                ".elser-2-elasticsearch".to_string(),
                PROBE_INPUT.to_string(),
                30
            )]
        );
    }

    #[tokio::test]
    async fn test_check_endpoint_failure_returns_false_without_retry() {
        let backend = ProbeBackend::new(true);
        assert!(!check_endpoint(&backend, "missing", 5).await);
        assert_eq!(backend.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_probe_reports_result() {
        let backend: Arc<dyn SearchBackend> = Arc::new(ProbeBackend::new(true));
        let handle = spawn_readiness_probe(backend, "missing".to_string(), 5);
        assert!(!handle.await.unwrap());
    }
}
