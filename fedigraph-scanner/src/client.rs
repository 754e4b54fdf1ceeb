use crate::outcome::{BlockEntry, FailureReason, FetchOutcome};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Default per-request deadline. Covers connect, TLS, and body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can answer "what does this instance block?".
///
/// The worker pool is written against this seam so the scheduler can be
/// exercised without a network.
pub trait BlockSource: Send + Sync {
    fn fetch_blocks(&self, instance: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// HTTP client for the `/api/v1/instance/domain_blocks` endpoint.
///
/// Owns the shared connection pool; holds no per-request state, so a single
/// value is cheaply shared across all workers.
pub struct BlockListClient {
    client: Client,
    scheme: String,
}

impl BlockListClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_settings(timeout, crate::pool::DEFAULT_WORKERS)
    }

    /// `pool_size` should match the worker count so idle connections are not
    /// evicted under the pool's own concurrency.
    pub fn with_settings(timeout: Duration, pool_size: usize) -> Self {
        let client = Client::builder()
            .user_agent(concat!(
                "fedigraph/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/mkoell/fedigraph)"
            ))
            .timeout(timeout)
            .pool_max_idle_per_host(pool_size.max(1))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            scheme: "https".to_string(),
        }
    }

    /// Override the URL scheme. Instances are reached over `https` by
    /// default; `http` is for instances that do not terminate TLS themselves
    /// and for tests against a local mock server.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Query one instance for its public block list.
    ///
    /// Never returns an error: every failure mode is classified into a
    /// `Failure` outcome so callers can fold successes and failures
    /// uniformly. No retries.
    pub async fn fetch_blocks(&self, instance: &str) -> FetchOutcome {
        let url = format!("{}://{}/api/v1/instance/domain_blocks", self.scheme, instance);
        debug!("Fetching {}", url);

        let response = match self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("{} unreachable: {}", instance, e);
                return FetchOutcome::failure(instance, FailureReason::Timeout);
            }
        };

        if response.status() != StatusCode::OK {
            debug!("{} answered {}", instance, response.status());
            return FetchOutcome::failure(instance, FailureReason::HttpError);
        }

        match response.json::<Vec<BlockEntry>>().await {
            Ok(blocks) => FetchOutcome::success(instance, blocks),
            Err(e) if e.is_timeout() => FetchOutcome::failure(instance, FailureReason::Timeout),
            Err(e) => {
                debug!("{} body did not parse: {}", instance, e);
                FetchOutcome::failure(instance, FailureReason::InvalidBody)
            }
        }
    }
}

impl BlockSource for BlockListClient {
    fn fetch_blocks(&self, instance: &str) -> impl Future<Output = FetchOutcome> + Send {
        BlockListClient::fetch_blocks(self, instance)
    }
}

impl Default for BlockListClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::BlockSeverity;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BLOCKS_PATH: &str = "/api/v1/instance/domain_blocks";

    fn host_of(server: &MockServer) -> String {
        server
            .uri()
            .strip_prefix("http://")
            .expect("mock server uri is http")
            .to_string()
    }

    fn test_client(timeout_ms: u64) -> BlockListClient {
        BlockListClient::with_timeout(Duration::from_millis(timeout_ms)).with_scheme("http")
    }

    #[tokio::test]
    async fn parses_a_block_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BLOCKS_PATH))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"domain": "spam.example", "digest": "d41d8cd9", "severity": "suspend", "comment": "spam"},
                {"domain": "rude.example", "severity": "silence", "comment": null}
            ])))
            .mount(&server)
            .await;

        let outcome = test_client(5_000).fetch_blocks(&host_of(&server)).await;

        match outcome {
            FetchOutcome::Success { instance, blocks } => {
                assert_eq!(instance, host_of(&server));
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0].domain, "spam.example");
                assert_eq!(blocks[0].severity, BlockSeverity::Suspend);
                assert_eq!(blocks[0].comment.as_deref(), Some("spam"));
                assert_eq!(blocks[1].severity, BlockSeverity::Silence);
                assert_eq!(blocks[1].comment, None);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_array_is_a_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BLOCKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let outcome = test_client(5_000).fetch_blocks(&host_of(&server)).await;

        assert_eq!(
            outcome,
            FetchOutcome::success(host_of(&server), Vec::new())
        );
    }

    #[tokio::test]
    async fn non_200_is_an_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BLOCKS_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let outcome = test_client(5_000).fetch_blocks(&host_of(&server)).await;

        assert_eq!(
            outcome,
            FetchOutcome::failure(host_of(&server), FailureReason::HttpError)
        );
    }

    #[tokio::test]
    async fn unparseable_body_is_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BLOCKS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html>not an api</html>"),
            )
            .mount(&server)
            .await;

        let outcome = test_client(5_000).fetch_blocks(&host_of(&server)).await;

        assert_eq!(
            outcome,
            FetchOutcome::failure(host_of(&server), FailureReason::InvalidBody)
        );
    }

    #[tokio::test]
    async fn json_object_instead_of_array_is_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BLOCKS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "unexpected shape"})),
            )
            .mount(&server)
            .await;

        let outcome = test_client(5_000).fetch_blocks(&host_of(&server)).await;

        assert_eq!(
            outcome,
            FetchOutcome::failure(host_of(&server), FailureReason::InvalidBody)
        );
    }

    #[tokio::test]
    async fn deadline_overrun_is_a_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(BLOCKS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let outcome = test_client(200).fetch_blocks(&host_of(&server)).await;

        assert_eq!(
            outcome,
            FetchOutcome::failure(host_of(&server), FailureReason::Timeout)
        );
    }

    #[tokio::test]
    async fn connection_refused_is_a_timeout() {
        let host = {
            let server = MockServer::start().await;
            host_of(&server)
            // server drops here and the port is released
        };

        let outcome = test_client(1_000).fetch_blocks(&host).await;

        assert_eq!(
            outcome,
            FetchOutcome::failure(host, FailureReason::Timeout)
        );
    }
}
