#![allow(dead_code)]

use std::path::Path;

use ticketmail_domain::PlatformConfig;
use ticketmail_infra::{SafeTicketClient, SessionCache};
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// A wiremock server driven by its own runtime so blocking clients can run
/// on the test thread.
pub struct MockPlatform {
    pub runtime: Runtime,
    pub server: MockServer,
}

impl MockPlatform {
    pub fn start(mocks: Vec<Mock>) -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            for mock in mocks {
                mock.mount(&server).await;
            }
            server
        });
        Self { runtime, server }
    }

    pub fn config(&self) -> PlatformConfig {
        PlatformConfig {
            organization: "example".into(),
            username: "someone@example.com".into(),
            password: "secret".into(),
            base_url: Some(self.server.uri()),
            timeout_seconds: 5,
        }
    }

    pub fn client(&self) -> SafeTicketClient {
        SafeTicketClient::new(&self.config()).expect("platform client")
    }

    pub fn cached_client(&self, cache_file: &Path) -> SafeTicketClient {
        self.client().with_session_cache(Some(SessionCache::new(cache_file)))
    }

    pub fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == path)
            .collect()
    }
}
