//! Test doubles.

use async_trait::async_trait;
use quotabar_fetch::{FetchError, FetchOutput, FetchRequest, QuotaFetcher, decode_response};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type ErrorFactory = Box<dyn Fn() -> FetchError + Send + Sync>;

/// A fetcher that answers from memory and records requests.
pub(crate) struct StubFetcher {
    response: Result<String, ErrorFactory>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub(crate) fn ok(stdout: &str) -> Self {
        Self::with_response(Ok(stdout.to_string()))
    }

    pub(crate) fn err(factory: impl Fn() -> FetchError + Send + Sync + 'static) -> Self {
        Self::with_response(Err(Box::new(factory)))
    }

    fn with_response(response: Result<String, ErrorFactory>) -> Self {
        Self {
            response,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Makes every fetch take `delay` (tokio time).
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuotaFetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutput, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            Ok(stdout) => Ok(FetchOutput {
                results: decode_response(stdout)?,
                raw: stdout.clone(),
                duration: Duration::ZERO,
            }),
            Err(factory) => Err(factory()),
        }
    }

    fn name(&self) -> String {
        "stub".to_string()
    }
}
