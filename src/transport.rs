use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::error::{Error, Result};

const USER_AGENT_VALUE: &str = concat!("novelfetch/", env!("CARGO_PKG_VERSION"));

/// Retry schedule for connection-level failures: `base_delay`, then doubled
/// for each following retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_factor(2.0)
            .without_max_delay()
            .with_max_times(self.max_retries as usize)
    }
}

/// Shared HTTP session. Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    retry: RetryPolicy,
}

enum Attempt {
    Transient(reqwest::Error),
    Failed(Error),
}

impl Transport {
    pub fn new(retry: RetryPolicy, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| Error::fetch("<client>", format!("build http client: {err}")))?;
        Ok(Self { client, retry })
    }

    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let retries = AtomicU32::new(0);
        let attempt = move || async move {
            let response = self
                .client
                .get(url.clone())
                .header(USER_AGENT, USER_AGENT_VALUE)
                .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
                .send()
                .await
                .map_err(|err| {
                    if is_transient(&err) {
                        Attempt::Transient(err)
                    } else {
                        Attempt::Failed(Error::fetch(url, err.to_string()))
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(Attempt::Failed(Error::fetch(url, format!("HTTP {status}"))));
            }
            response
                .text()
                .await
                .map_err(|err| Attempt::Failed(Error::fetch(url, format!("read body: {err}"))))
        };

        attempt
            .retry(self.retry.backoff())
            .sleep(tokio::time::sleep)
            .when(|outcome: &Attempt| matches!(outcome, Attempt::Transient(_)))
            .notify(|outcome: &Attempt, delay: Duration| {
                let retry = retries.fetch_add(1, Ordering::Relaxed) + 1;
                if let Attempt::Transient(err) = outcome {
                    tracing::warn!(%url, retry, ?delay, %err, "request failed; retrying");
                }
            })
            .await
            .map_err(|outcome| match outcome {
                Attempt::Transient(err) => {
                    let retry = retries.load(Ordering::Relaxed);
                    Error::fetch(url, format!("{err} (after {retry} retries)"))
                }
                Attempt::Failed(err) => err,
            })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
