//! Client for the upstream rates provider.

use oc_rates_common::{Currency, RatesResponse};
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::error::{FxError, FxResult};

/// Public Fixer endpoint root.
pub const DEFAULT_BASE_URL: &str = "http://data.fixer.io/api/";

/// Fetches latest rates from a Fixer-compatible API.
#[derive(Clone)]
pub struct FixerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FixerClient {
    /// Create a client for the public Fixer endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client for a custom endpoint root.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Endpoint root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch latest rates for `base`.
    ///
    /// Returns the payload as sent, including responses the provider flagged
    /// with `success: false`. Every transport problem collapses into
    /// [`FxError::ProviderFetch`]; the cause is only logged.
    #[instrument(skip(self), fields(base = %base))]
    pub async fn fetch_rates(&self, base: &Currency) -> FxResult<RatesResponse> {
        let url = format!("{}latest", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("access_key", self.api_key.as_str()), ("base", base.code())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_failed)?;

        let rates = response
            .json::<RatesResponse>()
            .await
            .map_err(fetch_failed)?;

        debug!(success = rates.success, currencies = rates.rates.len(), "Provider responded");
        Ok(rates)
    }
}

impl fmt::Debug for FixerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixerClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn fetch_failed(err: reqwest::Error) -> FxError {
    // The request URL carries the access key
    let err = err.without_url();
    warn!(error = %err, status = ?err.status(), "Provider request failed");
    FxError::ProviderFetch
}

#[cfg(any(test, feature = "test-utils"))]
pub use stub::StubProvider;

/// In-process stand-in for the provider, for tests.
#[cfg(any(test, feature = "test-utils"))]
mod stub {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::{header, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;
    use dashmap::DashMap;
    use oc_rates_common::{Currency, ProviderErrorInfo, RatesResponse};
    use tokio::task::JoinHandle;

    use super::FixerClient;

    #[derive(Clone)]
    struct StubReply {
        status: StatusCode,
        body: String,
    }

    #[derive(Default)]
    struct StubState {
        replies: DashMap<String, StubReply>,
        hits: AtomicUsize,
        last_query: Mutex<HashMap<String, String>>,
    }

    /// Serves `GET /latest` on an ephemeral local port with canned replies
    /// per base currency and counts the requests it receives.
    ///
    /// Bases without a configured reply get the provider's
    /// `invalid_base_currency` rejection.
    pub struct StubProvider {
        addr: SocketAddr,
        state: Arc<StubState>,
        server: JoinHandle<()>,
    }

    impl StubProvider {
        /// Bind to `127.0.0.1:0` and start serving.
        pub async fn spawn() -> std::io::Result<Self> {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
            let addr = listener.local_addr()?;
            let state = Arc::new(StubState::default());

            let app = Router::new()
                .route("/latest", get(latest))
                .with_state(state.clone());

            let server = tokio::spawn(async move {
                let _ = axum::serve(listener, app).await;
            });

            Ok(Self {
                addr,
                state,
                server,
            })
        }

        /// Endpoint root to point a [`FixerClient`] at.
        pub fn base_url(&self) -> String {
            format!("http://{}/", self.addr)
        }

        /// Client wired to this stub.
        pub fn client(&self, api_key: &str) -> FixerClient {
            FixerClient::with_base_url(api_key, self.base_url())
        }

        /// Answer `base` with a successful rates payload.
        pub fn set_rates(&self, base: &str, rates: &[(&str, f64)]) {
            let rates = rates
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect();
            let response = RatesResponse::new(Currency::new(base), rates);
            self.set_json(base, StatusCode::OK, &response);
        }

        /// Answer `base` with `success: false`.
        pub fn set_rejection(&self, base: &str, error: ProviderErrorInfo) {
            self.set_json(base, StatusCode::OK, &RatesResponse::rejected(error));
        }

        /// Answer `base` with a bare status code.
        pub fn set_status(&self, base: &str, status: StatusCode) {
            self.set_raw(base, status, "");
        }

        /// Answer `base` with an arbitrary body.
        pub fn set_raw(&self, base: &str, status: StatusCode, body: &str) {
            self.state.replies.insert(
                Currency::new(base).code().to_string(),
                StubReply {
                    status,
                    body: body.to_string(),
                },
            );
        }

        /// Requests received so far.
        pub fn hits(&self) -> usize {
            self.state.hits.load(Ordering::SeqCst)
        }

        /// Query parameters of the most recent request.
        pub fn last_query(&self) -> HashMap<String, String> {
            self.state
                .last_query
                .lock()
                .map(|q| q.clone())
                .unwrap_or_default()
        }

        fn set_json(&self, base: &str, status: StatusCode, response: &RatesResponse) {
            let body = serde_json::to_string(response).unwrap_or_default();
            self.set_raw(base, status, &body);
        }
    }

    impl Drop for StubProvider {
        fn drop(&mut self) {
            self.server.abort();
        }
    }

    async fn latest(
        State(state): State<Arc<StubState>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        state.hits.fetch_add(1, Ordering::SeqCst);

        let base = params
            .get("base")
            .map(|b| Currency::new(b.as_str()).code().to_string())
            .unwrap_or_default();
        if let Ok(mut last) = state.last_query.lock() {
            *last = params;
        }

        let reply = state.replies.get(&base).map(|r| r.value().clone()).unwrap_or_else(|| {
            let rejected = RatesResponse::rejected(
                ProviderErrorInfo::new(201, "invalid_base_currency")
                    .with_info("An invalid base currency has been entered."),
            );
            StubReply {
                status: StatusCode::OK,
                body: serde_json::to_string(&rejected).unwrap_or_default(),
            }
        });

        (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body,
        )
            .into_response()
    }
}
