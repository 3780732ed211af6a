//! Resilient request channel
//!
//! Every call to the meal service goes through [`ResilientChannel::execute`]:
//!
//! 1. resolve the URL and attach the session bearer token (authenticated
//!    requests only, and only when a token is stored)
//! 2. send with a fixed timeout; a non-2xx status is a failure
//! 3. classify failures and re-attempt the identical request while the
//!    [`RetryPolicy`] allows it
//! 4. unwrap the `{success, data, error, message}` envelope
//!
//! Terminal failures are handed to the [`FailureObserver`] once per call.
//! Attempt counters live on the stack of each call, so concurrent calls never
//! share retry state.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use tokio_util::sync::CancellationToken;

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::observer::{FailureObserver, FailureReport, TracingObserver};
use crate::retry::RetryPolicy;
use crate::session::TokenStore;
use crate::transport::{
    PreparedRequest, RawResponse, ReqwestTransport, RequestSpec, Transport, TransportFailure,
};

/// Request channel with auth, timeout, retry and envelope handling
#[derive(Debug, Clone)]
pub struct ResilientChannel {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    observer: Arc<dyn FailureObserver>,
    policy: RetryPolicy,
    base_url: String,
    timeout: Duration,
}

impl ResilientChannel {
    /// Create a channel talking to the network
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()?))
    }

    /// Create a channel over an arbitrary transport
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> ClientResult<Self> {
        Ok(Self {
            transport,
            tokens: config.token_store()?,
            observer: Arc::new(TracingObserver),
            policy: RetryPolicy::new(config.max_attempts),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn with_token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn FailureObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Session token store shared with login/logout
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve the URL and attach credentials
    pub fn prepare(&self, spec: &RequestSpec) -> ClientResult<PreparedRequest> {
        let bearer = if spec.authenticated {
            self.tokens.token()
        } else {
            None
        };
        Ok(PreparedRequest {
            method: spec.method.clone(),
            url: spec.url(&self.base_url)?,
            bearer,
            body: spec.body.clone(),
        })
    }

    /// Perform one logical call and return the envelope payload
    pub async fn execute<T: DeserializeOwned>(&self, spec: RequestSpec) -> ClientResult<T> {
        let request = self.prepare(&spec)?;
        let path = spec.path();

        let mut attempts: u32 = 0;
        let response = loop {
            attempts += 1;
            tracing::debug!(
                method = %spec.method,
                path = %path,
                attempt = attempts,
                "Sending request"
            );

            match self.send_once(request.clone()).await {
                Ok(response) => break response,
                Err(failure) => {
                    let classified = classify(&failure);
                    if self.policy.should_retry(&classified, attempts) {
                        let delay = self.policy.delay_for(attempts);
                        tracing::warn!(
                            method = %spec.method,
                            path = %path,
                            attempt = attempts,
                            kind = %classified.kind,
                            delay_ms = delay.as_millis() as u64,
                            "Request failed, retrying: {}",
                            classified.detail
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        continue;
                    }

                    let status = classified.status;
                    let detail = classified.detail.clone();
                    return Err(self.surface(&spec, attempts, status, detail, classified.into()));
                }
            }
        };

        self.unwrap_envelope(&spec, attempts, response)
    }

    /// Like [`execute`](Self::execute), but gives up as soon as `cancel` fires
    ///
    /// An abandoned call returns [`ClientError::Cancelled`] and its pending
    /// response, if one ever arrives, is dropped unread. Cancellation is the
    /// caller's choice, so the failure observer is not notified.
    pub async fn execute_cancellable<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        cancel: &CancellationToken,
    ) -> ClientResult<T> {
        let method = spec.method.clone();
        let path = spec.path();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(method = %method, path = %path, "Request cancelled");
                Err(ClientError::Cancelled)
            }
            result = self.execute(spec) => result,
        }
    }

    async fn send_once(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Err(_) => Err(TransportFailure::Timeout),
            Ok(Err(failure)) => Err(failure),
            Ok(Ok(response)) if response.status.is_success() => Ok(response),
            Ok(Ok(response)) => Err(response.into()),
        }
    }

    fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        attempts: u32,
        response: RawResponse,
    ) -> ClientResult<T> {
        let status = Some(response.status);

        let envelope: ApiResponse<serde_json::Value> = match serde_json::from_str(&response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                let err = ClientError::InvalidResponse(format!("malformed envelope: {e}"));
                return Err(self.surface(spec, attempts, status, response.body, err));
            }
        };

        if !envelope.success {
            let reason = envelope.failure_text().unwrap_or("Request failed").to_string();
            let err = ClientError::Rejected(reason);
            return Err(self.surface(spec, attempts, status, response.body, err));
        }

        let payload = match envelope.data {
            Some(data) => serde_json::from_value(data),
            // unit-like payloads only
            None => T::deserialize(serde_json::Value::Null),
        };

        payload.map_err(|e| {
            let err = ClientError::InvalidResponse(format!("unexpected payload: {e}"));
            self.surface(spec, attempts, status, response.body, err)
        })
    }

    /// Report a terminal failure and hand it back
    fn surface(
        &self,
        spec: &RequestSpec,
        attempts: u32,
        status: Option<StatusCode>,
        detail: String,
        error: ClientError,
    ) -> ClientError {
        let report = FailureReport {
            kind: error.kind(),
            message: error.user_message(),
            method: spec.method.clone(),
            path: spec.path(),
            attempts,
            status,
            detail,
        };
        self.observer.on_failure(&report);
        error
    }
}
