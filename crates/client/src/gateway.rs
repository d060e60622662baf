//! HTTP access to the configured remote endpoint.
//!
//! Every call races the request against a deadline; expiry cancels the
//! in-flight request and classifies as `TimedOut`. The gateway only
//! classifies transport outcomes; interpreting bodies is the caller's job.

use std::time::Duration;

use chrono::Utc;
use stockbook_core::{ClientError, ClientResult};

use crate::config::RemoteConfig;

/// Classified outcome of a query-encoded call.
#[derive(Debug, Clone)]
pub enum RemoteOutcome {
    /// HTTP-ok; raw body for the caller to interpret under its policy.
    Body(String),
    /// Non-success HTTP status.
    HttpError(u16),
    /// Transport-level failure.
    NetworkError(String),
    /// The deadline expired and the request was cancelled.
    TimedOut,
}

impl RemoteOutcome {
    /// Collapse into the error taxonomy, handing the raw body through.
    pub fn into_body(self) -> ClientResult<String> {
        match self {
            RemoteOutcome::Body(body) => Ok(body),
            RemoteOutcome::HttpError(status) => Err(ClientError::Http(status)),
            RemoteOutcome::NetworkError(cause) => Err(ClientError::Network(cause)),
            RemoteOutcome::TimedOut => Err(ClientError::Timeout),
        }
    }
}

/// Marker for a fire-and-forget POST that left the client.
///
/// This is `Dispatched`, not `Delivered`: the response body is never read,
/// so a caller reporting success on the strength of this value is making an
/// optimistic, unverified claim about the remote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched;

/// Client for the single configured web-app endpoint.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    config: RemoteConfig,
    http: reqwest::Client,
}

impl RemoteGateway {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Query-encoded GET: `?action=<action>&<urlencoded params>&timestamp=<ms>`.
    ///
    /// The timestamp parameter doubles as a cache buster on the remote side.
    pub async fn invoke(
        &self,
        action: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> RemoteOutcome {
        let url = self.query_url(action, params);
        tracing::debug!(action, "invoking remote action");

        let response = match self.http.get(&url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(err) => return classify(&err),
        };

        let status = response.status();
        if !status.is_success() {
            return RemoteOutcome::HttpError(status.as_u16());
        }

        match response.text().await {
            Ok(body) => RemoteOutcome::Body(body),
            Err(err) => classify(&err),
        }
    }

    /// Opaque POST of a structured body. The response is intentionally never
    /// inspected; the web-app transport does not expose it to the caller.
    pub async fn dispatch_opaque(
        &self,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> ClientResult<Dispatched> {
        tracing::debug!("dispatching opaque POST");
        match self
            .http
            .post(&self.config.web_app_url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(_) => Ok(Dispatched),
            Err(err) if err.is_timeout() => Err(ClientError::Timeout),
            Err(err) => Err(ClientError::network(err.to_string())),
        }
    }

    fn query_url(&self, action: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}?action={}", self.config.web_app_url, action);
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url.push_str("&timestamp=");
        url.push_str(&Utc::now().timestamp_millis().to_string());
        url
    }
}

fn classify(err: &reqwest::Error) -> RemoteOutcome {
    if err.is_timeout() {
        RemoteOutcome::TimedOut
    } else {
        RemoteOutcome::NetworkError(err.to_string())
    }
}
