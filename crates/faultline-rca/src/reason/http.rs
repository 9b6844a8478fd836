//! Blocking HTTP transport to a reasoning service.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use faultline_core::config::ReasonConfig;

use super::extract::refinement_from_text;
use super::{ReasonError, ReasonRequest, Reasoner, Refinement};

/// POSTs the graph summary to a configured endpoint and extracts the
/// refinement from whatever text comes back. Transient failures (transport
/// errors, 5xx, 429) are retried with doubling backoff; anything else
/// fails fast.
#[derive(Debug)]
pub struct HttpReasoner {
    client: reqwest::blocking::Client,
    endpoint: String,
    bearer_token: Option<String>,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl HttpReasoner {
    /// Build a reasoner from configuration.
    ///
    /// # Errors
    ///
    /// [`ReasonError::Disabled`] when refinement is switched off or no
    /// endpoint is configured; [`ReasonError::Transport`] when the
    /// underlying client cannot be constructed.
    pub fn from_config(config: &ReasonConfig) -> Result<Self, ReasonError> {
        let endpoint = match config.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if config.enabled && !endpoint.is_empty() => endpoint.to_string(),
            _ => return Err(ReasonError::Disabled),
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| ReasonError::Transport(err.to_string()))?;
        let bearer_token = config
            .api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok());

        Ok(Self {
            client,
            endpoint,
            bearer_token,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        })
    }

    fn submit(&self, request: &ReasonRequest) -> Result<Refinement, ReasonError> {
        let mut backoff = self.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(attempt, max = self.max_retries, ?backoff, "retrying refinement call");
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(self.max_backoff);
            }

            let mut req = self.client.post(&self.endpoint).json(request);
            if let Some(token) = self.bearer_token.as_deref() {
                req = req.bearer_auth(token);
            }

            match req.send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let body = resp
                            .text()
                            .map_err(|err| ReasonError::Transport(err.to_string()))?;
                        return refinement_from_text(&body).ok_or(ReasonError::Malformed);
                    }
                    if retryable(status) {
                        warn!(status = status.as_u16(), "reasoning service unavailable");
                        last_err = format!("HTTP {status}");
                        continue;
                    }
                    return Err(ReasonError::Rejected {
                        status: status.as_u16(),
                        body: resp.text().unwrap_or_default(),
                    });
                }
                Err(err) => {
                    warn!(error = %err, "refinement transport failure");
                    last_err = err.to_string();
                }
            }
        }

        Err(ReasonError::Exhausted(last_err))
    }
}

/// Server-side congestion and outages are worth retrying; other client
/// errors are not.
fn retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

impl Reasoner for HttpReasoner {
    fn refine(&self, request: &ReasonRequest) -> Result<Refinement, ReasonError> {
        self.submit(request)
    }
}

#[cfg(test)]
mod tests {
    use super::{retryable, HttpReasoner};
    use crate::reason::ReasonError;
    use faultline_core::config::ReasonConfig;
    use reqwest::StatusCode;

    #[test]
    fn disabled_config_yields_disabled() {
        let config = ReasonConfig::default();
        assert!(matches!(
            HttpReasoner::from_config(&config),
            Err(ReasonError::Disabled)
        ));
    }

    #[test]
    fn enabled_without_endpoint_yields_disabled() {
        let config = ReasonConfig {
            enabled: true,
            ..ReasonConfig::default()
        };
        assert!(matches!(
            HttpReasoner::from_config(&config),
            Err(ReasonError::Disabled)
        ));

        let blank = ReasonConfig {
            enabled: true,
            endpoint: Some("   ".to_string()),
            ..ReasonConfig::default()
        };
        assert!(matches!(
            HttpReasoner::from_config(&blank),
            Err(ReasonError::Disabled)
        ));
    }

    #[test]
    fn enabled_with_endpoint_builds() {
        let config = ReasonConfig {
            enabled: true,
            endpoint: Some("http://localhost:9911/refine".to_string()),
            ..ReasonConfig::default()
        };
        assert!(HttpReasoner::from_config(&config).is_ok());
    }

    #[test]
    fn retry_classification() {
        assert!(retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(retryable(StatusCode::BAD_GATEWAY));
        assert!(retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(!retryable(StatusCode::BAD_REQUEST));
        assert!(!retryable(StatusCode::UNAUTHORIZED));
        assert!(!retryable(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
