use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RemoteError;
use crate::models::{RawDocument, ResultSource, StructuredResult};
use crate::pipeline::structuring::{clamp_accuracy, validate_table, ParseOutcome};

/// Wire body of `POST /process`, shared by the service and its client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProcessResponse {
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    /// `{columns, data}`; kept loose so the shape check can name what is wrong.
    pub extracted_data: Value,
    /// Seconds.
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub column_count: usize,
    /// Identifier the service assigned to the uploaded document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<uuid::Uuid>,
    /// Path that produced the table on the service side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ResultSource>,
}

impl RemoteProcessResponse {
    /// Shape-check the payload into a result. The remote-reported accuracy
    /// is kept, clamped to `[0, 100]`.
    pub fn into_result(self) -> Result<StructuredResult, RemoteError> {
        if !self.success {
            return Err(RemoteError::CallFailed(
                "remote service reported success=false".into(),
            ));
        }
        match validate_table(&self.extracted_data) {
            ParseOutcome::Valid(mut result) => {
                result.accuracy = clamp_accuracy(self.accuracy);
                Ok(result)
            }
            ParseOutcome::Invalid(reason) => Err(RemoteError::MalformedResponse(reason)),
        }
    }
}

/// Out-of-process processing service (allows mocking).
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Lightweight liveness check. Never cached by callers.
    async fn health(&self) -> Result<(), RemoteError>;

    /// Delegate extraction of one document entirely to the service.
    async fn process(&self, document: &RawDocument) -> Result<StructuredResult, RemoteError>;

    /// Where the service lives, for logs and error messages.
    fn endpoint(&self) -> &str;
}

/// HTTP client for the remote processing service (`GET /health`,
/// `POST /process`).
pub struct HttpRemoteService {
    base_url: String,
    client: reqwest::Client,
    probe_timeout: Duration,
    timeout_secs: u64,
}

impl HttpRemoteService {
    pub fn new(
        base_url: &str,
        probe_timeout: Duration,
        timeout_secs: u64,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RemoteError::CallFailed(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            probe_timeout,
            timeout_secs,
        })
    }

    fn map_send_error(&self, e: reqwest::Error, timeout_secs: u64) -> RemoteError {
        if e.is_connect() {
            RemoteError::Unavailable {
                url: self.base_url.clone(),
                reason: e.to_string(),
            }
        } else if e.is_timeout() {
            RemoteError::Timeout(timeout_secs)
        } else {
            RemoteError::CallFailed(e.to_string())
        }
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn health(&self) -> Result<(), RemoteError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.probe_timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn process(&self, document: &RawDocument) -> Result<StructuredResult, RemoteError> {
        let url = format!("{}/process", self.base_url);
        let part = reqwest::multipart::Part::bytes(document.content.clone())
            .file_name(document.filename.clone())
            .mime_str(&document.declared_type)
            .map_err(|e| RemoteError::CallFailed(format!("invalid declared type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: RemoteProcessResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;

        body.into_result()
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

/// Mock remote service for testing: fixed health and fixed reply.
pub struct MockRemoteService {
    healthy: bool,
    reply: Option<StructuredResult>,
    probes: AtomicUsize,
    calls: AtomicUsize,
}

impl MockRemoteService {
    /// Healthy service answering every document with `reply`.
    pub fn healthy(reply: StructuredResult) -> Self {
        Self {
            healthy: true,
            reply: Some(reply),
            probes: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Service whose health check fails.
    pub fn down() -> Self {
        Self {
            healthy: false,
            reply: None,
            probes: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Passes the probe, then fails the processing call.
    pub fn failing_calls() -> Self {
        Self {
            healthy: true,
            reply: None,
            probes: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteService for MockRemoteService {
    async fn health(&self) -> Result<(), RemoteError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.healthy {
            Ok(())
        } else {
            Err(RemoteError::Unavailable {
                url: self.endpoint().to_string(),
                reason: "connection refused".into(),
            })
        }
    }

    async fn process(&self, _document: &RawDocument) -> Result<StructuredResult, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or_else(|| RemoteError::Status {
            status: 500,
            body: "internal error".into(),
        })
    }

    fn endpoint(&self) -> &str {
        "mock://remote"
    }
}
