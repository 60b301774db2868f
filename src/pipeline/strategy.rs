//! Ordered extraction strategies.
//!
//! Each tier either produces a table, reports itself unavailable (the next
//! tier is tried), or hits a fatal content error (the run stops).

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{RawDocument, ResultSource};
use crate::pipeline::backend::RemoteService;
use crate::pipeline::extraction::{DocumentExtractor, ExtractionError};
use crate::pipeline::structuring::{Structured, StructuringEngine};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Why a strategy did not produce a table.
#[derive(Debug)]
pub enum StrategyFailure {
    /// This tier cannot serve the document; try the next one.
    Unavailable(String),
    /// The document itself is bad; no other tier will do better.
    Fatal(ExtractionError),
}

/// One tier of the processing chain.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, document: Arc<RawDocument>) -> Result<Structured, StrategyFailure>;
}

// ═══════════════════════════════════════════════════════════
// Remote tier
// ═══════════════════════════════════════════════════════════

/// Probe the remote service, then delegate the whole document to it.
/// Liveness is re-probed on every attempt.
pub struct RemoteStrategy {
    service: Arc<dyn RemoteService>,
}

impl RemoteStrategy {
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ExtractionStrategy for RemoteStrategy {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn attempt(&self, document: Arc<RawDocument>) -> Result<Structured, StrategyFailure> {
        let endpoint = self.service.endpoint();

        if let Err(e) = self.service.health().await {
            tracing::warn!(document_id = %document.id, endpoint, error = %e, "Remote liveness probe failed");
            return Err(StrategyFailure::Unavailable(format!(
                "Backend unavailable (Health check failed): {e}"
            )));
        }
        tracing::debug!(document_id = %document.id, endpoint, "Remote liveness probe succeeded");

        match self.service.process(&document).await {
            Ok(result) => Ok(Structured {
                result,
                source: ResultSource::Remote,
            }),
            Err(e) => {
                tracing::warn!(document_id = %document.id, endpoint, error = %e, "Remote processing failed");
                Err(StrategyFailure::Unavailable(e.to_string()))
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Local tier
// ═══════════════════════════════════════════════════════════

/// Extract in-process, then structure with AI or the heuristic.
/// Only content-extraction errors can stop it.
pub struct LocalStrategy {
    extractor: DocumentExtractor,
    engine: StructuringEngine,
}

impl LocalStrategy {
    pub fn new(engine: StructuringEngine) -> Self {
        Self {
            extractor: DocumentExtractor,
            engine,
        }
    }
}

#[async_trait]
impl ExtractionStrategy for LocalStrategy {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn attempt(&self, document: Arc<RawDocument>) -> Result<Structured, StrategyFailure> {
        let media_type = document
            .media_type()
            .ok_or_else(|| {
                StrategyFailure::Fatal(ExtractionError::UnsupportedFormat(
                    document.declared_type.clone(),
                ))
            })?;

        // Decoding is CPU-bound; keep it off the async workers.
        let extractor = self.extractor;
        let doc = Arc::clone(&document);
        let content = tokio::task::spawn_blocking(move || extractor.extract_document(&doc))
            .await
            .map_err(|e| {
                StrategyFailure::Fatal(ExtractionError::UnparsableDocument(format!(
                    "extraction task failed: {e}"
                )))
            })?
            .map_err(StrategyFailure::Fatal)?;

        Ok(self.engine.structure(&content, media_type.as_str()).await)
    }
}
