//! Document processing entry point.
//!
//! One call drives one document: validate type → route (remote / local /
//! chain) → assemble → optionally hand off to the result store.
//!
//! All collaborators are injected, so the processor stays testable with
//! mock AI clients, mock remote services and in-memory stores.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::{DatabaseError, ResultStore};
use crate::models::{ProcessingOutcome, RawDocument};
use crate::pipeline::assembler::ResultAssembler;
use crate::pipeline::backend::{BackendOrchestrator, RemoteService, RoutingMode};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::structuring::StructuringEngine;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// The only failures a processing run reports. Structuring and backend
/// failures are recovered into results and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Background task failed: {0}")]
    Task(String),
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Processes documents independently; no state is shared between runs
/// beyond the injected, read-only collaborators.
pub struct DocumentProcessor {
    orchestrator: BackendOrchestrator,
    store: Option<Arc<dyn ResultStore>>,
}

impl DocumentProcessor {
    pub fn new(orchestrator: BackendOrchestrator) -> Self {
        Self {
            orchestrator,
            store: None,
        }
    }

    /// Build the processor for a routing mode.
    pub fn for_mode(
        mode: RoutingMode,
        remote: Arc<dyn RemoteService>,
        engine: StructuringEngine,
    ) -> Self {
        Self::new(BackendOrchestrator::new(mode, remote, engine))
    }

    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Run one document through the pipeline.
    ///
    /// Fails only for unsupported declared types and unparsable content;
    /// every other path ends in a valid result.
    pub async fn process(&self, document: RawDocument) -> Result<ProcessingOutcome, ProcessingError> {
        let assembler = ResultAssembler::start();

        if document.media_type().is_none() {
            tracing::warn!(
                document_id = %document.id,
                declared_type = %document.declared_type,
                "Rejecting unsupported document type"
            );
            return Err(ExtractionError::UnsupportedFormat(document.declared_type).into());
        }

        tracing::info!(
            document_id = %document.id,
            filename = %document.filename,
            size = document.size(),
            "Processing document"
        );

        let document = Arc::new(document);
        let structured = self.orchestrator.run(Arc::clone(&document)).await?;
        Ok(assembler.assemble(document.id, structured))
    }

    /// Process, then hand the assembled result to the configured store.
    /// Without a store this behaves like [`process`](Self::process) and
    /// returns `None` for the stored id.
    pub async fn process_and_store(
        &self,
        document: RawDocument,
    ) -> Result<(ProcessingOutcome, Option<Uuid>), ProcessingError> {
        let outcome = self.process(document).await?;

        let Some(store) = self.store.clone() else {
            return Ok((outcome, None));
        };

        let to_save = outcome.clone();
        let result_id = tokio::task::spawn_blocking(move || {
            store.save_result(
                &to_save.document_id,
                &to_save.result,
                to_save.processing_time_ms,
                to_save.source,
            )
        })
        .await
        .map_err(|e| ProcessingError::Task(e.to_string()))??;

        tracing::info!(
            document_id = %outcome.document_id,
            result_id = %result_id,
            "Processing result persisted"
        );
        Ok((outcome, Some(result_id)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
