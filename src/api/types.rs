//! Shared state for the processing service.

use std::sync::Arc;

use crate::pipeline::backend::BackendOrchestrator;
use crate::pipeline::processor::DocumentProcessor;
use crate::pipeline::structuring::StructuringEngine;

/// Shared context for all routes. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    pub processor: Arc<DocumentProcessor>,
    pub ai_enabled: bool,
}

impl ApiContext {
    /// Context whose processor runs the local pipeline only; the service
    /// never re-enters a remote.
    pub fn local(engine: StructuringEngine) -> Self {
        let ai_enabled = engine.ai_enabled();
        let processor = DocumentProcessor::new(BackendOrchestrator::local_only(engine));
        Self::new(processor, ai_enabled)
    }

    pub fn new(processor: DocumentProcessor, ai_enabled: bool) -> Self {
        Self {
            processor: Arc::new(processor),
            ai_enabled,
        }
    }
}
