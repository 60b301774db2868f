use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::fallback::{error_fallback, DEFAULT_FALLBACK_REASON};
use super::remote::RemoteService;
use crate::models::{RawDocument, ResultSource};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::strategy::{ExtractionStrategy, LocalStrategy, RemoteStrategy, StrategyFailure};
use crate::pipeline::structuring::{Structured, StructuringEngine};

/// Which processing tiers a document may go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingMode {
    /// Probe, then remote or error table.
    #[default]
    Remote,
    /// In-process extraction and structuring only.
    Local,
    /// Remote, then local AI, then heuristic.
    RemoteThenLocal,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::RemoteThenLocal => "remote-then-local",
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            "remote-then-local" => Ok(Self::RemoteThenLocal),
            other => Err(format!(
                "unknown routing mode '{other}' (expected remote, local or remote-then-local)"
            )),
        }
    }
}

/// Runs a document through an ordered list of strategies until one
/// produces a table. When every tier is unavailable the failure is
/// reported as an error-fallback table; only fatal content errors surface.
pub struct BackendOrchestrator {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl BackendOrchestrator {
    /// Build the chain for a routing mode.
    pub fn new(
        mode: RoutingMode,
        remote: Arc<dyn RemoteService>,
        engine: StructuringEngine,
    ) -> Self {
        let strategies: Vec<Box<dyn ExtractionStrategy>> = match mode {
            RoutingMode::Remote => vec![Box::new(RemoteStrategy::new(remote))],
            RoutingMode::Local => vec![Box::new(LocalStrategy::new(engine))],
            RoutingMode::RemoteThenLocal => vec![
                Box::new(RemoteStrategy::new(remote)),
                Box::new(LocalStrategy::new(engine)),
            ],
        };
        Self::with_strategies(strategies)
    }

    /// In-process chain with no remote tier.
    pub fn local_only(engine: StructuringEngine) -> Self {
        Self::with_strategies(vec![Box::new(LocalStrategy::new(engine))])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn run(&self, document: Arc<RawDocument>) -> Result<Structured, ExtractionError> {
        let mut last_reason: Option<String> = None;

        for strategy in &self.strategies {
            match strategy.attempt(Arc::clone(&document)).await {
                Ok(structured) => {
                    tracing::info!(
                        document_id = %document.id,
                        strategy = strategy.name(),
                        source = %structured.source,
                        "Strategy produced result"
                    );
                    return Ok(structured);
                }
                Err(StrategyFailure::Unavailable(reason)) => {
                    tracing::warn!(
                        document_id = %document.id,
                        strategy = strategy.name(),
                        reason = %reason,
                        "Strategy unavailable, trying next tier"
                    );
                    last_reason = Some(reason);
                }
                Err(StrategyFailure::Fatal(e)) => {
                    tracing::error!(
                        document_id = %document.id,
                        strategy = strategy.name(),
                        error = %e,
                        "Content extraction failed"
                    );
                    return Err(e);
                }
            }
        }

        let reason = last_reason.unwrap_or_else(|| DEFAULT_FALLBACK_REASON.to_string());
        tracing::warn!(document_id = %document.id, reason = %reason, "All strategies failed, using error fallback");
        Ok(Structured {
            result: error_fallback(&reason),
            source: ResultSource::ErrorFallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Row, StructuredResult};
    use crate::pipeline::backend::MockRemoteService;
    use crate::pipeline::structuring::FailingAiClient;

    fn remote_table() -> StructuredResult {
        let mut row = Row::new();
        row.insert("Total".into(), serde_json::json!(42));
        StructuredResult::new(vec!["Total".into()], vec![row], 90.0)
    }

    fn text_doc() -> Arc<RawDocument> {
        Arc::new(RawDocument::new("n.txt", "text/plain", b"first line\nsecond line\n".to_vec()))
    }

    fn orchestrator(mode: RoutingMode, remote: MockRemoteService) -> BackendOrchestrator {
        BackendOrchestrator::new(mode, Arc::new(remote), StructuringEngine::heuristic_only())
    }

    #[test]
    fn routing_mode_parses() {
        assert_eq!("remote".parse::<RoutingMode>().unwrap(), RoutingMode::Remote);
        assert_eq!("LOCAL".parse::<RoutingMode>().unwrap(), RoutingMode::Local);
        assert_eq!(
            "remote-then-local".parse::<RoutingMode>().unwrap(),
            RoutingMode::RemoteThenLocal
        );
        assert!("cloud".parse::<RoutingMode>().is_err());
        assert_eq!(RoutingMode::default(), RoutingMode::Remote);
        assert_eq!(RoutingMode::RemoteThenLocal.to_string(), "remote-then-local");
    }

    #[test]
    fn chain_per_mode() {
        let names = |mode| orchestrator(mode, MockRemoteService::down()).strategy_names();
        assert_eq!(names(RoutingMode::Remote), ["remote"]);
        assert_eq!(names(RoutingMode::Local), ["local"]);
        assert_eq!(names(RoutingMode::RemoteThenLocal), ["remote", "local"]);
    }

    #[tokio::test]
    async fn remote_result_returned_verbatim() {
        let orch = orchestrator(RoutingMode::Remote, MockRemoteService::healthy(remote_table()));
        let structured = orch.run(text_doc()).await.unwrap();
        assert_eq!(structured.source, ResultSource::Remote);
        assert_eq!(structured.result, remote_table());
    }

    #[tokio::test]
    async fn probe_failure_yields_error_table() {
        let orch = orchestrator(RoutingMode::Remote, MockRemoteService::down());
        let structured = orch.run(text_doc()).await.unwrap();

        assert_eq!(structured.source, ResultSource::ErrorFallback);
        assert_eq!(structured.result.column_count(), 2);
        assert_eq!(structured.result.row_count(), 1);
        assert_eq!(structured.result.accuracy, 0.0);
        let details = structured.result.rows[0]["Error Details"].as_str().unwrap();
        assert!(details.contains("Health check failed"), "{details}");
        assert!(details.contains("connection refused"), "{details}");
    }

    #[tokio::test]
    async fn remote_call_failure_yields_error_table() {
        let orch = orchestrator(RoutingMode::Remote, MockRemoteService::failing_calls());
        let structured = orch.run(text_doc()).await.unwrap();
        assert_eq!(structured.source, ResultSource::ErrorFallback);
        let details = structured.result.rows[0]["Error Details"].as_str().unwrap();
        assert!(details.contains("500"), "{details}");
    }

    #[tokio::test]
    async fn remote_mode_never_surfaces_content_errors() {
        let orch = orchestrator(RoutingMode::Remote, MockRemoteService::down());
        let doc = Arc::new(RawDocument::new("x.pdf", "application/pdf", b"garbage".to_vec()));
        let structured = orch.run(doc).await.unwrap();
        assert_eq!(structured.source, ResultSource::ErrorFallback);
    }

    #[tokio::test]
    async fn chain_falls_through_to_local_heuristic() {
        let remote = Arc::new(MockRemoteService::down());
        let orch = BackendOrchestrator::new(
            RoutingMode::RemoteThenLocal,
            remote.clone(),
            StructuringEngine::new(Arc::new(FailingAiClient::new())),
        );

        let structured = orch.run(text_doc()).await.unwrap();
        assert_eq!(structured.source, ResultSource::HeuristicFallback);
        assert_eq!(structured.result.row_count(), 2);
        assert_eq!(remote.probe_count(), 1);
    }

    #[tokio::test]
    async fn chain_prefers_remote_when_live() {
        let orch = orchestrator(
            RoutingMode::RemoteThenLocal,
            MockRemoteService::healthy(remote_table()),
        );
        let structured = orch.run(text_doc()).await.unwrap();
        assert_eq!(structured.source, ResultSource::Remote);
    }

    #[tokio::test]
    async fn local_mode_skips_probe() {
        let remote = Arc::new(MockRemoteService::healthy(remote_table()));
        let orch = BackendOrchestrator::new(
            RoutingMode::Local,
            remote.clone(),
            StructuringEngine::heuristic_only(),
        );
        let structured = orch.run(text_doc()).await.unwrap();
        assert_eq!(structured.source, ResultSource::HeuristicFallback);
        assert_eq!(remote.probe_count(), 0);
    }

    #[tokio::test]
    async fn local_mode_surfaces_unparsable_document() {
        let orch = orchestrator(RoutingMode::Local, MockRemoteService::down());
        let doc = Arc::new(RawDocument::new("x.pdf", "application/pdf", b"garbage".to_vec()));
        assert!(matches!(
            orch.run(doc).await,
            Err(ExtractionError::UnparsableDocument(_))
        ));
    }

    #[test]
    fn local_only_has_single_local_tier() {
        let orch = BackendOrchestrator::local_only(StructuringEngine::heuristic_only());
        assert_eq!(orch.strategy_names(), ["local"]);
    }

    #[tokio::test]
    async fn empty_chain_yields_error_table() {
        let orch = BackendOrchestrator::with_strategies(Vec::new());
        let structured = orch.run(text_doc()).await.unwrap();
        assert_eq!(structured.source, ResultSource::ErrorFallback);
        assert_eq!(
            structured.result.rows[0]["Error Details"],
            DEFAULT_FALLBACK_REASON
        );
    }
}
