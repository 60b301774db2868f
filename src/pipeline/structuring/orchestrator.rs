use std::sync::Arc;

use super::confidence::synthesized_ai_accuracy;
use super::heuristic::heuristic_fallback;
use super::ollama::DisabledAiClient;
use super::parser::{parse_structuring_response, ParseOutcome};
use super::prompt::{build_structuring_messages, structuring_options};
use super::types::AiClient;
use super::StructuringError;
use crate::models::{ResultSource, StructuredResult};
use crate::pipeline::extraction::ExtractedContent;

/// Result of one engine run plus the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Structured {
    pub result: StructuredResult,
    pub source: ResultSource,
}

/// Turns extracted content into a table:
/// serialize → prompt → AI → parse → accuracy, or heuristic on any failure.
///
/// `structure` is infallible. The AI is called at most once per run.
#[derive(Clone)]
pub struct StructuringEngine {
    ai: Arc<dyn AiClient>,
}

impl StructuringEngine {
    pub fn new(ai: Arc<dyn AiClient>) -> Self {
        Self { ai }
    }

    /// Engine that always takes the heuristic path.
    pub fn heuristic_only() -> Self {
        Self::new(Arc::new(DisabledAiClient))
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_enabled()
    }

    pub async fn structure(&self, content: &ExtractedContent, format_hint: &str) -> Structured {
        let text = content.to_prompt_text();

        if !self.ai.is_enabled() {
            tracing::debug!(format = format_hint, "AI disabled, using heuristic structuring");
            return Self::fallback(&text);
        }

        if content.is_empty() {
            tracing::debug!(format = format_hint, "No content to structure, skipping AI");
            return Self::fallback(&text);
        }

        match self.attempt_ai(&text, format_hint).await {
            Ok(result) => {
                tracing::info!(
                    format = format_hint,
                    columns = result.column_count(),
                    rows = result.row_count(),
                    accuracy = result.accuracy,
                    "AI structuring succeeded"
                );
                Structured {
                    result,
                    source: ResultSource::LocalAi,
                }
            }
            Err(e) => {
                tracing::warn!(
                    format = format_hint,
                    error = %e,
                    "AI structuring failed, falling back to heuristic"
                );
                Self::fallback(&text)
            }
        }
    }

    async fn attempt_ai(
        &self,
        text: &str,
        format_hint: &str,
    ) -> Result<StructuredResult, StructuringError> {
        let messages = build_structuring_messages(text, format_hint);
        let response = self.ai.complete(&messages, &structuring_options()).await?;

        match parse_structuring_response(&response) {
            ParseOutcome::Valid(mut result) => {
                result.accuracy = synthesized_ai_accuracy();
                Ok(result)
            }
            ParseOutcome::Invalid(reason) => Err(StructuringError::InvalidResponse(reason)),
        }
    }

    fn fallback(text: &str) -> Structured {
        Structured {
            result: heuristic_fallback(text),
            source: ResultSource::HeuristicFallback,
        }
    }
}
