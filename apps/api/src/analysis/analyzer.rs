//! Manuscript analyzer. Trait-based seam between the HTTP handlers and the model.
//!
//! Default: `GeminiAnalyzer` (compiles the prompt and makes exactly one inference call).
//! `AppState` holds an `Arc<dyn ManuscriptAnalyzer>`, so handlers can be exercised
//! against a fake without any network.

use async_trait::async_trait;
use tracing::info;

use crate::analysis::compiler::compile_prompt;
use crate::analysis::models::{AnalysisResult, Submission};
use crate::llm_client::{LlmClient, LlmError};

/// Produces an `AnalysisResult` for a submission, or a typed failure.
/// One call is one suspension point; implementations do not retry.
#[async_trait]
pub trait ManuscriptAnalyzer: Send + Sync {
    async fn analyze(&self, submission: &Submission) -> Result<AnalysisResult, LlmError>;

    /// Identifier of the model behind this analyzer, reported back to clients.
    fn model(&self) -> &str;
}

/// Gemini-backed analyzer. Payloads are parsed strictly; values are not validated.
pub struct GeminiAnalyzer(pub LlmClient);

#[async_trait]
impl ManuscriptAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, submission: &Submission) -> Result<AnalysisResult, LlmError> {
        let compiled = compile_prompt(submission);
        info!(
            "Analysing manuscript with model {} (prompt length: {} chars)",
            self.0.model(),
            compiled.instruction.chars().count()
        );

        let result: AnalysisResult = self
            .0
            .call_json(&compiled.instruction, &compiled.schema)
            .await?;

        info!(
            "Analysis complete: {} journals, detected area '{}'",
            result.journals.len(),
            result.detected_subject_area
        );
        Ok(result)
    }

    fn model(&self) -> &str {
        self.0.model()
    }
}
