//! Sequential fallback over model candidates.
//!
//! Candidates are tried strictly one at a time, in priority order, and the
//! loop stops at the first success. Calls are billed per invocation, so no
//! candidate is ever called speculatively.

use std::time::Duration;

use tracing::{info, warn};

use super::prompts::MenuPrompt;
use crate::domains::menus::models::ModelCandidate;
use crate::kernel::BaseAI;

/// Result of running the candidate chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// A candidate answered; `attempts` counts every call made, including this one
    Success {
        model: String,
        text: String,
        attempts: usize,
    },
    /// Every candidate failed; only the last error is kept
    AllFailed { last_error: String, attempts: usize },
}

/// Try each candidate in order until one returns text.
///
/// Invocation errors and timeouts are logged and skipped. An empty candidate
/// list counts as an immediate failure.
pub async fn run_candidates(
    ai: &dyn BaseAI,
    candidates: &[ModelCandidate],
    prompt: &MenuPrompt,
    per_candidate_timeout: Duration,
) -> ExecutionOutcome {
    let mut last_error = String::from("no model candidates available");
    let mut attempts = 0;

    for candidate in candidates {
        attempts += 1;

        let call = ai.generate(
            &candidate.name,
            &prompt.instruction,
            prompt.attachment.as_ref(),
        );

        match tokio::time::timeout(per_candidate_timeout, call).await {
            Ok(Ok(text)) => {
                info!(model = %candidate.name, attempts, "Model candidate succeeded");
                return ExecutionOutcome::Success {
                    model: candidate.name.clone(),
                    text,
                    attempts,
                };
            }
            Ok(Err(e)) => {
                warn!(model = %candidate.name, error = %e, "Model candidate failed, trying next");
                last_error = format!("{}: {}", candidate.name, e);
            }
            Err(_) => {
                warn!(
                    model = %candidate.name,
                    timeout_ms = per_candidate_timeout.as_millis(),
                    "Model candidate timed out, trying next"
                );
                last_error = format!(
                    "{}: timed out after {}ms",
                    candidate.name,
                    per_candidate_timeout.as_millis()
                );
            }
        }
    }

    ExecutionOutcome::AllFailed {
        last_error,
        attempts,
    }
}
