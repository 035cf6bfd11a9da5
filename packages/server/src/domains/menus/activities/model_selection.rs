//! Late-bound model selection.
//!
//! Which model names exist changes over time and per account, so candidates
//! are ranked from the live catalog on every call. The ranking is a pure
//! function of the catalog and is tested without the network.

use tracing::{debug, warn};

use crate::domains::menus::models::ModelCandidate;
use crate::kernel::{BaseAI, ModelDescriptor};

/// Name markers for fast, cheap variants
const FAST_MARKERS: &[&str] = &["flash"];
const FAST_WEIGHT: i32 = 10;

/// Name markers for capable general-purpose variants
const CAPABLE_MARKERS: &[&str] = &["pro"];
const CAPABLE_WEIGHT: i32 = 5;

/// Name markers for retired or soon-to-be-retired variants
const LEGACY_MARKERS: &[&str] = &["legacy", "deprecated", "vision", "gemini-1.0"];
const LEGACY_WEIGHT: i32 = -100;

/// Known-good models used when the catalog is unavailable or unusable.
pub const FALLBACK_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro"];

/// Score a model name. Higher is tried first.
pub fn score_model(name: &str) -> i32 {
    let name = name.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| name.contains(m));

    let mut score = 0;
    if has(FAST_MARKERS) {
        score += FAST_WEIGHT;
    }
    if has(CAPABLE_MARKERS) {
        score += CAPABLE_WEIGHT;
    }
    if has(LEGACY_MARKERS) {
        score += LEGACY_WEIGHT;
    }
    score
}

/// Rank generation-capable catalog entries, best first.
///
/// Ties keep catalog order. Never returns an empty list: when the catalog is
/// missing or holds nothing usable, the fixed fallback list is returned.
pub fn rank_candidates(catalog: Option<&[ModelDescriptor]>) -> Vec<ModelCandidate> {
    let mut candidates: Vec<ModelCandidate> = catalog
        .unwrap_or_default()
        .iter()
        .filter(|m| m.supports_generation)
        .map(|m| {
            let name = m.name.strip_prefix("models/").unwrap_or(&m.name).to_string();
            ModelCandidate {
                rank: score_model(&name),
                name,
            }
        })
        .collect();

    if candidates.is_empty() {
        return fallback_candidates();
    }

    // sort_by is stable, so equal scores stay in catalog order
    candidates.sort_by(|a, b| b.rank.cmp(&a.rank));
    candidates
}

/// The fixed fallback list, in priority order.
pub fn fallback_candidates() -> Vec<ModelCandidate> {
    FALLBACK_MODELS
        .iter()
        .map(|name| ModelCandidate {
            name: name.to_string(),
            rank: score_model(name),
        })
        .collect()
}

/// Query the catalog and rank it. Catalog failures degrade to the fallback list.
pub async fn select_candidates(ai: &dyn BaseAI) -> Vec<ModelCandidate> {
    let catalog = match ai.list_models().await {
        Ok(models) => Some(models),
        Err(e) => {
            warn!(error = %e, "Model catalog unavailable, using fallback list");
            None
        }
    };

    let candidates = rank_candidates(catalog.as_deref());
    debug!(
        candidates = ?candidates.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "Model candidates selected"
    );
    candidates
}
