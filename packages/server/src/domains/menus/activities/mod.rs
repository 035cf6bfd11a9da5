//! Menu extraction pipeline stages, leaf-first.

pub mod executor;
pub mod identifier;
pub mod model_selection;
pub mod normalize;
pub mod prompts;

pub use executor::{run_candidates, ExecutionOutcome};
pub use identifier::{recover_venue_name, venue_name_from_url};
pub use model_selection::{rank_candidates, select_candidates, FALLBACK_MODELS};
pub use normalize::{normalize_response, normalize_value, placeholder_record};
pub use prompts::{build_prompt, MenuPrompt, NAME_PLACEHOLDER};
