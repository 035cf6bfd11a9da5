//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod test_dependencies;
pub mod traits;
pub mod url_resolver;

pub use ai::GeminiAI;
pub use deps::{ServerDeps, DEFAULT_MODEL_TIMEOUT};
pub use test_dependencies::TestDependencies;
pub use traits::*;
pub use url_resolver::HttpUrlResolver;
