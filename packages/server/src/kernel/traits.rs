// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (what to prompt for, how to read the answer) lives in
// the domain layers that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseUrlResolver)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

/// A model advertised by the provider's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub name: String,
    /// Whether the model can be called for content generation
    pub supports_generation: bool,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, supports_generation: bool) -> Self {
        Self {
            name: name.into(),
            supports_generation,
        }
    }
}

/// Binary payload sent alongside a prompt (e.g. a menu photo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAttachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// List the models available to the configured credential
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>>;

    /// Run one generation call against `model` (returns raw text response)
    async fn generate(
        &self,
        model: &str,
        instruction: &str,
        attachment: Option<&InlineAttachment>,
    ) -> Result<String>;
}

// =============================================================================
// URL Resolver Trait (Infrastructure - redirect following)
// =============================================================================

#[async_trait]
pub trait BaseUrlResolver: Send + Sync {
    /// Follow redirects and return the final URL
    async fn resolve(&self, url: &str) -> Result<String>;
}
