// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseAI, BaseUrlResolver, InlineAttachment, ModelDescriptor, ServerDeps};
use crate::domains::groups::InMemoryGroupStore;

// =============================================================================
// Mock AI
// =============================================================================

/// Scripted outcome for one model
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Failure(String),
    /// Never answers within any sane timeout
    Hang,
}

/// Arguments captured from a generate call
#[derive(Debug, Clone)]
pub struct GenerateCallArgs {
    pub model: String,
    pub instruction: String,
    pub attachment_mime_type: Option<String>,
}

pub struct MockAI {
    catalog: Option<Vec<ModelDescriptor>>,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    calls: Arc<Mutex<Vec<GenerateCallArgs>>>,
    catalog_calls: Arc<Mutex<usize>>,
}

impl MockAI {
    /// A mock whose catalog query fails and whose models are all unscripted.
    pub fn new() -> Self {
        Self {
            catalog: None,
            replies: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            catalog_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Serve a catalog of generation-capable models, in this order
    pub fn with_models(mut self, names: &[&str]) -> Self {
        self.catalog = Some(
            names
                .iter()
                .map(|n| ModelDescriptor::new(*n, true))
                .collect(),
        );
        self
    }

    /// Serve an explicit catalog
    pub fn with_catalog(mut self, catalog: Vec<ModelDescriptor>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Script a successful text response for a model
    pub fn with_response(self, model: &str, response: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(model.to_string(), MockReply::Text(response.into()));
        self
    }

    /// Add a JSON response for a model (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, model: &str, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(model, json)
    }

    /// Script a failure for a model
    pub fn with_failure(self, model: &str, error: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(model.to_string(), MockReply::Failure(error.into()));
        self
    }

    /// Script a model that never answers
    pub fn with_hang(self, model: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(model.to_string(), MockReply::Hang);
        self
    }

    /// All generate calls, in order
    pub fn calls(&self) -> Vec<GenerateCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    /// Models that were invoked, in order
    pub fn called_models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.model.clone())
            .collect()
    }

    /// The last instruction sent to the AI
    pub fn last_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|c| c.instruction.clone())
    }

    /// Check if an instruction containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.instruction.contains(text))
    }

    /// How many times the catalog was queried
    pub fn catalog_call_count(&self) -> usize {
        *self.catalog_calls.lock().unwrap()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        *self.catalog_calls.lock().unwrap() += 1;

        self.catalog
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Mock catalog unavailable"))
    }

    async fn generate(
        &self,
        model: &str,
        instruction: &str,
        attachment: Option<&InlineAttachment>,
    ) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(GenerateCallArgs {
            model: model.to_string(),
            instruction: instruction.to_string(),
            attachment_mime_type: attachment.map(|a| a.mime_type.clone()),
        });

        let reply = self.replies.lock().unwrap().get(model).cloned();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Failure(error)) => Err(anyhow::anyhow!(error)),
            Some(MockReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(anyhow::anyhow!("Mock hang elapsed"))
            }
            None => Err(anyhow::anyhow!("404 model {} not found", model)),
        }
    }
}

// =============================================================================
// Mock URL Resolver
// =============================================================================

pub struct MockUrlResolver {
    redirects: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockUrlResolver {
    /// A resolver that fails for every URL not explicitly scripted.
    pub fn new() -> Self {
        Self {
            redirects: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script `from` to resolve to `to`
    pub fn with_redirect(self, from: &str, to: &str) -> Self {
        self.redirects
            .lock()
            .unwrap()
            .insert(from.to_string(), to.to_string());
        self
    }

    /// All URLs that were resolved
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockUrlResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseUrlResolver for MockUrlResolver {
    async fn resolve(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        self.redirects
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("connection refused: {}", url))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub url_resolver: Arc<MockUrlResolver>,
    pub groups: Arc<InMemoryGroupStore>,
    /// When false, ServerDeps is built as if no AI credential were configured
    pub ai_configured: bool,
    pub model_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            url_resolver: Arc::new(MockUrlResolver::new()),
            groups: Arc::new(InMemoryGroupStore::new()),
            ai_configured: true,
            model_timeout: Duration::from_millis(200),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set a mock URL resolver
    pub fn mock_resolver(mut self, resolver: MockUrlResolver) -> Self {
        self.url_resolver = Arc::new(resolver);
        self
    }

    /// Build deps with no AI credential
    pub fn without_ai(mut self) -> Self {
        self.ai_configured = false;
        self
    }

    /// Build ServerDeps for testing (mocks stay shared for assertions)
    pub fn build_deps(&self) -> ServerDeps {
        let ai: Option<Arc<dyn BaseAI>> = if self.ai_configured {
            Some(self.ai.clone())
        } else {
            None
        };

        ServerDeps::new(
            ai,
            self.url_resolver.clone(),
            self.groups.clone(),
            self.model_timeout,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
