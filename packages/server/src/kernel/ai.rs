// AI implementation using Gemini
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gemini_client::{GeminiClient, GenerateContentRequest};

use super::{BaseAI, InlineAttachment, ModelDescriptor};

/// Gemini implementation of AI capabilities
#[derive(Clone)]
pub struct GeminiAI {
    client: GeminiClient,
}

impl GeminiAI {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Build the request for one call. Image prompts carry the photo inline.
    fn build_request(
        instruction: &str,
        attachment: Option<&InlineAttachment>,
    ) -> GenerateContentRequest {
        let request = GenerateContentRequest::from_text(instruction).temperature(0.2);
        match attachment {
            Some(a) => request.inline_data(&a.mime_type, &a.data),
            None => request,
        }
    }
}

#[async_trait]
impl BaseAI for GeminiAI {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        let models = self
            .client
            .list_models()
            .await
            .context("Failed to list Gemini models")?;

        Ok(models
            .into_iter()
            .map(|m| {
                let supports_generation = m.supports_generate_content();
                ModelDescriptor::new(m.name, supports_generation)
            })
            .collect())
    }

    async fn generate(
        &self,
        model: &str,
        instruction: &str,
        attachment: Option<&InlineAttachment>,
    ) -> Result<String> {
        tracing::debug!(
            prompt_length = instruction.len(),
            model = model,
            has_attachment = attachment.is_some(),
            "Calling Gemini API"
        );

        let request = Self::build_request(instruction, attachment);
        let response = self
            .client
            .generate_content(model, request)
            .await
            .map_err(|e| {
                if e.is_rate_limited() {
                    tracing::warn!(model = model, "Gemini quota exhausted for model");
                }
                e
            })
            .with_context(|| format!("Gemini call failed for model {}", model))?;

        let text = response
            .text()
            .ok_or_else(|| anyhow::anyhow!("No text returned by {}", model))?;

        tracing::info!(
            response_length = text.len(),
            model = model,
            "Gemini API response received"
        );

        Ok(text)
    }
}
