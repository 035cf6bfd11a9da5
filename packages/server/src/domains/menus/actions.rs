//! Menu extraction actions - business logic functions
//!
//! `extract_menu` runs the whole pipeline:
//!
//! ```text
//! link → venue name (best effort) → ranked models → prompt
//!      → first model that answers → normalized record
//! ```
//!
//! It always returns a well-shaped record. Failures are reported in-band
//! through the record's name and a single manual-entry menu item, so the
//! client always has something to render and edit.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, warn};

use super::activities::{
    build_prompt, normalize_response, placeholder_record, recover_venue_name, run_candidates,
    select_candidates, ExecutionOutcome,
};
use super::models::{ExtractionRequest, RestaurantRecord};
use crate::kernel::ServerDeps;

/// Record name when no AI credential is configured
pub const AI_NOT_CONFIGURED: &str = "Menu extraction unavailable (AI not configured)";

/// Record name when every model candidate failed
pub const EXTRACTION_FAILED: &str = "Menu extraction failed (no model answered)";

/// Record name when an uploaded image cannot be decoded
pub const IMAGE_UNREADABLE: &str = "Could not read the uploaded image";

/// MIME type assumed for uploads that do not name one
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Extract a restaurant record from a map link or a menu photo.
pub async fn extract_menu(deps: &ServerDeps, request: ExtractionRequest) -> RestaurantRecord {
    let Some(ai) = deps.ai.as_ref() else {
        warn!("Menu extraction requested but no AI credential is configured");
        return placeholder_record(AI_NOT_CONFIGURED);
    };

    info!(kind = request.kind(), "Extracting menu");

    let recovered_name = match &request {
        ExtractionRequest::Url { url } => recover_venue_name(deps.url_resolver.as_ref(), url).await,
        ExtractionRequest::Image { .. } => None,
    };

    let candidates = select_candidates(ai.as_ref()).await;
    let prompt = build_prompt(&request, recovered_name.as_deref());

    match run_candidates(ai.as_ref(), &candidates, &prompt, deps.model_timeout).await {
        ExecutionOutcome::Success {
            model,
            text,
            attempts,
        } => {
            let record = normalize_response(&text, &model, recovered_name.as_deref());
            info!(
                model = %model,
                attempts,
                venue = %record.name,
                items = record.menu.len(),
                "Menu extracted"
            );
            record
        }
        ExecutionOutcome::AllFailed {
            last_error,
            attempts,
        } => {
            warn!(attempts, last_error = %last_error, "All model candidates failed");
            placeholder_record(EXTRACTION_FAILED)
        }
    }
}

/// Build an image request from a base64 upload.
///
/// Accepts plain base64 or a `data:<mime>;base64,<payload>` URL; the MIME
/// type embedded in a data URL is used when `mime_type` is absent.
pub fn decode_image_request(
    image: &str,
    mime_type: Option<&str>,
) -> Result<ExtractionRequest, base64::DecodeError> {
    let (embedded_mime, payload) = match image.strip_prefix("data:") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((mime, payload)) => (Some(mime), payload),
            None => (None, image),
        },
        None => (None, image),
    };

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let data = STANDARD.decode(payload)?;

    let mime_type = mime_type
        .filter(|m| !m.trim().is_empty())
        .or(embedded_mime)
        .unwrap_or(DEFAULT_IMAGE_MIME_TYPE)
        .to_string();

    Ok(ExtractionRequest::Image { data, mime_type })
}

/// Placeholder returned for uploads that are not valid base64.
pub fn unreadable_image_record() -> RestaurantRecord {
    placeholder_record(IMAGE_UNREADABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::menus::activities::normalize::MANUAL_ENTRY_ITEM;
    use crate::domains::menus::activities::NAME_PLACEHOLDER;
    use crate::kernel::test_dependencies::{MockAI, MockUrlResolver};
    use crate::kernel::TestDependencies;

    const SHORT_LINK: &str = "https://maps.app.goo.gl/xyz";
    const PLACE_URL: &str = "https://www.google.com/maps/place/Joe%27s+Diner/@25.03,121.56,17z";

    fn url_request() -> ExtractionRequest {
        ExtractionRequest::Url {
            url: SHORT_LINK.to_string(),
        }
    }

    fn assert_well_shaped(record: &RestaurantRecord) {
        assert!(!record.name.is_empty());
        assert!(!record.menu.is_empty());
        for (i, item) in record.menu.iter().enumerate() {
            assert_eq!(item.id as usize, i + 1);
        }
    }

    #[tokio::test]
    async fn test_url_extraction_end_to_end() {
        let ai = MockAI::new()
            .with_models(&["gemini-1.5-pro", "gemini-2.0-flash"])
            .with_response(
                "gemini-2.0-flash",
                format!(
                    "```json\n{{\"name\": \"{}\", \"phone\": \"02-1234-5678\", \"menu\": [{{\"id\": 9, \"name\": \"Burger\", \"price\": \"180\"}}]}}\n```",
                    NAME_PLACEHOLDER
                ),
            );
        let resolver = MockUrlResolver::new().with_redirect(SHORT_LINK, PLACE_URL);
        let test_deps = TestDependencies::new().mock_ai(ai).mock_resolver(resolver);

        let record = extract_menu(&test_deps.build_deps(), url_request()).await;

        assert_eq!(record.name, "Joe's Diner");
        assert_eq!(record.phone.as_deref(), Some("02-1234-5678"));
        assert_eq!(record.menu.len(), 1);
        assert_eq!(record.menu[0].id, 1);
        assert_eq!(record.menu[0].price, 180);
        assert_eq!(test_deps.ai.called_models(), vec!["gemini-2.0-flash"]);
        assert!(test_deps.ai.was_called_with("\"name\": \"Joe's Diner\""));
    }

    #[tokio::test]
    async fn test_missing_credential_yields_placeholder() {
        let test_deps = TestDependencies::new().without_ai();

        let record = extract_menu(&test_deps.build_deps(), url_request()).await;

        assert_eq!(record.name, AI_NOT_CONFIGURED);
        assert_eq!(record.menu[0].name, MANUAL_ENTRY_ITEM);
        assert!(test_deps.url_resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_all_candidates_failing_yields_placeholder() {
        // Catalog query fails, so the fallback list is tried and nothing is scripted
        let test_deps = TestDependencies::new();

        let record = extract_menu(&test_deps.build_deps(), url_request()).await;

        assert_eq!(record.name, EXTRACTION_FAILED);
        assert_well_shaped(&record);
        assert_eq!(
            test_deps.ai.called_models(),
            crate::domains::menus::activities::FALLBACK_MODELS.to_vec()
        );
    }

    #[tokio::test]
    async fn test_image_extraction_skips_link_resolution() {
        let ai = MockAI::new().with_response(
            "gemini-2.0-flash",
            r#"{"name": "Noodle Bar", "menu": [{"name": "Beef noodles", "price": 150}, {"name": "Tea", "price": 30}]}"#,
        );
        let test_deps = TestDependencies::new().mock_ai(ai);
        let request = ExtractionRequest::Image {
            data: vec![0xff, 0xd8],
            mime_type: "image/jpeg".to_string(),
        };

        let record = extract_menu(&test_deps.build_deps(), request).await;

        assert_eq!(record.name, "Noodle Bar");
        assert_well_shaped(&record);
        assert!(test_deps.url_resolver.calls().is_empty());
        assert_eq!(
            test_deps.ai.calls()[0].attachment_mime_type.as_deref(),
            Some("image/jpeg")
        );
    }

    #[tokio::test]
    async fn test_garbage_output_names_the_model() {
        let ai = MockAI::new()
            .with_models(&["gemini-x-flash"])
            .with_response("gemini-x-flash", "I cannot open links, sorry.");
        let test_deps = TestDependencies::new().mock_ai(ai);

        let record = extract_menu(&test_deps.build_deps(), url_request()).await;

        assert!(record.name.contains("gemini-x-flash"));
        assert_well_shaped(&record);
    }

    #[test]
    fn test_decode_plain_base64() {
        let request = decode_image_request("aGVsbG8=", Some("image/png")).unwrap();
        assert_eq!(
            request,
            ExtractionRequest::Image {
                data: b"hello".to_vec(),
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_data_url_uses_embedded_mime() {
        let request = decode_image_request("data:image/webp;base64,aGVs\nbG8=", None).unwrap();
        assert_eq!(
            request,
            ExtractionRequest::Image {
                data: b"hello".to_vec(),
                mime_type: "image/webp".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_defaults_mime_type() {
        match decode_image_request("aGVsbG8=", None).unwrap() {
            ExtractionRequest::Image { mime_type, .. } => {
                assert_eq!(mime_type, DEFAULT_IMAGE_MIME_TYPE)
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(decode_image_request("not base64!!", None).is_err());
    }
}
