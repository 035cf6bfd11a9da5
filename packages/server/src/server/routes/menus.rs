use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use serde::Deserialize;

use crate::domains::menus::{
    decode_image_request, extract_menu, unreadable_image_record, ExtractionRequest,
    RestaurantRecord,
};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Body of an analyze request: either a link or a base64 photo.
#[derive(Debug, Deserialize)]
pub struct AnalyzeMenuInput {
    pub url: Option<String>,
    pub image: Option<String>,
    pub mime_type: Option<String>,
}

/// Read a restaurant's menu from a map link or a menu photo.
///
/// Extraction failures still answer 200 with a placeholder record; only a
/// body naming neither source is rejected.
pub async fn analyze_menu_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<AnalyzeMenuInput>, JsonRejection>,
) -> Result<Json<RestaurantRecord>, ApiError> {
    let Json(input) = payload?;
    let url = input.url.filter(|u| !u.trim().is_empty());
    let image = input.image.filter(|i| !i.trim().is_empty());

    let request = match (url, image) {
        (Some(url), _) => ExtractionRequest::Url {
            url: url.trim().to_string(),
        },
        (None, Some(image)) => match decode_image_request(&image, input.mime_type.as_deref()) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Uploaded image is not valid base64");
                return Ok(Json(unreadable_image_record()));
            }
        },
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Provide either `url` or `image`".to_string(),
            ))
        }
    };

    let record = extract_menu(&state.server_deps, request).await;
    Ok(Json(record))
}
