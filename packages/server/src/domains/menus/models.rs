//! Menu extraction data types.

use serde::{Deserialize, Serialize};

/// One line of a restaurant menu.
///
/// `id` is assigned by position (1-based) when a record is normalized;
/// ids coming from the model are never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A restaurant and its menu, as returned to the client.
///
/// Built fresh for every extraction and never persisted by the extraction
/// pipeline (groups keep their own copy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "minDelivery", alias = "min_delivery", default)]
    pub min_delivery: u32,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

/// What to extract a menu from. Exactly one source per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRequest {
    /// A map or location-sharing link
    Url { url: String },
    /// A photographed paper menu
    Image { data: Vec<u8>, mime_type: String },
}

impl ExtractionRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionRequest::Url { .. } => "url",
            ExtractionRequest::Image { .. } => "image",
        }
    }
}

/// A model eligible for an extraction attempt, with its priority score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub name: String,
    pub rank: i32,
}
