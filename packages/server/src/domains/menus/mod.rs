//! Menus domain - reads a restaurant's menu from a map link or a photo
//!
//! # Architecture
//!
//! ```text
//! HTTP → actions::extract_menu → activities (identifier, model_selection,
//!        prompts, executor, normalize) → RestaurantRecord
//! ```
//!
//! The activities are independent and individually testable; only the
//! executor and the catalog query touch the AI provider.

pub mod actions;
pub mod activities;
pub mod models;

pub use actions::{decode_image_request, extract_menu, unreadable_image_record};
pub use models::{ExtractionRequest, MenuItem, ModelCandidate, RestaurantRecord};
