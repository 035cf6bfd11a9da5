//! Model output normalization.
//!
//! Turns whatever text a model produced into a well-shaped
//! [`RestaurantRecord`]. This is a total function: malformed output, missing
//! fields and wrong types all end in a valid record, never an error.
//!
//! Recovery order:
//! 1. strip code fences,
//! 2. parse the whole text,
//! 3. otherwise parse the first balanced `{...}` span that is a JSON object,
//! 4. otherwise fall back to a placeholder record naming the model.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::prompts::NAME_PLACEHOLDER;
use crate::domains::menus::models::{MenuItem, RestaurantRecord};

/// Name used when neither the model nor the link yields one
pub const DEFAULT_VENUE_NAME: &str = "Unnamed restaurant";

/// Name for menu lines the model left unnamed
pub const UNNAMED_ITEM: &str = "Unnamed item";

/// Single item of a placeholder record, asking the user to fill the menu in
pub const MANUAL_ENTRY_ITEM: &str = "Please add menu items manually";

lazy_static! {
    /// Opening or closing code fence with an optional language tag
    static ref CODE_FENCE: Regex = Regex::new(r"```[A-Za-z0-9_+-]*").unwrap();

    /// First number in a price string; commas are thousands separators and
    /// an exponent (`1e3`) is part of the number
    static ref AMOUNT: Regex = Regex::new(r"-?\d[\d,]*(?:\.\d+)?(?:[eE][+-]?\d+)?").unwrap();
}

/// Normalize raw model text into a record.
///
/// `model` is only used to label the placeholder record when nothing can be
/// parsed. `recovered_name` replaces an empty or placeholder name.
pub fn normalize_response(
    raw: &str,
    model: &str,
    recovered_name: Option<&str>,
) -> RestaurantRecord {
    let stripped = strip_code_fences(raw);

    match parse_payload(&stripped) {
        Some(value) => normalize_value(&value, recovered_name),
        None => {
            warn!(
                model = %model,
                preview = %gemini_client::truncate_to_char_boundary(raw, 200),
                "Model output contained no parseable JSON object"
            );
            placeholder_record(format!("Could not read menu ({})", model))
        }
    }
}

/// Normalize an already-parsed value.
///
/// Objects are read field by field; a bare array is treated as the menu.
/// Anything else yields a record with only defaults.
pub fn normalize_value(value: &Value, recovered_name: Option<&str>) -> RestaurantRecord {
    let empty = Map::new();
    let (fields, menu) = match value {
        Value::Object(map) => (map, map.get("menu")),
        Value::Array(_) => (&empty, Some(value)),
        _ => (&empty, None),
    };

    let name = coerce_text(fields.get("name")).filter(|n| n != NAME_PLACEHOLDER);
    let name = name
        .or_else(|| {
            recovered_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_VENUE_NAME.to_string());

    let min_delivery = fields
        .get("minDelivery")
        .or_else(|| fields.get("min_delivery"));

    RestaurantRecord {
        name,
        address: coerce_text(fields.get("address")),
        phone: coerce_text(fields.get("phone")),
        min_delivery: coerce_amount(min_delivery),
        menu: normalize_menu(menu),
    }
}

/// A record that signals failure in-band: the name carries the reason and
/// the menu holds one zero-priced manual-entry item.
pub fn placeholder_record(name: impl Into<String>) -> RestaurantRecord {
    RestaurantRecord {
        name: name.into(),
        address: None,
        phone: None,
        min_delivery: 0,
        menu: vec![manual_entry_item()],
    }
}

fn manual_entry_item() -> MenuItem {
    MenuItem {
        id: 1,
        name: MANUAL_ENTRY_ITEM.to_string(),
        price: 0,
        description: None,
    }
}

fn normalize_menu(menu: Option<&Value>) -> Vec<MenuItem> {
    let entries = match menu {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => &[],
    };

    let items: Vec<MenuItem> = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(item) => Some((
                coerce_text(item.get("name")),
                coerce_amount(item.get("price")),
                coerce_text(item.get("description")),
            )),
            Value::String(_) => Some((coerce_text(Some(entry)), 0, None)),
            _ => None,
        })
        .enumerate()
        // Model-supplied ids are discarded; position is the only ordering
        .map(|(index, (name, price, description))| MenuItem {
            id: index as u32 + 1,
            name: name.unwrap_or_else(|| UNNAMED_ITEM.to_string()),
            price,
            description,
        })
        .collect();

    if items.is_empty() {
        debug!("Menu was empty after normalization, inserting manual entry item");
        return vec![manual_entry_item()];
    }
    items
}

/// Text from a string or number; blank strings count as missing.
fn coerce_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Non-negative whole amount from a number or a decorated price string
/// (`"NT$1,200"`, `"50元"`). Anything unreadable is 0.
fn coerce_amount(value: Option<&Value>) -> u32 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => AMOUNT
            .find(s)
            .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok()),
        _ => None,
    };

    match amount {
        Some(a) if a.is_finite() && a > 0.0 => a.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// Parse the whole text, else the first balanced object span.
fn parse_payload(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => return Some(value),
        Ok(_) | Err(_) => {}
    }

    first_balanced_object(text)
}

/// Scan for `{...}` spans whose braces balance outside JSON string literals,
/// in order of their opening brace, and return the first that parses as an
/// object.
///
/// Unlike a greedy first-`{`-to-last-`}` match this does not swallow
/// commentary between two separate objects.
pub(crate) fn first_balanced_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();

    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(&bytes[start..]) else {
            continue;
        };

        let candidate = &text[start..start + end + 1];
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            return Some(value);
        }
    }

    None
}

/// Index of the brace closing the one at `bytes[0]`, if it closes.
fn balanced_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
