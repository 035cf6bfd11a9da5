//! Prompts for menu extraction.
//!
//! Both variants pin the exact JSON shape with an example and forbid any
//! surrounding commentary; the normalizer still copes when models ignore it.

use crate::domains::menus::models::ExtractionRequest;
use crate::kernel::InlineAttachment;

/// Token left in the example's "name" field when no venue name is known.
/// A model answering with this token has not found a name.
pub const NAME_PLACEHOLDER: &str = "RESTAURANT_NAME";

/// Instruction plus optional image payload for one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPrompt {
    pub instruction: String,
    pub attachment: Option<InlineAttachment>,
}

/// Build the prompt for a request.
///
/// For URL requests a name already recovered from the link is pre-filled in
/// the example so the model confirms it rather than guessing another one.
pub fn build_prompt(request: &ExtractionRequest, recovered_name: Option<&str>) -> MenuPrompt {
    match request {
        ExtractionRequest::Url { url } => MenuPrompt {
            instruction: url_instruction(url, recovered_name),
            attachment: None,
        },
        ExtractionRequest::Image { data, mime_type } => MenuPrompt {
            instruction: image_instruction(),
            attachment: Some(InlineAttachment {
                mime_type: mime_type.clone(),
                data: data.clone(),
            }),
        },
    }
}

fn output_shape(name: &str) -> String {
    // serde_json escapes quotes and backslashes in the recovered name
    let name = serde_json::Value::String(name.to_string());
    format!(
        r#"{{
  "name": {name},
  "address": "street address, or empty string if unknown",
  "phone": "phone number, or empty string if unknown",
  "minDelivery": 0,
  "menu": [
    {{"name": "dish name", "price": 100, "description": "short description, optional"}}
  ]
}}"#
    )
}

const OUTPUT_RULES: &str = "Rules:
- Respond with the JSON object only. No explanations, no markdown, no code fences.
- \"price\" is a whole number in the local currency, digits only.
- \"minDelivery\" is the minimum order amount for delivery, 0 if unknown.
- List every menu item you can find, in the order they appear.";

fn url_instruction(url: &str, recovered_name: Option<&str>) -> String {
    let name_hint = match recovered_name {
        Some(name) => format!(
            "The link points to a venue named \"{}\". Confirm this name unless the venue clearly has a different one.\n",
            name
        ),
        None => String::new(),
    };

    format!(
        "You are helping a group order lunch from a restaurant.\n\
         Identify the restaurant at this map link and list its menu.\n\
         Link: {url}\n\
         {name_hint}\
         Find the restaurant name, phone number, address if you can derive it, \
         and the menu items with their names and prices.\n\n\
         Return exactly this JSON shape:\n{shape}\n\n{rules}",
        url = url,
        name_hint = name_hint,
        shape = output_shape(recovered_name.unwrap_or(NAME_PLACEHOLDER)),
        rules = OUTPUT_RULES,
    )
}

fn image_instruction() -> String {
    format!(
        "You are helping a group order lunch from a restaurant.\n\
         The attached photo shows a paper menu. Read it and list every menu item \
         with its name and price, plus the restaurant name, phone number and \
         address if they are printed on it.\n\
         If no restaurant name is visible, invent a short plausible one based on the food.\n\n\
         Return exactly this JSON shape:\n{shape}\n\n{rules}",
        shape = output_shape(NAME_PLACEHOLDER),
        rules = OUTPUT_RULES,
    )
}
