//! Group and order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::menus::RestaurantRecord;

/// Length of the short ids handed out for groups and orders
const SHORT_ID_LEN: usize = 8;

/// Short random id, shareable in a link.
pub fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..SHORT_ID_LEN].to_string()
}

/// Where a group order is in its life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupStatus {
    /// Members can still add orders
    #[default]
    Open,
    /// No more orders
    Closed,
    /// Placed with the restaurant
    Ordered,
    /// Food has arrived
    Arrived,
}

/// A shared order against one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub restaurant: RestaurantRecord,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(restaurant: RestaurantRecord) -> Self {
        Self {
            id: short_id(),
            restaurant,
            orders: Vec::new(),
            status: GroupStatus::Open,
            created_at: Utc::now(),
        }
    }
}

/// One line of a member's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Menu item id within the group's restaurant
    #[serde(default)]
    pub item_id: Option<u32>,
    pub name: String,
    pub price: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// An order as submitted by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInput {
    pub member_name: String,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A member's order within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub member_name: String,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub note: Option<String>,
    /// Sum of price × quantity, computed on submission
    pub total: u32,
    /// What the member has paid so far
    #[serde(default)]
    pub paid_amount: u32,
}

impl Order {
    pub fn from_input(input: OrderInput) -> Self {
        let total = input
            .items
            .iter()
            .map(|line| line.price.saturating_mul(line.quantity))
            .fold(0u32, u32::saturating_add);

        Self {
            id: short_id(),
            member_name: input.member_name.trim().to_string(),
            items: input.items,
            note: input.note.filter(|n| !n.trim().is_empty()),
            total,
            paid_amount: 0,
        }
    }

    /// Whether the member has paid at least the order total.
    pub fn is_settled(&self) -> bool {
        self.paid_amount >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price: u32, quantity: u32) -> OrderLine {
        OrderLine {
            item_id: None,
            name: name.to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_short_id_length() {
        let id = short_id();
        assert_eq!(id.len(), SHORT_ID_LEN);
        assert_ne!(id, short_id());
    }

    #[test]
    fn test_order_total_is_computed() {
        let order = Order::from_input(OrderInput {
            member_name: " Amy ".to_string(),
            items: vec![line("Pork chop rice", 100, 2), line("Tea", 30, 1)],
            note: Some("  ".to_string()),
        });

        assert_eq!(order.total, 230);
        assert_eq!(order.member_name, "Amy");
        assert_eq!(order.note, None);
        assert_eq!(order.paid_amount, 0);
        assert!(!order.is_settled());
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let input: OrderInput = serde_json::from_str(
            r#"{"member_name": "Bo", "items": [{"name": "Soup", "price": 40}]}"#,
        )
        .unwrap();
        assert_eq!(input.items[0].quantity, 1);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&GroupStatus::Open).unwrap(), "\"OPEN\"");
        let status: GroupStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(status, GroupStatus::Closed);
    }
}
