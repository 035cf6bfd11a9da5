//! Group storage.
//!
//! An in-memory map, optionally mirrored to a JSON file after every write.
//! Writes go to a sibling temp file that is then renamed over the target, so
//! a crash mid-write leaves the previous snapshot intact. Last write wins;
//! there is exactly one writer process.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::models::{Group, GroupStatus, Order, OrderInput};
use crate::domains::menus::RestaurantRecord;

/// Errors from group storage.
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group not found: {id}")]
    NotFound { id: String },

    #[error("order {order_id} not found in group {group_id}")]
    OrderNotFound { group_id: String, order_id: String },

    #[error("failed to persist groups: {0}")]
    Persist(#[from] std::io::Error),

    #[error("failed to encode groups: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GroupError>;

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Open a new group for `restaurant` and return it
    async fn create(&self, restaurant: RestaurantRecord) -> Result<Group>;

    async fn get(&self, id: &str) -> Result<Group>;

    /// Add a member's order; returns the group's orders afterwards
    async fn append_order(&self, id: &str, input: OrderInput) -> Result<Vec<Order>>;

    async fn set_status(&self, id: &str, status: GroupStatus) -> Result<()>;

    /// Remove an order; returns the group's orders afterwards
    async fn delete_order(&self, id: &str, order_id: &str) -> Result<Vec<Order>>;

    /// Record what a member has paid; returns the updated order
    async fn set_paid_amount(&self, id: &str, order_id: &str, amount: u32) -> Result<Order>;

    /// Number of groups held
    async fn count(&self) -> usize;
}

type GroupMap = BTreeMap<String, Group>;

pub struct InMemoryGroupStore {
    groups: RwLock<GroupMap>,
    path: Option<PathBuf>,
}

impl InMemoryGroupStore {
    /// A store that lives and dies with the process.
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(GroupMap::new()),
            path: None,
        }
    }

    /// A store mirrored to `path`, loading whatever snapshot is already there.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let groups = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<GroupMap>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => GroupMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), groups = groups.len(), "Group store opened");

        Ok(Self {
            groups: RwLock::new(groups),
            path: Some(path),
        })
    }

    /// Apply `change` to a copy of the map, persist the copy, then commit it.
    /// A failed change or a failed write leaves the store untouched.
    async fn update<T>(&self, change: impl FnOnce(&mut GroupMap) -> Result<T>) -> Result<T> {
        let mut groups = self.groups.write().await;

        let mut next = groups.clone();
        let out = change(&mut next)?;

        if let Some(path) = &self.path {
            write_snapshot(path, &next).await?;
        }

        *groups = next;
        Ok(out)
    }
}

impl Default for InMemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_snapshot(path: &Path, groups: &GroupMap) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(groups)?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), bytes = bytes.len(), "Group snapshot written");
    Ok(())
}

fn group_mut<'a>(groups: &'a mut GroupMap, id: &str) -> Result<&'a mut Group> {
    groups
        .get_mut(id)
        .ok_or_else(|| GroupError::NotFound { id: id.to_string() })
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn create(&self, restaurant: RestaurantRecord) -> Result<Group> {
        self.update(|groups| {
            let mut group = Group::new(restaurant);
            while groups.contains_key(&group.id) {
                group.id = super::models::short_id();
            }
            groups.insert(group.id.clone(), group.clone());
            Ok(group)
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Group> {
        self.groups
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GroupError::NotFound { id: id.to_string() })
    }

    async fn append_order(&self, id: &str, input: OrderInput) -> Result<Vec<Order>> {
        self.update(|groups| {
            let group = group_mut(groups, id)?;
            group.orders.push(Order::from_input(input));
            Ok(group.orders.clone())
        })
        .await
    }

    async fn set_status(&self, id: &str, status: GroupStatus) -> Result<()> {
        self.update(|groups| {
            group_mut(groups, id)?.status = status;
            Ok(())
        })
        .await
    }

    async fn delete_order(&self, id: &str, order_id: &str) -> Result<Vec<Order>> {
        self.update(|groups| {
            let group = group_mut(groups, id)?;
            let before = group.orders.len();
            group.orders.retain(|o| o.id != order_id);
            if group.orders.len() == before {
                return Err(GroupError::OrderNotFound {
                    group_id: id.to_string(),
                    order_id: order_id.to_string(),
                });
            }
            Ok(group.orders.clone())
        })
        .await
    }

    async fn set_paid_amount(&self, id: &str, order_id: &str, amount: u32) -> Result<Order> {
        self.update(|groups| {
            let group = group_mut(groups, id)?;
            let order = group
                .orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .ok_or_else(|| GroupError::OrderNotFound {
                    group_id: id.to_string(),
                    order_id: order_id.to_string(),
                })?;
            order.paid_amount = amount;
            Ok(order.clone())
        })
        .await
    }

    async fn count(&self) -> usize {
        self.groups.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::groups::models::OrderLine;
    use crate::domains::menus::activities::placeholder_record;

    fn restaurant() -> RestaurantRecord {
        placeholder_record("Joe's Diner")
    }

    fn order(member: &str, price: u32) -> OrderInput {
        OrderInput {
            member_name: member.to_string(),
            items: vec![OrderLine {
                item_id: Some(1),
                name: "Burger".to_string(),
                price,
                quantity: 1,
            }],
            note: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryGroupStore::new();
        let group = store.create(restaurant()).await.unwrap();

        let fetched = store.get(&group.id).await.unwrap();
        assert_eq!(fetched, group);
        assert_eq!(fetched.status, GroupStatus::Open);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_group() {
        let store = InMemoryGroupStore::new();
        assert!(matches!(
            store.get("nope").await,
            Err(GroupError::NotFound { .. })
        ));
        assert!(matches!(
            store.append_order("nope", order("Amy", 1)).await,
            Err(GroupError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let store = InMemoryGroupStore::new();
        let group = store.create(restaurant()).await.unwrap();

        store.append_order(&group.id, order("Amy", 100)).await.unwrap();
        let orders = store.append_order(&group.id, order("Bo", 120)).await.unwrap();
        assert_eq!(orders.len(), 2);

        let paid = store
            .set_paid_amount(&group.id, &orders[1].id, 120)
            .await
            .unwrap();
        assert!(paid.is_settled());

        let remaining = store.delete_order(&group.id, &orders[0].id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].member_name, "Bo");
        assert_eq!(remaining[0].paid_amount, 120);

        store.set_status(&group.id, GroupStatus::Closed).await.unwrap();
        assert_eq!(store.get(&group.id).await.unwrap().status, GroupStatus::Closed);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let store = InMemoryGroupStore::new();
        let group = store.create(restaurant()).await.unwrap();

        assert!(matches!(
            store.delete_order(&group.id, "missing").await,
            Err(GroupError::OrderNotFound { .. })
        ));
        assert!(matches!(
            store.set_paid_amount(&group.id, "missing", 10).await,
            Err(GroupError::OrderNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");

        let store = InMemoryGroupStore::open(&path).await.unwrap();
        let group = store.create(restaurant()).await.unwrap();
        store.append_order(&group.id, order("Amy", 100)).await.unwrap();
        drop(store);

        assert!(!dir.path().join("groups.json.tmp").exists());

        let reopened = InMemoryGroupStore::open(&path).await.unwrap();
        let restored = reopened.get(&group.id).await.unwrap();
        assert_eq!(restored.orders.len(), 1);
        assert_eq!(restored.restaurant.name, "Joe's Diner");
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryGroupStore::open(dir.path().join("none.json"))
            .await
            .unwrap();
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            InMemoryGroupStore::open(&path).await,
            Err(GroupError::Serialize(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so every write fails
        let store = InMemoryGroupStore {
            groups: RwLock::new(GroupMap::new()),
            path: Some(dir.path().join("missing").join("groups.json")),
        };

        assert!(matches!(
            store.create(restaurant()).await,
            Err(GroupError::Persist(_))
        ));
        assert_eq!(store.count().await, 0);
    }
}
