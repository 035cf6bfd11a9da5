//! Groups domain - shared orders against one restaurant
//!
//! A coordinator opens a group with a restaurant record (usually produced by
//! the menus domain), members append their orders, and the coordinator moves
//! the group through its statuses and records payments.

pub mod models;
pub mod store;

pub use models::{Group, GroupStatus, Order, OrderInput, OrderLine};
pub use store::{GroupError, GroupStore, InMemoryGroupStore};
