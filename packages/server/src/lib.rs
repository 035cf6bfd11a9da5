// Lunch Order API - Core
//
// Backend for group lunch orders: a coordinator opens a group against a
// restaurant, members add their orders, and the restaurant's menu can be
// read automatically from a map link or a photo of a paper menu.
//
// Domains live in domains/*, infrastructure traits and adapters in kernel/,
// and the axum surface in server/.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
