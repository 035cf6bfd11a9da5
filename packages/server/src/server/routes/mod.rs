// HTTP routes
pub mod groups;
pub mod health;
pub mod menus;

pub use groups::*;
pub use health::*;
pub use menus::*;
