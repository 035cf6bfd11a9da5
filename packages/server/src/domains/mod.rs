// Business domains
pub mod groups;
pub mod menus;
