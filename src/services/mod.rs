pub mod auth;
pub mod demo;
pub mod groceries;
pub mod metrics;
pub mod recipes;
pub mod weekly_menus;
