pub mod admin;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod menus;
