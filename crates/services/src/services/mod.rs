pub mod auth;
pub mod config;
pub mod monthly_tasks;
