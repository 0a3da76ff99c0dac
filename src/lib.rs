pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod schema;
pub mod services;
pub mod ui;

#[cfg(test)]
pub mod testing;
