#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "A multi-user todo list served as HTML: users register, sign in, and manage a personal"]
#![doc = "list of text tasks. This crate holds the domain models, repositories, stores, session"]
#![doc = "handling, views, routes and the error boundary. `main.rs` wires them into a server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod views;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
