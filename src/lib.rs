// src/lib.rs

pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod snapshot;
pub mod state;
pub mod utils;

pub use routes::create_router;
