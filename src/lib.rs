pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod geo;
pub mod hooks;
pub mod models;
pub mod notify;
pub mod observability;
pub mod remote;
pub mod state;
pub mod store;
