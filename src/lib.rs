//! AgriFlow Marketplace
//!
//! Peer-to-peer marketplace server for an agricultural platform: farmers
//! publish listings to rent or sell equipment and produce, other users
//! reserve them, and a simpler equipment catalogue is rented out through
//! rental contracts. Exposes a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
