//! Hitch API Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};

use std::sync::Arc;

use storage::Storage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given storage backend and configuration
    pub fn new(storage: Arc<dyn Storage>, config: Config) -> Self {
        Self { storage, config }
    }
}
