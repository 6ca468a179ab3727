//! Shared application state.

use mongodb::{Client, Database};

/// State handed to route constructors at startup.
///
/// Cloning is cheap (the MongoDB client is an Arc over its connection
/// pool), so readiness handlers take the whole struct by value.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client, kept for health checks and shutdown
    pub mongo_client: Client,
    /// Database the events collection lives in
    pub db: Database,
}
