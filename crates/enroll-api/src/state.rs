//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Holds the enrollment workflow (which owns
//! the in-memory catalog) and application configuration. Clone-friendly
//! via `Arc` internals in the catalog.

use std::sync::Arc;

use enroll_catalog::MemoryCatalog;
use enroll_engine::{CalendarIntegration, EnrollmentWorkflow, Notifier};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state accessible to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The enrollment workflow. Owns the catalog; all session and
    /// enrollment mutations go through it.
    pub workflow: EnrollmentWorkflow,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// State with an empty catalog, no-op collaborators, and default
    /// configuration.
    pub fn new() -> Self {
        Self {
            workflow: EnrollmentWorkflow::new(MemoryCatalog::new()),
            config: AppConfig::default(),
        }
    }

    /// State with the given configuration and collaborator implementations.
    pub fn with_config(
        config: AppConfig,
        notifier: Arc<dyn Notifier>,
        calendar: Arc<dyn CalendarIntegration>,
    ) -> Self {
        Self {
            workflow: EnrollmentWorkflow::with_collaborators(
                MemoryCatalog::new(),
                notifier,
                calendar,
            ),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
