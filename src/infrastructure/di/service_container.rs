//! Service container for dependency injection
//!
//! Wires up services with their dependencies.

use std::sync::Arc;

use crate::application::services::TreeService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, Prompter, RealFileSystem, StdioPrompter};

/// Container holding application settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Console dialogue used by the input collector
    pub prompter: Arc<dyn Prompter>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(StdioPrompter))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            prompter,
        }
    }

    pub fn tree_service(&self) -> TreeService {
        TreeService::new(Arc::clone(&self.settings), Arc::clone(&self.fs))
    }
}
