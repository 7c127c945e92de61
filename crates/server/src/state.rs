use std::sync::Arc;

use armory_core::{Config, FetchOrchestrator, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<FetchOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<FetchOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator {
        self.orchestrator.as_ref()
    }
}
