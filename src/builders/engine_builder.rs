//! Build an assignment engine from configuration.

use std::sync::Arc;

use crate::config::{EngineConfig, NotifierBackendConfig, StoreBackendConfig};
use crate::core::engine::AssignmentEngine;
use crate::core::error::EngineError;
use crate::core::notify::Notifier;
use crate::core::store::Store;
use crate::infra::notify::{LogNotifier, RecordingNotifier};
use crate::infra::store::{InMemoryStore, PostgresStore};

/// Build an engine from configuration, selecting the configured backends.
pub fn build_engine(cfg: &EngineConfig) -> Result<AssignmentEngine, EngineError> {
    cfg.validate()
        .map_err(|e| EngineError::Backend(format!("config invalid: {e}")))?;

    let store: Arc<dyn Store> = match cfg.store {
        StoreBackendConfig::InMemory => Arc::new(InMemoryStore::new()),
        StoreBackendConfig::Postgres => Arc::new(PostgresStore::new()),
    };
    let notifier: Arc<dyn Notifier> = match cfg.notifier {
        NotifierBackendConfig::Recording => Arc::new(RecordingNotifier::new()),
        NotifierBackendConfig::Log => Arc::new(LogNotifier),
    };

    Ok(AssignmentEngine::new(store, notifier, cfg.policy()))
}

/// Build an engine from configuration with caller-provided backends, keeping
/// handles on them (the usual shape for tests and embedding applications).
pub fn build_engine_with(
    cfg: &EngineConfig,
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
) -> Result<AssignmentEngine, EngineError> {
    cfg.validate()
        .map_err(|e| EngineError::Backend(format!("config invalid: {e}")))?;
    Ok(AssignmentEngine::new(store, notifier, cfg.policy()))
}
