//! # Dependency Injection / 依赖注入模块
//!
//! Builds the adapters named by [`AppConfig`] and groups them into
//! [`AppDeps`]. Assembly only: no business decisions are made here.
//!
//! 这是唯一同时依赖 rf-infra 与 rf-app 的地方，只负责组装。

use std::sync::Arc;
use std::time::Duration;

use rf_app::AppDeps;
use rf_core::config::AppConfig;
use rf_core::ports::{ConnectivityPort, KeyValueStorePort};
use rf_infra::network::ConnectivityError;
use rf_infra::{
    FileKeyValueStore, HttpConnectivity, InMemoryAuth, InMemoryErrorReporter,
    MemoryKeyValueStore, SampleCatalog, StaticConnectivity, SystemClock, TokioSleeper,
    TracingPlayer,
};
use tracing::info;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Connectivity probe initialization failed: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("Invalid retry configuration: {0}")]
    Retry(#[from] rf_core::retry::RetryPolicyError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] rf_core::config::ConfigError),
}

fn storage_for(config: &AppConfig) -> Arc<dyn KeyValueStorePort> {
    let path = &config.storage.state_file;
    if path.as_os_str().is_empty() {
        info!("no state file configured, keeping state in memory");
        Arc::new(MemoryKeyValueStore::new())
    } else {
        info!(path = %path.display(), "using file-backed state store");
        Arc::new(FileKeyValueStore::new(path.clone()))
    }
}

fn connectivity_for(config: &AppConfig) -> WiringResult<Arc<dyn ConnectivityPort>> {
    let probe = &config.connectivity;
    if probe.probe_url.is_empty() {
        return Ok(Arc::new(StaticConnectivity::online()));
    }
    let http = HttpConnectivity::new(
        probe.probe_url.clone(),
        Duration::from_millis(probe.probe_timeout_ms),
    )?;
    Ok(Arc::new(http))
}

/// Wire every port from configuration.
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<AppDeps> {
    let catalog = Arc::new(SampleCatalog::with_sample_videos());

    Ok(AppDeps {
        auth: Arc::new(InMemoryAuth::new()),
        engagement: catalog.clone(),
        catalog,
        player: Arc::new(TracingPlayer::new()),
        storage: storage_for(config),
        connectivity: connectivity_for(config)?,
        reporter: Arc::new(InMemoryErrorReporter::new()),
        clock: Arc::new(SystemClock),
        sleeper: Arc::new(TokioSleeper),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_probe_url_assumes_online() {
        let deps = wire_dependencies(&AppConfig::default()).unwrap();
        assert!(deps.connectivity.is_connected().await);
    }

    #[tokio::test]
    async fn file_store_is_used_when_a_path_is_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.state_file = dir.path().join("state.json");

        let deps = wire_dependencies(&config).unwrap();
        deps.storage.set("k", "v").await.unwrap();

        assert!(dir.path().join("state.json").exists());
    }
}
