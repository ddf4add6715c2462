//! # Application Dependencies / 应用依赖
//!
//! Dependency grouping for session construction. Not a builder: no build
//! steps, no defaults, just parameter grouping.
//!
//! 仅用于参数打包，不是 Builder 模式。

use std::sync::Arc;

use rf_core::ports::*;

/// Every port the use cases need. All fields are required.
#[derive(Clone)]
pub struct AppDeps {
    // Backend / 后端
    pub auth: Arc<dyn AuthPort>,
    pub engagement: Arc<dyn EngagementPort>,
    pub catalog: Arc<dyn VideoCatalogPort>,

    // Device / 设备
    pub player: Arc<dyn MediaPlayerPort>,
    pub storage: Arc<dyn KeyValueStorePort>,
    pub connectivity: Arc<dyn ConnectivityPort>,

    // Observability / 可观测性
    pub reporter: Arc<dyn ErrorReporterPort>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,
    pub sleeper: Arc<dyn SleeperPort>,
}
