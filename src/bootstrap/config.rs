//! # Configuration Loader / 配置加载器
//!
//! Reads a TOML file into [`AppConfig`]. Missing keys take their defaults
//! (handled by the DTO); this module only adds I/O and parse context.
//!
//! 仅负责读取与解析，默认值由 DTO 自身处理。

use std::path::{Path, PathBuf};

use anyhow::Context;
use rf_core::config::AppConfig;

const APP_DIR_NAME: &str = "reelfeed";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - the file cannot be read
/// - the content is not valid TOML or does not match the schema
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    AppConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Per-user data directory, e.g. `~/.local/share/reelfeed` on Linux.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .context("Failed to resolve the local data directory")
}

/// Load `config_path` when given, otherwise fall back to system defaults.
pub fn load_or_default(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::with_system_defaults(default_data_dir()?)),
    }
}
