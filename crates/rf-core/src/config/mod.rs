//! # Configuration DTO / 配置数据结构
//!
//! TOML → [`AppConfig`] mapping. Every section is `#[serde(default)]`, so a
//! missing key takes the documented default and an empty file is a valid
//! configuration.
//!
//! 每个配置段都带默认值，缺失的键使用默认值。

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::{
    ViewportConfig, ViewportConfigError, DEFAULT_MIN_DWELL_MS, DEFAULT_VISIBILITY_THRESHOLD,
};
use crate::retry::{RetryPolicy, RetryPolicyError};

/// A configuration value that parsed but cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Retry(#[from] RetryPolicyError),
    #[error(transparent)]
    Viewport(#[from] ViewportConfigError),
}

/// Application configuration DTO
/// 应用配置 DTO
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
    pub connectivity: ConnectivityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub visibility_threshold: f32,
    pub min_dwell_ms: u64,
    /// How many times the user may press "Retry" on a failed feed load.
    pub max_manual_reload_retries: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            min_dwell_ms: DEFAULT_MIN_DWELL_MS,
            max_manual_reload_retries: 3,
        }
    }
}

impl FeedConfig {
    pub fn viewport(&self) -> Result<ViewportConfig, ViewportConfigError> {
        ViewportConfig::new(self.visibility_threshold, self.min_dwell_ms)
    }
}

/// One `[retry.*]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryProfile {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryProfile {
    pub fn policy(&self) -> Result<RetryPolicy, RetryPolicyError> {
        RetryPolicy::new(self.max_attempts, self.base_delay_ms)
    }
}

impl From<RetryPolicy> for RetryProfile {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts(),
            base_delay_ms: policy.base_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub auth: RetryProfile,
    pub sign_out: RetryProfile,
    pub engagement: RetryProfile,
    pub catalog: RetryProfile,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            auth: RetryPolicy::AUTH.into(),
            sign_out: RetryPolicy::SIGN_OUT.into(),
            engagement: RetryPolicy::ENGAGEMENT.into(),
            catalog: RetryPolicy::CATALOG.into(),
        }
    }
}

/// Resolved retry policies, one per call-site family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicies {
    pub auth: RetryPolicy,
    pub sign_out: RetryPolicy,
    pub engagement: RetryPolicy,
    pub catalog: RetryPolicy,
}

impl Default for RetryPolicies {
    fn default() -> Self {
        Self {
            auth: RetryPolicy::AUTH,
            sign_out: RetryPolicy::SIGN_OUT,
            engagement: RetryPolicy::ENGAGEMENT,
            catalog: RetryPolicy::CATALOG,
        }
    }
}

impl RetryConfig {
    pub fn policies(&self) -> Result<RetryPolicies, RetryPolicyError> {
        Ok(RetryPolicies {
            auth: self.auth.policy()?,
            sign_out: self.sign_out.policy()?,
            engagement: self.engagement.policy()?,
            catalog: self.catalog.policy()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON state file. Empty means keep state in memory only.
    pub state_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// URL probed with HEAD. Empty means "assume online".
    pub probe_url: String,
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_url: String::new(),
            probe_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling log file. Empty disables file logging.
    pub directory: PathBuf,
}

impl AppConfig {
    /// Parse TOML text.
    /// 解析 TOML 文本。
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Defaults with data files placed under `data_dir`.
    ///
    /// `data_dir` is computed by the caller (e.g. with the `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            storage: StorageConfig {
                state_file: data_dir.join("app_state.json"),
            },
            logging: LoggingConfig {
                directory: data_dir.join("logs"),
            },
            ..Self::default()
        }
    }
}
