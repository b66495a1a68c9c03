//! # Config 模块
//!
//! 宿主配置，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use fx_runtime::{ConfigError, EffectsConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HostError, HostResult};

/// 宿主配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// 效果参数
    #[serde(default)]
    pub effects: EffectsConfig,

    /// 视口配置
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 视口配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewportConfig {
    /// 视口宽度（页面描述未指定时使用）
    #[serde(default = "default_viewport_width")]
    pub width: f64,

    /// 视口高度（页面描述未指定时使用）
    #[serde(default = "default_viewport_height")]
    pub height: f64,

    /// 虚拟帧间隔（毫秒）
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    720.0
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            effects: EffectsConfig::default(),
            viewport: ViewportConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> HostResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| HostError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.effects.validate()?;

        if !(self.viewport.width > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "viewport.width",
            });
        }
        if !(self.viewport.height > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "viewport.height",
            });
        }
        if self.viewport.frame_interval_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "viewport.frame_interval_ms",
            });
        }

        Ok(())
    }

    /// 解析日志级别，无法识别时回退到 `INFO`
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!(level = %self.log_level, "无法识别的日志级别，使用 info");
            tracing::Level::INFO
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.viewport.width, 1280.0);
        assert_eq!(config.viewport.height, 720.0);
        assert_eq!(config.viewport.frame_interval_ms, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "viewport": { "height": 900 } }"#).unwrap();
        assert_eq!(config.viewport.height, 900.0);
        assert_eq!(config.viewport.width, 1280.0);
        assert_eq!(config.effects, EffectsConfig::default());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.viewport.frame_interval_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "viewport.frame_interval_ms"
            })
        );

        config.viewport.frame_interval_ms = 16;
        config.viewport.width = -1.0;
        assert!(config.validate().is_err());

        // 效果参数的校验同样生效
        let mut config = AppConfig::default();
        config.effects.reveal.threshold = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tracing_level() {
        let mut config = AppConfig::default();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
        config.log_level = "debug".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
        config.log_level = "loud".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
