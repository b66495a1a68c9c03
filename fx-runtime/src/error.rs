//! # Error 模块
//!
//! 效果层本身只降级、不失败；错误类型仅用于配置校验。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 数值超出允许范围
    #[error("配置项 '{field}' 超出范围: {value}（允许 {range}）")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },

    /// 必须为正数
    #[error("配置项 '{field}' 必须大于 0")]
    NotPositive { field: &'static str },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
