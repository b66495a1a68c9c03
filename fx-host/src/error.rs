//! # Error 模块
//!
//! 宿主侧错误：文件读写、JSON 解析、配置校验、场景引用。

use std::path::PathBuf;

use fx_runtime::ConfigError;
use thiserror::Error;

/// 宿主错误
#[derive(Error, Debug)]
pub enum HostError {
    /// 文件读写失败
    #[error("读写文件失败 {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 解析失败
    #[error("解析 {path:?} 失败: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 配置校验失败
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 场景引用了不存在的节点
    #[error("场景第 {step} 步引用了不存在的节点: {reference}")]
    UnknownNode { step: usize, reference: String },
}

/// Result 类型别名
pub type HostResult<T> = Result<T, HostError>;
