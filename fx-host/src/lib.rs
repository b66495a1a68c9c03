//! # FX Host
//!
//! `fx-runtime` 的无界面宿主。
//!
//! - [`host`]：内存文档、虚拟调度器、模拟观察器、事件总线
//! - [`page`]：把宿主能力与效果层运行时组装成可驱动的 [`Page`]
//! - [`layout`]：页面描述文件
//! - [`scenario`]：脚本化会话回放
//! - [`config`]：宿主配置

pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod page;
pub mod scenario;

pub use config::{AppConfig, ViewportConfig};
pub use error::{HostError, HostResult};
pub use host::{
    Element, EventBus, MemorySurface, NodeSnapshot, SimulatedObservers, VirtualScheduler,
};
pub use layout::{NodeLayout, PageLayout, ViewportSize};
pub use page::{Page, PageReport};
pub use scenario::{PlaybackSummary, Scenario, Step};
