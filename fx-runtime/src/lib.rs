//! # FX Runtime
//!
//! 页面视觉效果层的核心库。
//!
//! ## 架构概述
//!
//! `fx-runtime` 不依赖任何真实 IO，通过 [`platform`] 中的 trait 消费宿主能力：
//!
//! ```text
//! Host                                  Runtime
//!   │── LifecycleEvent::Ready ─────────►│ 构造 5 个控制器（替换旧实例）
//!   │◄── observe / listen / frame / timer│
//!   │── 回调（滚动、可见性、帧、定时器）─►│ 检查 destroyed → 修改 Surface
//!   │── LifecycleEvent::Closing ───────►│ 释放所有资源
//! ```
//!
//! ## 模块结构
//!
//! - [`platform`]：宿主能力 trait 与 [`Env`]
//! - [`lifecycle`]：资源账本、帧合并闸门、控制器注册表
//! - [`effects`]：五个效果控制器
//! - [`runtime`]：生命周期入口 [`EffectsRuntime`]
//! - [`config`]：效果参数
//! - [`survey`]：页面概览

pub mod config;
pub mod effects;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod platform;
pub mod runtime;
pub mod selectors;
pub mod survey;

// 重导出核心类型
pub use config::{
    DecorationConfig, EffectsConfig, ParallaxConfig, PointerConfig, RevealConfig, ScrollConfig,
    StaggerConfig, TypewriterConfig,
};
pub use effects::{
    DecorationSpawner, FAMILIES, ParallaxDriver, PointerFollower, ScrollChrome, VisibilityAnimator,
};
pub use error::{ConfigError, ConfigResult};
pub use lifecycle::{
    ControllerRegistry, ControllerResources, EffectController, FrameGate, GateState,
    ResourceCounts,
};
pub use platform::{
    AttrMatch, EdgeMargin, Env, Event, EventHandler, EventHost, EventKind, EventTarget,
    FrameCallback, FrameId, FrameScheduler, IntersectionEntry, IntervalCallback, ListenerId,
    ListenerRegistration, NodeId, ObserverCallback, ObserverHandle, ObserverHost,
    ObserverOptions, Rect, Selector, Surface, SurfaceRef, TimeoutCallback, TimerId,
};
pub use runtime::{EffectsRuntime, KEYFRAMES_CSS, LifecycleEvent, ensure_stylesheet};
pub use survey::PageSurvey;
