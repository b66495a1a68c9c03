//! # Effects 模块
//!
//! 五个效果控制器，每个都是独立的注册表家族：
//!
//! | 家族 | 控制器 | 资源 |
//! |------|--------|------|
//! | `visibility` | [`VisibilityAnimator`] | 2 个观察器、打字机定时器 |
//! | `parallax` | [`ParallaxDriver`] | window 滚动监听 |
//! | `pointer` | [`PointerFollower`] | 每个磁性元素 3 个监听 |
//! | `decoration` | [`DecorationSpawner`] | 浮动装饰、粒子容器 |
//! | `scroll-chrome` | [`ScrollChrome`] | 进度条节点、滚动/点击监听 |
//!
//! 各控制器作用于互不相交的元素集合，跨控制器没有顺序要求。

pub mod decoration;
pub mod parallax;
pub mod pointer;
pub mod scroll_chrome;
pub mod visibility;

pub use decoration::{DecorationParams, DecorationSpawner, ParticleParams};
pub use parallax::{ParallaxDriver, parallax_offset};
pub use pointer::{PointerFollower, magnetic_offset};
pub use scroll_chrome::{HeaderState, ScrollChrome, scroll_progress};
pub use visibility::{
    CounterAnimation, CounterTick, TypewriterProgress, VisibilityAnimator, VisibilitySummary,
};

/// 所有家族名（构造顺序）
pub const FAMILIES: [&str; 5] = [
    VisibilityAnimator::FAMILY,
    ParallaxDriver::FAMILY,
    PointerFollower::FAMILY,
    DecorationSpawner::FAMILY,
    ScrollChrome::FAMILY,
];
