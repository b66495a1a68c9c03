//! # Selectors
//!
//! 效果层使用的 class 名、属性名与选择器。
//! 页面标记约定只在这里定义，控制器与页面概览共享同一份。

use crate::platform::Selector;

/// 入场动画标记
pub const ENTRANCE_CLASSES: [&str; 4] = ["fade-in", "slide-in-left", "slide-in-right", "scale-in"];
/// 显现后添加的标记
pub const REVEALED_CLASS: &str = "animate-in";
/// 数字滚动目标值（`data-count`）
pub const COUNT_DATA: &str = "count";
pub const TYPEWRITER_CLASS: &str = "typewriter";
/// 懒加载图片的延迟地址（`data-src`）
pub const DEFERRED_SRC_DATA: &str = "src";
pub const LOADED_CLASS: &str = "loaded";
pub const CARD_GRID_CLASS: &str = "card-grid";
pub const CARD_CLASSES: [&str; 2] = ["card", "pricing-card"];

pub const PARALLAX_CLASS: &str = "parallax";
/// 视差速度（`data-speed`）
pub const SPEED_DATA: &str = "speed";

pub const MAGNETIC_CLASS: &str = "magnetic";
/// 磁性效果排除的导航区域
pub const NAV_REGION_CLASS: &str = "nav-links";

pub const FLOATING_CLASS: &str = "floating-decoration";
pub const HERO_CLASS: &str = "hero";
pub const GRADIENT_CLASSES: [&str; 2] = ["hero", "cta-button"];
pub const PARTICLES_CLASS: &str = "particles";
pub const PARTICLE_CLASS: &str = "particle";

pub const SCROLL_INDICATOR_CLASS: &str = "scroll-indicator";
pub const HEADER_CLASS: &str = "header";

/// 共享关键帧样式表的元素 id
pub const STYLESHEET_ID: &str = "animation-styles";

pub fn entrance() -> Selector {
    Selector::any_class(&ENTRANCE_CLASSES)
}

pub fn counters() -> Selector {
    Selector::attr(&format!("data-{COUNT_DATA}"))
}

pub fn typewriters() -> Selector {
    Selector::class(TYPEWRITER_CLASS)
}

pub fn lazy_images() -> Selector {
    Selector::tag("img").with_attr(&format!("data-{DEFERRED_SRC_DATA}"))
}

pub fn card_grids() -> Selector {
    Selector::class(CARD_GRID_CLASS)
}

pub fn cards() -> Selector {
    Selector::any_class(&CARD_CLASSES)
}

pub fn parallax() -> Selector {
    Selector::class(PARALLAX_CLASS)
}

pub fn magnetic() -> Selector {
    Selector::class(MAGNETIC_CLASS).not_within(NAV_REGION_CLASS)
}

pub fn hero() -> Selector {
    Selector::class(HERO_CLASS)
}

pub fn gradient_targets() -> Selector {
    Selector::any_class(&GRADIENT_CLASSES)
}

pub fn header() -> Selector {
    Selector::class(HEADER_CLASS)
}

/// 页内锚点 `a[href^="#"]`
pub fn anchors() -> Selector {
    Selector::tag("a").with_attr_prefix("href", "#")
}
