//! # Runtime 模块
//!
//! 效果层的生命周期入口。
//!
//! ```text
//! LifecycleEvent::Ready   → 注入共享样式表（仅一次）→ 逐个家族"销毁旧实例 + 构造新实例"
//! LifecycleEvent::Closing → 销毁所有家族
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::info;

use crate::config::EffectsConfig;
use crate::effects::{
    DecorationSpawner, ParallaxDriver, PointerFollower, ScrollChrome, VisibilityAnimator,
};
use crate::lifecycle::{ControllerRegistry, EffectController, ResourceCounts};
use crate::platform::Env;
use crate::selectors::STYLESHEET_ID;

/// 入场动画、浮动、粒子、光标闪烁使用的关键帧
pub const KEYFRAMES_CSS: &str = r#"
@keyframes float {
    0%, 100% { transform: translateY(0) rotate(0deg); }
    50% { transform: translateY(-20px) rotate(180deg); }
}

@keyframes gradientShift {
    0% { background-position: 0% 50%; }
    50% { background-position: 100% 50%; }
    100% { background-position: 0% 50%; }
}

@keyframes particleFloat {
    0% { transform: translateY(100vh) rotate(0deg); opacity: 0; }
    10% { opacity: 0.5; }
    90% { opacity: 0.5; }
    100% { transform: translateY(-100px) rotate(360deg); opacity: 0; }
}

@keyframes blink {
    0%, 50% { border-color: transparent; }
    51%, 100% { border-color: var(--primary-color); }
}

.animate-in {
    opacity: 1 !important;
    transform: translateY(0) translateX(0) scale(1) !important;
}

.fade-in, .slide-in-left, .slide-in-right, .scale-in {
    opacity: 0;
    transition: all 0.8s cubic-bezier(0.4, 0, 0.2, 1);
}

.slide-in-left { transform: translateX(-30px); }
.slide-in-right { transform: translateX(30px); }
.scale-in { transform: scale(0.9); }
.fade-in { transform: translateY(30px); }
"#;

/// 页面生命周期事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// 页面就绪
    Ready,
    /// 页面即将关闭
    Closing,
}

/// 效果层运行时
pub struct EffectsRuntime {
    env: Env,
    config: EffectsConfig,
    registry: ControllerRegistry,
}

impl std::fmt::Debug for EffectsRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectsRuntime")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl EffectsRuntime {
    pub fn new(env: Env, config: EffectsConfig) -> Self {
        Self {
            env,
            config,
            registry: ControllerRegistry::new(),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// 处理生命周期事件
    pub fn handle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Ready => self.on_ready(),
            LifecycleEvent::Closing => self.on_closing(),
        }
    }

    fn on_ready(&mut self) {
        ensure_stylesheet(&self.env);

        let env = &self.env;
        let config = &self.config;
        self.registry
            .replace_with(VisibilityAnimator::FAMILY, || VisibilityAnimator::new(env, config));
        self.registry
            .replace_with(ParallaxDriver::FAMILY, || ParallaxDriver::new(env, config));
        self.registry
            .replace_with(PointerFollower::FAMILY, || PointerFollower::new(env, config));
        self.registry
            .replace_with(DecorationSpawner::FAMILY, || DecorationSpawner::new(env, config));
        self.registry
            .replace_with(ScrollChrome::FAMILY, || ScrollChrome::new(env, config));

        info!(families = self.registry.len(), "效果层已就绪");
    }

    fn on_closing(&mut self) {
        let released = self.registry.teardown_all();
        info!(released = released.total(), "效果层已卸载");
    }

    /// 按具体类型获取当前实例
    pub fn controller<C: EffectController + 'static>(&self, family: &str) -> Option<Rc<C>> {
        self.registry.get_as::<C>(family)
    }

    /// 各家族当前持有的资源
    pub fn live_counts(&self) -> BTreeMap<&'static str, ResourceCounts> {
        self.registry.live_counts()
    }
}

/// 注入共享关键帧样式表；已存在时不重复注入
///
/// # 返回
/// - `true`: 本次新注入
/// - `false`: 已存在
pub fn ensure_stylesheet(env: &Env) -> bool {
    let mut surface = env.surface_mut();
    if surface.element_by_id(STYLESHEET_ID).is_some() {
        return false;
    }

    let style = surface.create_element("style");
    surface.set_attribute(style, "id", STYLESHEET_ID);
    surface.set_text(style, KEYFRAMES_CSS);
    let head = surface.head();
    surface.append_child(head, style);
    true
}
