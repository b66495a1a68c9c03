//! # Parallax Driver
//!
//! 滚动时为 `.parallax` 元素计算垂直位移 `-(scrollY × speed)`。
//!
//! 滚动事件经 [`FrameGate`] 合并：一个帧间隔内的任意多次滚动只触发一次重算。

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::config::EffectsConfig;
use crate::format::{parse_finite, px};
use crate::lifecycle::{ControllerResources, EffectController, FrameGate};
use crate::platform::{Env, EventKind, EventTarget, Surface};
use crate::selectors;

/// 视差位移
pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    -(scroll_y * speed)
}

/// 视差控制器
pub struct ParallaxDriver {
    resources: Rc<ControllerResources>,
    gate: Rc<FrameGate>,
    recomputations: Rc<Cell<u64>>,
}

impl ParallaxDriver {
    pub const FAMILY: &'static str = "parallax";

    pub fn new(env: &Env, config: &EffectsConfig) -> Rc<Self> {
        let resources = ControllerResources::new(Self::FAMILY, env);
        let gate = Rc::new(FrameGate::new());
        let recomputations = Rc::new(Cell::new(0));
        let default_speed = config.parallax.default_speed;

        {
            let gate = gate.clone();
            let recomputations = recomputations.clone();
            resources.listen(EventTarget::Window, EventKind::Scroll, move |res, _| {
                let recomputations = recomputations.clone();
                gate.schedule(res, move |res| {
                    apply(&mut *res.env().surface_mut(), default_speed);
                    recomputations.set(recomputations.get() + 1);
                });
            });
        }
        debug!("视差滚动已初始化");

        Rc::new(Self {
            resources,
            gate,
            recomputations,
        })
    }

    pub fn gate(&self) -> &FrameGate {
        &self.gate
    }

    /// 已执行的重算次数
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }
}

impl EffectController for ParallaxDriver {
    fn family(&self) -> &'static str {
        Self::FAMILY
    }

    fn resources(&self) -> &Rc<ControllerResources> {
        &self.resources
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

fn apply(surface: &mut dyn Surface, default_speed: f64) {
    let scroll_y = surface.scroll_y();
    for node in surface.query_all(&selectors::parallax()) {
        let speed = surface
            .data(node, selectors::SPEED_DATA)
            .and_then(|raw| parse_finite(&raw))
            .unwrap_or(default_speed);
        let offset = parallax_offset(scroll_y, speed);
        surface.set_style(node, "transform", &format!("translateY({})", px(offset)));
    }
}
