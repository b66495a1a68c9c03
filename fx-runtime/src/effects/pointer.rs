//! # Pointer Follower
//!
//! 悬停时让 `.magnetic` 元素朝指针方向偏移：
//! `offset = strength × (pointer − element center)`。
//!
//! ## 降级策略
//!
//! 可跟随元素（排除导航区域）超过上限时整页跳过，不注册任何监听，
//! 以限制最坏情况下的监听器数量。这不是错误，只输出一条警告。
//!
//! ## 时序
//!
//! - 指针移动：经 [`FrameGate`] 合并到每帧一次
//! - 指针离开：立即复位（不经帧调度），清除悬停标记并推进悬停轮次；
//!   离开之前调度、离开之后才执行的帧回调被丢弃（即使指针已重新进入）

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::EffectsConfig;
use crate::format::px;
use crate::lifecycle::{ControllerResources, EffectController, FrameGate};
use crate::platform::{Env, Event, EventKind, EventTarget, NodeId, Rect};
use crate::selectors;

/// 指针跟随位移
pub fn magnetic_offset(pointer: (f64, f64), rect: Rect, strength: f64) -> (f64, f64) {
    let (cx, cy) = rect.center();
    ((pointer.0 - cx) * strength, (pointer.1 - cy) * strength)
}

fn translate(dx: f64, dy: f64) -> String {
    format!("translate({}, {})", px(dx), px(dy))
}

/// 单个元素的悬停状态
#[derive(Debug, Default)]
struct HoverState {
    hovering: Cell<bool>,
    /// 每次离开递增
    epoch: Cell<u64>,
    gate: Rc<FrameGate>,
}

/// 指针跟随控制器
pub struct PointerFollower {
    resources: Rc<ControllerResources>,
    eligible: usize,
    skipped: bool,
}

impl PointerFollower {
    pub const FAMILY: &'static str = "pointer";

    pub fn new(env: &Env, config: &EffectsConfig) -> Rc<Self> {
        let resources = ControllerResources::new(Self::FAMILY, env);
        let elements = env.surface().query_all(&selectors::magnetic());
        let eligible = elements.len();
        let cap = config.pointer.max_elements;

        let skipped = eligible > cap;
        if skipped {
            warn!(eligible, cap, "磁性元素过多，跳过指针跟随效果");
        } else {
            for node in elements {
                attach(&resources, node, config.pointer.strength);
            }
            debug!(eligible, "指针跟随已初始化");
        }

        Rc::new(Self {
            resources,
            eligible,
            skipped,
        })
    }

    /// 可跟随元素数量
    pub fn eligible(&self) -> usize {
        self.eligible
    }

    /// 是否因超过上限而整体跳过
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }
}

impl EffectController for PointerFollower {
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

fn attach(res: &Rc<ControllerResources>, node: NodeId, strength: f64) {
    let state = Rc::new(HoverState::default());
    let target = EventTarget::Node(node);

    {
        let state = state.clone();
        res.listen(target, EventKind::PointerEnter, move |_, _| {
            state.hovering.set(true);
        });
    }

    {
        let state = state.clone();
        res.listen(target, EventKind::PointerLeave, move |res, _| {
            state.hovering.set(false);
            state.epoch.set(state.epoch.get() + 1);
            res.env()
                .surface_mut()
                .set_style(node, "transform", &translate(0.0, 0.0));
        });
    }

    res.listen(target, EventKind::PointerMove, move |res, event| {
        let Event::PointerMove { x, y } = *event else {
            return;
        };
        if !state.hovering.get() {
            return;
        }

        let frame_state = state.clone();
        let epoch = state.epoch.get();
        state.gate.schedule(res, move |res| {
            if !frame_state.hovering.get() || frame_state.epoch.get() != epoch {
                return;
            }
            let mut surface = res.env().surface_mut();
            let rect = surface.bounding_rect(node);
            let (dx, dy) = magnetic_offset((x, y), rect, strength);
            surface.set_style(node, "transform", &translate(dx, dy));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnetic_offset() {
        let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
        // 中心 (200, 150)
        assert_eq!(magnetic_offset((200.0, 150.0), rect, 0.05), (0.0, 0.0));
        assert_eq!(magnetic_offset((300.0, 50.0), rect, 0.05), (5.0, -5.0));
    }

    #[test]
    fn test_translate_format() {
        assert_eq!(translate(0.0, 0.0), "translate(0px, 0px)");
        assert_eq!(translate(-2.5, 4.0), "translate(-2.5px, 4px)");
    }
}
