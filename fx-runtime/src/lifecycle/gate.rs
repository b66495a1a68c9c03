//! # Frame Gate
//!
//! 单槽"待处理工作"闸门：每条连续更新流（滚动位置、指针位置）
//! 同一时刻最多只有一个待执行的帧回调。
//!
//! ```text
//! Idle ──try_arm──► Pending ──begin──► Running ──finish──► Idle
//! ```
//!
//! 一个帧间隔内到达的 N 个事件只触发一次重算（合并）。
//! 闸门只在帧回调内部、重算结束之后回到 `Idle`。

use std::cell::Cell;
use std::rc::Rc;

use super::resources::ControllerResources;

/// 闸门状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// 无待处理工作
    #[default]
    Idle,
    /// 已请求帧回调，尚未执行
    Pending,
    /// 帧回调正在执行重算
    Running,
}

/// 帧合并闸门
#[derive(Debug, Default)]
pub struct FrameGate {
    state: Cell<GateState>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state.get()
    }

    /// `Idle → Pending`，成功返回 `true`
    pub fn try_arm(&self) -> bool {
        if self.state.get() == GateState::Idle {
            self.state.set(GateState::Pending);
            true
        } else {
            false
        }
    }

    /// `Pending → Running`
    pub fn begin(&self) -> bool {
        if self.state.get() == GateState::Pending {
            self.state.set(GateState::Running);
            true
        } else {
            false
        }
    }

    /// 回到 `Idle`
    pub fn finish(&self) {
        self.state.set(GateState::Idle);
    }

    /// 合并调度一次帧重算
    ///
    /// 已有待处理工作时直接返回 `false`。实例销毁后，帧回调被丢弃，
    /// 闸门停留在 `Pending`，不会再有新的工作进入。
    pub fn schedule(
        self: &Rc<Self>,
        resources: &Rc<ControllerResources>,
        work: impl FnOnce(&Rc<ControllerResources>) + 'static,
    ) -> bool {
        if resources.is_destroyed() || !self.try_arm() {
            return false;
        }

        let gate = Rc::clone(self);
        resources.request_frame(move |res| {
            gate.begin();
            work(res);
            gate.finish();
        });
        true
    }
}
