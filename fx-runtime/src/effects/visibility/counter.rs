//! # Counter 动画
//!
//! 元素显现时把 `data-count` 从 0 滚动到目标值。
//!
//! 每帧 `current += target / (duration / frame)`；未到目标时写入
//! `floor(current)`（千位分组），到达或越过目标时写入精确目标值并停止。
//! 实际帧数取决于宿主刷新率，不固定为 125 帧。

use std::rc::Rc;

use tracing::debug;

use crate::format::{group_thousands, parse_int_prefix};
use crate::lifecycle::ControllerResources;
use crate::platform::NodeId;
use crate::selectors;

/// 单次推进的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterTick {
    /// 中间值，需要继续
    Continue(i64),
    /// 最终值
    Done(i64),
}

impl CounterTick {
    pub fn value(&self) -> i64 {
        match self {
            CounterTick::Continue(v) | CounterTick::Done(v) => *v,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, CounterTick::Done(_))
    }

    /// 显示文本
    pub fn display(&self) -> String {
        group_thousands(self.value())
    }
}

/// 数字滚动状态
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    current: f64,
    increment: f64,
}

impl CounterAnimation {
    pub fn new(target: i64, duration_ms: f64, frame_ms: f64) -> Self {
        let steps = duration_ms / frame_ms;
        Self {
            target,
            current: 0.0,
            increment: target as f64 / steps,
        }
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// 推进一帧
    pub fn tick(&mut self) -> CounterTick {
        self.current += self.increment;
        if self.current < self.target as f64 {
            CounterTick::Continue(self.current.floor() as i64)
        } else {
            CounterTick::Done(self.target)
        }
    }
}

/// 为 `root` 下所有带 `data-count` 的后代启动数字滚动，返回启动数量
pub(crate) fn start_counters(
    res: &Rc<ControllerResources>,
    root: NodeId,
    duration_ms: f64,
    frame_ms: f64,
) -> usize {
    let targets: Vec<(NodeId, i64)> = {
        let surface = res.env().surface();
        surface
            .query_within(root, &selectors::counters())
            .into_iter()
            .filter_map(|node| {
                let raw = surface.data(node, selectors::COUNT_DATA)?;
                match parse_int_prefix(&raw) {
                    Some(target) => Some((node, target)),
                    None => {
                        debug!(%node, value = %raw, "data-count 不是整数，跳过");
                        None
                    }
                }
            })
            .collect()
    };

    for (node, target) in &targets {
        drive(res, *node, CounterAnimation::new(*target, duration_ms, frame_ms));
    }
    targets.len()
}

/// 推进一帧并写入文本，未完成时请求下一帧
fn drive(res: &Rc<ControllerResources>, node: NodeId, mut counter: CounterAnimation) {
    let tick = counter.tick();
    res.env().surface_mut().set_text(node, &tick.display());

    if !tick.is_done() {
        res.request_frame(move |res| drive(res, node, counter));
    }
}
