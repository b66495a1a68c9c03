//! # Observer 模块
//!
//! 可见性观察器接口：监视一组元素，批量接收进入/离开视口的通知。

use super::surface::{NodeId, Rect};

/// 根区域边距（像素，负值表示向内收缩）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeMargin {
    /// 仅底边
    pub const fn bottom(bottom: f64) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom,
            left: 0.0,
        }
    }

    /// 按边距扩展（或收缩）矩形
    pub fn expand(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.left - self.left,
            rect.top - self.top,
            rect.width + self.left + self.right,
            rect.height + self.top + self.bottom,
        )
    }
}

/// 观察器配置
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObserverOptions {
    /// 可见比例阈值 (0.0 - 1.0)
    pub threshold: f64,
    /// 根区域边距
    pub root_margin: EdgeMargin,
}

/// 单条可见性通知
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    /// 可见比例 (0.0 - 1.0)
    pub ratio: f64,
}

/// 观察器句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(pub u64);

/// 批量通知回调
pub type ObserverCallback = Box<dyn FnMut(&[IntersectionEntry])>;

/// 观察器宿主
///
/// 回调可能在执行中调用 `unobserve` / `disconnect` 作用于自身，
/// 实现方投递通知时不得持有内部状态的借用。
pub trait ObserverHost {
    fn create(&self, options: ObserverOptions, callback: ObserverCallback) -> ObserverHandle;

    fn observe(&self, observer: ObserverHandle, target: NodeId);

    fn unobserve(&self, observer: ObserverHandle, target: NodeId);

    /// 断开观察器，此后不再投递任何通知
    fn disconnect(&self, observer: ObserverHandle);
}
