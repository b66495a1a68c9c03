//! # Platform 模块
//!
//! 效果层消费的宿主能力：
//!
//! - [`Surface`]：可查询、可修改的页面结构面
//! - [`FrameScheduler`]：帧回调与毫秒定时器
//! - [`ObserverHost`]：可见性观察器
//! - [`EventHost`]：事件监听注册
//!
//! [`Env`] 把四者打包，控制器与回调都持有它的克隆。
//!
//! ## 执行模型
//!
//! 单线程协作式：所有回调运行在同一条事件时间线上，没有抢占。
//! 共享状态使用 `Rc` / `Cell` / `RefCell`，不跨线程。

mod events;
mod observer;
mod scheduler;
mod surface;

pub use events::{
    Event, EventHandler, EventHost, EventKind, EventTarget, ListenerId, ListenerRegistration,
};
pub use observer::{
    EdgeMargin, IntersectionEntry, ObserverCallback, ObserverHandle, ObserverHost, ObserverOptions,
};
pub use scheduler::{
    FrameCallback, FrameId, FrameScheduler, IntervalCallback, TimeoutCallback, TimerId,
};
pub use surface::{AttrMatch, NodeId, Rect, Selector, Surface};

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// 共享的结构面引用
pub type SurfaceRef = Rc<RefCell<dyn Surface>>;

/// 宿主能力集合
#[derive(Clone)]
pub struct Env {
    pub surface: SurfaceRef,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub observers: Rc<dyn ObserverHost>,
    pub events: Rc<dyn EventHost>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env").finish_non_exhaustive()
    }
}

impl Env {
    pub fn new(
        surface: SurfaceRef,
        scheduler: Rc<dyn FrameScheduler>,
        observers: Rc<dyn ObserverHost>,
        events: Rc<dyn EventHost>,
    ) -> Self {
        Self {
            surface,
            scheduler,
            observers,
            events,
        }
    }

    /// 只读借用结构面
    ///
    /// 借用不可跨越任何会触发回调的宿主调用。
    pub fn surface(&self) -> Ref<'_, dyn Surface> {
        self.surface.borrow()
    }

    /// 可变借用结构面
    pub fn surface_mut(&self) -> RefMut<'_, dyn Surface> {
        self.surface.borrow_mut()
    }
}
