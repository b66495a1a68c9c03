//! # Resources 模块
//!
//! 控制器实例的资源账本。
//!
//! 每个控制器实例持有一个 `Rc<ControllerResources>`，所有观察器、监听器、
//! 定时器、插入的节点都在获取时登记到这里，`destroy()` 统一释放。
//!
//! 回调只捕获 `Weak<ControllerResources>`，执行前通过 [`ControllerResources::upgrade_live`]
//! 检查实例仍然存活且未销毁；因此：
//! - 宿主中的回调不会让实例无法释放（没有 `Rc` 环）
//! - 销毁后仍被宿主调用的回调不产生任何可见效果

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::debug;

use crate::platform::{
    Env, Event, EventKind, EventTarget, IntersectionEntry, ListenerRegistration, NodeId,
    ObserverHandle, ObserverOptions, TimerId,
};

/// 资源计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResourceCounts {
    pub observers: usize,
    pub listeners: usize,
    pub timers: usize,
    pub nodes: usize,
}

impl ResourceCounts {
    pub fn total(&self) -> usize {
        self.observers + self.listeners + self.timers + self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// 控制器资源账本
pub struct ControllerResources {
    family: &'static str,
    env: Env,
    destroyed: Cell<bool>,
    observers: RefCell<Vec<ObserverHandle>>,
    listeners: RefCell<Vec<ListenerRegistration>>,
    timers: RefCell<Vec<TimerId>>,
    nodes: RefCell<Vec<NodeId>>,
}

impl std::fmt::Debug for ControllerResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerResources")
            .field("family", &self.family)
            .field("destroyed", &self.destroyed.get())
            .field("live", &self.live_counts())
            .finish()
    }
}

impl ControllerResources {
    pub fn new(family: &'static str, env: &Env) -> Rc<Self> {
        Rc::new(Self {
            family,
            env: env.clone(),
            destroyed: Cell::new(false),
            observers: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            nodes: RefCell::new(Vec::new()),
        })
    }

    /// 升级弱引用；实例已释放或已销毁时返回 `None`
    pub fn upgrade_live(weak: &Weak<Self>) -> Option<Rc<Self>> {
        weak.upgrade().filter(|res| !res.is_destroyed())
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// 当前持有的资源数量
    pub fn live_counts(&self) -> ResourceCounts {
        ResourceCounts {
            observers: self.observers.borrow().len(),
            listeners: self.listeners.borrow().len(),
            timers: self.timers.borrow().len(),
            nodes: self.nodes.borrow().len(),
        }
    }

    // ========== 资源获取 ==========

    /// 注册事件监听
    ///
    /// 处理函数仅在实例存活时执行。
    pub fn listen(
        self: &Rc<Self>,
        target: EventTarget,
        kind: EventKind,
        handler: impl Fn(&Rc<Self>, &Event) + 'static,
    ) -> Option<ListenerRegistration> {
        if self.is_destroyed() {
            return None;
        }

        let weak = Rc::downgrade(self);
        let registration = self.env.events.add_listener(
            target,
            kind,
            Rc::new(move |event: &Event| {
                if let Some(res) = Self::upgrade_live(&weak) {
                    handler(&res, event);
                }
            }),
        );
        self.listeners.borrow_mut().push(registration);
        Some(registration)
    }

    /// 创建可见性观察器
    ///
    /// 回调额外收到观察器自身的句柄，便于 `unobserve`。
    pub fn observe(
        self: &Rc<Self>,
        options: ObserverOptions,
        mut callback: impl FnMut(&Rc<Self>, ObserverHandle, &[IntersectionEntry]) + 'static,
    ) -> Option<ObserverHandle> {
        if self.is_destroyed() {
            return None;
        }

        let weak = Rc::downgrade(self);
        let own_handle: Rc<Cell<Option<ObserverHandle>>> = Rc::new(Cell::new(None));
        let slot = own_handle.clone();
        let handle = self.env.observers.create(
            options,
            Box::new(move |entries: &[IntersectionEntry]| {
                let Some(res) = Self::upgrade_live(&weak) else {
                    return;
                };
                if let Some(handle) = slot.get() {
                    callback(&res, handle, entries);
                }
            }),
        );
        own_handle.set(Some(handle));
        self.observers.borrow_mut().push(handle);
        Some(handle)
    }

    /// 请求帧回调
    ///
    /// 帧回调不登记（执行一次即消费），销毁后的帧回调在执行时被丢弃。
    pub fn request_frame(self: &Rc<Self>, work: impl FnOnce(&Rc<Self>) + 'static) {
        if self.is_destroyed() {
            return;
        }

        let weak = Rc::downgrade(self);
        self.env.scheduler.request_frame(Box::new(move |_timestamp| {
            if let Some(res) = Self::upgrade_live(&weak) {
                work(&res);
            }
        }));
    }

    /// 一次性定时器，触发后自动从账本移除
    pub fn set_timeout(
        self: &Rc<Self>,
        delay_ms: u64,
        work: impl FnOnce(&Rc<Self>) + 'static,
    ) -> Option<TimerId> {
        if self.is_destroyed() {
            return None;
        }

        let weak = Rc::downgrade(self);
        let own_id: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let slot = own_id.clone();
        let id = self.env.scheduler.set_timeout(
            delay_ms,
            Box::new(move || {
                let Some(res) = Self::upgrade_live(&weak) else {
                    return;
                };
                if let Some(id) = slot.get() {
                    res.untrack_timer(id);
                }
                work(&res);
            }),
        );
        own_id.set(Some(id));
        self.timers.borrow_mut().push(id);
        Some(id)
    }

    /// 重复定时器
    ///
    /// 回调额外收到自身句柄，可通过 [`clear_timer`](Self::clear_timer) 结束自己。
    pub fn set_interval(
        self: &Rc<Self>,
        period_ms: u64,
        mut work: impl FnMut(&Rc<Self>, TimerId) + 'static,
    ) -> Option<TimerId> {
        if self.is_destroyed() {
            return None;
        }

        let weak = Rc::downgrade(self);
        let own_id: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let slot = own_id.clone();
        let id = self.env.scheduler.set_interval(
            period_ms,
            Box::new(move || {
                let Some(res) = Self::upgrade_live(&weak) else {
                    return;
                };
                if let Some(id) = slot.get() {
                    work(&res, id);
                }
            }),
        );
        own_id.set(Some(id));
        self.timers.borrow_mut().push(id);
        Some(id)
    }

    /// 清除本实例的定时器
    pub fn clear_timer(&self, id: TimerId) {
        self.env.scheduler.clear_timer(id);
        self.untrack_timer(id);
    }

    fn untrack_timer(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|t| *t != id);
    }

    /// 登记由本实例插入的节点
    pub fn track_node(&self, node: NodeId) {
        self.nodes.borrow_mut().push(node);
    }

    // ========== 释放 ==========

    /// 销毁：断开观察器、移除监听、清除定时器、移除插入的节点
    ///
    /// 幂等，重复调用返回全零计数。资源之间没有依赖，释放顺序无关。
    pub fn destroy(&self) -> ResourceCounts {
        if self.destroyed.replace(true) {
            return ResourceCounts::default();
        }

        let observers = std::mem::take(&mut *self.observers.borrow_mut());
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        let timers = std::mem::take(&mut *self.timers.borrow_mut());
        let nodes = std::mem::take(&mut *self.nodes.borrow_mut());

        for handle in &observers {
            self.env.observers.disconnect(*handle);
        }
        for registration in &listeners {
            self.env.events.remove_listener(registration);
        }
        for id in &timers {
            self.env.scheduler.clear_timer(*id);
        }
        {
            let mut surface = self.env.surface_mut();
            for node in &nodes {
                surface.remove_node(*node);
            }
        }

        let released = ResourceCounts {
            observers: observers.len(),
            listeners: listeners.len(),
            timers: timers.len(),
            nodes: nodes.len(),
        };
        debug!(
            family = self.family,
            observers = released.observers,
            listeners = released.listeners,
            timers = released.timers,
            nodes = released.nodes,
            "控制器已销毁"
        );
        released
    }
}

impl Drop for ControllerResources {
    fn drop(&mut self) {
        self.destroy();
    }
}
