//! # Page
//!
//! 把内存文档、虚拟调度器、模拟观察器和事件总线组装成一个可驱动的页面，
//! 并持有效果层运行时。
//!
//! 一帧的顺序：
//! 1. 推进虚拟时钟，执行到期定时器与排队的帧回调
//! 2. 按新的布局与滚动位置计算可见性并投递

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::rc::Rc;

use fx_runtime::{
    EffectController, EffectsConfig, EffectsRuntime, Env, Event, EventTarget, LifecycleEvent,
    NodeId, ResourceCounts, Selector, Surface, SurfaceRef,
};
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::host::{EventBus, MemorySurface, NodeSnapshot, SimulatedObservers, VirtualScheduler};
use crate::layout::PageLayout;

/// 页面运行状态报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub now_ms: u64,
    pub scroll_y: f64,
    /// 各家族持有的资源
    pub controllers: BTreeMap<&'static str, ResourceCounts>,
    /// 宿主侧仍存活的监听器
    pub listeners: usize,
    /// 宿主侧仍存活的观察器
    pub observers: usize,
    /// 宿主侧仍存活的定时器
    pub timers: usize,
    pub pending_frames: usize,
}

/// 无界面页面
pub struct Page {
    surface: Rc<RefCell<MemorySurface>>,
    scheduler: Rc<VirtualScheduler>,
    observers: Rc<SimulatedObservers>,
    events: Rc<EventBus>,
    runtime: EffectsRuntime,
}

impl Page {
    /// 以内存文档构造
    pub fn new(surface: MemorySurface, config: &AppConfig) -> Self {
        Self::with_effects(
            surface,
            config.effects.clone(),
            config.viewport.frame_interval_ms,
        )
    }

    /// 从页面描述构造
    pub fn from_layout(layout: &PageLayout, config: &AppConfig) -> Self {
        Self::new(layout.build(&config.viewport), config)
    }

    pub fn with_effects(
        surface: MemorySurface,
        effects: EffectsConfig,
        frame_interval_ms: u64,
    ) -> Self {
        let surface = Rc::new(RefCell::new(surface));
        let scheduler = Rc::new(VirtualScheduler::new(frame_interval_ms));
        let observers = Rc::new(SimulatedObservers::new());
        let events = Rc::new(EventBus::new());

        let surface_ref: SurfaceRef = surface.clone();
        let env = Env::new(
            surface_ref,
            scheduler.clone(),
            observers.clone(),
            events.clone(),
        );

        Self {
            surface,
            scheduler,
            observers,
            events,
            runtime: EffectsRuntime::new(env, effects),
        }
    }

    // ========== 生命周期 ==========

    /// 页面就绪：构造（或替换）所有控制器，并投递初始可见性
    pub fn ready(&mut self) {
        self.runtime.handle(LifecycleEvent::Ready);
        self.observers.evaluate(&*self.surface);
    }

    /// 页面关闭：释放所有控制器资源
    pub fn close(&mut self) {
        self.runtime.handle(LifecycleEvent::Closing);
    }

    // ========== 用户输入 ==========

    /// 滚动到指定位置（限制在可滚动范围内）并派发滚动事件
    ///
    /// # 返回
    /// 被调用的处理函数数量
    pub fn scroll_to(&self, y: f64) -> usize {
        self.surface.borrow_mut().set_scroll_y(y);
        self.events.dispatch(EventTarget::Window, &Event::Scroll)
    }

    pub fn pointer_enter(&self, node: NodeId) -> usize {
        self.events
            .dispatch(EventTarget::Node(node), &Event::PointerEnter)
    }

    /// 指针在元素上移动（视口坐标）
    pub fn pointer_move(&self, node: NodeId, x: f64, y: f64) -> usize {
        self.events
            .dispatch(EventTarget::Node(node), &Event::PointerMove { x, y })
    }

    pub fn pointer_leave(&self, node: NodeId) -> usize {
        self.events
            .dispatch(EventTarget::Node(node), &Event::PointerLeave)
    }

    /// 点击元素；点击导致滚动位置变化时派发滚动事件
    pub fn click(&self, node: NodeId) -> usize {
        let before = self.surface.borrow().scroll_y();
        let invoked = self.events.dispatch(EventTarget::Node(node), &Event::Click);
        if self.surface.borrow().scroll_y() != before {
            self.events.dispatch(EventTarget::Window, &Event::Scroll);
        }
        invoked
    }

    // ========== 时间推进 ==========

    /// 推进一帧
    ///
    /// # 返回
    /// 本帧执行的帧回调数量
    pub fn frame(&self) -> usize {
        let callbacks = self.scheduler.run_frame();
        let delivered = self.observers.evaluate(&*self.surface);
        debug!(now = self.scheduler.now(), callbacks, delivered, "帧");
        callbacks
    }

    /// 连续推进 `count` 帧
    pub fn frames(&self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// 推进至少 `ms` 毫秒
    pub fn advance(&self, ms: u64) {
        for _ in 0..self.scheduler.frames_for(ms) {
            self.frame();
        }
    }

    // ========== 查询 ==========

    /// 解析节点引用：`#id` 按 id 查找，`.class` 取第一个命中的元素
    pub fn resolve(&self, reference: &str) -> Option<NodeId> {
        let surface = self.surface.borrow();
        if let Some(id) = reference.strip_prefix('#') {
            return surface.element_by_id(id);
        }
        if let Some(class) = reference.strip_prefix('.') {
            return surface.query_first(&Selector::class(class));
        }
        None
    }

    pub fn surface(&self) -> Ref<'_, MemorySurface> {
        self.surface.borrow()
    }

    pub fn surface_mut(&self) -> RefMut<'_, MemorySurface> {
        self.surface.borrow_mut()
    }

    pub fn env(&self) -> &Env {
        self.runtime.env()
    }

    pub fn runtime(&self) -> &EffectsRuntime {
        &self.runtime
    }

    pub fn scheduler(&self) -> &VirtualScheduler {
        &self.scheduler
    }

    pub fn observers(&self) -> &SimulatedObservers {
        &self.observers
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// 按具体类型获取当前控制器实例
    pub fn controller<C: EffectController + 'static>(&self, family: &str) -> Option<Rc<C>> {
        self.runtime.controller::<C>(family)
    }

    /// body 快照
    pub fn snapshot(&self) -> Option<NodeSnapshot> {
        self.surface.borrow().snapshot_body()
    }

    pub fn report(&self) -> PageReport {
        PageReport {
            now_ms: self.scheduler.now(),
            scroll_y: self.surface.borrow().scroll_y(),
            controllers: self.runtime.live_counts(),
            listeners: self.events.listener_count(),
            observers: self.observers.live_observers(),
            timers: self.scheduler.active_timers(),
            pending_frames: self.scheduler.pending_frames(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NodeLayout;

    fn page(body: Vec<NodeLayout>) -> Page {
        let layout = PageLayout {
            body,
            ..Default::default()
        };
        Page::from_layout(&layout, &AppConfig::default())
    }

    #[test]
    fn test_empty_page_lifecycle() {
        let mut page = page(Vec::new());
        page.ready();
        let report = page.report();
        assert_eq!(report.controllers.len(), 5);
        // 进度条的滚动监听
        assert!(report.listeners >= 1);

        page.close();
        let report = page.report();
        assert!(report.controllers.is_empty());
        assert_eq!(report.listeners, 0);
        assert_eq!(report.observers, 0);
        assert_eq!(report.timers, 0);
    }

    #[test]
    fn test_resolve_references() {
        let page = page(vec![
            NodeLayout::new("section", &["hero"]).with_id("top"),
        ]);
        let by_id = page.resolve("#top");
        assert!(by_id.is_some());
        assert_eq!(page.resolve(".hero"), by_id);
        assert_eq!(page.resolve("#missing"), None);
        assert_eq!(page.resolve("top"), None);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let page = page(vec![
            NodeLayout::new("div", &[]).with_rect(0.0, 0.0, 1280.0, 2000.0),
        ]);
        // 未就绪时没有滚动监听
        assert_eq!(page.scroll_to(5000.0), 0);
        assert_eq!(page.surface().scroll_y(), 1280.0);
        page.scroll_to(-1.0);
        assert_eq!(page.surface().scroll_y(), 0.0);
    }
}
