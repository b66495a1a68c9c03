//! # Simulated Observers
//!
//! 根据布局与滚动位置计算可见性的 [`ObserverHost`]。
//!
//! 每次 [`SimulatedObservers::evaluate`] 时：
//! - 新观察的目标投递一次初始状态（无论是否可见）
//! - 之后只在可见性发生变化时投递
//!
//! 同一观察器的通知按批投递，投递期间回调被取出，允许其 `unobserve` / `disconnect` 自身。

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use fx_runtime::{
    IntersectionEntry, NodeId, ObserverCallback, ObserverHandle, ObserverHost, ObserverOptions,
    Rect, Surface,
};
use tracing::trace;

struct ObserverState {
    options: ObserverOptions,
    callback: Option<ObserverCallback>,
    targets: Vec<NodeId>,
    /// 上次投递的可见性
    last: HashMap<NodeId, bool>,
}

/// 模拟观察器宿主
#[derive(Default)]
pub struct SimulatedObservers {
    next_id: Cell<u64>,
    observers: RefCell<BTreeMap<ObserverHandle, ObserverState>>,
    delivered: Cell<u64>,
}

/// 计算单个元素相对于（扩展后的）视口的可见性
pub fn intersect(target: Rect, viewport: Rect, options: &ObserverOptions) -> IntersectionEntry {
    let root = options.root_margin.expand(viewport);
    let overlap = root.intersection(&target);
    let ratio = match overlap {
        Some(overlap) if target.area() > 0.0 => (overlap.area() / target.area()).clamp(0.0, 1.0),
        Some(_) => 1.0,
        None => 0.0,
    };
    let is_intersecting = overlap.is_some()
        && if options.threshold > 0.0 {
            ratio >= options.threshold
        } else {
            true
        };
    IntersectionEntry {
        target: NodeId(0),
        is_intersecting,
        ratio,
    }
}

impl SimulatedObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 存活的观察器数量
    pub fn live_observers(&self) -> usize {
        self.observers.borrow().len()
    }

    /// 指定观察器正在观察的目标数
    pub fn watched(&self, observer: ObserverHandle) -> usize {
        self.observers
            .borrow()
            .get(&observer)
            .map_or(0, |state| state.targets.len())
    }

    /// 所有观察器观察的目标总数
    pub fn total_watched(&self) -> usize {
        self.observers
            .borrow()
            .values()
            .map(|state| state.targets.len())
            .sum()
    }

    /// 累计投递的通知条数
    pub fn delivered(&self) -> u64 {
        self.delivered.get()
    }

    /// 按当前布局计算并投递变化
    ///
    /// # 返回
    /// 本次投递的通知条数
    pub fn evaluate<S: Surface + ?Sized>(&self, surface: &RefCell<S>) -> usize {
        let handles: Vec<ObserverHandle> = self.observers.borrow().keys().copied().collect();
        let mut total = 0;

        for handle in handles {
            let entries = {
                let surface = surface.borrow();
                let viewport = Rect::new(
                    0.0,
                    0.0,
                    surface.viewport_width(),
                    surface.viewport_height(),
                );
                let mut observers = self.observers.borrow_mut();
                let Some(state) = observers.get_mut(&handle) else {
                    continue;
                };

                let mut entries = Vec::new();
                let targets = state.targets.clone();
                for target in targets {
                    if !surface.contains(target) {
                        continue;
                    }
                    let mut entry =
                        intersect(surface.bounding_rect(target), viewport, &state.options);
                    entry.target = target;
                    if state.last.get(&target) != Some(&entry.is_intersecting) {
                        state.last.insert(target, entry.is_intersecting);
                        entries.push(entry);
                    }
                }
                entries
            };

            total += self.deliver(handle, &entries);
        }
        total
    }

    /// 强制向观察 `target` 的所有观察器投递一条通知
    pub fn inject(&self, target: NodeId, is_intersecting: bool) -> usize {
        let handles: Vec<ObserverHandle> = self
            .observers
            .borrow_mut()
            .iter_mut()
            .filter(|(_, state)| state.targets.contains(&target))
            .map(|(handle, state)| {
                state.last.insert(target, is_intersecting);
                *handle
            })
            .collect();

        let entry = IntersectionEntry {
            target,
            is_intersecting,
            ratio: if is_intersecting { 1.0 } else { 0.0 },
        };
        handles
            .into_iter()
            .map(|handle| self.deliver(handle, &[entry]))
            .sum()
    }

    fn deliver(&self, handle: ObserverHandle, entries: &[IntersectionEntry]) -> usize {
        if entries.is_empty() {
            return 0;
        }
        let callback = self
            .observers
            .borrow_mut()
            .get_mut(&handle)
            .and_then(|state| state.callback.take());
        let Some(mut callback) = callback else {
            return 0;
        };

        trace!(?handle, count = entries.len(), "投递可见性通知");
        callback(entries);
        self.delivered.set(self.delivered.get() + entries.len() as u64);

        // 回调中可能已断开
        if let Some(state) = self.observers.borrow_mut().get_mut(&handle) {
            state.callback = Some(callback);
        }
        entries.len()
    }
}

impl ObserverHost for SimulatedObservers {
    fn create(&self, options: ObserverOptions, callback: ObserverCallback) -> ObserverHandle {
        let handle = ObserverHandle(self.next_id.get() + 1);
        self.next_id.set(handle.0);
        self.observers.borrow_mut().insert(
            handle,
            ObserverState {
                options,
                callback: Some(callback),
                targets: Vec::new(),
                last: HashMap::new(),
            },
        );
        handle
    }

    fn observe(&self, observer: ObserverHandle, target: NodeId) {
        if let Some(state) = self.observers.borrow_mut().get_mut(&observer) {
            if !state.targets.contains(&target) {
                state.targets.push(target);
            }
        }
    }

    fn unobserve(&self, observer: ObserverHandle, target: NodeId) {
        if let Some(state) = self.observers.borrow_mut().get_mut(&observer) {
            state.targets.retain(|t| *t != target);
            state.last.remove(&target);
        }
    }

    fn disconnect(&self, observer: ObserverHandle) {
        self.observers.borrow_mut().remove(&observer);
    }
}
