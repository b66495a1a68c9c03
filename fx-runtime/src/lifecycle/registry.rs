//! # Controller Registry
//!
//! 控制器家族名 → 当前实例 的注册表。
//!
//! 替换是破坏性交接：旧实例先被销毁，再构造新实例并登记，
//! 同一家族永远不会同时存在两个活跃实例。

use std::any::Any;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use super::{EffectController, ResourceCounts};

/// 控制器注册表
#[derive(Default)]
pub struct ControllerRegistry {
    slots: BTreeMap<&'static str, Rc<dyn EffectController>>,
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("families", &self.families())
            .finish()
    }
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 销毁旧实例后构造并登记新实例
    ///
    /// `build` 在旧实例销毁之后才被调用。
    pub fn replace_with<C, F>(&mut self, family: &'static str, build: F) -> Rc<C>
    where
        C: EffectController + 'static,
        F: FnOnce() -> Rc<C>,
    {
        if let Some(previous) = self.slots.remove(family) {
            let released = previous.destroy();
            debug!(family, released = released.total(), "替换旧控制器实例");
        }

        let controller = build();
        self.slots
            .insert(family, controller.clone() as Rc<dyn EffectController>);
        controller
    }

    /// 获取当前实例
    pub fn get(&self, family: &str) -> Option<Rc<dyn EffectController>> {
        self.slots.get(family).cloned()
    }

    /// 获取当前实例（具体类型）
    pub fn get_as<C: EffectController + 'static>(&self, family: &str) -> Option<Rc<C>> {
        let controller = self.slots.get(family)?.clone();
        let any: Rc<dyn Any> = controller.into_any();
        any.downcast::<C>().ok()
    }

    /// 销毁并移除某个家族
    pub fn teardown(&mut self, family: &str) -> Option<ResourceCounts> {
        self.slots.remove(family).map(|controller| controller.destroy())
    }

    /// 销毁并移除所有家族
    pub fn teardown_all(&mut self) -> ResourceCounts {
        let mut total = ResourceCounts::default();
        for (_, controller) in std::mem::take(&mut self.slots) {
            let released = controller.destroy();
            total.observers += released.observers;
            total.listeners += released.listeners;
            total.timers += released.timers;
            total.nodes += released.nodes;
        }
        total
    }

    /// 已登记的家族名
    pub fn families(&self) -> Vec<&'static str> {
        self.slots.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 各家族当前持有的资源
    pub fn live_counts(&self) -> BTreeMap<&'static str, ResourceCounts> {
        self.slots
            .iter()
            .map(|(family, controller)| (*family, controller.resources().live_counts()))
            .collect()
    }
}
