//! # Event Bus
//!
//! 内存事件总线，实现 [`EventHost`]。
//!
//! 派发时先复制监听列表再逐个调用；派发过程中被移除的监听器不会再被调用。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use fx_runtime::{
    Event, EventHandler, EventHost, EventKind, EventTarget, ListenerId, ListenerRegistration,
};
use tracing::trace;

type ListenerList = Vec<(ListenerId, EventHandler)>;

/// 事件总线
#[derive(Default)]
pub struct EventBus {
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<(EventTarget, EventKind), ListenerList>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 向目标派发事件
    ///
    /// # 返回
    /// 被调用的监听器数量
    pub fn dispatch(&self, target: EventTarget, event: &Event) -> usize {
        let key = (target, event.kind());
        let snapshot: ListenerList = self
            .listeners
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_default();

        let mut invoked = 0;
        for (id, handler) in snapshot {
            let still_registered = self
                .listeners
                .borrow()
                .get(&key)
                .is_some_and(|list| list.iter().any(|(l, _)| *l == id));
            if !still_registered {
                continue;
            }
            handler(event);
            invoked += 1;
        }
        trace!(?target, ?event, invoked, "事件已派发");
        invoked
    }

    /// 全部监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    /// 指定目标与类型的监听器数量
    pub fn listeners_for(&self, target: EventTarget, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .get(&(target, kind))
            .map_or(0, Vec::len)
    }
}

impl EventHost for EventBus {
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        handler: EventHandler,
    ) -> ListenerRegistration {
        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.listeners
            .borrow_mut()
            .entry((target, kind))
            .or_default()
            .push((id, handler));
        ListenerRegistration { target, kind, id }
    }

    fn remove_listener(&self, registration: &ListenerRegistration) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let key = (registration.target, registration.kind);
        let Some(list) = listeners.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != registration.id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(&key);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_runtime::NodeId;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_to_matching_listeners() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        bus.add_listener(
            EventTarget::Window,
            EventKind::Scroll,
            Rc::new(move |_| h.set(h.get() + 1)),
        );

        assert_eq!(bus.dispatch(EventTarget::Window, &Event::Scroll), 1);
        assert_eq!(bus.dispatch(EventTarget::Document, &Event::Scroll), 0);
        assert_eq!(bus.dispatch(EventTarget::Window, &Event::Click), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_remove_requires_full_registration() {
        let bus = EventBus::new();
        let node = EventTarget::Node(NodeId(3));
        let reg = bus.add_listener(node, EventKind::PointerEnter, Rc::new(|_| {}));

        let wrong_kind = ListenerRegistration {
            kind: EventKind::PointerLeave,
            ..reg
        };
        assert!(!bus.remove_listener(&wrong_kind));
        assert!(bus.remove_listener(&reg));
        assert!(!bus.remove_listener(&reg));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let bus = Rc::new(EventBus::new());
        let second_hits = Rc::new(Cell::new(0));
        let second_reg = Rc::new(Cell::new(None));

        let b = bus.clone();
        let r = second_reg.clone();
        bus.add_listener(
            EventTarget::Window,
            EventKind::Scroll,
            Rc::new(move |_| {
                if let Some(reg) = r.get() {
                    b.remove_listener(&reg);
                }
            }),
        );
        let h = second_hits.clone();
        let reg = bus.add_listener(
            EventTarget::Window,
            EventKind::Scroll,
            Rc::new(move |_| h.set(h.get() + 1)),
        );
        second_reg.set(Some(reg));

        assert_eq!(bus.dispatch(EventTarget::Window, &Event::Scroll), 1);
        assert_eq!(second_hits.get(), 0);
    }
}
