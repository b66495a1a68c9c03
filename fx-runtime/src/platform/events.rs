//! # Events 模块
//!
//! 事件监听注册接口。

use std::rc::Rc;

use super::surface::NodeId;

/// 事件目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    PointerEnter,
    PointerLeave,
    PointerMove,
    Click,
}

/// 事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Scroll,
    PointerEnter,
    PointerLeave,
    /// 指针位置（视口坐标）
    PointerMove { x: f64, y: f64 },
    Click,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Scroll => EventKind::Scroll,
            Event::PointerEnter => EventKind::PointerEnter,
            Event::PointerLeave => EventKind::PointerLeave,
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::Click => EventKind::Click,
        }
    }
}

/// 监听器标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// 监听注册三元组
///
/// 移除监听必须使用注册时得到的完整三元组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerRegistration {
    pub target: EventTarget,
    pub kind: EventKind,
    pub id: ListenerId,
}

/// 事件处理函数
pub type EventHandler = Rc<dyn Fn(&Event)>;

/// 事件宿主
pub trait EventHost {
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        handler: EventHandler,
    ) -> ListenerRegistration;

    /// # 返回
    /// - `true`: 三元组匹配且已移除
    /// - `false`: 未找到匹配的注册
    fn remove_listener(&self, registration: &ListenerRegistration) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        assert_eq!(Event::Scroll.kind(), EventKind::Scroll);
        assert_eq!(
            Event::PointerMove { x: 1.0, y: 2.0 }.kind(),
            EventKind::PointerMove
        );
    }
}
