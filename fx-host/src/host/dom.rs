//! # Memory Surface
//!
//! 内存中的文档树，实现 [`Surface`]。
//!
//! - 元素布局（`rect`）使用文档坐标，`bounding_rect` 减去 `scroll_y` 得到视口坐标
//! - 移除节点会连同子树一起从文档中删除，之后对该 ID 的读写静默失效
//! - 记录样式写入次数，便于断言"某段时间内没有发生样式修改"

use std::collections::{BTreeMap, HashMap};

use fx_runtime::{NodeId, Rect, Selector, Surface};
use serde::Serialize;

/// 文档元素
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// 文档坐标下的布局
    pub rect: Rect,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// 文档快照（用于输出与断言）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// 内存文档
#[derive(Debug)]
pub struct MemorySurface {
    nodes: HashMap<NodeId, Element>,
    next_id: u64,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    scroll_y: f64,
    /// 显式指定的文档高度；`None` 时由布局推导
    scroll_height: Option<f64>,
    viewport_width: f64,
    viewport_height: f64,
    style_writes: u64,
    last_scroll_into_view: Option<(NodeId, bool)>,
}

impl MemorySurface {
    /// 创建仅含 `<html><head/><body/></html>` 的空文档
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let mut surface = Self {
            nodes: HashMap::new(),
            next_id: 1,
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            scroll_y: 0.0,
            scroll_height: None,
            viewport_width,
            viewport_height,
            style_writes: 0,
            last_scroll_into_view: None,
        };

        let root = surface.insert(Element::new("html"));
        let head = surface.insert(Element::new("head"));
        let body = surface.insert(Element::new("body"));
        surface.link(root, head);
        surface.link(root, body);
        surface.root = root;
        surface.head = head;
        surface.body = body;
        surface
    }

    fn insert(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, element);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get_mut(&child).and_then(|c| c.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != child);
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        if let Some(element) = self.nodes.remove(&node) {
            for child in element.children {
                self.drop_subtree(child);
            }
        }
    }

    /// 添加一个带布局的元素
    pub fn add_element(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        element.parent = None;
        element.children.clear();
        let id = self.insert(element);
        self.link(parent, id);
        id
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element.rect = rect;
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// 设置滚动位置（限制在可滚动范围内），返回实际位置
    pub fn set_scroll_y(&mut self, y: f64) -> f64 {
        let max = (self.scroll_height() - self.viewport_height).max(0.0);
        self.scroll_y = if y.is_finite() { y.clamp(0.0, max) } else { 0.0 };
        self.scroll_y
    }

    pub fn set_scroll_height(&mut self, height: Option<f64>) {
        self.scroll_height = height;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// 累计样式写入次数
    pub fn style_writes(&self) -> u64 {
        self.style_writes
    }

    pub fn last_scroll_into_view(&self) -> Option<(NodeId, bool)> {
        self.last_scroll_into_view
    }

    /// 文档中（挂在根上）的元素数量
    pub fn attached_count(&self) -> usize {
        self.descendants(self.root).len() + 1
    }

    /// 前序遍历 `root` 的后代
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(&root) {
            Some(element) => element.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(element) = self.nodes.get(&node) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        out
    }

    fn has_ancestor_with_class(&self, node: NodeId, class: &str) -> bool {
        let mut current = self.nodes.get(&node).and_then(|e| e.parent);
        while let Some(id) = current {
            let Some(element) = self.nodes.get(&id) else {
                return false;
            };
            if element.has_class(class) {
                return true;
            }
            current = element.parent;
        }
        false
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let Some(element) = self.nodes.get(&node) else {
            return false;
        };
        let matched = selector.matches_element(
            &element.tag,
            |c| element.has_class(c),
            |name| element.attributes.get(name).map(String::as_str),
        );
        if !matched {
            return false;
        }
        match &selector.not_within_class {
            Some(class) => !self.has_ancestor_with_class(node, class),
            None => true,
        }
    }

    /// 元素快照
    pub fn snapshot(&self, node: NodeId) -> Option<NodeSnapshot> {
        let element = self.nodes.get(&node)?;
        Some(NodeSnapshot {
            tag: element.tag.clone(),
            classes: element.classes.clone(),
            attributes: element.attributes.clone(),
            style: element.style.clone(),
            text: element.text.clone(),
            children: element
                .children
                .iter()
                .filter_map(|child| self.snapshot(*child))
                .collect(),
        })
    }

    /// 整个 body 的快照
    pub fn snapshot_body(&self) -> Option<NodeSnapshot> {
        self.snapshot(self.body)
    }
}

impl Surface for MemorySurface {
    fn head(&self) -> NodeId {
        self.head
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_within(self.root, selector)
    }

    fn query_within(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|node| {
            self.nodes
                .get(node)
                .and_then(|e| e.attributes.get("id"))
                .is_some_and(|v| v == id)
        })
    }

    fn contains(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes.get(&id).and_then(|e| e.parent);
        }
        false
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(&node).is_some_and(|e| e.has_class(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(&node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get(&node)?.style.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(&node) {
            element
                .style
                .insert(property.to_string(), value.to_string());
            self.style_writes += 1;
        }
    }

    fn text(&self, node: NodeId) -> String {
        let Some(element) = self.nodes.get(&node) else {
            return String::new();
        };
        let mut text = element.text.clone();
        for child in &element.children {
            text.push_str(&self.text(*child));
        }
        text
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let children = match self.nodes.get_mut(&node) {
            Some(element) => {
                element.text = text.to_string();
                std::mem::take(&mut element.children)
            }
            None => return,
        };
        for child in children {
            if let Some(c) = self.nodes.get_mut(&child) {
                c.parent = None;
            }
            self.drop_subtree(child);
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(Element::new(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child)
        {
            return;
        }
        self.unlink(child);
        self.link(parent, child);
    }

    fn remove_node(&mut self, node: NodeId) -> bool {
        if node == self.root || !self.nodes.contains_key(&node) {
            return false;
        }
        self.unlink(node);
        self.drop_subtree(node);
        true
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.nodes
            .get(&node)
            .map(|e| e.rect.offset_y(-self.scroll_y))
            .unwrap_or_default()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_height(&self) -> f64 {
        if let Some(height) = self.scroll_height {
            return height;
        }
        self.nodes
            .values()
            .map(|e| e.rect.bottom())
            .fold(self.viewport_height, f64::max)
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_into_view(&mut self, node: NodeId, smooth: bool) {
        let Some(top) = self.nodes.get(&node).map(|e| e.rect.top) else {
            return;
        };
        self.set_scroll_y(top);
        self.last_scroll_into_view = Some((node, smooth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, classes: &[&str]) -> Element {
        Element {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_document() {
        let surface = MemorySurface::new(800.0, 600.0);
        assert!(surface.contains(surface.body()));
        assert!(surface.contains(surface.head()));
        assert_eq!(surface.attached_count(), 3);
        assert_eq!(surface.scroll_height(), 600.0);
    }

    #[test]
    fn test_query_in_document_order() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let a = surface.add_element(body, element("div", &["fade-in"]));
        let b = surface.add_element(a, element("span", &["scale-in"]));
        let c = surface.add_element(body, element("div", &["fade-in"]));

        let found = surface.query_all(&Selector::any_class(&["fade-in", "scale-in"]));
        assert_eq!(found, vec![a, b, c]);

        let within = surface.query_within(a, &Selector::any_class(&["fade-in", "scale-in"]));
        assert_eq!(within, vec![b]);
    }

    #[test]
    fn test_not_within_excludes_region() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let nav = surface.add_element(body, element("nav", &["nav-links"]));
        let in_nav = surface.add_element(nav, element("a", &["magnetic"]));
        let outside = surface.add_element(body, element("button", &["magnetic"]));

        let selector = Selector::class("magnetic").not_within("nav-links");
        assert_eq!(surface.query_all(&selector), vec![outside]);
        assert_eq!(surface.query_all(&Selector::class("magnetic")), vec![in_nav, outside]);
    }

    #[test]
    fn test_remove_node_drops_subtree() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let container = surface.create_element("div");
        let child = surface.create_element("div");
        surface.append_child(container, child);
        surface.append_child(body, container);
        assert!(surface.contains(child));

        assert!(surface.remove_node(container));
        assert!(!surface.contains(container));
        assert!(!surface.contains(child));
        assert!(surface.element(child).is_none());

        // 重复移除
        assert!(!surface.remove_node(container));
        // 不能移除根
        assert!(!surface.remove_node(surface.root()));
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let p = surface.add_element(body, element("p", &[]));
        let span = surface.add_element(p, Element { text: "inner".into(), ..element("span", &[]) });
        assert_eq!(surface.text(p), "inner");

        surface.set_text(p, "replaced");
        assert_eq!(surface.text(p), "replaced");
        assert!(!surface.contains(span));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let node = surface.add_element(body, element("div", &[]));
        surface.add_class(node, "animate-in");
        surface.add_class(node, "animate-in");
        assert_eq!(surface.element(node).unwrap().classes, vec!["animate-in"]);
    }

    #[test]
    fn test_bounding_rect_follows_scroll() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let node = surface.add_element(
            body,
            Element {
                rect: Rect::new(0.0, 1000.0, 100.0, 100.0),
                ..element("div", &[])
            },
        );
        assert_eq!(surface.scroll_height(), 1100.0);

        surface.set_scroll_y(300.0);
        assert_eq!(surface.bounding_rect(node).top, 700.0);

        // 限制在可滚动范围内
        assert_eq!(surface.set_scroll_y(5000.0), 500.0);
        assert_eq!(surface.set_scroll_y(-10.0), 0.0);
    }

    #[test]
    fn test_style_writes_counted() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let node = surface.add_element(body, element("div", &[]));
        surface.set_style(node, "transform", "translateY(0px)");
        surface.set_style(NodeId(9999), "transform", "none");
        assert_eq!(surface.style_writes(), 1);
        assert_eq!(surface.style(node, "transform").as_deref(), Some("translateY(0px)"));
    }

    #[test]
    fn test_element_by_id_and_scroll_into_view() {
        let mut surface = MemorySurface::new(800.0, 600.0);
        let body = surface.body();
        let mut section = element("section", &[]);
        section.attributes.insert("id".into(), "pricing".into());
        section.rect = Rect::new(0.0, 900.0, 800.0, 600.0);
        let node = surface.add_element(body, section);

        assert_eq!(surface.element_by_id("pricing"), Some(node));
        surface.scroll_into_view(node, true);
        assert_eq!(surface.scroll_y(), 900.0);
        assert_eq!(surface.last_scroll_into_view(), Some((node, true)));
    }
}
