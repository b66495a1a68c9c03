//! # Surface 模块
//!
//! 页面结构面的抽象：元素查询、class/属性/样式/文本读写、节点插入与移除。
//!
//! 控制器只通过 [`Surface`] 观察和修改页面，不假设宿主是浏览器 DOM 还是内存文档。

use serde::{Deserialize, Serialize};

/// 节点标识符
///
/// 由宿主分配，在节点被移除后不会复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// 矩形区域（像素）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// 创建新的矩形
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// 中心点
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// 垂直平移
    pub fn offset_y(self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            ..self
        }
    }

    /// 与另一矩形的交集
    ///
    /// 边缘相接（面积为 0）也视为相交，返回零面积矩形。
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// 属性匹配条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// 属性存在即可
    Present(String),
    /// 属性值以指定前缀开头
    Prefix { name: String, prefix: String },
}

/// 元素选择器
///
/// 只覆盖效果层实际用到的查询形态：
/// - 标签名
/// - 任一 class 命中
/// - 属性存在/前缀
/// - 排除位于某个 class 区域内部的元素
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub tag: Option<String>,
    pub any_class: Vec<String>,
    pub attr: Option<AttrMatch>,
    pub not_within_class: Option<String>,
}

impl Selector {
    /// 单个 class
    pub fn class(class: &str) -> Self {
        Self {
            any_class: vec![class.to_string()],
            ..Default::default()
        }
    }

    /// 任一 class 命中
    pub fn any_class(classes: &[&str]) -> Self {
        Self {
            any_class: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    /// 按标签名
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            ..Default::default()
        }
    }

    /// 按属性存在
    pub fn attr(name: &str) -> Self {
        Self::default().with_attr(name)
    }

    pub fn with_attr(mut self, name: &str) -> Self {
        self.attr = Some(AttrMatch::Present(name.to_string()));
        self
    }

    pub fn with_attr_prefix(mut self, name: &str, prefix: &str) -> Self {
        self.attr = Some(AttrMatch::Prefix {
            name: name.to_string(),
            prefix: prefix.to_string(),
        });
        self
    }

    /// 排除祖先链上带有指定 class 的元素
    pub fn not_within(mut self, class: &str) -> Self {
        self.not_within_class = Some(class.to_string());
        self
    }

    /// 判断单个元素是否命中（不含祖先排除条件，由宿主结合树结构判断）
    pub fn matches_element<'a>(
        &self,
        tag: &str,
        has_class: impl Fn(&str) -> bool,
        attribute: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        if let Some(expected) = &self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }

        if !self.any_class.is_empty() && !self.any_class.iter().any(|c| has_class(c)) {
            return false;
        }

        match &self.attr {
            None => true,
            Some(AttrMatch::Present(name)) => attribute(name).is_some(),
            Some(AttrMatch::Prefix { name, prefix }) => {
                attribute(name).is_some_and(|v| v.starts_with(prefix.as_str()))
            }
        }
    }
}

/// 页面结构面
///
/// 所有方法对未知或已移除的节点都应静默处理（读返回空值，写不生效），
/// 因为回调可能在节点被外部移除之后才触发。
pub trait Surface {
    /// `<head>` 节点
    fn head(&self) -> NodeId;

    /// `<body>` 节点
    fn body(&self) -> NodeId;

    /// 按文档顺序查询所有命中元素
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    /// 查询 `root` 的后代（不含 `root` 自身）
    fn query_within(&self, root: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// 查询第一个命中元素
    fn query_first(&self, selector: &Selector) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    /// 按 `id` 属性查找
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// 节点是否仍挂在文档上
    fn contains(&self, node: NodeId) -> bool;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// 添加 class（幂等）
    fn add_class(&mut self, node: NodeId, class: &str);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// 读取 `data-*` 属性
    fn data(&self, node: NodeId, key: &str) -> Option<String> {
        self.attribute(node, &format!("data-{key}"))
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// 文本内容（含后代）
    fn text(&self, node: NodeId) -> String;

    /// 设置文本内容（替换所有子节点）
    fn set_text(&mut self, node: NodeId, text: &str);

    /// 创建游离元素
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// 移除节点（连同子树）
    ///
    /// # 返回
    /// - `true`: 节点存在并已移除
    /// - `false`: 节点未知或已被移除
    fn remove_node(&mut self, node: NodeId) -> bool;

    /// 相对视口的包围盒
    fn bounding_rect(&self, node: NodeId) -> Rect;

    fn scroll_y(&self) -> f64;

    fn scroll_height(&self) -> f64;

    fn viewport_width(&self) -> f64;

    fn viewport_height(&self) -> f64;

    /// 将元素滚动到视口顶部
    fn scroll_into_view(&mut self, node: NodeId, smooth: bool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_rect_intersection() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        let inside = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(viewport.intersection(&inside), Some(inside));

        let partial = Rect::new(90.0, 90.0, 20.0, 20.0);
        assert_eq!(
            viewport.intersection(&partial),
            Some(Rect::new(90.0, 90.0, 10.0, 10.0))
        );

        let outside = Rect::new(0.0, 150.0, 10.0, 10.0);
        assert_eq!(viewport.intersection(&outside), None);

        // 边缘相接
        let touching = Rect::new(0.0, 100.0, 10.0, 10.0);
        assert_eq!(viewport.intersection(&touching).map(|r| r.area()), Some(0.0));
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.center(), (60.0, 45.0));
    }

    #[test]
    fn test_selector_matches_class_and_attr() {
        let attrs: HashMap<&str, &str> = HashMap::from([("href", "#pricing")]);
        let classes = ["nav", "magnetic"];
        let has_class = |c: &str| classes.contains(&c);
        let attribute = |n: &str| attrs.get(n).copied();

        assert!(Selector::class("magnetic").matches_element("a", has_class, attribute));
        assert!(!Selector::class("hero").matches_element("a", has_class, attribute));
        assert!(
            Selector::tag("A")
                .with_attr_prefix("href", "#")
                .matches_element("a", has_class, attribute)
        );
        assert!(
            !Selector::tag("a")
                .with_attr_prefix("href", "/")
                .matches_element("a", has_class, attribute)
        );
        assert!(!Selector::attr("data-src").matches_element("img", has_class, attribute));
    }

    #[test]
    fn test_selector_any_class() {
        let selector = Selector::any_class(&["fade-in", "scale-in"]);
        assert!(selector.matches_element("div", |c| c == "scale-in", |_| None));
        assert!(!selector.matches_element("div", |c| c == "slide-in-left", |_| None));
    }
}
