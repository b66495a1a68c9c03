//! # Page Layout
//!
//! 页面描述文件（JSON）：视口、文档高度与元素树。
//!
//! ```json
//! {
//!   "viewport": { "width": 1280, "height": 720 },
//!   "body": [
//!     { "tag": "header", "classes": ["header"], "rect": { "left": 0, "top": 0, "width": 1280, "height": 80 } },
//!     { "tag": "section", "id": "stats", "classes": ["fade-in"],
//!       "rect": { "left": 0, "top": 900, "width": 1280, "height": 400 },
//!       "children": [ { "tag": "span", "attributes": { "data-count": "1000" }, "text": "0" } ] }
//!   ]
//! }
//! ```
//!
//! 未指定 `rect` 的元素继承父元素的布局。

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use fx_runtime::{NodeId, Rect, Surface};
use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::error::{HostError, HostResult};
use crate::host::{Element, MemorySurface};

/// 视口尺寸
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// 页面描述
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// 未指定时使用宿主配置中的视口
    #[serde(default)]
    pub viewport: Option<ViewportSize>,

    /// 文档总高度；未指定时取所有元素底边的最大值
    #[serde(default)]
    pub scroll_height: Option<f64>,

    /// 初始滚动位置
    #[serde(default)]
    pub scroll_y: f64,

    #[serde(default)]
    pub head: Vec<NodeLayout>,

    #[serde(default)]
    pub body: Vec<NodeLayout>,
}

/// 元素描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub text: String,

    /// 文档坐标下的布局
    #[serde(default)]
    pub rect: Option<Rect>,

    #[serde(default)]
    pub children: Vec<NodeLayout>,
}

fn default_tag() -> String {
    "div".to_string()
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            rect: None,
            children: Vec::new(),
        }
    }
}

impl NodeLayout {
    /// 带 class 的元素
    pub fn new(tag: &str, classes: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_rect(mut self, left: f64, top: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(left, top, width, height));
        self
    }

    pub fn with_children(mut self, children: Vec<NodeLayout>) -> Self {
        self.children = children;
        self
    }

    fn to_element(&self, inherited: Rect) -> Element {
        let mut attributes = self.attributes.clone();
        if let Some(id) = &self.id {
            attributes.insert("id".to_string(), id.clone());
        }
        Element {
            classes: self.classes.clone(),
            attributes,
            text: self.text.clone(),
            rect: self.rect.unwrap_or(inherited),
            ..Element::new(&self.tag)
        }
    }
}

impl PageLayout {
    /// 从 JSON 文件读取
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| HostError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 构建内存文档
    pub fn build(&self, fallback: &ViewportConfig) -> MemorySurface {
        let viewport = self.viewport.unwrap_or(ViewportSize {
            width: fallback.width,
            height: fallback.height,
        });
        let mut surface = MemorySurface::new(viewport.width, viewport.height);
        surface.set_scroll_height(self.scroll_height);

        let head = surface.head();
        let body = surface.body();
        let page_rect = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        for node in &self.head {
            insert(&mut surface, head, node, Rect::default());
        }
        for node in &self.body {
            insert(&mut surface, body, node, page_rect);
        }

        surface.set_scroll_y(self.scroll_y);
        surface
    }
}

fn insert(surface: &mut MemorySurface, parent: NodeId, layout: &NodeLayout, inherited: Rect) {
    let element = layout.to_element(inherited);
    let rect = element.rect;
    let id = surface.add_element(parent, element);
    for child in &layout.children {
        insert(surface, id, child, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_runtime::Selector;

    #[test]
    fn test_parse_minimal_layout() {
        let layout: PageLayout = serde_json::from_str(
            r#"{
                "body": [
                    { "classes": ["fade-in"], "rect": { "left": 0, "top": 900, "width": 100, "height": 50 },
                      "children": [ { "tag": "span", "attributes": { "data-count": "42" } } ] }
                ]
            }"#,
        )
        .unwrap();

        let surface = layout.build(&ViewportConfig::default());
        let sections = surface.query_all(&Selector::class("fade-in"));
        assert_eq!(sections.len(), 1);

        let counters = surface.query_all(&Selector::attr("data-count"));
        assert_eq!(counters.len(), 1);
        // 子元素继承父元素布局
        assert_eq!(surface.bounding_rect(counters[0]).top, 900.0);
        assert_eq!(surface.viewport_height(), 720.0);
    }

    #[test]
    fn test_id_becomes_attribute() {
        let layout = PageLayout {
            viewport: Some(ViewportSize {
                width: 800.0,
                height: 600.0,
            }),
            body: vec![NodeLayout::new("section", &[]).with_id("pricing")],
            ..Default::default()
        };
        let surface = layout.build(&ViewportConfig::default());
        let node = surface.element_by_id("pricing").unwrap();
        assert_eq!(surface.attribute(node, "id").as_deref(), Some("pricing"));
        assert_eq!(surface.viewport_width(), 800.0);
    }

    #[test]
    fn test_explicit_scroll_height() {
        let layout = PageLayout {
            scroll_height: Some(720.0),
            scroll_y: 300.0,
            body: vec![NodeLayout::new("div", &[]).with_rect(0.0, 0.0, 100.0, 3000.0)],
            ..Default::default()
        };
        let surface = layout.build(&ViewportConfig::default());
        assert_eq!(surface.scroll_height(), 720.0);
        // 无可滚动范围，初始位置被限制为 0
        assert_eq!(surface.scroll_y(), 0.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PageLayout::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, HostError::Io { .. }));
    }
}
