//! 集成测试共用的页面构造

#![allow(dead_code)]

use fx_host::{AppConfig, NodeLayout, Page, PageLayout};
use fx_runtime::{NodeId, Selector, Surface};

/// 固定随机种子的配置
pub fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.effects.decoration.seed = Some(7);
    config
}

/// 1280×720 视口下的页面（未触发就绪）
pub fn page_with(body: Vec<NodeLayout>, config: &AppConfig) -> Page {
    let layout = PageLayout {
        body,
        ..Default::default()
    };
    Page::from_layout(&layout, config)
}

pub fn page(body: Vec<NodeLayout>) -> Page {
    page_with(body, &config())
}

/// 文档高度 3000 的占位元素
pub fn filler() -> NodeLayout {
    NodeLayout::new("main", &[]).with_rect(0.0, 0.0, 1280.0, 3000.0)
}

pub fn node(page: &Page, reference: &str) -> NodeId {
    page.resolve(reference)
        .unwrap_or_else(|| panic!("页面中没有 {reference}"))
}

pub fn count(page: &Page, class: &str) -> usize {
    page.surface().query_all(&Selector::class(class)).len()
}

pub fn style(page: &Page, node: NodeId, property: &str) -> Option<String> {
    page.surface().style(node, property)
}

pub fn text(page: &Page, node: NodeId) -> String {
    page.surface().text(node)
}

pub fn has_class(page: &Page, node: NodeId, class: &str) -> bool {
    page.surface().has_class(node, class)
}
