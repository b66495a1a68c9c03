//! # Scroll Chrome
//!
//! 滚动相关的页面外观：
//!
//! - 顶部滚动进度条（插入一个 `.scroll-indicator` 节点）
//! - 页头：向下滚动超过阈值时隐藏、向上滚动时显示，背景不透明度随滚动渐变
//! - 页内锚点平滑滚动
//!
//! 进度条与页头各自拥有独立的 [`FrameGate`]，互不抢占。

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::config::{EffectsConfig, ScrollConfig};
use crate::format::{css_number, percent};
use crate::lifecycle::{ControllerResources, EffectController, FrameGate};
use crate::platform::{Env, EventKind, EventTarget, NodeId};
use crate::selectors;

const INDICATOR_STYLES: [(&str, &str); 8] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "0%"),
    ("height", "3px"),
    ("background", "var(--gradient-primary)"),
    ("z-index", "1000"),
    ("transition", "width 0.1s ease"),
];

/// 滚动进度百分比
///
/// 可滚动范围不为正时返回 `0.0`；结果限制在 `[0, 100]`。
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let range = scroll_height - viewport_height;
    if !(range > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / range * 100.0).clamp(0.0, 100.0)
}

/// 页头外观
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderState {
    pub hidden: bool,
    pub background_alpha: f64,
}

impl HeaderState {
    pub fn compute(current: f64, last: f64, config: &ScrollConfig) -> Self {
        let hidden = current > last && current > config.header_hide_after_px;
        let ratio = (current / config.header_opacity_range_px).clamp(0.0, 1.0);
        Self {
            hidden,
            background_alpha: config.header_max_alpha * ratio,
        }
    }

    pub fn transform(&self) -> &'static str {
        if self.hidden {
            "translateY(-100%)"
        } else {
            "translateY(0)"
        }
    }

    pub fn background(&self) -> String {
        format!("rgba(255, 255, 255, {})", css_number(self.background_alpha))
    }
}

/// 滚动外观控制器
pub struct ScrollChrome {
    resources: Rc<ControllerResources>,
    indicator: NodeId,
    header: Option<NodeId>,
    anchors: usize,
}

impl ScrollChrome {
    pub const FAMILY: &'static str = "scroll-chrome";

    pub fn new(env: &Env, config: &EffectsConfig) -> Rc<Self> {
        let resources = ControllerResources::new(Self::FAMILY, env);

        let anchors = setup_smooth_anchors(&resources);
        let indicator = setup_indicator(&resources);
        let header = setup_header(&resources, &config.scroll);
        debug!(%indicator, header = header.is_some(), anchors, "滚动外观已初始化");

        Rc::new(Self {
            resources,
            indicator,
            header,
            anchors,
        })
    }

    /// 进度条节点
    pub fn indicator(&self) -> NodeId {
        self.indicator
    }

    /// 页头节点（页面无 `.header` 时为 `None`）
    pub fn header(&self) -> Option<NodeId> {
        self.header
    }

    pub fn anchors(&self) -> usize {
        self.anchors
    }
}

impl EffectController for ScrollChrome {
    fn family(&self) -> &'static str {
        Self::FAMILY
    }

    fn resources(&self) -> &Rc<ControllerResources> {
        &self.resources
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

fn setup_smooth_anchors(res: &Rc<ControllerResources>) -> usize {
    let anchors = res.env().surface().query_all(&selectors::anchors());
    for anchor in &anchors {
        let anchor = *anchor;
        res.listen(EventTarget::Node(anchor), EventKind::Click, move |res, _| {
            let mut surface = res.env().surface_mut();
            let Some(href) = surface.attribute(anchor, "href") else {
                return;
            };
            let id = href.trim_start_matches('#');
            if id.is_empty() {
                return;
            }
            if let Some(target) = surface.element_by_id(id) {
                surface.scroll_into_view(target, true);
            }
        });
    }
    anchors.len()
}

fn setup_indicator(res: &Rc<ControllerResources>) -> NodeId {
    let indicator = {
        let mut surface = res.env().surface_mut();
        let node = surface.create_element("div");
        surface.add_class(node, selectors::SCROLL_INDICATOR_CLASS);
        for (property, value) in INDICATOR_STYLES {
            surface.set_style(node, property, value);
        }
        let body = surface.body();
        surface.append_child(body, node);
        node
    };
    res.track_node(indicator);

    let gate = Rc::new(FrameGate::new());
    res.listen(EventTarget::Window, EventKind::Scroll, move |res, _| {
        gate.schedule(res, move |res| {
            let mut surface = res.env().surface_mut();
            let progress = scroll_progress(
                surface.scroll_y(),
                surface.scroll_height(),
                surface.viewport_height(),
            );
            surface.set_style(indicator, "width", &percent(progress));
        });
    });
    indicator
}

fn setup_header(res: &Rc<ControllerResources>, config: &ScrollConfig) -> Option<NodeId> {
    let (header, initial_scroll) = {
        let surface = res.env().surface();
        (surface.query_first(&selectors::header())?, surface.scroll_y())
    };

    let gate = Rc::new(FrameGate::new());
    let last_scroll_y = Rc::new(Cell::new(initial_scroll));
    let config = config.clone();

    res.listen(EventTarget::Window, EventKind::Scroll, move |res, _| {
        let last_scroll_y = last_scroll_y.clone();
        let config = config.clone();
        gate.schedule(res, move |res| {
            let mut surface = res.env().surface_mut();
            let current = surface.scroll_y();
            let state = HeaderState::compute(current, last_scroll_y.get(), &config);
            surface.set_style(header, "transform", state.transform());
            surface.set_style(header, "background-color", &state.background());
            last_scroll_y.set(current);
        });
    });
    Some(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_progress() {
        assert_eq!(scroll_progress(0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(scroll_progress(1000.0, 2000.0, 1000.0), 100.0);
    }

    #[test]
    fn test_scroll_progress_without_scrollable_range() {
        // scrollHeight == viewportHeight
        assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(30.0, 800.0, 800.0), 0.0);
        // 内容比视口短
        assert_eq!(scroll_progress(10.0, 500.0, 800.0), 0.0);
        assert!(!scroll_progress(f64::NAN, 2000.0, 800.0).is_nan());
    }

    #[test]
    fn test_scroll_progress_is_clamped() {
        // 弹性滚动可能越界
        assert_eq!(scroll_progress(-40.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(1200.0, 2000.0, 1000.0), 100.0);
    }

    #[test]
    fn test_header_state() {
        let config = ScrollConfig::default();

        // 向下滚动但未超过阈值
        let state = HeaderState::compute(80.0, 40.0, &config);
        assert!(!state.hidden);
        assert!((state.background_alpha - 0.76).abs() < 1e-9);

        // 向下滚动超过阈值
        let state = HeaderState::compute(300.0, 200.0, &config);
        assert!(state.hidden);
        assert_eq!(state.transform(), "translateY(-100%)");
        assert_eq!(state.background(), "rgba(255, 255, 255, 0.95)");

        // 向上滚动
        let state = HeaderState::compute(250.0, 300.0, &config);
        assert!(!state.hidden);
        assert_eq!(state.transform(), "translateY(0)");

        // 顶部
        let state = HeaderState::compute(0.0, 0.0, &config);
        assert_eq!(state.background(), "rgba(255, 255, 255, 0)");
    }
}
