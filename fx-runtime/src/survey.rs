//! # Page Survey
//!
//! 不构造控制器，只统计页面上各效果会认领多少元素。

use serde::Serialize;

use crate::config::EffectsConfig;
use crate::platform::{Selector, Surface};
use crate::selectors;

/// 页面概览
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSurvey {
    pub entrance_elements: usize,
    pub counters: usize,
    pub typewriters: usize,
    pub lazy_images: usize,
    pub card_grids: usize,
    pub parallax_elements: usize,
    pub magnetic_elements: usize,
    /// 磁性元素超过上限，指针跟随会被整体跳过
    pub magnetic_skipped: bool,
    pub gradient_targets: usize,
    pub has_hero: bool,
    pub has_header: bool,
    pub anchors: usize,
}

impl PageSurvey {
    pub fn collect(surface: &dyn Surface, config: &EffectsConfig) -> Self {
        let count = |selector: Selector| surface.query_all(&selector).len();
        let magnetic_elements = count(selectors::magnetic());

        Self {
            entrance_elements: count(selectors::entrance()),
            counters: count(selectors::counters()),
            typewriters: count(selectors::typewriters()),
            lazy_images: count(selectors::lazy_images()),
            card_grids: count(selectors::card_grids()),
            parallax_elements: count(selectors::parallax()),
            magnetic_elements,
            magnetic_skipped: magnetic_elements > config.pointer.max_elements,
            gradient_targets: count(selectors::gradient_targets()),
            has_hero: surface.query_first(&selectors::hero()).is_some(),
            has_header: surface.query_first(&selectors::header()).is_some(),
            anchors: count(selectors::anchors()),
        }
    }
}
