//! # Card Stagger
//!
//! 同步为 `.card-grid` 内的卡片设置递增的 `animation-delay`。

use crate::format::{round_to, seconds};
use crate::platform::Surface;
use crate::selectors;

/// 第 `index` 张卡片的延迟（秒）
pub fn stagger_delay(index: usize, step_secs: f64) -> f64 {
    round_to(index as f64 * step_secs, 3)
}

/// 返回设置了延迟的卡片数量
pub(crate) fn apply(surface: &mut dyn Surface, step_secs: f64) -> usize {
    let mut staggered = 0;
    for grid in surface.query_all(&selectors::card_grids()) {
        let cards = surface.query_within(grid, &selectors::cards());
        for (index, card) in cards.into_iter().enumerate() {
            surface.set_style(card, "animation-delay", &seconds(stagger_delay(index, step_secs)));
            staggered += 1;
        }
    }
    staggered
}
