//! # Typewriter 效果
//!
//! 逐字显示 `.typewriter` 元素的文本，结束后移除闪烁光标。
//!
//! 两个定时器（逐字的重复定时器、移除光标的一次性定时器）都登记在实例账本里，
//! 打字途中销毁实例会一并取消。

use std::rc::Rc;

use crate::config::TypewriterConfig;
use crate::lifecycle::ControllerResources;
use crate::platform::NodeId;
use crate::selectors;

const CARET_BORDER: &str = "2px solid";
const CARET_ANIMATION: &str = "blink 1s infinite";

/// 逐字进度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterProgress {
    chars: Vec<char>,
    typed: usize,
}

impl TypewriterProgress {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            typed: 0,
        }
    }

    /// 再显示一个字符，返回当前应显示的文本
    pub fn advance(&mut self) -> String {
        self.typed = (self.typed + 1).min(self.chars.len());
        self.visible()
    }

    pub fn visible(&self) -> String {
        self.chars[..self.typed].iter().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.typed >= self.chars.len()
    }
}

/// 启动页面上所有打字机元素，返回数量
pub(crate) fn start_all(res: &Rc<ControllerResources>, config: &TypewriterConfig) -> usize {
    let nodes = res.env().surface().query_all(&selectors::typewriters());
    for node in &nodes {
        start(res, *node, config);
    }
    nodes.len()
}

fn start(res: &Rc<ControllerResources>, node: NodeId, config: &TypewriterConfig) {
    let text = {
        let mut surface = res.env().surface_mut();
        let text = surface.text(node);
        surface.set_text(node, "");
        surface.set_style(node, "border-right", CARET_BORDER);
        surface.set_style(node, "animation", CARET_ANIMATION);
        text
    };

    let mut progress = TypewriterProgress::new(&text);
    let caret_linger_ms = config.caret_linger_ms;
    let mut finished = false;

    res.set_interval(config.tick_ms, move |res, own_timer| {
        if !progress.is_complete() {
            let visible = progress.advance();
            res.env().surface_mut().set_text(node, &visible);
        }

        if progress.is_complete() && !finished {
            finished = true;
            res.clear_timer(own_timer);
            res.set_timeout(caret_linger_ms, move |res| {
                let mut surface = res.env().surface_mut();
                surface.set_style(node, "border-right", "none");
                surface.set_style(node, "animation", "none");
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_advances_by_char() {
        let mut progress = TypewriterProgress::new("héllo");
        assert_eq!(progress.advance(), "h");
        assert_eq!(progress.advance(), "hé");
        assert!(!progress.is_complete());

        progress.advance();
        progress.advance();
        assert_eq!(progress.advance(), "héllo");
        assert!(progress.is_complete());

        // 完成后保持不变
        assert_eq!(progress.advance(), "héllo");
    }

    #[test]
    fn test_empty_text_is_complete() {
        let progress = TypewriterProgress::new("");
        assert!(progress.is_complete());
        assert_eq!(progress.visible(), "");
    }
}
