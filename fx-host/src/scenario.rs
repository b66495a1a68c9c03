//! # Scenario
//!
//! 脚本化的用户会话：按顺序回放滚动、指针、点击与时间推进。
//!
//! ```json
//! {
//!   "steps": [
//!     { "action": "scroll", "y": 900 },
//!     { "action": "frame" },
//!     { "action": "pointer_enter", "target": "#buy" },
//!     { "action": "pointer_move", "target": "#buy", "x": 610, "y": 420 },
//!     { "action": "advance", "ms": 2000 },
//!     { "action": "close" }
//!   ]
//! }
//! ```
//!
//! 节点引用格式见 [`Page::resolve`]。

use std::fs;
use std::path::Path;

use fx_runtime::NodeId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{HostError, HostResult};
use crate::page::Page;

fn default_frame_count() -> usize {
    1
}

/// 单步操作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// 滚动到指定位置
    Scroll { y: f64 },
    PointerEnter { target: String },
    /// 指针移动（视口坐标）
    PointerMove { target: String, x: f64, y: f64 },
    PointerLeave { target: String },
    Click { target: String },
    /// 推进若干毫秒
    Advance { ms: u64 },
    /// 推进若干帧
    Frame {
        #[serde(default = "default_frame_count")]
        count: usize,
    },
    /// 重新触发页面就绪（替换所有控制器）
    Reload,
    /// 触发页面关闭
    Close,
}

/// 场景
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// 回放结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackSummary {
    pub steps: usize,
    /// 事件处理函数被调用的总次数
    pub handlers_invoked: usize,
}

impl Scenario {
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

    /// 在页面上回放所有步骤
    ///
    /// 遇到无法解析的节点引用时立即停止并返回错误，已执行的步骤不回滚。
    pub fn play(&self, page: &mut Page) -> HostResult<PlaybackSummary> {
        let mut summary = PlaybackSummary::default();

        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, ?step, "执行场景步骤");
            let invoked = match step {
                Step::Scroll { y } => page.scroll_to(*y),
                Step::PointerEnter { target } => {
                    page.pointer_enter(resolve(page, index, target)?)
                }
                Step::PointerMove { target, x, y } => {
                    page.pointer_move(resolve(page, index, target)?, *x, *y)
                }
                Step::PointerLeave { target } => {
                    page.pointer_leave(resolve(page, index, target)?)
                }
                Step::Click { target } => page.click(resolve(page, index, target)?),
                Step::Advance { ms } => {
                    page.advance(*ms);
                    0
                }
                Step::Frame { count } => {
                    page.frames(*count);
                    0
                }
                Step::Reload => {
                    page.ready();
                    0
                }
                Step::Close => {
                    page.close();
                    0
                }
            };

            summary.steps += 1;
            summary.handlers_invoked += invoked;
        }

        info!(name = %self.name, steps = summary.steps, "场景回放完成");
        Ok(summary)
    }
}

fn resolve(page: &Page, step: usize, reference: &str) -> HostResult<NodeId> {
    page.resolve(reference).ok_or_else(|| HostError::UnknownNode {
        step,
        reference: reference.to_string(),
    })
}
