//! # Scheduler 模块
//!
//! 帧调度与定时器接口。
//!
//! - `request_frame`：下一次重绘前执行一次
//! - `set_timeout` / `set_interval`：毫秒定时器，可通过句柄取消

/// 帧回调句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// 定时器句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// 帧回调，参数为帧时间戳（毫秒）
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// 一次性定时器回调
pub type TimeoutCallback = Box<dyn FnOnce()>;

/// 重复定时器回调
pub type IntervalCallback = Box<dyn FnMut()>;

/// 调度器接口
///
/// 方法均取 `&self`，实现方自行使用内部可变性。
/// 实现方在执行回调期间不得持有自身状态的借用：回调会重入调度器
/// （重新请求帧、清除自己的定时器）。
pub trait FrameScheduler {
    /// 请求在下一次重绘前执行回调
    fn request_frame(&self, callback: FrameCallback) -> FrameId;

    /// `delay_ms` 毫秒后执行一次
    fn set_timeout(&self, delay_ms: u64, callback: TimeoutCallback) -> TimerId;

    /// 每 `period_ms` 毫秒执行一次，直到被清除
    fn set_interval(&self, period_ms: u64, callback: IntervalCallback) -> TimerId;

    /// 清除定时器（对未知或已结束的句柄无效果）
    fn clear_timer(&self, id: TimerId);
}
