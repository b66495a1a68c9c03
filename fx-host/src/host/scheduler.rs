//! # Virtual Scheduler
//!
//! 虚拟时钟驱动的 [`FrameScheduler`]。
//!
//! 时间只在 [`VirtualScheduler::run_frame`] 中推进：
//! 每一帧先把时钟推进一个帧间隔，依次执行到期的定时器，再执行本帧之前排队的帧回调。
//! 帧回调中再次请求的帧排入下一帧。

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use fx_runtime::{FrameCallback, FrameId, FrameScheduler, IntervalCallback, TimeoutCallback, TimerId};
use tracing::trace;

enum TimerKind {
    Once(Option<TimeoutCallback>),
    Repeat {
        period_ms: u64,
        callback: Option<IntervalCallback>,
    },
}

struct Timer {
    due_ms: u64,
    kind: TimerKind,
}

/// 虚拟调度器
pub struct VirtualScheduler {
    now_ms: Cell<u64>,
    frame_interval_ms: u64,
    next_id: Cell<u64>,
    frames: RefCell<Vec<(FrameId, FrameCallback)>>,
    timers: RefCell<BTreeMap<TimerId, Timer>>,
    frames_run: Cell<u64>,
}

impl VirtualScheduler {
    pub fn new(frame_interval_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(0),
            frame_interval_ms: frame_interval_ms.max(1),
            next_id: Cell::new(1),
            frames: RefCell::new(Vec::new()),
            timers: RefCell::new(BTreeMap::new()),
            frames_run: Cell::new(0),
        }
    }

    fn allocate(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// 当前虚拟时间（毫秒）
    pub fn now(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// 等待执行的帧回调数
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// 尚未结束的定时器数
    pub fn active_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// 已执行的帧数
    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }

    /// 推进一帧
    ///
    /// # 返回
    /// 本帧执行的帧回调数量
    pub fn run_frame(&self) -> usize {
        let now = self.now_ms.get() + self.frame_interval_ms;
        self.now_ms.set(now);
        self.fire_due_timers(now);

        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for (_, callback) in frames {
            callback(now as f64);
        }
        self.frames_run.set(self.frames_run.get() + 1);
        trace!(now, count, "虚拟帧");
        count
    }

    /// 覆盖至少 `ms` 毫秒所需的整帧数
    pub fn frames_for(&self, ms: u64) -> u64 {
        ms.div_ceil(self.frame_interval_ms)
    }

    /// 按到期时间（相同时按创建顺序）执行所有不晚于 `now` 的定时器
    fn fire_due_timers(&self, now: u64) {
        loop {
            let next = {
                let timers = self.timers.borrow();
                timers
                    .iter()
                    .filter(|(_, t)| t.due_ms <= now)
                    .min_by_key(|(id, t)| (t.due_ms, **id))
                    .map(|(id, _)| *id)
            };
            let Some(id) = next else {
                break;
            };
            self.fire(id);
        }
    }

    fn fire(&self, id: TimerId) {
        let taken = {
            let mut timers = self.timers.borrow_mut();
            match timers.get_mut(&id) {
                Some(Timer {
                    kind: TimerKind::Once(callback),
                    ..
                }) => {
                    let callback = callback.take();
                    timers.remove(&id);
                    callback.map(Fired::Once)
                }
                Some(Timer {
                    kind: TimerKind::Repeat { callback, .. },
                    ..
                }) => callback.take().map(Fired::Repeat),
                None => None,
            }
        };

        match taken {
            Some(Fired::Once(callback)) => callback(),
            Some(Fired::Repeat(mut callback)) => {
                callback();
                // 回调中可能已清除自身
                let mut timers = self.timers.borrow_mut();
                if let Some(Timer {
                    due_ms,
                    kind:
                        TimerKind::Repeat {
                            period_ms,
                            callback: slot,
                        },
                }) = timers.get_mut(&id)
                {
                    *due_ms = due_ms.saturating_add(*period_ms);
                    *slot = Some(callback);
                }
            }
            None => {}
        }
    }
}

enum Fired {
    Once(TimeoutCallback),
    Repeat(IntervalCallback),
}

impl FrameScheduler for VirtualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = FrameId(self.allocate());
        self.frames.borrow_mut().push((id, callback));
        id
    }

    fn set_timeout(&self, delay_ms: u64, callback: TimeoutCallback) -> TimerId {
        let id = TimerId(self.allocate());
        self.timers.borrow_mut().insert(
            id,
            Timer {
                due_ms: self.now_ms.get().saturating_add(delay_ms),
                kind: TimerKind::Once(Some(callback)),
            },
        );
        id
    }

    fn set_interval(&self, period_ms: u64, callback: IntervalCallback) -> TimerId {
        let period_ms = period_ms.max(1);
        let id = TimerId(self.allocate());
        self.timers.borrow_mut().insert(
            id,
            Timer {
                due_ms: self.now_ms.get().saturating_add(period_ms),
                kind: TimerKind::Repeat {
                    period_ms,
                    callback: Some(callback),
                },
            },
        );
        id
    }

    fn clear_timer(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn advance(scheduler: &VirtualScheduler, ms: u64) {
        for _ in 0..scheduler.frames_for(ms) {
            scheduler.run_frame();
        }
    }

    #[test]
    fn test_frame_callbacks_run_once() {
        let scheduler = VirtualScheduler::new(16);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        scheduler.request_frame(Box::new(move |_| h.set(h.get() + 1)));

        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.now(), 32);
    }

    #[test]
    fn test_frame_requested_inside_frame_runs_next_frame() {
        let scheduler = Rc::new(VirtualScheduler::new(16));
        let hits = Rc::new(Cell::new(0));

        let s = scheduler.clone();
        let h = hits.clone();
        scheduler.request_frame(Box::new(move |_| {
            h.set(h.get() + 1);
            let h = h.clone();
            s.request_frame(Box::new(move |_| h.set(h.get() + 1)));
        }));

        scheduler.run_frame();
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending_frames(), 1);
        scheduler.run_frame();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_timeout_fires_when_due() {
        let scheduler = VirtualScheduler::new(10);
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        scheduler.set_timeout(25, Box::new(move || f.set(true)));

        advance(&scheduler, 20);
        assert!(!fired.get());
        advance(&scheduler, 10);
        assert!(fired.get());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_interval_and_clear() {
        let scheduler = VirtualScheduler::new(10);
        let ticks = Rc::new(Cell::new(0));
        let t = ticks.clone();
        let id = scheduler.set_interval(10, Box::new(move || t.set(t.get() + 1)));

        advance(&scheduler, 50);
        assert_eq!(ticks.get(), 5);

        scheduler.clear_timer(id);
        advance(&scheduler, 50);
        assert_eq!(ticks.get(), 5);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_interval_clears_itself() {
        let scheduler = Rc::new(VirtualScheduler::new(10));
        let ticks = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));

        let s = scheduler.clone();
        let t = ticks.clone();
        let o = own_id.clone();
        let id = scheduler.set_interval(
            10,
            Box::new(move || {
                t.set(t.get() + 1);
                if t.get() == 3 {
                    if let Some(id) = o.get() {
                        s.clear_timer(id);
                    }
                }
            }),
        );
        own_id.set(Some(id));

        advance(&scheduler, 100);
        assert_eq!(ticks.get(), 3);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_interval_catches_up_within_long_frame() {
        // 帧间隔大于周期时，一帧内补齐所有到期的触发
        let scheduler = VirtualScheduler::new(50);
        let ticks = Rc::new(Cell::new(0));
        let t = ticks.clone();
        scheduler.set_interval(10, Box::new(move || t.set(t.get() + 1)));

        scheduler.run_frame();
        assert_eq!(ticks.get(), 5);
    }

    #[test]
    fn test_far_future_timers_never_fire() {
        let scheduler = VirtualScheduler::new(16);
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        scheduler.set_timeout(u64::MAX, Box::new(move || f.set(f.get() + 1)));
        let f = fired.clone();
        scheduler.set_interval(u64::MAX, Box::new(move || f.set(f.get() + 1)));

        advance(&scheduler, 1000);
        assert_eq!(fired.get(), 0);
        assert_eq!(scheduler.active_timers(), 2);
    }
}
