//! # Visibility Animator
//!
//! 基于可见性的一次性动画：
//!
//! - 入场标记元素进入视口时添加 `animate-in`，并启动其后代的数字滚动
//! - 打字机效果（[`typewriter`]）
//! - 图片懒加载（[`lazy_image`]）
//! - 卡片错位延迟（[`stagger`]，同步，无观察器）
//!
//! ## 显现规则
//!
//! 每次进入视口都会（幂等地）添加 `animate-in`；数字滚动只在元素第一次显现时启动。
//! 默认不会 `unobserve` 已显现元素，可通过 `unobserve_after_reveal` 改为一次性。

mod counter;
mod lazy_image;
mod stagger;
mod typewriter;

pub use counter::{CounterAnimation, CounterTick};
pub use stagger::stagger_delay;
pub use typewriter::TypewriterProgress;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::config::EffectsConfig;
use crate::lifecycle::{ControllerResources, EffectController};
use crate::platform::{EdgeMargin, Env, NodeId, ObserverHandle, ObserverOptions};
use crate::selectors;

/// 构造时的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilitySummary {
    /// 被观察的入场元素
    pub entrance_elements: usize,
    pub typewriters: usize,
    pub lazy_images: usize,
    pub staggered_cards: usize,
}

/// 可见性动画控制器
pub struct VisibilityAnimator {
    resources: Rc<ControllerResources>,
    reveal_observer: Option<ObserverHandle>,
    image_observer: Option<ObserverHandle>,
    summary: VisibilitySummary,
    counters_started: Rc<Cell<usize>>,
}

impl VisibilityAnimator {
    pub const FAMILY: &'static str = "visibility";

    pub fn new(env: &Env, config: &EffectsConfig) -> Rc<Self> {
        let resources = ControllerResources::new(Self::FAMILY, env);
        let counters_started = Rc::new(Cell::new(0));

        let (reveal_observer, entrance_elements) =
            observe_entrances(&resources, config, counters_started.clone());
        let typewriters = typewriter::start_all(&resources, &config.typewriter);
        let (image_observer, lazy_images) = lazy_image::observe_all(&resources);
        let staggered_cards = stagger::apply(&mut *env.surface_mut(), config.stagger.step_secs);

        let summary = VisibilitySummary {
            entrance_elements,
            typewriters,
            lazy_images,
            staggered_cards,
        };
        debug!(?summary, "可见性动画已初始化");

        Rc::new(Self {
            resources,
            reveal_observer,
            image_observer,
            summary,
            counters_started,
        })
    }

    pub fn summary(&self) -> VisibilitySummary {
        self.summary
    }

    pub fn reveal_observer(&self) -> Option<ObserverHandle> {
        self.reveal_observer
    }

    pub fn image_observer(&self) -> Option<ObserverHandle> {
        self.image_observer
    }

    /// 已启动的数字滚动数量
    pub fn counters_started(&self) -> usize {
        self.counters_started.get()
    }
}

impl EffectController for VisibilityAnimator {
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

fn observe_entrances(
    res: &Rc<ControllerResources>,
    config: &EffectsConfig,
    counters_started: Rc<Cell<usize>>,
) -> (Option<ObserverHandle>, usize) {
    let options = ObserverOptions {
        threshold: config.reveal.threshold,
        root_margin: EdgeMargin::bottom(-config.reveal.bottom_inset_px),
    };
    let unobserve_after_reveal = config.reveal.unobserve_after_reveal;
    let duration_ms = config.reveal.counter_duration_ms;
    let frame_ms = config.reveal.counter_frame_ms;
    let revealed: RefCell<HashSet<NodeId>> = RefCell::new(HashSet::new());

    let handle = res.observe(options, move |res, handle, entries| {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let target = entry.target;
            res.env()
                .surface_mut()
                .add_class(target, selectors::REVEALED_CLASS);

            if revealed.borrow_mut().insert(target) {
                let started = counter::start_counters(res, target, duration_ms, frame_ms);
                counters_started.set(counters_started.get() + started);
            }

            if unobserve_after_reveal {
                res.env().observers.unobserve(handle, target);
            }
        }
    });

    let elements = res.env().surface().query_all(&selectors::entrance());
    if let Some(handle) = handle {
        for element in &elements {
            res.env().observers.observe(handle, *element);
        }
    }
    (handle, elements.len())
}
