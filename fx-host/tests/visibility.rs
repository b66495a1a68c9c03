//! # 可见性动画集成测试
//!
//! 入场标记、数字滚动、打字机、懒加载、卡片错位。

mod common;

use common::{config, filler, has_class, node, page, page_with, style, text};
use fx_host::{NodeLayout, Page};
use fx_runtime::{EffectController, VisibilityAnimator};

/// 位于首屏之下的统计区块
fn stats_page(config: &fx_host::AppConfig) -> Page {
    page_with(
        vec![
            filler(),
            NodeLayout::new("section", &["fade-in"])
                .with_id("stats")
                .with_rect(0.0, 1500.0, 1280.0, 400.0)
                .with_children(vec![
                    NodeLayout::new("span", &[])
                        .with_id("users")
                        .with_attr("data-count", "1000")
                        .with_text("0"),
                    NodeLayout::new("span", &[])
                        .with_id("bad")
                        .with_attr("data-count", "n/a")
                        .with_text("—"),
                ]),
        ],
        config,
    )
}

fn visibility(page: &Page) -> std::rc::Rc<VisibilityAnimator> {
    page.controller::<VisibilityAnimator>(VisibilityAnimator::FAMILY)
        .unwrap()
}

#[test]
fn test_reveal_adds_single_marker() {
    let mut page = stats_page(&config());
    page.ready();
    let stats = node(&page, "#stats");
    assert!(!has_class(&page, stats, "animate-in"));

    page.scroll_to(1000.0);
    page.frame();
    assert!(has_class(&page, stats, "animate-in"));

    // 离开后再次进入
    page.scroll_to(0.0);
    page.frame();
    page.scroll_to(1000.0);
    page.frame();

    let markers = page
        .surface()
        .element(stats)
        .unwrap()
        .classes
        .iter()
        .filter(|c| *c == "animate-in")
        .count();
    assert_eq!(markers, 1);
    // 数字滚动只在第一次显现时启动
    assert_eq!(visibility(&page).counters_started(), 1);
}

#[test]
fn test_counter_lands_on_exact_target() {
    let mut page = stats_page(&config());
    page.ready();
    let users = node(&page, "#users");
    let bad = node(&page, "#bad");

    page.scroll_to(1000.0);
    page.frame();
    // 显现时同步执行第一步
    assert_eq!(text(&page, users), "8");

    page.frames(123);
    assert_eq!(text(&page, users), "992");

    page.frame();
    assert_eq!(text(&page, users), "1,000");

    page.frames(5);
    assert_eq!(text(&page, users), "1,000");
    assert_eq!(page.scheduler().pending_frames(), 0);
    // 无法解析的目标值保持原文本
    assert_eq!(text(&page, bad), "—");
}

#[test]
fn test_unobserve_after_reveal_is_configurable() {
    let mut config = config();
    config.effects.reveal.unobserve_after_reveal = true;
    let mut page = stats_page(&config);
    page.ready();
    let observer = visibility(&page).reveal_observer().unwrap();
    assert_eq!(page.observers().watched(observer), 1);

    page.scroll_to(1000.0);
    page.frame();
    assert_eq!(page.observers().watched(observer), 0);

    // 默认保持观察
    let mut page = stats_page(&common::config());
    page.ready();
    let observer = visibility(&page).reveal_observer().unwrap();
    page.scroll_to(1000.0);
    page.frame();
    assert_eq!(page.observers().watched(observer), 1);
}

#[test]
fn test_lazy_image_loads_once() {
    let mut page = page(vec![
        filler(),
        NodeLayout::new("img", &[])
            .with_id("chart")
            .with_attr("data-src", "/img/chart.png")
            .with_rect(0.0, 2000.0, 400.0, 300.0),
    ]);
    page.ready();
    let chart = node(&page, "#chart");
    let observer = visibility(&page).image_observer().unwrap();

    assert_eq!(page.surface().element(chart).unwrap().attributes.get("src"), None);
    assert!(!has_class(&page, chart, "loaded"));

    page.scroll_to(1500.0);
    page.frame();
    assert_eq!(
        page.surface()
            .element(chart)
            .unwrap()
            .attributes
            .get("src")
            .map(String::as_str),
        Some("/img/chart.png")
    );
    assert!(has_class(&page, chart, "loaded"));

    // 已停止观察，后续可见性变化不再投递
    assert_eq!(page.observers().watched(observer), 0);
    assert_eq!(page.observers().inject(chart, true), 0);
}

#[test]
fn test_typewriter_types_then_drops_caret() {
    let mut page = page(vec![NodeLayout::new("p", &["typewriter"])
        .with_id("tagline")
        .with_text("Hi!")]);
    page.ready();
    let tagline = node(&page, "#tagline");

    assert_eq!(text(&page, tagline), "");
    assert_eq!(style(&page, tagline, "border-right").as_deref(), Some("2px solid"));
    assert_eq!(
        style(&page, tagline, "animation").as_deref(),
        Some("blink 1s infinite")
    );

    page.advance(100);
    assert_eq!(text(&page, tagline), "H");

    page.advance(1000);
    assert_eq!(text(&page, tagline), "Hi!");
    assert_eq!(style(&page, tagline, "border-right").as_deref(), Some("none"));
    assert_eq!(style(&page, tagline, "animation").as_deref(), Some("none"));
    assert_eq!(page.scheduler().active_timers(), 0);
    assert_eq!(visibility(&page).resources().live_counts().timers, 0);
}

#[test]
fn test_typewriter_cancelled_on_close() {
    let mut page = page(vec![NodeLayout::new("p", &["typewriter"])
        .with_id("tagline")
        .with_text("Hello world")]);
    page.ready();
    let tagline = node(&page, "#tagline");

    page.advance(250);
    assert_eq!(text(&page, tagline), "He");
    assert_eq!(page.scheduler().active_timers(), 1);

    page.close();
    assert_eq!(page.scheduler().active_timers(), 0);

    page.advance(3000);
    assert_eq!(text(&page, tagline), "He");
    assert_eq!(style(&page, tagline, "border-right").as_deref(), Some("2px solid"));
}

#[test]
fn test_typewriter_with_unbounded_caret_linger() {
    let mut config = config();
    config.effects.typewriter.caret_linger_ms = u64::MAX;
    assert!(config.validate().is_ok());

    let mut page = page_with(
        vec![NodeLayout::new("p", &["typewriter"])
            .with_id("tagline")
            .with_text("Hi!")],
        &config,
    );
    page.ready();
    let tagline = node(&page, "#tagline");

    page.advance(1000);
    assert_eq!(text(&page, tagline), "Hi!");
    // 光标移除定时器永不到期
    assert_eq!(style(&page, tagline, "border-right").as_deref(), Some("2px solid"));
    assert_eq!(page.scheduler().active_timers(), 1);

    page.close();
    assert_eq!(page.scheduler().active_timers(), 0);
}

#[test]
fn test_cards_are_staggered_within_grids() {
    let mut page = page(vec![
        NodeLayout::new("div", &["card-grid"]).with_children(vec![
            NodeLayout::new("div", &["card"]).with_id("c0"),
            NodeLayout::new("div", &["pricing-card"]).with_id("c1"),
            NodeLayout::new("div", &["card"]).with_id("c2"),
        ]),
        NodeLayout::new("div", &["card"]).with_id("loose"),
    ]);
    page.ready();

    let delays: Vec<Option<String>> = ["#c0", "#c1", "#c2", "#loose"]
        .iter()
        .map(|r| style(&page, node(&page, r), "animation-delay"))
        .collect();
    assert_eq!(
        delays,
        vec![
            Some("0s".to_string()),
            Some("0.1s".to_string()),
            Some("0.2s".to_string()),
            None,
        ]
    );
    assert_eq!(visibility(&page).summary().staggered_cards, 3);
}
