//! # Decoration Spawner
//!
//! 纯装饰节点：
//!
//! - 若干浮动装饰（插入 body）
//! - hero / CTA 按钮的背景渐变动画（仅修改样式，无需释放）
//! - hero 存在时，在其内部插入一个粒子容器
//!
//! 随机参数由 [`DecorationParams::sample`] / [`ParticleParams::sample`]
//! 从随机源纯函数式生成，测试可替换为确定性随机源。
//! `destroy()` 只移除本实例创建的节点。

use std::any::Any;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::EffectsConfig;
use crate::format::{css_number, percent, px, round_to, seconds};
use crate::lifecycle::{ControllerResources, EffectController};
use crate::platform::{Env, NodeId, Surface};
use crate::selectors;

/// 浮动装饰可选字符
pub const GLYPHS: [&str; 8] = ["💫", "⭐", "✨", "🌟", "💎", "🔮", "🎯", "🚀"];

/// 浮动装饰参数
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationParams {
    pub glyph: &'static str,
    /// 字号 [10, 25) px
    pub font_size_px: f64,
    /// 水平位置 [0, 100) %
    pub left_pct: f64,
    /// 垂直位置 [0, 100) %
    pub top_pct: f64,
    /// 不透明度 [0.03, 0.08)
    pub opacity: f64,
    /// 浮动周期 [15, 30) s
    pub float_secs: f64,
}

impl DecorationParams {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            glyph: GLYPHS[rng.random_range(0..GLYPHS.len())],
            font_size_px: round_to(rng.random_range(10.0..25.0), 2),
            left_pct: round_to(rng.random_range(0.0..100.0), 2),
            top_pct: round_to(rng.random_range(0.0..100.0), 2),
            opacity: round_to(rng.random_range(0.03..0.08), 3),
            float_secs: round_to(rng.random_range(15.0..30.0), 2),
        }
    }

    fn styles(&self) -> [(&'static str, String); 8] {
        [
            ("position", "fixed".to_string()),
            ("font-size", px(self.font_size_px)),
            ("left", percent(self.left_pct)),
            ("top", percent(self.top_pct)),
            ("opacity", css_number(self.opacity)),
            ("pointer-events", "none".to_string()),
            ("z-index", "-1".to_string()),
            (
                "animation",
                format!("float {} ease-in-out infinite", seconds(self.float_secs)),
            ),
        ]
    }
}

/// 粒子参数
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleParams {
    pub left_pct: f64,
    pub top_pct: f64,
    /// 漂浮周期 [10, 30) s
    pub float_secs: f64,
}

impl ParticleParams {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            left_pct: round_to(rng.random_range(0.0..100.0), 2),
            top_pct: round_to(rng.random_range(0.0..100.0), 2),
            float_secs: round_to(rng.random_range(10.0..30.0), 2),
        }
    }

    fn styles(&self) -> [(&'static str, String); 8] {
        [
            ("position", "absolute".to_string()),
            ("width", "2px".to_string()),
            ("height", "2px".to_string()),
            ("background", "rgba(255, 255, 255, 0.5)".to_string()),
            ("border-radius", "50%".to_string()),
            ("left", percent(self.left_pct)),
            ("top", percent(self.top_pct)),
            (
                "animation",
                format!("particleFloat {} linear infinite", seconds(self.float_secs)),
            ),
        ]
    }
}

const PARTICLE_CONTAINER_STYLES: [(&str, &str); 7] = [
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("overflow", "hidden"),
    ("pointer-events", "none"),
];

/// 装饰控制器
pub struct DecorationSpawner {
    resources: Rc<ControllerResources>,
    floating: Vec<NodeId>,
    particle_container: Option<NodeId>,
    gradient_targets: usize,
}

impl DecorationSpawner {
    pub const FAMILY: &'static str = "decoration";

    /// 使用配置中的种子（或系统熵）构造
    pub fn new(env: &Env, config: &EffectsConfig) -> Rc<Self> {
        let mut rng = match config.decoration.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(env, config, &mut rng)
    }

    /// 使用指定随机源构造
    pub fn with_rng<R: Rng + ?Sized>(env: &Env, config: &EffectsConfig, rng: &mut R) -> Rc<Self> {
        let resources = ControllerResources::new(Self::FAMILY, env);

        let (floating, particle_container, gradient_targets) = {
            let mut surface = env.surface_mut();
            let floating = spawn_floating(&mut *surface, config.decoration.floating_count, rng);
            let gradient_targets = apply_gradient(&mut *surface);
            let particle_container =
                spawn_particles(&mut *surface, config.decoration.particle_count, rng);
            (floating, particle_container, gradient_targets)
        };

        for node in floating.iter().chain(particle_container.iter()) {
            resources.track_node(*node);
        }
        debug!(
            floating = floating.len(),
            particles = particle_container.is_some(),
            gradient_targets,
            "装饰元素已创建"
        );

        Rc::new(Self {
            resources,
            floating,
            particle_container,
            gradient_targets,
        })
    }

    /// 浮动装饰节点
    pub fn floating(&self) -> &[NodeId] {
        &self.floating
    }

    /// 粒子容器（hero 不存在时为 `None`）
    pub fn particle_container(&self) -> Option<NodeId> {
        self.particle_container
    }

    pub fn gradient_targets(&self) -> usize {
        self.gradient_targets
    }
}

impl EffectController for DecorationSpawner {
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

fn spawn_floating<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    count: usize,
    rng: &mut R,
) -> Vec<NodeId> {
    let body = surface.body();
    (0..count)
        .map(|_| {
            let params = DecorationParams::sample(rng);
            let node = surface.create_element("div");
            surface.add_class(node, selectors::FLOATING_CLASS);
            surface.set_text(node, params.glyph);
            for (property, value) in params.styles() {
                surface.set_style(node, property, &value);
            }
            surface.append_child(body, node);
            node
        })
        .collect()
}

fn apply_gradient(surface: &mut dyn Surface) -> usize {
    let targets = surface.query_all(&selectors::gradient_targets());
    for node in &targets {
        surface.set_style(*node, "background-size", "200% 200%");
        surface.set_style(*node, "animation", "gradientShift 8s ease infinite");
    }
    targets.len()
}

fn spawn_particles<R: Rng + ?Sized>(
    surface: &mut dyn Surface,
    count: usize,
    rng: &mut R,
) -> Option<NodeId> {
    let hero = surface.query_first(&selectors::hero())?;

    let container = surface.create_element("div");
    surface.add_class(container, selectors::PARTICLES_CLASS);
    for (property, value) in PARTICLE_CONTAINER_STYLES {
        surface.set_style(container, property, value);
    }

    for _ in 0..count {
        let params = ParticleParams::sample(rng);
        let particle = surface.create_element("div");
        surface.add_class(particle, selectors::PARTICLE_CLASS);
        for (property, value) in params.styles() {
            surface.set_style(particle, property, &value);
        }
        surface.append_child(container, particle);
    }

    surface.append_child(hero, container);
    Some(container)
}
