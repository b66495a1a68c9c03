//! # Config 模块
//!
//! 效果层参数。所有字段都有默认值，配置文件只需写出想覆盖的项。

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// 效果层配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default)]
    pub reveal: RevealConfig,

    #[serde(default)]
    pub typewriter: TypewriterConfig,

    #[serde(default)]
    pub stagger: StaggerConfig,

    #[serde(default)]
    pub parallax: ParallaxConfig,

    #[serde(default)]
    pub pointer: PointerConfig,

    #[serde(default)]
    pub decoration: DecorationConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,
}

/// 入场动画 / 数字滚动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// 可见比例阈值
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,

    /// 根区域底边向内收缩的像素数（元素略早于到达视口底边时触发）
    #[serde(default = "default_reveal_bottom_inset")]
    pub bottom_inset_px: f64,

    /// 元素显现后是否停止观察
    ///
    /// 默认不停止：若 `animate-in` 被外部移除，再次进入视口时会重新添加。
    #[serde(default)]
    pub unobserve_after_reveal: bool,

    /// 数字滚动总时长（毫秒）
    #[serde(default = "default_counter_duration_ms")]
    pub counter_duration_ms: f64,

    /// 计算步长时假定的帧间隔（毫秒）
    #[serde(default = "default_counter_frame_ms")]
    pub counter_frame_ms: f64,
}

/// 打字机效果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// 每个字符的间隔（毫秒）
    #[serde(default = "default_typewriter_tick_ms")]
    pub tick_ms: u64,

    /// 打完后光标保留时长（毫秒）
    #[serde(default = "default_caret_linger_ms")]
    pub caret_linger_ms: u64,
}

/// 卡片错位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// 相邻卡片的延迟差（秒）
    #[serde(default = "default_stagger_step_secs")]
    pub step_secs: f64,
}

/// 视差滚动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxConfig {
    /// 未配置 `data-speed` 时的速度系数
    #[serde(default = "default_parallax_speed")]
    pub default_speed: f64,
}

/// 磁性跟随
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    /// 可跟随元素上限，超过则整页跳过
    #[serde(default = "default_max_magnetic")]
    pub max_elements: usize,

    /// 位移系数
    #[serde(default = "default_magnetic_strength")]
    pub strength: f64,
}

/// 装饰元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationConfig {
    /// 浮动装饰数量
    #[serde(default = "default_floating_count")]
    pub floating_count: usize,

    /// hero 内粒子数量
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,

    /// 随机种子（未配置时使用系统熵）
    #[serde(default)]
    pub seed: Option<u64>,
}

/// 滚动外观
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// 向下滚动超过该值时隐藏页头（像素）
    #[serde(default = "default_header_hide_after_px")]
    pub header_hide_after_px: f64,

    /// 页头背景不透明度达到上限所需的滚动距离（像素）
    #[serde(default = "default_header_opacity_range_px")]
    pub header_opacity_range_px: f64,

    /// 页头背景最大 alpha
    #[serde(default = "default_header_max_alpha")]
    pub header_max_alpha: f64,
}

// 默认值函数
fn default_reveal_threshold() -> f64 {
    0.1
}

fn default_reveal_bottom_inset() -> f64 {
    50.0
}

fn default_counter_duration_ms() -> f64 {
    2000.0
}

fn default_counter_frame_ms() -> f64 {
    16.0
}

fn default_typewriter_tick_ms() -> u64 {
    100
}

fn default_caret_linger_ms() -> u64 {
    500
}

fn default_stagger_step_secs() -> f64 {
    0.1
}

fn default_parallax_speed() -> f64 {
    0.5
}

fn default_max_magnetic() -> usize {
    8
}

fn default_magnetic_strength() -> f64 {
    0.05
}

fn default_floating_count() -> usize {
    3
}

fn default_particle_count() -> usize {
    20
}

fn default_header_hide_after_px() -> f64 {
    100.0
}

fn default_header_opacity_range_px() -> f64 {
    100.0
}

fn default_header_max_alpha() -> f64 {
    0.95
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            bottom_inset_px: default_reveal_bottom_inset(),
            unobserve_after_reveal: false,
            counter_duration_ms: default_counter_duration_ms(),
            counter_frame_ms: default_counter_frame_ms(),
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_typewriter_tick_ms(),
            caret_linger_ms: default_caret_linger_ms(),
        }
    }
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            step_secs: default_stagger_step_secs(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            default_speed: default_parallax_speed(),
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            max_elements: default_max_magnetic(),
            strength: default_magnetic_strength(),
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            floating_count: default_floating_count(),
            particle_count: default_particle_count(),
            seed: None,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_hide_after_px: default_header_hide_after_px(),
            header_opacity_range_px: default_header_opacity_range_px(),
            header_max_alpha: default_header_max_alpha(),
        }
    }
}

impl EffectsConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        let threshold = self.reveal.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::OutOfRange {
                field: "reveal.threshold",
                value: threshold,
                range: "0.0 - 1.0",
            });
        }

        if !(self.reveal.counter_duration_ms > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "reveal.counter_duration_ms",
            });
        }

        if !(self.reveal.counter_frame_ms > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "reveal.counter_frame_ms",
            });
        }

        if self.typewriter.tick_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "typewriter.tick_ms",
            });
        }

        if !self.stagger.step_secs.is_finite() || self.stagger.step_secs < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "stagger.step_secs",
                value: self.stagger.step_secs,
                range: ">= 0",
            });
        }

        if !self.parallax.default_speed.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "parallax.default_speed",
                value: self.parallax.default_speed,
                range: "有限值",
            });
        }

        if !self.pointer.strength.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "pointer.strength",
                value: self.pointer.strength,
                range: "有限值",
            });
        }

        if !(self.scroll.header_opacity_range_px > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "scroll.header_opacity_range_px",
            });
        }

        let alpha = self.scroll.header_max_alpha;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::OutOfRange {
                field: "scroll.header_max_alpha",
                value: alpha,
                range: "0.0 - 1.0",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EffectsConfig::default();
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.reveal.bottom_inset_px, 50.0);
        assert!(!config.reveal.unobserve_after_reveal);
        assert_eq!(config.pointer.max_elements, 8);
        assert_eq!(config.decoration.floating_count, 3);
        assert_eq!(config.decoration.particle_count, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "pointer": { "max_elements": 4 }, "decoration": { "seed": 7 } }"#;
        let config: EffectsConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.pointer.max_elements, 4);
        assert_eq!(config.pointer.strength, 0.05);
        assert_eq!(config.decoration.seed, Some(7));
        assert_eq!(config.typewriter.tick_ms, 100);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EffectsConfig::default();

        config.reveal.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "reveal.threshold",
                ..
            })
        ));

        config.reveal.threshold = 0.1;
        config.typewriter.tick_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "typewriter.tick_ms"
            })
        );

        config.typewriter.tick_ms = 100;
        config.reveal.counter_frame_ms = f64::NAN;
        assert!(config.validate().is_err());
    }
}
