//! # Lifecycle 模块
//!
//! 所有控制器共享的生命周期纪律：
//!
//! 1. 获取的每个资源（观察器、监听器、定时器、插入节点）都登记到 [`ControllerResources`]
//! 2. 销毁后拒绝再产生任何可见效果
//! 3. 初始化前替换掉同一家族的旧实例（[`ControllerRegistry`]）
//!
//! 连续更新流通过 [`FrameGate`] 合并到每帧最多一次。

mod gate;
mod registry;
mod resources;

pub use gate::{FrameGate, GateState};
pub use registry::ControllerRegistry;
pub use resources::{ControllerResources, ResourceCounts};

use std::any::Any;
use std::rc::Rc;

/// 效果控制器
pub trait EffectController {
    /// 家族名（注册表键）
    fn family(&self) -> &'static str;

    /// 资源账本
    fn resources(&self) -> &Rc<ControllerResources>;

    /// 转为 `Any` 以便按具体类型取回
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;

    /// 销毁实例，返回释放的资源数量
    fn destroy(&self) -> ResourceCounts {
        self.resources().destroy()
    }

    fn is_destroyed(&self) -> bool {
        self.resources().is_destroyed()
    }
}
