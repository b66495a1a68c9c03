//! # Host 模块
//!
//! 无界面宿主：在内存中实现效果层需要的全部宿主能力。

pub mod dom;
pub mod events;
pub mod observer;
pub mod scheduler;

pub use dom::{Element, MemorySurface, NodeSnapshot};
pub use events::EventBus;
pub use observer::SimulatedObservers;
pub use scheduler::VirtualScheduler;
