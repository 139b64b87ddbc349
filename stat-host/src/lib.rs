//! # Stat Host
//!
//! 仪表盘统计卡片动画的宿主层。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 扫描文档中的统计元素并绑定到动画器
//! - 驱动帧循环（浏览器中为 `requestAnimationFrame`，headless 模式为手动步进）
//! - 将 Runtime 的 [`DisplayCommand`](stat_runtime::DisplayCommand) 落到文档上
//!
//! Host 层不包含动画逻辑，只负责执行 Runtime 发出的指令。

#[cfg(feature = "web")]
pub mod clock;
pub mod command_executor;
pub mod config;
pub mod dashboard;
pub mod dom;
#[cfg(feature = "cli")]
pub mod logging;
#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "web")]
pub use clock::PerformanceClock;
pub use command_executor::{CommandExecutor, ExecuteResult, StatBinding};
pub use config::{AppConfig, ClassConfig, ConfigError, DebugConfig, SelectorConfig};
pub use dashboard::Dashboard;
pub use dom::{DomBackend, DomError, MemoryDom, Mutation, NodeId};
#[cfg(feature = "web")]
pub use dom::WebDom;
