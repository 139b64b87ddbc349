//! # Stat Runtime
//!
//! 仪表盘统计数值动画的核心运行时库。
//!
//! ## 架构概述
//!
//! `stat-runtime` 是纯逻辑核心，不依赖任何 DOM、IO 或渲染引擎。
//! 它通过 **指令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                              Runtime
//!   │                                  │
//!   │── register / update_stat ──────►│
//!   │                                  │ tick()（读取注入的 Clock）
//!   │◄── Vec<DisplayCommand> ──────────│
//!   │                                  │
//! ```
//!
//! ## 核心类型
//!
//! - [`StatAnimator`]：统计项动画器，管理状态记录、计数动画与高亮定时器
//! - [`DisplayCommand`]：Runtime 向 Host 发出的显示指令
//! - [`CountAnimation`]：单个计数动画的时间轴
//! - [`Clock`]：时间源抽象
//!
//! ## 模块结构
//!
//! - [`animation`]：计数插值（纯函数）
//! - [`animator`]：动画器与统计项状态
//! - [`command`]：DisplayCommand 定义
//! - [`format`]：千分位格式化
//! - [`parse`]：数值属性解析
//! - [`highlight`]：变化方向高亮
//! - [`timer`]：可取消的定时器队列

pub mod animation;
pub mod animator;
pub mod clock;
pub mod command;
pub mod config;
pub mod easing;
pub mod error;
pub mod format;
pub mod highlight;
pub mod parse;
pub mod timer;

// 重导出核心类型
pub use animation::{AnimationId, AnimationState, CountAnimation, Frame, interpolate, progress};
pub use animator::{AnimatorEvent, StatAnimator, StatId, StatPhase, StatSnapshot};
pub use clock::{Clock, ManualClock};
pub use command::DisplayCommand;
pub use config::AnimatorConfig;
pub use easing::EasingFunction;
pub use error::{AnimatorError, StatError, StatResult, ValueParseError};
pub use format::{NumberFormat, format_grouped};
pub use highlight::Highlight;
pub use parse::{MalformedValuePolicy, ParsedAttribute, parse_stat_value, read_stat_attribute};
pub use timer::{TimerId, TimerQueue};
