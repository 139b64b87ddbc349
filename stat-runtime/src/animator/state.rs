//! # State 模块
//!
//! 每个统计项的显式状态记录。

use serde::{Deserialize, Serialize};

use crate::animation::CountAnimation;
use crate::highlight::Highlight;
use crate::timer::TimerId;

/// 统计项唯一标识符
///
/// 由 `StatAnimator` 在注册时分配，注销后不会复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatId(pub(crate) u64);

impl StatId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for StatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stat#{}", self.0)
    }
}

/// 统计项生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatPhase {
    /// 已注册，尚未开始动画
    #[default]
    Initial,
    /// 计数动画进行中
    Animating,
    /// 动画已结束，显示终值
    Settled,
}

/// 统计项状态记录
#[derive(Debug, Clone)]
pub(crate) struct StatRecord {
    /// 存储值（最近一次更新传入的值）
    pub value: f64,
    /// 最近一次输出的显示文本
    pub text: Option<String>,
    pub phase: StatPhase,
    pub animation: Option<CountAnimation>,
    pub highlight: Option<Highlight>,
    /// 等待中的高亮清除定时器
    pub highlight_timer: Option<TimerId>,
    /// 累计触发的脉冲次数
    pub pulses: u32,
}

impl StatRecord {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            text: None,
            phase: StatPhase::Initial,
            animation: None,
            highlight: None,
            highlight_timer: None,
            pulses: 0,
        }
    }

    pub fn snapshot(&self, id: StatId) -> StatSnapshot {
        StatSnapshot {
            id,
            value: self.value,
            text: self.text.clone(),
            phase: self.phase,
            animating: self.animation.as_ref().is_some_and(|a| a.is_active()),
            highlight: self.highlight,
            highlight_pending: self.highlight_timer.is_some(),
            pulses: self.pulses,
        }
    }
}

/// 统计项状态快照（只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub id: StatId,
    /// 存储值
    pub value: f64,
    /// 当前显示文本（尚未渲染过时为 `None`）
    pub text: Option<String>,
    pub phase: StatPhase,
    /// 是否有进行中的计数动画
    pub animating: bool,
    /// 当前高亮
    pub highlight: Option<Highlight>,
    /// 是否有等待中的高亮清除
    pub highlight_pending: bool,
    /// 累计脉冲次数
    pub pulses: u32,
}
