//! # Command 模块
//!
//! 定义动画器向 Host 发出的显示指令。
//! DisplayCommand 是动画器与 Host 之间的**唯一输出方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：只描述"显示成什么样"，不关心 DOM 如何实现
//! - **按统计项寻址**：Host 负责把 `StatId` 映射到具体元素和所在卡片
//! - **类名无关**：高亮用 [`Highlight`] 表达，具体 CSS 类名由 Host 配置决定

use serde::{Deserialize, Serialize};

use crate::animator::StatId;
use crate::highlight::Highlight;

/// 动画器向 Host 发出的显示指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisplayCommand {
    /// 设置统计项的显示文本
    SetText { stat: StatId, text: String },

    /// 把存储值同步到元素的数值属性
    StoreValue { stat: StatId, value: f64 },

    /// 重新触发脉冲效果（移除标记 → 强制重排 → 重新添加）
    RestartPulse { stat: StatId },

    /// 设置卡片高亮
    ///
    /// 先清除卡片上所有高亮标记，`Some` 时再添加对应标记。
    SetHighlight {
        stat: StatId,
        highlight: Option<Highlight>,
    },
}

impl DisplayCommand {
    /// 指令作用的统计项
    pub fn stat(&self) -> StatId {
        match self {
            Self::SetText { stat, .. }
            | Self::StoreValue { stat, .. }
            | Self::RestartPulse { stat }
            | Self::SetHighlight { stat, .. } => *stat,
        }
    }
}

impl std::fmt::Display for DisplayCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetText { stat, text } => write!(f, "{stat} text {text}"),
            Self::StoreValue { stat, value } => write!(f, "{stat} store {value}"),
            Self::RestartPulse { stat } => write!(f, "{stat} pulse"),
            Self::SetHighlight {
                stat,
                highlight: Some(highlight),
            } => write!(f, "{stat} highlight {highlight}"),
            Self::SetHighlight {
                stat,
                highlight: None,
            } => write!(f, "{stat} highlight -"),
        }
    }
}
