//! # Highlight 模块
//!
//! 数值变化方向对应的卡片高亮标记。

use serde::{Deserialize, Serialize};

/// 高亮标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// 数值上升
    Increase,
    /// 数值下降
    Decrease,
    /// 数值不变（或无法比较，例如 NaN）
    Neutral,
}

impl Highlight {
    /// 全部高亮标记，清除时按此顺序移除
    pub const ALL: [Highlight; 3] = [Highlight::Increase, Highlight::Decrease, Highlight::Neutral];

    /// 根据新旧值选择高亮
    pub fn between(old_value: f64, new_value: f64) -> Self {
        if new_value > old_value {
            Self::Increase
        } else if new_value < old_value {
            Self::Decrease
        } else {
            Self::Neutral
        }
    }

    /// 名称（用于日志与调试）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Highlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
