//! # Config 模块
//!
//! 动画器参数。所有字段都有默认值，可以直接嵌入 Host 的配置文件。

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::format::NumberFormat;
use crate::parse::MalformedValuePolicy;

/// 动画器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// 页面初始化时计数动画时长（毫秒）
    #[serde(default = "default_init_duration_ms")]
    pub init_duration_ms: f64,

    /// 数值更新时计数动画时长（毫秒）
    #[serde(default = "default_update_duration_ms")]
    pub update_duration_ms: f64,

    /// 高亮保持时长（毫秒），到期后清除
    #[serde(default = "default_highlight_hold_ms")]
    pub highlight_hold_ms: f64,

    /// 缓动函数
    #[serde(default)]
    pub easing: EasingFunction,

    /// 格式错误数值的处理策略
    #[serde(default)]
    pub malformed_value: MalformedValuePolicy,

    /// 数值显示格式
    #[serde(default)]
    pub number_format: NumberFormat,
}

fn default_init_duration_ms() -> f64 {
    1500.0
}

fn default_update_duration_ms() -> f64 {
    800.0
}

fn default_highlight_hold_ms() -> f64 {
    1200.0
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            init_duration_ms: default_init_duration_ms(),
            update_duration_ms: default_update_duration_ms(),
            highlight_hold_ms: default_highlight_hold_ms(),
            easing: EasingFunction::default(),
            malformed_value: MalformedValuePolicy::default(),
            number_format: NumberFormat::default(),
        }
    }
}

impl AnimatorConfig {
    /// 从 JSON 字符串解析
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnimatorConfig::default();
        assert_eq!(config.init_duration_ms, 1500.0);
        assert_eq!(config.update_duration_ms, 800.0);
        assert_eq!(config.highlight_hold_ms, 1200.0);
        assert_eq!(config.easing, EasingFunction::Linear);
        assert_eq!(config.malformed_value, MalformedValuePolicy::Propagate);
    }

    #[test]
    fn test_partial_json() {
        let config = AnimatorConfig::from_json_str(
            r#"{ "update_duration_ms": 400, "malformed_value": "zero" }"#,
        )
        .unwrap();
        assert_eq!(config.update_duration_ms, 400.0);
        assert_eq!(config.malformed_value, MalformedValuePolicy::Zero);
        assert_eq!(config.init_duration_ms, 1500.0);
        assert_eq!(config.number_format, NumberFormat::default());
    }
}
