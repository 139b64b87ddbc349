//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use stat_runtime::AnimatorConfig;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 元素选择配置
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// 效果类名配置
    #[serde(default)]
    pub classes: ClassConfig,

    /// 动画参数
    #[serde(default)]
    pub animation: AnimatorConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 元素选择配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// 统计数值元素的标记类名
    #[serde(default = "default_stat_class")]
    pub stat_class: String,

    /// 卡片容器的类名
    #[serde(default = "default_card_class")]
    pub card_class: String,

    /// 存放数值的属性名
    #[serde(default = "default_value_attribute")]
    pub value_attribute: String,
}

/// 效果类名配置
///
/// 这些类名对应的样式/动画由外部 CSS 定义，这里只负责切换。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassConfig {
    /// 脉冲效果
    #[serde(default = "default_pulse_class")]
    pub pulse: String,

    /// 数值上升高亮
    #[serde(default = "default_increase_class")]
    pub increase: String,

    /// 数值下降高亮
    #[serde(default = "default_decrease_class")]
    pub decrease: String,

    /// 数值不变高亮
    #[serde(default = "default_neutral_class")]
    pub neutral: String,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// 默认值函数
fn default_stat_class() -> String {
    "stat-value".to_string()
}

fn default_card_class() -> String {
    "stat-card".to_string()
}

fn default_value_attribute() -> String {
    "data-value".to_string()
}

fn default_pulse_class() -> String {
    "pulse".to_string()
}

fn default_increase_class() -> String {
    "glow-green".to_string()
}

fn default_decrease_class() -> String {
    "glow-red".to_string()
}

fn default_neutral_class() -> String {
    "glow-neutral".to_string()
}

/// 调试构建默认输出 debug 日志，发布构建为 info
fn default_log_level() -> String {
    if cfg!(debug_assertions) {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            stat_class: default_stat_class(),
            card_class: default_card_class(),
            value_attribute: default_value_attribute(),
        }
    }
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            pulse: default_pulse_class(),
            increase: default_increase_class(),
            decrease: default_decrease_class(),
            neutral: default_neutral_class(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ClassConfig {
    /// 高亮对应的类名
    pub fn highlight_class(&self, highlight: stat_runtime::Highlight) -> &str {
        match highlight {
            stat_runtime::Highlight::Increase => &self.increase,
            stat_runtime::Highlight::Decrease => &self.decrease,
            stat_runtime::Highlight::Neutral => &self.neutral,
        }
    }

    /// 所有高亮类名
    pub fn highlight_classes(&self) -> [&str; 3] {
        [
            self.increase.as_str(),
            self.decrease.as_str(),
            self.neutral.as_str(),
        ]
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 从 JSON 字符串解析
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::SerializationFailed(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("init_duration_ms", self.animation.init_duration_ms),
            ("update_duration_ms", self.animation.update_duration_ms),
            ("highlight_hold_ms", self.animation.highlight_hold_ms),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name} 必须是非负有限数，当前为 {value}"
                )));
            }
        }

        let names = [
            ("selectors.stat_class", &self.selectors.stat_class),
            ("selectors.card_class", &self.selectors.card_class),
            ("selectors.value_attribute", &self.selectors.value_attribute),
            ("classes.pulse", &self.classes.pulse),
            ("classes.increase", &self.classes.increase),
            ("classes.decrease", &self.classes.decrease),
            ("classes.neutral", &self.classes.neutral),
        ];
        for (name, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!("{name} 不能为空")));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationFailed(format!(
                    "{name} 不能包含空白字符: {value:?}"
                )));
            }
        }

        if self.animation.number_format.max_fraction_digits > 20 {
            return Err(ConfigError::ValidationFailed(
                "number_format.max_fraction_digits 不能超过 20".to_string(),
            ));
        }

        if self.debug.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "无效的日志级别: {}",
                self.debug.log_level
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// 序列化失败
    SerializationFailed(String),
    /// IO 错误
    IoError(String),
    /// 验证失败
    ValidationFailed(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SerializationFailed(e) => write!(f, "配置序列化失败: {}", e),
            ConfigError::IoError(e) => write!(f, "配置 IO 错误: {}", e),
            ConfigError::ValidationFailed(e) => write!(f, "配置验证失败: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.selectors.stat_class, "stat-value");
        assert_eq!(config.selectors.card_class, "stat-card");
        assert_eq!(config.selectors.value_attribute, "data-value");
        assert_eq!(config.classes.pulse, "pulse");
        assert_eq!(
            config.classes.highlight_classes(),
            ["glow-green", "glow-red", "glow-neutral"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_log_level_follows_build_profile() {
        let expected = if cfg!(debug_assertions) { "debug" } else { "info" };
        assert_eq!(DebugConfig::default().log_level, expected);
        assert_eq!(AppConfig::default().debug.log_level, expected);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let loaded = AppConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded.classes.increase, config.classes.increase);
        assert_eq!(loaded.animation, config.animation);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_json_str(
            r#"{ "classes": { "pulse": "bump" }, "animation": { "highlight_hold_ms": 500 } }"#,
        )
        .unwrap();
        assert_eq!(config.classes.pulse, "bump");
        assert_eq!(config.classes.increase, "glow-green");
        assert_eq!(config.animation.highlight_hold_ms, 500.0);
        assert_eq!(config.animation.update_duration_ms, 800.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        // 负时长
        config.animation.update_duration_ms = -1.0;
        assert!(config.validate().is_err());
        config.animation.update_duration_ms = 800.0;

        // 空类名
        config.classes.neutral = " ".to_string();
        assert!(config.validate().is_err());
        config.classes.neutral = "glow-neutral".to_string();

        // 无效日志级别
        config.debug.log_level = "loud".to_string();
        assert!(config.validate().is_err());
        config.debug.log_level = "warn".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("missing.json"));
        assert_eq!(config.selectors.stat_class, "stat-value");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.classes.increase = "up".to_string();
        config.animation.init_duration_ms = 900.0;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.classes.increase, "up");
        assert_eq!(loaded.animation.init_duration_ms, 900.0);
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.classes.pulse, "pulse");
    }
}
