//! # Error 模块
//!
//! 定义 stat-runtime 中使用的错误类型。

use thiserror::Error;

use crate::animator::StatId;

/// 数值属性解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueParseError {
    /// 去掉千分位逗号后没有任何可解析的数字前缀
    #[error("无法解析数值 '{raw}'")]
    Malformed { raw: String },
}

/// 动画器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimatorError {
    /// 统计项未注册（或已注销）
    #[error("统计项 {0} 未注册")]
    UnknownStat(StatId),
}

/// stat-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatError {
    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ValueParseError),

    /// 动画器错误
    #[error("动画器错误: {0}")]
    Animator(#[from] AnimatorError),
}

/// Result 类型别名
pub type StatResult<T> = Result<T, StatError>;
