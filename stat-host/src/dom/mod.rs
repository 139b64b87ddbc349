//! # DOM 模块
//!
//! 文档访问抽象。`Dashboard` 只通过 [`DomBackend`] 操作元素，
//! 浏览器实现（`web` feature）与内存实现共享同一套执行逻辑。
//!
//! ## 模块结构
//!
//! - `memory`: 内存文档，用于测试与 headless 模式
//! - `web`: 基于 `web-sys` 的浏览器文档（需要 `web` feature）

mod memory;
#[cfg(feature = "web")]
mod web;

pub use memory::{MemoryDom, Mutation, NodeId};
#[cfg(feature = "web")]
pub use web::WebDom;

use thiserror::Error;

/// DOM 操作错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    /// 元素不存在（已移除或句柄无效）
    #[error("元素不存在: {0}")]
    Detached(String),

    /// 浏览器环境不可用
    #[error("浏览器环境不可用: {0}")]
    Unavailable(String),

    /// DOM 操作失败
    #[error("DOM 操作 {operation} 失败: {message}")]
    OperationFailed { operation: String, message: String },
}

/// 文档访问接口
///
/// 只包含统计项动画需要的最小操作集。
pub trait DomBackend {
    /// 元素句柄
    type Element: Clone + PartialEq + std::fmt::Debug;

    /// 按文档顺序查找带有指定类名的元素
    fn query_by_class(&self, class: &str) -> Vec<Self::Element>;

    /// 读取属性
    fn get_attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// 写入属性
    fn set_attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
        value: &str,
    ) -> Result<(), DomError>;

    /// 设置文本内容
    fn set_text(&mut self, element: &Self::Element, text: &str) -> Result<(), DomError>;

    /// 添加类名（已存在时无变化）
    fn add_class(&mut self, element: &Self::Element, class: &str) -> Result<(), DomError>;

    /// 移除类名（不存在时无变化）
    fn remove_class(&mut self, element: &Self::Element, class: &str) -> Result<(), DomError>;

    /// 强制重排，使之前的样式变化生效
    fn force_reflow(&mut self, element: &Self::Element) -> Result<(), DomError>;

    /// 查找自身或最近的带有指定类名的祖先
    fn closest_with_class(&self, element: &Self::Element, class: &str) -> Option<Self::Element>;

    /// 元素是否仍在文档中
    fn is_attached(&self, element: &Self::Element) -> bool;
}
