//! # Command Executor 模块
//!
//! DisplayCommand 执行器，负责把动画器发出的指令落到文档上。
//!
//! ## 设计说明
//!
//! - 执行器不持有文档，也不持有统计项映射，只按传入的 [`StatBinding`] 执行
//! - 具体 CSS 类名与属性名来自配置，动画器只知道 [`Highlight`]

use stat_runtime::{DisplayCommand, Highlight};
use tracing::debug;

use crate::config::ClassConfig;
use crate::dom::{DomBackend, DomError};

/// 统计项与文档元素的绑定
#[derive(Debug, Clone, PartialEq)]
pub struct StatBinding<E> {
    /// 统计数值元素
    pub element: E,
    /// 所在卡片（可能不存在）
    pub card: Option<E>,
}

/// Command 执行结果
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExecuteResult {
    /// 执行成功
    #[default]
    Ok,
    /// 无需执行（例如统计项没有卡片）
    Skipped(String),
    /// 执行失败
    Error(String),
}

/// 属性中存储的数值文本（与 JS 的 `String(number)` 一致）
fn attribute_text(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}

/// Command 执行器
#[derive(Debug)]
pub struct CommandExecutor {
    classes: ClassConfig,
    value_attribute: String,
}

impl CommandExecutor {
    /// 创建新的执行器
    pub fn new(classes: ClassConfig, value_attribute: impl Into<String>) -> Self {
        Self {
            classes,
            value_attribute: value_attribute.into(),
        }
    }

    /// 执行单个 Command
    pub fn execute<D: DomBackend>(
        &self,
        command: &DisplayCommand,
        binding: Option<&StatBinding<D::Element>>,
        dom: &mut D,
    ) -> ExecuteResult {
        let Some(binding) = binding else {
            return ExecuteResult::Error(format!("{} 没有绑定元素", command.stat()));
        };

        debug!(command = %command, "执行显示指令");

        let result = match command {
            DisplayCommand::SetText { text, .. } => dom.set_text(&binding.element, text),
            DisplayCommand::StoreValue { value, .. } => {
                dom.set_attribute(&binding.element, &self.value_attribute, &attribute_text(*value))
            }
            DisplayCommand::RestartPulse { .. } => self.restart_pulse(&binding.element, dom),
            DisplayCommand::SetHighlight { highlight, .. } => {
                let Some(card) = binding.card.as_ref() else {
                    return ExecuteResult::Skipped(format!("{} 不在卡片内", command.stat()));
                };
                self.apply_highlight(card, *highlight, dom)
            }
        };

        match result {
            Ok(()) => ExecuteResult::Ok,
            Err(e) => ExecuteResult::Error(e.to_string()),
        }
    }

    /// 移除脉冲类 → 强制重排 → 重新添加，保证 CSS 动画从头播放
    fn restart_pulse<D: DomBackend>(&self, element: &D::Element, dom: &mut D) -> Result<(), DomError> {
        dom.remove_class(element, &self.classes.pulse)?;
        dom.force_reflow(element)?;
        dom.add_class(element, &self.classes.pulse)
    }

    /// 清除所有高亮类，再添加指定高亮
    fn apply_highlight<D: DomBackend>(
        &self,
        card: &D::Element,
        highlight: Option<Highlight>,
        dom: &mut D,
    ) -> Result<(), DomError> {
        for class in self.classes.highlight_classes() {
            dom.remove_class(card, class)?;
        }
        if let Some(highlight) = highlight {
            dom.add_class(card, self.classes.highlight_class(highlight))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, Mutation};
    use stat_runtime::{ManualClock, StatAnimator};
    use std::rc::Rc;

    fn fixture() -> (CommandExecutor, MemoryDom, StatBinding<crate::dom::NodeId>, stat_runtime::StatId) {
        let mut dom = MemoryDom::new();
        let (card, element) = dom.create_stat_card("stat-card", "stat-value", "data-value", None);
        let mut animator = StatAnimator::new(Default::default(), Rc::new(ManualClock::new(0.0)));
        let stat = animator.register(0.0);
        (
            CommandExecutor::new(ClassConfig::default(), "data-value"),
            dom,
            StatBinding {
                element,
                card: Some(card),
            },
            stat,
        )
    }

    #[test]
    fn test_set_text_and_store_value() {
        let (executor, mut dom, binding, stat) = fixture();

        let cmd = DisplayCommand::SetText {
            stat,
            text: "1,250".to_string(),
        };
        assert_eq!(executor.execute(&cmd, Some(&binding), &mut dom), ExecuteResult::Ok);
        assert_eq!(dom.text(binding.element), "1,250");

        let cmd = DisplayCommand::StoreValue { stat, value: 15.5 };
        assert_eq!(executor.execute(&cmd, Some(&binding), &mut dom), ExecuteResult::Ok);
        assert_eq!(dom.attribute(binding.element, "data-value"), Some("15.5"));
    }

    #[test]
    fn test_attribute_text() {
        assert_eq!(attribute_text(10.0), "10");
        assert_eq!(attribute_text(-2.5), "-2.5");
        assert_eq!(attribute_text(f64::NAN), "NaN");
        assert_eq!(attribute_text(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_restart_pulse_order() {
        let (executor, mut dom, binding, stat) = fixture();
        let node = binding.element;

        let cmd = DisplayCommand::RestartPulse { stat };
        executor.execute(&cmd, Some(&binding), &mut dom);
        executor.execute(&cmd, Some(&binding), &mut dom);

        assert!(dom.has_class(node, "pulse"));
        assert_eq!(dom.reflow_count(node), 2);
        assert_eq!(
            dom.mutations()[..3],
            [
                Mutation::RemoveClass {
                    node,
                    class: "pulse".to_string()
                },
                Mutation::Reflow { node },
                Mutation::AddClass {
                    node,
                    class: "pulse".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_highlight_replaces_previous() {
        let (executor, mut dom, binding, stat) = fixture();
        let card = binding.card.unwrap();

        let up = DisplayCommand::SetHighlight {
            stat,
            highlight: Some(Highlight::Increase),
        };
        executor.execute(&up, Some(&binding), &mut dom);
        assert!(dom.has_class(card, "glow-green"));

        let down = DisplayCommand::SetHighlight {
            stat,
            highlight: Some(Highlight::Decrease),
        };
        executor.execute(&down, Some(&binding), &mut dom);
        assert!(dom.has_class(card, "glow-red"));
        assert!(!dom.has_class(card, "glow-green"));

        let clear = DisplayCommand::SetHighlight {
            stat,
            highlight: None,
        };
        executor.execute(&clear, Some(&binding), &mut dom);
        assert_eq!(dom.classes(card), ["stat-card".to_string()]);
    }

    #[test]
    fn test_highlight_without_card_is_skipped() {
        let (executor, mut dom, mut binding, stat) = fixture();
        binding.card = None;

        let cmd = DisplayCommand::SetHighlight {
            stat,
            highlight: Some(Highlight::Neutral),
        };
        assert!(matches!(
            executor.execute(&cmd, Some(&binding), &mut dom),
            ExecuteResult::Skipped(_)
        ));
    }

    #[test]
    fn test_unbound_stat_is_error() {
        let (executor, mut dom, _binding, stat) = fixture();
        let cmd = DisplayCommand::RestartPulse { stat };
        assert!(matches!(
            executor.execute::<MemoryDom>(&cmd, None, &mut dom),
            ExecuteResult::Error(_)
        ));
    }
}
