//! # Memory DOM
//!
//! 基于数组的内存文档。节点按创建顺序即文档顺序。

use std::collections::BTreeMap;

use super::{DomBackend, DomError};

/// 节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// 获取内部索引
    pub fn index(&self) -> usize {
        self.0
    }
}

/// 变更记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetText { node: NodeId, text: String },
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    Reflow { node: NodeId },
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    reflows: u32,
    detached: bool,
}

/// 内存文档
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    mutations: Vec<Mutation>,
}

impl MemoryDom {
    /// 创建空文档
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建元素
    pub fn create_element(&mut self, parent: Option<NodeId>, classes: &[&str]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Node::default()
        });
        id
    }

    /// 创建一张卡片及其中的统计元素，返回 `(card, stat)`
    ///
    /// `value` 为 `None` 时不设置数值属性。
    pub fn create_stat_card(
        &mut self,
        card_class: &str,
        stat_class: &str,
        value_attribute: &str,
        value: Option<&str>,
    ) -> (NodeId, NodeId) {
        let card = self.create_element(None, &[card_class]);
        let stat = self.create_element(Some(card), &[stat_class]);
        if let Some(value) = value {
            self.nodes[stat.0]
                .attributes
                .insert(value_attribute.to_string(), value.to_string());
        }
        (card, stat)
    }

    /// 把节点（连同其子树）移出文档
    pub fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.detached = true;
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DomError::Detached(format!("{id:?}")))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DomError::Detached(format!("{id:?}")))
    }

    /// 节点文本
    pub fn text(&self, id: NodeId) -> &str {
        self.nodes.get(id.0).map(|n| n.text.as_str()).unwrap_or("")
    }

    /// 节点类名列表
    pub fn classes(&self, id: NodeId) -> &[String] {
        self.nodes
            .get(id.0)
            .map(|n| n.classes.as_slice())
            .unwrap_or(&[])
    }

    /// 节点是否带有类名
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    /// 读取属性
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(id.0)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    /// 节点被强制重排的次数
    pub fn reflow_count(&self, id: NodeId) -> u32 {
        self.nodes.get(id.0).map(|n| n.reflows).unwrap_or(0)
    }

    /// 所有变更记录
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// 取走变更记录
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }
}

impl DomBackend for MemoryDom {
    type Element = NodeId;

    fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.classes.iter().any(|c| c == class))
            .map(|(i, _)| NodeId(i))
            .filter(|id| self.is_attached(id))
            .collect()
    }

    fn get_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.attribute(*element, name).map(str::to_string)
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.node_mut(*element)?
            .attributes
            .insert(name.to_string(), value.to_string());
        self.mutations.push(Mutation::SetAttribute {
            node: *element,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn set_text(&mut self, element: &NodeId, text: &str) -> Result<(), DomError> {
        self.node_mut(*element)?.text = text.to_string();
        self.mutations.push(Mutation::SetText {
            node: *element,
            text: text.to_string(),
        });
        Ok(())
    }

    fn add_class(&mut self, element: &NodeId, class: &str) -> Result<(), DomError> {
        let node = self.node_mut(*element)?;
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
        self.mutations.push(Mutation::AddClass {
            node: *element,
            class: class.to_string(),
        });
        Ok(())
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) -> Result<(), DomError> {
        self.node_mut(*element)?.classes.retain(|c| c != class);
        self.mutations.push(Mutation::RemoveClass {
            node: *element,
            class: class.to_string(),
        });
        Ok(())
    }

    fn force_reflow(&mut self, element: &NodeId) -> Result<(), DomError> {
        self.node_mut(*element)?.reflows += 1;
        self.mutations.push(Mutation::Reflow { node: *element });
        Ok(())
    }

    fn closest_with_class(&self, element: &NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(*element);
        while let Some(id) = current {
            let node = self.node(id).ok()?;
            if node.classes.iter().any(|c| c == class) {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    fn is_attached(&self, element: &NodeId) -> bool {
        let mut current = Some(*element);
        while let Some(id) = current {
            match self.nodes.get(id.0) {
                Some(node) if !node.detached => current = node.parent,
                _ => return false,
            }
        }
        true
    }
}
