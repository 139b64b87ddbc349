//! # Dashboard 模块
//!
//! 仪表盘组件封装：持有动画器、执行器与文档，并维护统计项与元素的绑定。
//!
//! 对外只暴露按元素操作的接口（`animate_count` / `update_stat`），
//! 统计项的状态全部保存在动画器的状态记录中，而不是散落在元素属性上。

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use stat_runtime::{
    AnimationId, Clock, DisplayCommand, StatAnimator, StatId, StatResult, StatSnapshot,
};
use tracing::{debug, info, warn};

use crate::command_executor::{CommandExecutor, ExecuteResult, StatBinding};
use crate::config::AppConfig;
use crate::dom::DomBackend;

/// 仪表盘组件
pub struct Dashboard<D: DomBackend> {
    config: AppConfig,
    dom: D,
    animator: StatAnimator,
    executor: CommandExecutor,
    bindings: BTreeMap<StatId, StatBinding<D::Element>>,
    /// 由扫描绑定的统计项；失去统计类名后会被释放
    scanned: BTreeSet<StatId>,
}

impl<D: DomBackend> std::fmt::Debug for Dashboard<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("bindings", &self.bindings.len())
            .field("animator", &self.animator)
            .finish()
    }
}

impl<D: DomBackend> Dashboard<D> {
    /// 创建仪表盘组件
    pub fn new(config: AppConfig, dom: D, clock: Rc<dyn Clock>) -> Self {
        let animator = StatAnimator::new(config.animation.clone(), clock);
        let executor = CommandExecutor::new(
            config.classes.clone(),
            config.selectors.value_attribute.clone(),
        );
        Self {
            config,
            dom,
            animator,
            executor,
            bindings: BTreeMap::new(),
            scanned: BTreeSet::new(),
        }
    }

    /// 页面就绪：扫描所有统计元素，从 0 计数到各自的数值属性
    ///
    /// 已绑定的元素会被跳过，可以重复调用以接入新插入的元素；
    /// 已移出文档或不再带有统计类名的元素会先被释放。
    /// 返回本次新初始化的统计项数量。
    pub fn on_ready(&mut self) -> usize {
        let elements = self.dom.query_by_class(&self.config.selectors.stat_class);
        self.prune(&elements);
        let mut initialized = 0;

        for element in elements {
            if self.stat_for(&element).is_some() {
                continue;
            }
            let stat = self.bind(element);
            self.scanned.insert(stat);
            match self.animator.initialize(stat) {
                Ok(_) => initialized += 1,
                Err(e) => warn!(error = %e, "统计项初始化失败"),
            }
        }

        info!(count = initialized, "统计项初始化完成");
        initialized
    }

    /// 查找元素对应的统计项
    pub fn stat_for(&self, element: &D::Element) -> Option<StatId> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.element == *element)
            .map(|(&stat, _)| stat)
    }

    /// 绑定元素：读取数值属性并注册统计项
    fn bind(&mut self, element: D::Element) -> StatId {
        let raw = self
            .dom
            .get_attribute(&element, &self.config.selectors.value_attribute);
        let (stat, parsed) = self.animator.register_from_attribute(raw.as_deref());
        if let Some(e) = parsed.error {
            warn!(
                %stat,
                error = %e,
                policy = ?self.config.animation.malformed_value,
                "数值属性格式错误"
            );
        }

        let card = self
            .dom
            .closest_with_class(&element, &self.config.selectors.card_class);
        if card.is_none() {
            warn!(%stat, card_class = %self.config.selectors.card_class, "统计元素不在卡片内，将不显示高亮");
        }

        debug!(%stat, value = parsed.value, "绑定统计元素");
        self.bindings.insert(stat, StatBinding { element, card });
        stat
    }

    /// 解除元素绑定并注销其统计项
    ///
    /// 动画与等待中的高亮清除一并丢弃，已写入文档的内容保持不变。
    /// 元素未绑定时返回 `false`。
    pub fn unbind(&mut self, element: &D::Element) -> bool {
        let Some(stat) = self.stat_for(element) else {
            return false;
        };
        self.bindings.remove(&stat);
        self.scanned.remove(&stat);
        debug!(%stat, "解除统计元素绑定");
        self.animator.unregister(stat)
    }

    /// 释放失效的绑定，`present` 为本次扫描到的统计元素
    fn prune(&mut self, present: &[D::Element]) -> usize {
        let stale: Vec<D::Element> = self
            .bindings
            .iter()
            .filter(|(stat, binding)| {
                !self.dom.is_attached(&binding.element)
                    || (self.scanned.contains(stat) && !present.contains(&binding.element))
            })
            .map(|(_, binding)| binding.element.clone())
            .collect();

        for element in &stale {
            self.unbind(element);
        }
        if !stale.is_empty() {
            info!(count = stale.len(), "释放失效的统计元素");
        }
        stale.len()
    }

    /// 已绑定的元素数量
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    fn stat_or_bind(&mut self, element: &D::Element) -> StatId {
        match self.stat_for(element) {
            Some(stat) => stat,
            None => self.bind(element.clone()),
        }
    }

    /// 在元素上启动计数动画
    ///
    /// `duration_ms` 为 `None` 时使用初始化时长。未绑定的元素会先被绑定。
    pub fn animate_count(
        &mut self,
        element: &D::Element,
        start: f64,
        end: f64,
        duration_ms: Option<f64>,
    ) -> StatResult<AnimationId> {
        let stat = self.stat_or_bind(element);
        Ok(self.animator.animate_count(stat, start, end, duration_ms)?)
    }

    /// 更新元素的数值：计数动画 + 脉冲 + 卡片高亮
    pub fn update_stat(&mut self, element: &D::Element, new_value: f64) -> StatResult<()> {
        let stat = self.stat_or_bind(element);
        let commands = self.animator.update_stat(stat, new_value)?;
        self.apply(commands);
        Ok(())
    }

    /// 推进一帧
    ///
    /// 返回是否还需要下一帧。
    pub fn frame(&mut self) -> bool {
        let commands = self.animator.tick();
        self.apply(commands);
        for event in self.animator.take_events() {
            debug!(?event, "动画事件");
        }
        self.animator.has_pending_work()
    }

    /// 跳过所有计数动画，立即显示终值
    pub fn skip_all(&mut self) {
        let commands = self.animator.skip_all();
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<DisplayCommand>) {
        for command in commands {
            let binding = self.bindings.get(&command.stat());
            match self.executor.execute(&command, binding, &mut self.dom) {
                ExecuteResult::Ok => {}
                ExecuteResult::Skipped(reason) => debug!(%reason, "指令已跳过"),
                ExecuteResult::Error(e) => warn!(error = %e, "指令执行失败"),
            }
        }
    }

    /// 是否还有活跃动画或等待中的高亮清除
    pub fn has_pending_work(&self) -> bool {
        self.animator.has_pending_work()
    }

    /// 元素对应统计项的快照
    pub fn snapshot(&self, element: &D::Element) -> Option<StatSnapshot> {
        self.stat_for(element)
            .and_then(|stat| self.animator.snapshot(stat))
    }

    /// 动画器
    pub fn animator(&self) -> &StatAnimator {
        &self.animator
    }

    /// 文档
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// 文档（可变）
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// 当前配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, NodeId};
    use stat_runtime::ManualClock;

    fn dashboard(values: &[Option<&str>]) -> (Dashboard<MemoryDom>, ManualClock, Vec<NodeId>) {
        let mut dom = MemoryDom::new();
        let nodes = values
            .iter()
            .map(|v| dom.create_stat_card("stat-card", "stat-value", "data-value", *v).1)
            .collect();
        let clock = ManualClock::new(0.0);
        let dashboard = Dashboard::new(AppConfig::default(), dom, Rc::new(clock.clone()));
        (dashboard, clock, nodes)
    }

    fn run_until_idle(dashboard: &mut Dashboard<MemoryDom>, clock: &ManualClock) {
        while dashboard.frame() {
            clock.advance(16.0);
        }
    }

    #[test]
    fn test_on_ready_is_idempotent() {
        let (mut dashboard, _clock, nodes) = dashboard(&[Some("10"), Some("20")]);

        assert_eq!(dashboard.on_ready(), 2);
        assert_eq!(dashboard.on_ready(), 0);
        assert_eq!(dashboard.animator().registered_count(), 2);
        assert!(dashboard.stat_for(&nodes[0]).is_some());
    }

    #[test]
    fn test_on_ready_counts_up_to_attribute() {
        let (mut dashboard, clock, nodes) = dashboard(&[Some("1,250"), None]);
        dashboard.on_ready();
        run_until_idle(&mut dashboard, &clock);

        assert_eq!(dashboard.dom().text(nodes[0]), "1,250");
        assert_eq!(dashboard.dom().text(nodes[1]), "0");
    }

    #[test]
    fn test_update_unbound_element_reads_attribute() {
        let (mut dashboard, clock, nodes) = dashboard(&[Some("40")]);

        dashboard.update_stat(&nodes[0], 30.0).unwrap();
        let card = dashboard
            .dom()
            .closest_with_class(&nodes[0], "stat-card")
            .unwrap();
        assert!(dashboard.dom().has_class(card, "glow-red"));
        assert_eq!(dashboard.dom().attribute(nodes[0], "data-value"), Some("30"));

        run_until_idle(&mut dashboard, &clock);
        assert_eq!(dashboard.dom().text(nodes[0]), "30");
        assert!(!dashboard.dom().has_class(card, "glow-red"));
    }

    #[test]
    fn test_skip_all_shows_final_values() {
        let (mut dashboard, _clock, nodes) = dashboard(&[Some("500"), Some("7")]);
        dashboard.on_ready();
        dashboard.frame();

        dashboard.skip_all();
        assert_eq!(dashboard.dom().text(nodes[0]), "500");
        assert_eq!(dashboard.dom().text(nodes[1]), "7");
        assert!(!dashboard.frame());
    }

    #[test]
    fn test_unbind_discards_pending_work() {
        let (mut dashboard, _clock, nodes) = dashboard(&[Some("40")]);
        dashboard.update_stat(&nodes[0], 50.0).unwrap();
        assert!(dashboard.has_pending_work());

        assert!(dashboard.unbind(&nodes[0]));
        assert!(!dashboard.has_pending_work());
        assert_eq!(dashboard.bound_count(), 0);
        assert_eq!(dashboard.animator().registered_count(), 0);
        assert!(!dashboard.unbind(&nodes[0]));
    }

    #[test]
    fn test_on_ready_releases_stale_elements() {
        let (mut dashboard, _clock, nodes) = dashboard(&[Some("1"), Some("2"), Some("3")]);
        assert_eq!(dashboard.on_ready(), 3);

        // 失去类名、整张卡片被移出文档
        dashboard.dom_mut().remove_class(&nodes[0], "stat-value").unwrap();
        let card = dashboard.dom().closest_with_class(&nodes[1], "stat-card").unwrap();
        dashboard.dom_mut().detach(card);

        assert_eq!(dashboard.on_ready(), 0);
        assert_eq!(dashboard.bound_count(), 1);
        assert_eq!(dashboard.animator().registered_count(), 1);
        assert!(dashboard.stat_for(&nodes[0]).is_none());
        assert!(dashboard.stat_for(&nodes[1]).is_none());
        assert!(dashboard.stat_for(&nodes[2]).is_some());
    }

    #[test]
    fn test_on_ready_keeps_directly_bound_elements() {
        let (mut dashboard, _clock, _nodes) = dashboard(&[]);
        let plain = dashboard.dom_mut().create_element(None, &["kpi"]);
        dashboard.update_stat(&plain, 3.0).unwrap();

        dashboard.on_ready();
        assert!(dashboard.stat_for(&plain).is_some());

        dashboard.dom_mut().detach(plain);
        dashboard.on_ready();
        assert!(dashboard.stat_for(&plain).is_none());
    }

    #[test]
    fn test_snapshot_by_element() {
        let (mut dashboard, _clock, nodes) = dashboard(&[Some("5")]);
        assert!(dashboard.snapshot(&nodes[0]).is_none());

        dashboard.on_ready();
        let snapshot = dashboard.snapshot(&nodes[0]).unwrap();
        assert_eq!(snapshot.value, 5.0);
        assert!(snapshot.animating);
    }
}
