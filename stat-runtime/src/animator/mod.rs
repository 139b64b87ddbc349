//! # Animator 模块
//!
//! 统计项动画器：管理所有统计项的状态记录、计数动画与高亮定时器。
//!
//! ## 核心设计理念
//!
//! 动画器只负责 **状态与时间轴**：
//! - 每个统计项一份显式的 [`StatRecord`]（存储值、显示文本、动画、定时器句柄）
//! - 通过注入的 [`Clock`] 读取时间，`tick()` 推进所有动画与定时器
//! - 不接触 DOM，所有显示变化以 [`DisplayCommand`] 的形式交给 Host
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let clock = ManualClock::new(0.0);
//! let mut animator = StatAnimator::new(AnimatorConfig::default(), Rc::new(clock.clone()));
//!
//! let (stat, _) = animator.register_from_attribute(Some("1,250"));
//! animator.initialize(stat)?;
//!
//! loop {
//!     for cmd in animator.tick() {
//!         host.execute(cmd);
//!     }
//!     clock.advance(16.0);
//! }
//! ```

mod state;


pub use state::{StatId, StatPhase, StatSnapshot};

use std::collections::BTreeMap;
use std::rc::Rc;

use state::StatRecord;

use crate::animation::{AnimationId, CountAnimation};
use crate::clock::Clock;
use crate::command::DisplayCommand;
use crate::config::AnimatorConfig;
use crate::error::AnimatorError;
use crate::highlight::Highlight;
use crate::parse::{ParsedAttribute, read_stat_attribute};
use crate::timer::TimerQueue;

/// 动画器事件
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorEvent {
    /// 计数动画开始
    Started(AnimationId),
    /// 计数动画完成
    Completed(AnimationId),
    /// 计数动画被同一统计项上的新动画取代
    Cancelled(AnimationId),
    /// 计数动画被跳过
    Skipped(AnimationId),
    /// 卡片高亮已清除
    HighlightCleared(StatId),
}

/// 定时器动作
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerAction {
    ClearHighlight(StatId),
}

/// 统计项动画器
pub struct StatAnimator {
    config: AnimatorConfig,
    clock: Rc<dyn Clock>,
    /// 已注册的统计项（有序，保证输出指令顺序稳定）
    stats: BTreeMap<StatId, StatRecord>,
    timers: TimerQueue<TimerAction>,
    next_stat_id: u64,
    next_anim_id: u64,
    /// 待取走的事件
    events: Vec<AnimatorEvent>,
}

impl std::fmt::Debug for StatAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatAnimator")
            .field("stats", &self.stats.len())
            .field("active_animations", &self.active_count())
            .field("pending_timers", &self.timers.pending_count())
            .finish()
    }
}

impl StatAnimator {
    /// 创建新的动画器
    pub fn new(config: AnimatorConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            stats: BTreeMap::new(),
            timers: TimerQueue::new(),
            next_stat_id: 1,
            next_anim_id: 1,
            events: Vec::new(),
        }
    }

    /// 当前配置
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    fn next_animation_id(&mut self) -> AnimationId {
        let id = AnimationId::new(self.next_anim_id);
        self.next_anim_id += 1;
        id
    }

    fn record_mut(&mut self, stat: StatId) -> Result<&mut StatRecord, AnimatorError> {
        self.stats
            .get_mut(&stat)
            .ok_or(AnimatorError::UnknownStat(stat))
    }

    // ========== 统计项管理 ==========

    /// 注册统计项，存储值为 `value`
    pub fn register(&mut self, value: f64) -> StatId {
        let id = StatId(self.next_stat_id);
        self.next_stat_id += 1;
        self.stats.insert(id, StatRecord::new(value));
        id
    }

    /// 从原始属性文本注册统计项
    ///
    /// 属性按配置的 [`MalformedValuePolicy`](crate::MalformedValuePolicy) 解析，
    /// 返回值中保留解析错误，由调用方决定是否记录。
    pub fn register_from_attribute(&mut self, raw: Option<&str>) -> (StatId, ParsedAttribute) {
        let parsed = read_stat_attribute(raw, self.config.malformed_value);
        let id = self.register(parsed.value);
        (id, parsed)
    }

    /// 注销统计项，同时丢弃其动画与等待中的定时器
    pub fn unregister(&mut self, stat: StatId) -> bool {
        match self.stats.remove(&stat) {
            Some(record) => {
                if let Some(timer) = record.highlight_timer {
                    self.timers.cancel(timer);
                }
                true
            }
            None => false,
        }
    }

    /// 检查统计项是否已注册
    pub fn is_registered(&self, stat: StatId) -> bool {
        self.stats.contains_key(&stat)
    }

    /// 已注册统计项数量
    pub fn registered_count(&self) -> usize {
        self.stats.len()
    }

    // ========== 动画控制 ==========

    /// 页面初始化：从 0 计数到存储值
    pub fn initialize(&mut self, stat: StatId) -> Result<AnimationId, AnimatorError> {
        let value = self.record_mut(stat)?.value;
        let duration = self.config.init_duration_ms;
        self.start_animation(stat, 0.0, value, duration)
    }

    /// 启动计数动画
    ///
    /// `duration_ms` 为 `None` 时使用初始化时长。
    /// 统计项上已有的动画会被取代。
    pub fn animate_count(
        &mut self,
        stat: StatId,
        start: f64,
        end: f64,
        duration_ms: Option<f64>,
    ) -> Result<AnimationId, AnimatorError> {
        let duration = duration_ms.unwrap_or(self.config.init_duration_ms);
        self.start_animation(stat, start, end, duration)
    }

    fn start_animation(
        &mut self,
        stat: StatId,
        start: f64,
        end: f64,
        duration_ms: f64,
    ) -> Result<AnimationId, AnimatorError> {
        if !self.stats.contains_key(&stat) {
            return Err(AnimatorError::UnknownStat(stat));
        }

        let anim_id = self.next_animation_id();
        let easing = self.config.easing;
        let record = self.record_mut(stat)?;

        let replaced = record
            .animation
            .take()
            .filter(|anim| anim.is_active())
            .map(|anim| anim.id);
        record.animation =
            Some(CountAnimation::new(anim_id, start, end, duration_ms).with_easing(easing));
        record.phase = StatPhase::Animating;

        if let Some(old_id) = replaced {
            self.events.push(AnimatorEvent::Cancelled(old_id));
        }
        self.events.push(AnimatorEvent::Started(anim_id));
        Ok(anim_id)
    }

    /// 更新统计项的值
    ///
    /// 1. 记录旧值并写入新值
    /// 2. 从旧值计数到新值
    /// 3. 重新触发脉冲
    /// 4. 按变化方向设置卡片高亮，并安排到期清除（取消尚未触发的旧定时器）
    ///
    /// 返回需要立即执行的指令；计数动画的帧由后续 `tick()` 输出。
    pub fn update_stat(
        &mut self,
        stat: StatId,
        new_value: f64,
    ) -> Result<Vec<DisplayCommand>, AnimatorError> {
        let old_value = {
            let record = self.record_mut(stat)?;
            std::mem::replace(&mut record.value, new_value)
        };

        let duration = self.config.update_duration_ms;
        self.start_animation(stat, old_value, new_value, duration)?;

        let highlight = Highlight::between(old_value, new_value);
        let due_at = self.clock.now_ms() + self.config.highlight_hold_ms;

        let record = self.record_mut(stat)?;
        record.pulses += 1;
        record.highlight = Some(highlight);
        let stale_timer = record.highlight_timer.take();

        if let Some(timer) = stale_timer {
            self.timers.cancel(timer);
        }
        let timer = self
            .timers
            .schedule(due_at, TimerAction::ClearHighlight(stat));
        self.record_mut(stat)?.highlight_timer = Some(timer);

        Ok(vec![
            DisplayCommand::StoreValue {
                stat,
                value: new_value,
            },
            DisplayCommand::RestartPulse { stat },
            DisplayCommand::SetHighlight {
                stat,
                highlight: Some(highlight),
            },
        ])
    }

    /// 推进所有动画与定时器到当前时间
    ///
    /// 只在显示文本变化时输出 `SetText`。
    pub fn tick(&mut self) -> Vec<DisplayCommand> {
        let now = self.clock.now_ms();
        let mut commands = Vec::new();

        for (&stat, record) in self.stats.iter_mut() {
            let Some(animation) = record.animation.as_mut() else {
                continue;
            };
            if !animation.is_active() {
                continue;
            }

            let frame = animation.tick(now);
            let text = self.config.number_format.format(frame.value);
            if record.text.as_deref() != Some(text.as_str()) {
                record.text = Some(text.clone());
                commands.push(DisplayCommand::SetText { stat, text });
            }

            if frame.finished {
                self.events.push(AnimatorEvent::Completed(animation.id));
                record.animation = None;
                record.phase = StatPhase::Settled;
            }
        }

        for (timer, action) in self.timers.drain_due(now) {
            match action {
                TimerAction::ClearHighlight(stat) => {
                    let Some(record) = self.stats.get_mut(&stat) else {
                        continue;
                    };
                    if record.highlight_timer != Some(timer) {
                        continue;
                    }
                    record.highlight = None;
                    record.highlight_timer = None;
                    commands.push(DisplayCommand::SetHighlight {
                        stat,
                        highlight: None,
                    });
                    self.events.push(AnimatorEvent::HighlightCleared(stat));
                }
            }
        }

        commands
    }

    /// 跳过统计项的计数动画，立即显示终值
    pub fn skip(&mut self, stat: StatId) -> Result<Vec<DisplayCommand>, AnimatorError> {
        let format = self.config.number_format.clone();
        let record = self.record_mut(stat)?;
        let Some(mut animation) = record.animation.take() else {
            return Ok(Vec::new());
        };

        let end = animation.skip();
        let text = format.format(end);
        record.text = Some(text.clone());
        record.phase = StatPhase::Settled;

        self.events.push(AnimatorEvent::Skipped(animation.id));
        Ok(vec![DisplayCommand::SetText { stat, text }])
    }

    /// 跳过所有计数动画
    pub fn skip_all(&mut self) -> Vec<DisplayCommand> {
        let animating: Vec<StatId> = self
            .stats
            .iter()
            .filter(|(_, record)| record.animation.is_some())
            .map(|(&stat, _)| stat)
            .collect();

        animating
            .into_iter()
            .filter_map(|stat| self.skip(stat).ok())
            .flatten()
            .collect()
    }

    /// 取走累积的事件
    pub fn take_events(&mut self) -> Vec<AnimatorEvent> {
        std::mem::take(&mut self.events)
    }

    // ========== 查询方法 ==========

    /// 统计项快照
    pub fn snapshot(&self, stat: StatId) -> Option<StatSnapshot> {
        self.stats.get(&stat).map(|record| record.snapshot(stat))
    }

    /// 统计项的存储值
    pub fn value(&self, stat: StatId) -> Option<f64> {
        self.stats.get(&stat).map(|record| record.value)
    }

    /// 统计项当前显示文本
    pub fn text(&self, stat: StatId) -> Option<&str> {
        self.stats.get(&stat).and_then(|record| record.text.as_deref())
    }

    /// 活跃动画数量
    pub fn active_count(&self) -> usize {
        self.stats
            .values()
            .filter(|record| record.animation.as_ref().is_some_and(|a| a.is_active()))
            .count()
    }

    /// 等待中的定时器数量
    pub fn pending_timer_count(&self) -> usize {
        self.timers.pending_count()
    }

    /// 是否还需要继续推进（有活跃动画或等待中的定时器）
    pub fn has_pending_work(&self) -> bool {
        self.active_count() > 0 || !self.timers.is_empty()
    }
}
