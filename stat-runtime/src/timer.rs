//! # Timer 模块
//!
//! 可取消的虚拟定时器队列。
//!
//! 队列本身不计时，由调用方传入当前时间（毫秒）来取出到期项。

use serde::{Deserialize, Serialize};

/// 定时器 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    id: TimerId,
    due_at: f64,
    payload: T,
}

/// 定时器队列
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// 创建空队列
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// 在 `due_at`（毫秒）安排一个定时器
    pub fn schedule(&mut self, due_at: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            due_at,
            payload,
        });
        id
    }

    /// 取消定时器
    ///
    /// 返回 `false` 表示定时器不存在（已触发或已取消）。
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// 定时器是否仍在等待
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// 取出所有在 `now` 之前（含）到期的定时器
    ///
    /// 按到期时间排序，相同到期时间按安排顺序。
    pub fn drain_due(&mut self, now: f64) -> Vec<(TimerId, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.due_at <= now);
        self.entries = pending;

        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.id.cmp(&b.id)));
        due.into_iter()
            .map(|entry| (entry.id, entry.payload))
            .collect()
    }

    /// 最早的到期时间
    pub fn next_due(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|entry| entry.due_at)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// 等待中的定时器数量
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有等待中的定时器
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
