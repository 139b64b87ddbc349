//! # Clock 模块
//!
//! 时间源抽象。动画器只通过 [`Clock`] 读取时间，Host 决定时间从哪里来
//! （`performance.now()`、`Instant`，或测试中手动推进的 [`ManualClock`]）。

use std::cell::Cell;
use std::rc::Rc;

/// 时间源
pub trait Clock {
    /// 当前时间（毫秒，单调递增）
    fn now_ms(&self) -> f64;
}

/// 手动推进的时钟
///
/// 克隆体共享同一个时间值，测试中可以一边持有克隆体推进时间，
/// 一边把另一个克隆体交给动画器。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// 创建从 `start_ms` 开始的时钟
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// 推进 `delta_ms` 毫秒
    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }

    /// 设置为指定时间
    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(10.0);
        let handle = clock.clone();

        handle.advance(5.0);
        assert_eq!(clock.now_ms(), 15.0);

        handle.set(100.0);
        assert_eq!(clock.now_ms(), 100.0);
    }
}
