//! # Clock 模块
//!
//! 浏览器时间源。headless 模式使用 [`ManualClock`](stat_runtime::ManualClock) 手动步进。

use stat_runtime::Clock;

/// 浏览器 `performance.now()` 时钟
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

impl PerformanceClock {
    /// 从全局 `window.performance` 创建
    pub fn from_window() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}
