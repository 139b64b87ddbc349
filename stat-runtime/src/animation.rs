//! # Animation 模块
//!
//! 单个计数动画的时间轴。
//!
//! 核心设计：插值是纯函数（`elapsed -> value`），与帧调度解耦。
//! 动画只记录"第一帧的时间"，之后每一帧由调用方传入当前时间。

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;

/// 动画 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// 创建新的动画 ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// 动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    /// 等待第一帧
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已完成
    Completed,
    /// 已跳过
    Skipped,
}

impl AnimationState {
    /// 是否为活跃状态（需要更新）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Playing)
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// 计算归一化进度
///
/// `min(elapsed / duration, 1)`，并截断到 `[0, 1]`。
/// 时长不为正数时直接视为完成。
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if !(duration_ms > 0.0) {
        return 1.0;
    }
    if elapsed_ms.is_nan() {
        return 0.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// 按进度插值并向下取整
pub fn interpolate(start: f64, end: f64, progress: f64) -> f64 {
    (progress * (end - start) + start).floor()
}

/// 单帧采样结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// 本帧应显示的值
    pub value: f64,
    /// 是否为最后一帧
    pub finished: bool,
}

/// 计数动画
///
/// 从 `start` 计数到 `end`，中间帧显示取整后的插值，最后一帧显示精确的 `end`。
#[derive(Debug, Clone)]
pub struct CountAnimation {
    /// 动画 ID
    pub id: AnimationId,
    /// 起始值
    pub start: f64,
    /// 目标值
    pub end: f64,
    /// 动画时长（毫秒）
    pub duration_ms: f64,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 当前状态
    pub state: AnimationState,
    /// 当前进度（0.0 - 1.0，未应用缓动）
    pub progress: f64,
    /// 第一帧的时间
    start_time: Option<f64>,
    /// 最近一帧显示的值
    last_value: f64,
}

impl CountAnimation {
    /// 创建新的计数动画
    pub fn new(id: AnimationId, start: f64, end: f64, duration_ms: f64) -> Self {
        Self {
            id,
            start,
            end,
            duration_ms,
            easing: EasingFunction::default(),
            state: AnimationState::Pending,
            progress: 0.0,
            start_time: None,
            last_value: start,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 采样经过 `elapsed_ms` 后的帧（不修改状态）
    pub fn sample(&self, elapsed_ms: f64) -> Frame {
        let p = progress(elapsed_ms, self.duration_ms);
        if p < 1.0 {
            Frame {
                value: interpolate(self.start, self.end, self.easing.apply(p)),
                finished: false,
            }
        } else {
            // 最后一帧使用精确终值，避免取整误差
            Frame {
                value: self.end,
                finished: true,
            }
        }
    }

    /// 推进到 `now_ms`
    ///
    /// 第一次调用记录起始时间。已结束的动画返回终值帧。
    pub fn tick(&mut self, now_ms: f64) -> Frame {
        if self.state.is_finished() {
            return Frame {
                value: self.end,
                finished: true,
            };
        }

        let start_time = *self.start_time.get_or_insert(now_ms);
        let elapsed = now_ms - start_time;
        let frame = self.sample(elapsed);

        self.progress = progress(elapsed, self.duration_ms);
        self.last_value = frame.value;
        self.state = if frame.finished {
            AnimationState::Completed
        } else {
            AnimationState::Playing
        };
        frame
    }

    /// 跳过动画，返回终值
    pub fn skip(&mut self) -> f64 {
        if self.state.is_active() {
            self.progress = 1.0;
            self.last_value = self.end;
            self.state = AnimationState::Skipped;
        }
        self.end
    }

    /// 最近一帧显示的值
    pub fn current_value(&self) -> f64 {
        self.last_value
    }

    /// 获取最终值
    pub fn final_value(&self) -> f64 {
        self.end
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// 是否为活跃状态
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_animation(start: f64, end: f64) -> CountAnimation {
        CountAnimation::new(AnimationId::new(1), start, end, 1000.0)
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(progress(0.0, 1000.0), 0.0);
        assert_eq!(progress(500.0, 1000.0), 0.5);
        assert_eq!(progress(1500.0, 1000.0), 1.0);
        assert_eq!(progress(-20.0, 1000.0), 0.0);
        assert_eq!(progress(f64::NAN, 1000.0), 0.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert_eq!(progress(0.0, 0.0), 1.0);
        assert_eq!(progress(0.0, -5.0), 1.0);
        assert_eq!(progress(0.0, f64::NAN), 1.0);
    }

    #[test]
    fn test_interpolate_floors() {
        assert_eq!(interpolate(0.0, 1250.0, 0.5), 625.0);
        assert_eq!(interpolate(0.0, 10.0, 0.33), 3.0);
        assert_eq!(interpolate(10.0, 15.0, 0.5), 12.0);
        assert_eq!(interpolate(15.0, 10.0, 0.5), 12.0);
        assert!(interpolate(0.0, f64::NAN, 0.5).is_nan());
    }

    #[test]
    fn test_interpolate_monotonic() {
        for (start, end) in [(0.0, 1250.0), (3.0, 7.0), (-40.0, 40.0), (5.0, 5.0)] {
            let mut prev = interpolate(start, end, 0.0);
            for step in 1..=1000 {
                let value = interpolate(start, end, step as f64 / 1000.0);
                assert!(value >= prev, "{start}->{end} 在 {step} 处回退");
                prev = value;
            }
            assert_eq!(prev, end);
        }
    }

    #[test]
    fn test_sample_final_frame_is_exact() {
        let anim = create_test_animation(0.0, 1250.75);

        let mid = anim.sample(999.0);
        assert!(!mid.finished);
        assert_eq!(mid.value, (0.999_f64 * 1250.75).floor());

        let last = anim.sample(1000.0);
        assert!(last.finished);
        assert_eq!(last.value, 1250.75);
    }

    #[test]
    fn test_tick_records_first_frame() {
        let mut anim = create_test_animation(0.0, 100.0);
        assert_eq!(anim.state, AnimationState::Pending);

        // 第一帧 elapsed 为 0
        let frame = anim.tick(5000.0);
        assert_eq!(frame.value, 0.0);
        assert_eq!(anim.state, AnimationState::Playing);

        let frame = anim.tick(5250.0);
        assert_eq!(frame.value, 25.0);
        assert_eq!(anim.progress, 0.25);

        let frame = anim.tick(6000.0);
        assert!(frame.finished);
        assert_eq!(frame.value, 100.0);
        assert_eq!(anim.state, AnimationState::Completed);

        // 结束后继续推进保持终值
        assert_eq!(anim.tick(9000.0).value, 100.0);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_frame() {
        let mut anim = CountAnimation::new(AnimationId::new(1), 0.0, 42.0, 0.0);
        let frame = anim.tick(10.0);
        assert!(frame.finished);
        assert_eq!(frame.value, 42.0);
    }

    #[test]
    fn test_skip() {
        let mut anim = create_test_animation(0.0, 100.0);
        anim.tick(0.0);
        anim.tick(100.0);

        assert_eq!(anim.skip(), 100.0);
        assert_eq!(anim.state, AnimationState::Skipped);
        assert_eq!(anim.current_value(), 100.0);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_with_easing() {
        let anim = create_test_animation(0.0, 100.0).with_easing(EasingFunction::EaseOutQuad);
        // 1 - 0.5^2 = 0.75
        assert_eq!(anim.sample(500.0).value, 75.0);
    }
}
