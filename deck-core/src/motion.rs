//! Interpolated visual values: card pose, exit and pop curves.
//!
//! Everything here is a function of an offset or an elapsed time, so a
//! renderer can sample it at any frame rate.

use std::time::Duration;

use crate::config::SwipeConfig;
use crate::gesture::{Direction, Offset};

/// Timing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Fast start, cubic slowdown.
    OutCubic,
    /// Fast start, exponential slowdown.
    OutExpo,
}

impl Easing {
    /// Map progress `t` in `[0, 1]` onto the curve.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::OutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Linear interpolation of `value` from `[in_lo, in_hi]` onto
/// `[out_lo, out_hi]`, clamped at both ends.
pub fn interpolate(value: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let (in_lo, in_hi) = input;
    let (out_lo, out_hi) = output;
    if in_hi == in_lo {
        return out_hi;
    }
    let t = ((value - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    out_lo + (out_hi - out_lo) * t
}

/// Everything a renderer needs to draw the top card for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    /// Card translation.
    pub offset: Offset,
    /// Card rotation in degrees; positive is clockwise.
    pub rotation_deg: f64,
    /// Opacity of the LIKE badge.
    pub like_opacity: f64,
    /// Opacity of the NOPE badge.
    pub nope_opacity: f64,
}

impl CardPose {
    /// Pose for an offset.
    pub fn at(offset: Offset, config: &SwipeConfig) -> Self {
        let threshold = config.distance_threshold;
        let range = config.rotation_range;
        let max = config.max_rotation_deg;
        let rotation_deg = if offset.x >= 0.0 {
            interpolate(offset.x, (0.0, range), (0.0, max))
        } else {
            interpolate(offset.x, (-range, 0.0), (-max, 0.0))
        };
        Self {
            offset,
            rotation_deg,
            like_opacity: interpolate(offset.x, (0.0, threshold), (0.0, 1.0)),
            nope_opacity: interpolate(offset.x, (-threshold, 0.0), (1.0, 0.0)),
        }
    }

    /// The resting pose.
    pub fn rest() -> Self {
        Self {
            offset: Offset::ZERO,
            rotation_deg: 0.0,
            like_opacity: 0.0,
            nope_opacity: 0.0,
        }
    }
}

/// A single animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Start value.
    pub from: f64,
    /// End value.
    pub to: f64,
    /// Total duration.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

impl Tween {
    /// Create a tween.
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    /// Value after `elapsed`. Holds `to` once finished.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    /// Check whether the tween has finished at `elapsed`.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Gesture exit: card flies off-screen while the next card is promoted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitMotion {
    /// Horizontal translation.
    pub x: Tween,
    /// Vertical drift.
    pub y: Tween,
    /// Next-card promotion, 0 to 1.
    pub promotion: Tween,
}

impl ExitMotion {
    /// Exit from `from` towards `direction`.
    pub fn new(from: Offset, direction: Direction, config: &SwipeConfig) -> Self {
        let duration = config.exit_duration();
        let target_x = direction.sign() * (config.screen_width + config.exit_margin);
        Self {
            x: Tween::new(from.x, target_x, duration, Easing::OutCubic),
            y: Tween::new(from.y, config.exit_drift, duration, Easing::OutCubic),
            promotion: Tween::new(0.0, 1.0, duration, Easing::OutCubic),
        }
    }

    /// Card offset after `elapsed`.
    pub fn offset_at(&self, elapsed: Duration) -> Offset {
        Offset::new(self.x.value_at(elapsed), self.y.value_at(elapsed))
    }

    /// Promotion value after `elapsed`.
    pub fn promotion_at(&self, elapsed: Duration) -> f64 {
        self.promotion.value_at(elapsed)
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.x.duration
    }
}

/// Button pop: icon scales from 0.8 past 1.05 and settles at 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopMotion {
    spring: Tween,
    settle: Tween,
}

impl PopMotion {
    /// Starting scale.
    pub const START: f64 = 0.8;
    /// Overshoot peak.
    pub const PEAK: f64 = 1.05;
    /// Resting scale.
    pub const REST: f64 = 1.0;

    /// Pop with the configured phase durations.
    pub fn new(config: &SwipeConfig) -> Self {
        Self {
            spring: Tween::new(
                Self::START,
                Self::PEAK,
                Duration::from_millis(config.pop_spring_ms),
                Easing::OutCubic,
            ),
            settle: Tween::new(
                Self::PEAK,
                Self::REST,
                Duration::from_millis(config.pop_settle_ms),
                Easing::OutExpo,
            ),
        }
    }

    /// Icon scale after `elapsed`.
    pub fn scale_at(&self, elapsed: Duration) -> f64 {
        if elapsed < self.spring.duration {
            self.spring.value_at(elapsed)
        } else {
            self.settle.value_at(elapsed - self.spring.duration)
        }
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.spring.duration + self.settle.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::OutCubic, Easing::OutExpo] {
            assert!(close(easing.apply(0.0), 0.0));
            assert!(close(easing.apply(1.0), 1.0));
            assert!(close(easing.apply(2.0), 1.0));
        }
        assert!(Easing::OutCubic.apply(0.5) > 0.5);
    }

    #[test]
    fn interpolate_clamps() {
        assert!(close(interpolate(60.0, (0.0, 120.0), (0.0, 1.0)), 0.5));
        assert!(close(interpolate(500.0, (0.0, 120.0), (0.0, 1.0)), 1.0));
        assert!(close(interpolate(-5.0, (0.0, 120.0), (0.0, 1.0)), 0.0));
    }

    #[test]
    fn pose_badges_and_rotation() {
        let config = SwipeConfig::default();

        let pose = CardPose::at(Offset::new(60.0, 0.0), &config);
        assert!(close(pose.like_opacity, 0.5));
        assert!(close(pose.nope_opacity, 0.0));
        assert!(close(pose.rotation_deg, 9.0));

        let pose = CardPose::at(Offset::new(-400.0, 0.0), &config);
        assert!(close(pose.like_opacity, 0.0));
        assert!(close(pose.nope_opacity, 1.0));
        assert!(close(pose.rotation_deg, -30.0));

        assert_eq!(CardPose::at(Offset::ZERO, &config), CardPose::rest());
    }

    #[test]
    fn exit_targets_beyond_screen() {
        let config = SwipeConfig::default();
        let motion = ExitMotion::new(Offset::new(150.0, 10.0), Direction::Right, &config);

        assert_eq!(motion.duration(), Duration::from_millis(260));
        assert_eq!(motion.offset_at(Duration::ZERO), Offset::new(150.0, 10.0));
        let end = motion.offset_at(Duration::from_millis(260));
        assert!(close(end.x, 530.0));
        assert!(close(end.y, 20.0));
        assert!(close(motion.promotion_at(Duration::from_millis(400)), 1.0));

        let left = ExitMotion::new(Offset::ZERO, Direction::Left, &config);
        assert!(close(left.offset_at(Duration::from_millis(260)).x, -530.0));
    }

    #[test]
    fn pop_overshoots_then_settles() {
        let config = SwipeConfig::default();
        let pop = PopMotion::new(&config);

        assert!(close(pop.scale_at(Duration::ZERO), PopMotion::START));
        assert!(close(pop.scale_at(Duration::from_millis(250)), PopMotion::PEAK));
        assert!(close(pop.scale_at(Duration::from_millis(450)), PopMotion::REST));
        assert!(pop.scale_at(Duration::from_millis(300)) > PopMotion::REST);
        assert_eq!(pop.duration(), config.pop_duration());
    }

    #[test]
    fn zero_duration_tween_jumps_to_end() {
        let tween = Tween::new(0.0, 5.0, Duration::ZERO, Easing::Linear);
        assert!(close(tween.value_at(Duration::ZERO), 5.0));
        assert!(tween.is_finished(Duration::ZERO));
    }
}
