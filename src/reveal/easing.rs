//! Easing curves for reveal animations.

/// Easing applied to a task's raw time progress.
///
/// All curves clamp their input to `0.0..=1.0` and stay within that range
/// on output; the driver can treat eased progress as an opacity directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    /// No easing: `t`.
    Linear,
    /// Slow start, accelerating: `t³`.
    EaseIn,
    /// Slow end, decelerating: `1 - (1-t)³`.
    #[default]
    EaseOut,
    /// Smooth S-curve: slow start and end.
    EaseInOut,
    /// Subtle slow end: `1 - (1-t)²`.
    EaseOutQuad,
}

impl Easing {
    /// Apply the curve to a progress value.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::EaseOutQuad => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutQuad,
    ];

    #[test]
    fn test_easing_endpoints() {
        for curve in CURVES {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        for curve in CURVES {
            assert_eq!(curve.apply(-1.0), 0.0);
            assert!((curve.apply(2.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_easing_stays_in_range() {
        for curve in CURVES {
            for i in 0..=100 {
                let t = i as f32 / 100.0;
                let v = curve.apply(t);
                assert!((0.0..=1.0).contains(&v), "{curve:?}({t}) = {v}");
            }
        }
    }
}
