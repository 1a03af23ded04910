//! Limit violation detection against reduced limits.

use gridsec_core::{LimitType, ThreeSides};
use serde::{Deserialize, Serialize};

use crate::limit_reduction::LimitsContainer;

/// An operating value above a (possibly reduced) threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitViolation {
    pub subject_id: String,
    pub limit_type: LimitType,
    pub side: ThreeSides,
    /// Name of the exceeded temporary limit, `None` for the permanent one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_name: Option<String>,
    /// Original (unreduced) value of the exceeded threshold
    pub limit: f64,
    /// Factor applied to `limit`; the effective threshold is `limit * limit_reduction`
    pub limit_reduction: f64,
    pub value: f64,
    /// Seconds the value may be sustained, 0 when every rung is exceeded
    pub acceptable_duration: u32,
}

impl LimitViolation {
    pub fn effective_limit(&self) -> f64 {
        self.limit * self.limit_reduction
    }

    pub fn is_permanent(&self) -> bool {
        self.limit_name.is_none()
    }
}

/// Compare `value` with the reduced ladder of `limits`.
///
/// A value above the reduced permanent limit is a violation. The exceeded
/// threshold is the highest rung the value is above; the acceptable duration
/// is that of the first rung (longest first) the value stays at or below.
/// Without a permanent limit, only a value above some rung is a violation.
pub fn detect_violation(
    subject_id: &str,
    limit_type: LimitType,
    side: ThreeSides,
    limits: &LimitsContainer,
    value: f64,
) -> Option<LimitViolation> {
    let reduced = &limits.reduced;
    let has_permanent = reduced.has_permanent_limit();
    if value.is_nan() || (has_permanent && value <= reduced.permanent_limit()) {
        return None;
    }

    let mut exceeded = None;
    let mut acceptable_duration = 0;
    for rung in reduced.temporary_limits() {
        if value <= rung.value {
            acceptable_duration = rung.acceptable_duration;
            break;
        }
        exceeded = Some(rung);
    }
    if !has_permanent && exceeded.is_none() {
        return None;
    }

    let (limit_name, original, effective) = match exceeded {
        Some(rung) => (
            Some(rung.name.clone()),
            limits
                .original
                .temporary_limit_value(rung.acceptable_duration)
                .unwrap_or(rung.value),
            rung.value,
        ),
        None => (
            None,
            limits.original.permanent_limit(),
            reduced.permanent_limit(),
        ),
    };
    let limit_reduction = if original == 0.0 || !original.is_finite() {
        1.0
    } else {
        effective / original
    };

    Some(LimitViolation {
        subject_id: subject_id.to_string(),
        limit_type,
        side,
        limit_name,
        limit: original,
        limit_reduction,
        value,
        acceptable_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit_reduction::reduce_limits;
    use gridsec_core::LoadingLimits;

    fn halved() -> LimitsContainer {
        let original = LoadingLimits::new(1100.0)
            .with_temporary("20'", 1200, 1200.0)
            .with_temporary("N/A", 60, f64::MAX);
        let (reduced, has_changed) = reduce_limits(&original, |_| 0.5);
        LimitsContainer {
            original,
            reduced,
            has_changed,
        }
    }

    #[test]
    fn test_below_reduced_permanent() {
        assert!(detect_violation("L", LimitType::Current, ThreeSides::One, &halved(), 550.0).is_none());
    }

    #[test]
    fn test_permanent_violation_with_reduction() {
        let violation =
            detect_violation("L", LimitType::Current, ThreeSides::One, &halved(), 580.0).unwrap();
        assert!(violation.is_permanent());
        assert_eq!(violation.limit, 1100.0);
        assert!((violation.limit_reduction - 0.5).abs() < 1e-9);
        assert!((violation.effective_limit() - 550.0).abs() < 1e-9);
        assert_eq!(violation.acceptable_duration, 1200);
    }

    #[test]
    fn test_temporary_violation() {
        let violation =
            detect_violation("L", LimitType::Current, ThreeSides::One, &halved(), 700.0).unwrap();
        assert_eq!(violation.limit_name.as_deref(), Some("20'"));
        assert_eq!(violation.limit, 1200.0);
        assert_eq!(violation.acceptable_duration, 60);
    }

    #[test]
    fn test_every_rung_exceeded() {
        let original = LoadingLimits::new(100.0).with_temporary("1'", 60, 150.0);
        let limits = LimitsContainer::unchanged(original);
        let violation =
            detect_violation("T", LimitType::ActivePower, ThreeSides::Two, &limits, 200.0).unwrap();
        assert_eq!(violation.limit_name.as_deref(), Some("1'"));
        assert_eq!(violation.acceptable_duration, 0);
        assert_eq!(violation.limit_reduction, 1.0);
    }

    #[test]
    fn test_unset_permanent_limit() {
        for permanent in [f64::NAN, f64::MAX] {
            let original = LoadingLimits::new(permanent)
                .with_temporary("10'", 600, 1200.0)
                .with_temporary("1'", 60, 1500.0);
            let limits = LimitsContainer::unchanged(original);
            assert!(detect_violation("L", LimitType::Current, ThreeSides::One, &limits, 500.0).is_none());
            assert!(detect_violation("L", LimitType::Current, ThreeSides::One, &limits, 1200.0).is_none());

            let violation =
                detect_violation("L", LimitType::Current, ThreeSides::One, &limits, 1300.0).unwrap();
            assert_eq!(violation.limit_name.as_deref(), Some("10'"));
            assert_eq!(violation.limit, 1200.0);
            assert_eq!(violation.acceptable_duration, 60);
        }
    }
}
