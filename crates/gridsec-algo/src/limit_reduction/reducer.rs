//! Applying per-rung factors to a limit ladder.
//!
//! Every threshold is multiplied by its own factor, which may leave the ladder
//! out of order. The repair pass walks the temporary rungs from the most
//! restrictive (shortest duration) to the least restrictive and keeps a rung
//! only if its reduced value is strictly below every shorter-duration rung
//! kept so far and strictly above the reduced permanent limit:
//!
//! ```text
//! original   1100  │ 1200@600s │ 1500@60s │ MAX@0s
//! factors    1.0   │ 1.0       │ 0.75     │ -
//! reduced    1100  │ 1200@600s │ 1125@60s │ MAX@0s
//! repaired   1100  │    ---    │ 1125@60s │ MAX@0s     (1200 is not below 1125)
//! ```
//!
//! Unbounded rungs are never reduced or removed, and the permanent limit is
//! always kept. An unset permanent limit puts no floor under the rungs.

use gridsec_core::limits::is_unbounded;
use gridsec_core::{LimitDuration, LoadingLimits, TemporaryLimit};

/// Reduce `original` with the factor returned for each rung.
///
/// Returns the repaired ladder and whether any factor differed from 1.0.
pub fn reduce_limits(original: &LoadingLimits, mut factor_for: impl FnMut(LimitDuration) -> f64) -> (LoadingLimits, bool) {
    let mut changed = false;
    let mut reduce = |value: f64, duration: LimitDuration| {
        if is_unbounded(value) {
            return value;
        }
        let factor = factor_for(duration);
        if factor != 1.0 {
            changed = true;
        }
        value * factor
    };

    let permanent = reduce(original.permanent_limit(), LimitDuration::Permanent);
    let reduced: Vec<TemporaryLimit> = original
        .temporary_limits()
        .iter()
        .map(|limit| TemporaryLimit {
            value: reduce(limit.value, LimitDuration::Temporary(limit.acceptable_duration)),
            ..limit.clone()
        })
        .collect();

    let floor = if is_unbounded(permanent) {
        f64::NEG_INFINITY
    } else {
        permanent
    };
    let mut kept = Vec::with_capacity(reduced.len());
    let mut ceiling = f64::INFINITY;
    for limit in reduced.into_iter().rev() {
        if limit.is_unbounded() {
            kept.push(limit);
        } else if limit.value < ceiling && limit.value > floor {
            ceiling = limit.value;
            kept.push(limit);
        }
    }

    (LoadingLimits::from_parts(permanent, kept), changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> LoadingLimits {
        LoadingLimits::new(1100.0)
            .with_temporary("10'", 600, 1200.0)
            .with_temporary("1'", 60, 1500.0)
            .with_temporary("N/A", 0, f64::MAX)
    }

    #[test]
    fn test_permanent_only() {
        let (reduced, changed) = reduce_limits(&ladder(), |d| match d {
            LimitDuration::Permanent => 0.9,
            LimitDuration::Temporary(_) => 1.0,
        });
        assert!(changed);
        assert!((reduced.permanent_limit() - 990.0).abs() < 1e-9);
        assert_eq!(reduced.temporary_limit_value(600), Some(1200.0));
        assert_eq!(reduced.temporary_limit_value(60), Some(1500.0));
        assert_eq!(reduced.temporary_limit_value(0), Some(f64::MAX));
    }

    #[test]
    fn test_rung_above_shorter_one_is_removed() {
        let (reduced, changed) = reduce_limits(&ladder(), |d| match d {
            LimitDuration::Temporary(60) => 0.75,
            _ => 1.0,
        });
        assert!(changed);
        assert_eq!(reduced.permanent_limit(), 1100.0);
        assert_eq!(reduced.temporary_limit_value(600), None);
        assert_eq!(reduced.temporary_limit_value(60), Some(1125.0));
        assert_eq!(reduced.temporary_limit_value(0), Some(f64::MAX));
    }

    #[test]
    fn test_rung_below_permanent_is_removed() {
        let (reduced, _) = reduce_limits(&ladder(), |d| match d {
            LimitDuration::Temporary(600) => 0.5,
            _ => 1.0,
        });
        assert_eq!(reduced.temporary_limit_value(600), None);
        assert_eq!(reduced.temporary_limit_value(60), Some(1500.0));
    }

    #[test]
    fn test_uniform_factor_keeps_every_rung() {
        let (reduced, changed) = reduce_limits(&ladder(), |_| 0.5);
        assert!(changed);
        assert_eq!(reduced.permanent_limit(), 550.0);
        assert_eq!(reduced.temporary_limit_value(600), Some(600.0));
        assert_eq!(reduced.temporary_limit_value(60), Some(750.0));
        assert_eq!(reduced.temporary_limit_value(0), Some(f64::MAX));
    }

    #[test]
    fn test_factor_one_is_unchanged() {
        let original = ladder();
        let (reduced, changed) = reduce_limits(&original, |_| 1.0);
        assert!(!changed);
        assert_eq!(reduced, original);
    }

    fn without_permanent(permanent: f64) -> LoadingLimits {
        LoadingLimits::new(permanent)
            .with_temporary("10'", 600, 1200.0)
            .with_temporary("1'", 60, 1500.0)
    }

    #[test]
    fn test_unset_permanent_keeps_rungs() {
        for permanent in [f64::NAN, f64::MAX, f64::INFINITY] {
            let original = without_permanent(permanent);
            let (reduced, changed) = reduce_limits(&original, |_| 1.0);
            assert!(!changed);
            assert_eq!(reduced.permanent_limit().to_bits(), permanent.to_bits());
            assert_eq!(reduced.temporary_limits(), original.temporary_limits());
        }
    }

    #[test]
    fn test_unset_permanent_rungs_are_reduced() {
        for permanent in [f64::NAN, f64::MAX] {
            let (reduced, changed) = reduce_limits(&without_permanent(permanent), |d| match d {
                LimitDuration::Permanent => panic!("no factor for an unset permanent limit"),
                LimitDuration::Temporary(_) => 0.5,
            });
            assert!(changed);
            assert!(!reduced.has_permanent_limit());
            assert_eq!(reduced.temporary_limit_value(600), Some(600.0));
            assert_eq!(reduced.temporary_limit_value(60), Some(750.0));
        }
    }

    #[test]
    fn test_deserialized_unsorted_ladder() {
        let original: LoadingLimits = serde_json::from_str(
            r#"{"permanent": 1100.0, "temporary": [
                {"name": "1'", "acceptable_duration": 60, "value": 1500.0},
                {"name": "10'", "acceptable_duration": 600, "value": 1200.0}
            ]}"#,
        )
        .unwrap();
        let (reduced, changed) = reduce_limits(&original, |d| match d {
            LimitDuration::Temporary(60) => 0.75,
            _ => 1.0,
        });
        assert!(changed);
        assert_eq!(reduced.temporary_limit_value(600), None);
        assert_eq!(reduced.temporary_limit_value(60), Some(1125.0));
    }
}
