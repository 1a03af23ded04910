//! Criteria over the acceptable duration of a limit.

use gridsec_core::{GridsecError, GridsecResult, LimitDuration};
use serde::{Deserialize, Serialize};

/// Predicate over a [`LimitDuration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationCriterion {
    /// The permanent limit only
    Permanent,
    /// Every temporary limit
    AllTemporary,
    /// The temporary limit with exactly this acceptable duration (seconds)
    EqualityTemporary { duration: u32 },
    /// Temporary limits whose acceptable duration falls in a range (seconds).
    /// A missing bound is unbounded.
    IntervalTemporary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        low: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        high: Option<u32>,
        #[serde(default = "default_closed")]
        low_closed: bool,
        #[serde(default = "default_closed")]
        high_closed: bool,
    },
}

fn default_closed() -> bool {
    true
}

impl DurationCriterion {
    pub fn between(low: u32, high: u32, low_closed: bool, high_closed: bool) -> GridsecResult<Self> {
        let criterion = DurationCriterion::IntervalTemporary {
            low: Some(low),
            high: Some(high),
            low_closed,
            high_closed,
        };
        criterion.validate()?;
        Ok(criterion)
    }

    pub fn greater_than(low: u32, closed: bool) -> Self {
        DurationCriterion::IntervalTemporary {
            low: Some(low),
            high: None,
            low_closed: closed,
            high_closed: false,
        }
    }

    pub fn lower_than(high: u32, closed: bool) -> Self {
        DurationCriterion::IntervalTemporary {
            low: None,
            high: Some(high),
            low_closed: false,
            high_closed: closed,
        }
    }

    pub fn matches(&self, duration: LimitDuration) -> bool {
        match (self, duration) {
            (DurationCriterion::Permanent, LimitDuration::Permanent) => true,
            (DurationCriterion::Permanent, LimitDuration::Temporary(_)) => false,
            (_, LimitDuration::Permanent) => false,
            (DurationCriterion::AllTemporary, LimitDuration::Temporary(_)) => true,
            (DurationCriterion::EqualityTemporary { duration }, LimitDuration::Temporary(seconds)) => {
                *duration == seconds
            }
            (
                DurationCriterion::IntervalTemporary {
                    low,
                    high,
                    low_closed,
                    high_closed,
                },
                LimitDuration::Temporary(seconds),
            ) => {
                let above_low = match *low {
                    Some(low) if *low_closed => seconds >= low,
                    Some(low) => seconds > low,
                    None => true,
                };
                let below_high = match *high {
                    Some(high) if *high_closed => seconds <= high,
                    Some(high) => seconds < high,
                    None => true,
                };
                above_low && below_high
            }
        }
    }

    pub fn validate(&self) -> GridsecResult<()> {
        if let DurationCriterion::IntervalTemporary {
            low: Some(low),
            high: Some(high),
            low_closed,
            high_closed,
        } = self
        {
            if low > high || (low == high && !(*low_closed && *high_closed)) {
                return Err(GridsecError::Validation(format!(
                    "duration interval [{low}, {high}] is empty"
                )));
            }
        }
        Ok(())
    }
}

/// Empty list, or any member matches.
pub fn any_duration_criterion_matches(criteria: &[DurationCriterion], duration: LimitDuration) -> bool {
    criteria.is_empty() || criteria.iter().any(|c| c.matches(duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_and_temporary() {
        assert!(DurationCriterion::Permanent.matches(LimitDuration::Permanent));
        assert!(!DurationCriterion::Permanent.matches(LimitDuration::Temporary(60)));
        assert!(DurationCriterion::AllTemporary.matches(LimitDuration::Temporary(0)));
        assert!(!DurationCriterion::AllTemporary.matches(LimitDuration::Permanent));

        let equality = DurationCriterion::EqualityTemporary { duration: 60 };
        assert!(equality.matches(LimitDuration::Temporary(60)));
        assert!(!equality.matches(LimitDuration::Temporary(600)));
        assert!(!equality.matches(LimitDuration::Permanent));
    }

    #[test]
    fn test_interval() {
        let interval = DurationCriterion::between(60, 600, true, false).unwrap();
        assert!(interval.matches(LimitDuration::Temporary(60)));
        assert!(interval.matches(LimitDuration::Temporary(300)));
        assert!(!interval.matches(LimitDuration::Temporary(600)));
        assert!(!interval.matches(LimitDuration::Permanent));

        assert!(DurationCriterion::greater_than(600, true).matches(LimitDuration::Temporary(1200)));
        assert!(!DurationCriterion::lower_than(60, false).matches(LimitDuration::Temporary(60)));
        assert!(DurationCriterion::between(600, 60, true, true).is_err());
    }

    #[test]
    fn test_empty_list_matches_everything() {
        assert!(any_duration_criterion_matches(&[], LimitDuration::Permanent));
        assert!(!any_duration_criterion_matches(
            &[DurationCriterion::Permanent],
            LimitDuration::Temporary(60)
        ));
    }

    #[test]
    fn test_yaml_tags() {
        let criteria: Vec<DurationCriterion> = serde_yaml::from_str(
            "- type: PERMANENT\n- type: EQUALITY_TEMPORARY\n  duration: 60\n- type: INTERVAL_TEMPORARY\n  low: 60\n",
        )
        .unwrap();
        assert_eq!(criteria[0], DurationCriterion::Permanent);
        assert_eq!(criteria[1], DurationCriterion::EqualityTemporary { duration: 60 });
        assert_eq!(
            criteria[2],
            DurationCriterion::IntervalTemporary {
                low: Some(60),
                high: None,
                low_closed: true,
                high_closed: true,
            }
        );
    }
}
