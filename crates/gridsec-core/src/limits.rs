//! Operating limits attached to equipment sides.
//!
//! A [`LoadingLimits`] ladder holds one permanent threshold and any number of
//! temporary thresholds. A temporary threshold may be exceeded for at most its
//! acceptable duration; the shorter that duration, the higher the threshold:
//!
//! ```text
//! permanent 1100 A  <  1200 A for 600 s  <  1500 A for 60 s  <  unbounded for 0 s
//! ```
//!
//! Temporary limits are kept sorted by decreasing acceptable duration, i.e.
//! from the least to the most restrictive rung.

use serde::{Deserialize, Serialize};

/// Category of an operating limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitType {
    ActivePower,
    ApparentPower,
    Current,
    Voltage,
    LowShortCircuitCurrent,
    HighShortCircuitCurrent,
}

impl LimitType {
    /// Limit categories that accept a reduction factor.
    pub const REDUCIBLE: [LimitType; 3] = [
        LimitType::ActivePower,
        LimitType::ApparentPower,
        LimitType::Current,
    ];

    pub fn is_reducible(self) -> bool {
        Self::REDUCIBLE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LimitType::ActivePower => "ACTIVE_POWER",
            LimitType::ApparentPower => "APPARENT_POWER",
            LimitType::Current => "CURRENT",
            LimitType::Voltage => "VOLTAGE",
            LimitType::LowShortCircuitCurrent => "LOW_SHORT_CIRCUIT_CURRENT",
            LimitType::HighShortCircuitCurrent => "HIGH_SHORT_CIRCUIT_CURRENT",
        }
    }
}

impl std::fmt::Display for LimitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a one-, two- or three-terminal element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreeSides {
    One,
    Two,
    Three,
}

impl ThreeSides {
    pub const ALL: [ThreeSides; 3] = [ThreeSides::One, ThreeSides::Two, ThreeSides::Three];

    /// Zero-based position of this side in an element's terminal list.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ThreeSides::One => 0,
            ThreeSides::Two => 1,
            ThreeSides::Three => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for ThreeSides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ThreeSides::One => "ONE",
            ThreeSides::Two => "TWO",
            ThreeSides::Three => "THREE",
        };
        f.write_str(name)
    }
}

/// How long a threshold may be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitDuration {
    /// The permanent threshold
    Permanent,
    /// A temporary threshold, with its acceptable duration in seconds
    Temporary(u32),
}

/// One rung of a limit ladder above the permanent threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryLimit {
    pub name: String,
    /// Acceptable duration in seconds
    pub acceptable_duration: u32,
    pub value: f64,
}

impl TemporaryLimit {
    pub fn new(name: impl Into<String>, acceptable_duration: u32, value: f64) -> Self {
        Self {
            name: name.into(),
            acceptable_duration,
            value,
        }
    }

    /// A rung without an actual threshold (infinite or `f64::MAX`).
    pub fn is_unbounded(&self) -> bool {
        is_unbounded(self.value)
    }
}

/// Whether a threshold value stands for "not set".
#[inline]
pub fn is_unbounded(value: f64) -> bool {
    !value.is_finite() || value >= f64::MAX
}

/// Permanent threshold plus temporary rungs for one (limit type, side).
///
/// A permanent value that [`is_unbounded`] (NaN, infinite or `f64::MAX`)
/// means the side has no permanent threshold, only temporary rungs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLoadingLimits")]
pub struct LoadingLimits {
    permanent: f64,
    temporary: Vec<TemporaryLimit>,
}

/// Deserialized ladder before its rungs are sorted.
#[derive(Deserialize)]
struct RawLoadingLimits {
    permanent: f64,
    #[serde(default)]
    temporary: Vec<TemporaryLimit>,
}

impl From<RawLoadingLimits> for LoadingLimits {
    fn from(raw: RawLoadingLimits) -> Self {
        LoadingLimits::from_parts(raw.permanent, raw.temporary)
    }
}

impl LoadingLimits {
    pub fn new(permanent: f64) -> Self {
        Self {
            permanent,
            temporary: Vec::new(),
        }
    }

    /// Build a ladder from raw parts; rungs are sorted by decreasing duration.
    pub fn from_parts(permanent: f64, mut temporary: Vec<TemporaryLimit>) -> Self {
        temporary.sort_by(|a, b| b.acceptable_duration.cmp(&a.acceptable_duration));
        Self {
            permanent,
            temporary,
        }
    }

    /// Add (or replace) the rung with the given acceptable duration.
    pub fn with_temporary(mut self, name: impl Into<String>, acceptable_duration: u32, value: f64) -> Self {
        self.temporary
            .retain(|limit| limit.acceptable_duration != acceptable_duration);
        let position = self
            .temporary
            .iter()
            .position(|limit| limit.acceptable_duration < acceptable_duration)
            .unwrap_or(self.temporary.len());
        self.temporary.insert(
            position,
            TemporaryLimit::new(name, acceptable_duration, value),
        );
        self
    }

    #[inline]
    pub fn permanent_limit(&self) -> f64 {
        self.permanent
    }

    pub fn has_permanent_limit(&self) -> bool {
        !is_unbounded(self.permanent)
    }

    /// Temporary rungs, longest acceptable duration first.
    #[inline]
    pub fn temporary_limits(&self) -> &[TemporaryLimit] {
        &self.temporary
    }

    pub fn temporary_limit(&self, acceptable_duration: u32) -> Option<&TemporaryLimit> {
        self.temporary
            .iter()
            .find(|limit| limit.acceptable_duration == acceptable_duration)
    }

    pub fn temporary_limit_value(&self, acceptable_duration: u32) -> Option<f64> {
        self.temporary_limit(acceptable_duration)
            .map(|limit| limit.value)
    }

    /// Threshold for a duration descriptor.
    pub fn value_for(&self, duration: LimitDuration) -> Option<f64> {
        match duration {
            LimitDuration::Permanent => Some(self.permanent),
            LimitDuration::Temporary(seconds) => self.temporary_limit_value(seconds),
        }
    }

    /// Every rung strictly above the previous, longer-duration one, and the first
    /// one strictly above the permanent threshold.
    pub fn is_ladder_monotonic(&self) -> bool {
        let mut previous = self.permanent;
        let mut previous_duration = u32::MAX;
        for limit in &self.temporary {
            if limit.acceptable_duration >= previous_duration {
                return false;
            }
            if !is_unbounded(previous) && limit.value <= previous {
                return false;
            }
            previous = limit.value;
            previous_duration = limit.acceptable_duration;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_limits() -> LoadingLimits {
        LoadingLimits::new(1100.0)
            .with_temporary("1'", 60, 1500.0)
            .with_temporary("10'", 600, 1200.0)
            .with_temporary("N/A", 0, f64::MAX)
    }

    #[test]
    fn test_rungs_sorted_by_decreasing_duration() {
        let limits = line_limits();
        let durations: Vec<u32> = limits
            .temporary_limits()
            .iter()
            .map(|l| l.acceptable_duration)
            .collect();
        assert_eq!(durations, vec![600, 60, 0]);
        assert!(limits.is_ladder_monotonic());
    }

    #[test]
    fn test_value_lookup() {
        let limits = line_limits();
        assert_eq!(limits.value_for(LimitDuration::Permanent), Some(1100.0));
        assert_eq!(limits.temporary_limit_value(600), Some(1200.0));
        assert_eq!(limits.temporary_limit_value(300), None);
        assert!(limits.temporary_limit(0).unwrap().is_unbounded());
    }

    #[test]
    fn test_with_temporary_replaces_same_duration() {
        let limits = line_limits().with_temporary("10' bis", 600, 1250.0);
        assert_eq!(limits.temporary_limits().len(), 3);
        assert_eq!(limits.temporary_limit_value(600), Some(1250.0));
    }

    #[test]
    fn test_non_monotonic_ladder_detected() {
        let limits = LoadingLimits::from_parts(
            1100.0,
            vec![
                TemporaryLimit::new("1'", 60, 1150.0),
                TemporaryLimit::new("10'", 600, 1200.0),
            ],
        );
        assert!(!limits.is_ladder_monotonic());
    }

    #[test]
    fn test_unset_permanent_ladder_is_monotonic() {
        for permanent in [f64::NAN, f64::MAX] {
            let limits = LoadingLimits::new(permanent)
                .with_temporary("10'", 600, 1200.0)
                .with_temporary("1'", 60, 1500.0);
            assert!(!limits.has_permanent_limit());
            assert!(limits.is_ladder_monotonic());
        }
        assert!(line_limits().has_permanent_limit());
    }

    #[test]
    fn test_deserialized_rungs_are_sorted() {
        let json = r#"{
            "permanent": 1100.0,
            "temporary": [
                {"name": "1'", "acceptable_duration": 60, "value": 1500.0},
                {"name": "10'", "acceptable_duration": 600, "value": 1200.0}
            ]
        }"#;
        let limits: LoadingLimits = serde_json::from_str(json).unwrap();
        let durations: Vec<u32> = limits
            .temporary_limits()
            .iter()
            .map(|l| l.acceptable_duration)
            .collect();
        assert_eq!(durations, vec![600, 60]);
        assert!(limits.is_ladder_monotonic());
    }

    #[test]
    fn test_reducible_limit_types() {
        assert!(LimitType::Current.is_reducible());
        assert!(LimitType::ApparentPower.is_reducible());
        assert!(!LimitType::Voltage.is_reducible());
        assert!(!LimitType::HighShortCircuitCurrent.is_reducible());
    }

    #[test]
    fn test_limit_type_serde_name() {
        let json = serde_json::to_string(&LimitType::ApparentPower).unwrap();
        assert_eq!(json, "\"APPARENT_POWER\"");
        let side: ThreeSides = serde_json::from_str("\"TWO\"").unwrap();
        assert_eq!(side, ThreeSides::Two);
    }
}
