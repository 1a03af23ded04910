//! Operating values fed to violation detection.
//!
//! The analysis never computes flows itself: an [`OperatingPointProvider`]
//! (a power-flow engine, a replayed snapshot, a test fixture) is asked for the
//! monitored values of the working network, after tripping.

use std::collections::{BTreeMap, HashMap};

use gridsec_core::{GridsecResult, LimitType, Network, ThreeSides};
use serde::{Deserialize, Serialize};

use crate::contingency::Contingency;

/// One monitored quantity: an element side under a limit category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitoredQuantity {
    pub element_id: String,
    pub limit_type: LimitType,
    pub side: ThreeSides,
}

impl MonitoredQuantity {
    pub fn new(element_id: impl Into<String>, limit_type: LimitType, side: ThreeSides) -> Self {
        Self {
            element_id: element_id.into(),
            limit_type,
            side,
        }
    }
}

/// Operating values of one network state, ordered by quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatingPoint {
    values: BTreeMap<MonitoredQuantity, f64>,
}

impl OperatingPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quantity: MonitoredQuantity, value: f64) -> Option<f64> {
        self.values.insert(quantity, value)
    }

    pub fn with_value(
        mut self,
        element_id: impl Into<String>,
        limit_type: LimitType,
        side: ThreeSides,
        value: f64,
    ) -> Self {
        self.insert(MonitoredQuantity::new(element_id, limit_type, side), value);
        self
    }

    pub fn get(&self, quantity: &MonitoredQuantity) -> Option<f64> {
        self.values.get(quantity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MonitoredQuantity, f64)> {
        self.values.iter().map(|(quantity, &value)| (quantity, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Source of operating values for a network state.
///
/// `contingency` is `None` for the pre-contingency state; otherwise `network`
/// is the working copy with the contingency already applied.
pub trait OperatingPointProvider: Send + Sync {
    fn operating_point(
        &self,
        network: &Network,
        contingency: Option<&Contingency>,
    ) -> GridsecResult<OperatingPoint>;
}

/// Precomputed operating points keyed by contingency id.
///
/// Contingencies without their own point fall back to the base point.
#[derive(Debug, Clone, Default)]
pub struct FixedOperatingPoints {
    base: OperatingPoint,
    per_contingency: HashMap<String, OperatingPoint>,
}

impl FixedOperatingPoints {
    pub fn new(base: OperatingPoint) -> Self {
        Self {
            base,
            per_contingency: HashMap::new(),
        }
    }

    pub fn with_contingency(mut self, contingency_id: impl Into<String>, point: OperatingPoint) -> Self {
        self.per_contingency.insert(contingency_id.into(), point);
        self
    }
}

impl OperatingPointProvider for FixedOperatingPoints {
    fn operating_point(
        &self,
        _network: &Network,
        contingency: Option<&Contingency>,
    ) -> GridsecResult<OperatingPoint> {
        let point = contingency
            .and_then(|c| self.per_contingency.get(&c.id))
            .unwrap_or(&self.base);
        Ok(point.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contingency::ContingencyElementType;

    #[test]
    fn test_fixed_points_fall_back_to_base() {
        let base = OperatingPoint::new().with_value("L1", LimitType::Current, ThreeSides::One, 100.0);
        let c1 = OperatingPoint::new().with_value("L1", LimitType::Current, ThreeSides::One, 900.0);
        let provider = FixedOperatingPoints::new(base.clone()).with_contingency("c1", c1.clone());
        let network = Network::new();

        let quantity = MonitoredQuantity::new("L1", LimitType::Current, ThreeSides::One);
        let pre = provider.operating_point(&network, None).unwrap();
        assert_eq!(pre.get(&quantity), Some(100.0));

        let with_c1 = Contingency::single("c1", ContingencyElementType::Line);
        assert_eq!(provider.operating_point(&network, Some(&with_c1)).unwrap(), c1);

        let other = Contingency::single("c2", ContingencyElementType::Line);
        assert_eq!(provider.operating_point(&network, Some(&other)).unwrap(), base);
    }
}
