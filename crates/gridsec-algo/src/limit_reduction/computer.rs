//! Reduced-limits computer with a contingency-scoped cache.
//!
//! The computer owns an ordered list of [`LimitReduction`]s and a cursor on
//! the contingency being evaluated. Moving the cursor filters the reductions
//! down to those whose contexts authorize the new contingency; the per-category
//! subsets derived from that list are then rebuilt lazily, and only if the
//! applicable list actually changed.
//!
//! ## Cursor
//!
//! ```text
//! set_active_contingency(None)      applicable = [r2, r6]
//! set_active_contingency("c2")      applicable = [r2, r6]   -> true, cache kept
//! set_active_contingency("c1")      applicable = [r1, r2, r6] -> false, cache dropped
//! ```
//!
//! The cursor is mutable state: one computer serves one contingency at a time.
//! Parallel drivers clone it per worker; the reduction list itself is shared.

use std::collections::HashMap;
use std::sync::Arc;

use gridsec_core::{LimitDuration, LimitType, LoadingLimits, Network, ThreeSides};
use serde::Serialize;
use tracing::debug;

use super::criteria::ElementFacts;
use super::reducer::reduce_limits;
use super::reduction::LimitReduction;

/// Original and reduced limits of one (element, limit type, side).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitsContainer {
    pub original: LoadingLimits,
    pub reduced: LoadingLimits,
    /// At least one factor other than 1.0 was applied
    pub has_changed: bool,
}

impl LimitsContainer {
    pub fn unchanged(original: LoadingLimits) -> Self {
        Self {
            reduced: original.clone(),
            original,
            has_changed: false,
        }
    }

    /// Reduction factor applied to the permanent limit.
    pub fn permanent_reduction(&self) -> f64 {
        let original = self.original.permanent_limit();
        if original == 0.0 || !original.is_finite() {
            1.0
        } else {
            self.reduced.permanent_limit() / original
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReducedLimitsComputer {
    reductions: Arc<[LimitReduction]>,
    active_contingency: Option<String>,
    /// Indices of the reductions authorized under the active contingency
    applicable: Vec<usize>,
    same_as_previous: bool,
    /// Subsets of `applicable` per (limit type, monitoring only)
    by_category: HashMap<(LimitType, bool), Arc<[usize]>>,
}

impl ReducedLimitsComputer {
    /// A computer positioned on the pre-contingency state.
    pub fn new(reductions: Vec<LimitReduction>) -> Self {
        let reductions: Arc<[LimitReduction]> = reductions.into();
        let applicable = applicable_indices(&reductions, None);
        Self {
            reductions,
            active_contingency: None,
            applicable,
            same_as_previous: true,
            by_category: HashMap::new(),
        }
    }

    pub fn reductions(&self) -> &[LimitReduction] {
        &self.reductions
    }

    pub fn active_contingency(&self) -> Option<&str> {
        self.active_contingency.as_deref()
    }

    /// Whether the last cursor move kept the same applicable reductions.
    pub fn is_same_as_previous(&self) -> bool {
        self.same_as_previous
    }

    /// Move the cursor to `contingency` (`None` = pre-contingency).
    ///
    /// Returns `true` when exactly the same reductions (by position in the
    /// list) apply as before, in which case cached subsets are kept.
    pub fn set_active_contingency(&mut self, contingency: Option<&str>) -> bool {
        let applicable = applicable_indices(&self.reductions, contingency);
        let same = applicable == self.applicable;
        if !same {
            self.applicable = applicable;
            self.by_category.clear();
        }
        self.same_as_previous = same;
        self.active_contingency = contingency.map(str::to_string);
        debug!(
            contingency = contingency.unwrap_or("<pre-contingency>"),
            applicable = self.applicable.len(),
            same_as_previous = same,
            "active contingency changed"
        );
        same
    }

    /// Limits of `element_id` for `(limit_type, side)` under the active
    /// contingency, or `None` when the element has no such limits.
    pub fn compute_limits(
        &mut self,
        network: &Network,
        element_id: &str,
        limit_type: LimitType,
        side: ThreeSides,
        monitoring_only: bool,
    ) -> Option<LimitsContainer> {
        let equipment = network.find_equipment(element_id)?;
        let original = network.equipment(equipment).limits(limit_type, side)?.clone();

        let subset = self.category_subset(limit_type, monitoring_only);
        let facts = ElementFacts::new(network, equipment).focused(side);
        let matching: Vec<&LimitReduction> = subset
            .iter()
            .map(|&i| &self.reductions[i])
            .filter(|reduction| reduction.matches_element(&facts))
            .collect();
        if matching.is_empty() {
            return Some(LimitsContainer::unchanged(original));
        }

        let (reduced, has_changed) = reduce_limits(&original, |duration: LimitDuration| {
            matching
                .iter()
                .rev()
                .find(|reduction| reduction.matches_duration(duration))
                .map_or(1.0, |reduction| reduction.value())
        });
        Some(LimitsContainer {
            original,
            reduced,
            has_changed,
        })
    }

    fn category_subset(&mut self, limit_type: LimitType, monitoring_only: bool) -> Arc<[usize]> {
        if let Some(subset) = self.by_category.get(&(limit_type, monitoring_only)) {
            return Arc::clone(subset);
        }
        let subset: Arc<[usize]> = self
            .applicable
            .iter()
            .copied()
            .filter(|&i| {
                let reduction = &self.reductions[i];
                reduction.limit_type() == limit_type && reduction.is_monitoring_only() == monitoring_only
            })
            .collect();
        debug!(
            %limit_type,
            monitoring_only,
            reductions = subset.len(),
            "reduction subset cached"
        );
        self.by_category
            .insert((limit_type, monitoring_only), Arc::clone(&subset));
        subset
    }
}

fn applicable_indices(reductions: &[LimitReduction], contingency: Option<&str>) -> Vec<usize> {
    reductions
        .iter()
        .enumerate()
        .filter(|(_, reduction)| reduction.is_applicable_to_contingency(contingency))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit_reduction::{ContingencyContext, DurationCriterion, NetworkElementCriterion};
    use crate::test_utils::tutorial_network;

    fn reductions() -> Vec<LimitReduction> {
        vec![
            LimitReduction::builder(LimitType::Current, 0.9)
                .with_contingency_context(ContingencyContext::specific("contingency1"))
                .with_network_element_criterion(NetworkElementCriterion::id_list(["NHV1_NHV2_1"]))
                .with_duration_criterion(DurationCriterion::Permanent)
                .build()
                .unwrap(),
            LimitReduction::builder(LimitType::Current, 0.5)
                .with_network_element_criterion(NetworkElementCriterion::id_list(["NHV1_NHV2_2"]))
                .build()
                .unwrap(),
        ]
    }

    #[test]
    fn test_no_limits_is_none() {
        let network = tutorial_network();
        let mut computer = ReducedLimitsComputer::new(reductions());
        let limits =
            computer.compute_limits(&network, "NGEN_NHV1", LimitType::Current, ThreeSides::One, false);
        assert!(limits.is_none());
        assert!(computer
            .compute_limits(&network, "UNKNOWN", LimitType::Current, ThreeSides::One, false)
            .is_none());
    }

    #[test]
    fn test_cache_survives_equivalent_contingency() {
        let network = tutorial_network();
        let mut computer = ReducedLimitsComputer::new(reductions());
        computer.compute_limits(&network, "NHV1_NHV2_2", LimitType::Current, ThreeSides::One, false);
        assert_eq!(computer.by_category.len(), 1);

        assert!(computer.set_active_contingency(Some("contingency2")));
        assert_eq!(computer.by_category.len(), 1);

        assert!(!computer.set_active_contingency(Some("contingency1")));
        assert!(computer.by_category.is_empty());
        assert!(!computer.is_same_as_previous());
        assert_eq!(computer.active_contingency(), Some("contingency1"));
    }

    #[test]
    fn test_clones_are_independent_cursors() {
        let mut a = ReducedLimitsComputer::new(reductions());
        let mut b = a.clone();
        a.set_active_contingency(Some("contingency1"));
        assert!(b.set_active_contingency(None));
        assert_eq!(b.active_contingency(), None);
        assert!(Arc::ptr_eq(&a.reductions, &b.reductions));
    }
}
