//! Limit reduction rules.

use gridsec_core::{GridsecError, GridsecResult, LimitDuration, LimitType};
use serde::Serialize;

use super::context::{is_context_list_applicable, ContingencyContext};
use super::criteria::{any_element_criterion_matches, ElementFacts, NetworkElementCriterion};
use super::duration::{any_duration_criterion_matches, DurationCriterion};

/// A derating factor applied to the limits selected by its criteria.
///
/// Immutable once built; construction goes through [`LimitReduction::builder`],
/// which rejects factors outside `[0, 1]` and limit types that cannot be reduced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitReduction {
    limit_type: LimitType,
    value: f64,
    monitoring_only: bool,
    contingency_contexts: Vec<ContingencyContext>,
    network_element_criteria: Vec<NetworkElementCriterion>,
    duration_criteria: Vec<DurationCriterion>,
}

impl LimitReduction {
    pub fn builder(limit_type: LimitType, value: f64) -> LimitReductionBuilder {
        LimitReductionBuilder {
            limit_type,
            value,
            monitoring_only: false,
            contingency_contexts: Vec::new(),
            network_element_criteria: Vec::new(),
            duration_criteria: Vec::new(),
        }
    }

    /// Shorthand for a reduction with no criteria.
    pub fn new(limit_type: LimitType, value: f64) -> GridsecResult<Self> {
        Self::builder(limit_type, value).build()
    }

    pub fn limit_type(&self) -> LimitType {
        self.limit_type
    }

    /// Factor applied to the selected limits.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_monitoring_only(&self) -> bool {
        self.monitoring_only
    }

    pub fn contingency_contexts(&self) -> &[ContingencyContext] {
        &self.contingency_contexts
    }

    pub fn network_element_criteria(&self) -> &[NetworkElementCriterion] {
        &self.network_element_criteria
    }

    pub fn duration_criteria(&self) -> &[DurationCriterion] {
        &self.duration_criteria
    }

    pub fn is_applicable_to_contingency(&self, contingency: Option<&str>) -> bool {
        is_context_list_applicable(&self.contingency_contexts, contingency)
    }

    pub fn matches_element(&self, facts: &ElementFacts<'_>) -> bool {
        any_element_criterion_matches(&self.network_element_criteria, facts)
    }

    pub fn matches_duration(&self, duration: LimitDuration) -> bool {
        any_duration_criterion_matches(&self.duration_criteria, duration)
    }
}

#[derive(Debug, Clone)]
pub struct LimitReductionBuilder {
    limit_type: LimitType,
    value: f64,
    monitoring_only: bool,
    contingency_contexts: Vec<ContingencyContext>,
    network_element_criteria: Vec<NetworkElementCriterion>,
    duration_criteria: Vec<DurationCriterion>,
}

impl LimitReductionBuilder {
    pub fn with_monitoring_only(mut self, monitoring_only: bool) -> Self {
        self.monitoring_only = monitoring_only;
        self
    }

    pub fn with_contingency_context(mut self, context: ContingencyContext) -> Self {
        self.contingency_contexts.push(context);
        self
    }

    pub fn with_contingency_contexts(mut self, contexts: impl IntoIterator<Item = ContingencyContext>) -> Self {
        self.contingency_contexts.extend(contexts);
        self
    }

    pub fn with_network_element_criterion(mut self, criterion: NetworkElementCriterion) -> Self {
        self.network_element_criteria.push(criterion);
        self
    }

    pub fn with_network_element_criteria(
        mut self,
        criteria: impl IntoIterator<Item = NetworkElementCriterion>,
    ) -> Self {
        self.network_element_criteria.extend(criteria);
        self
    }

    pub fn with_duration_criterion(mut self, criterion: DurationCriterion) -> Self {
        self.duration_criteria.push(criterion);
        self
    }

    pub fn with_duration_criteria(mut self, criteria: impl IntoIterator<Item = DurationCriterion>) -> Self {
        self.duration_criteria.extend(criteria);
        self
    }

    pub fn build(self) -> GridsecResult<LimitReduction> {
        if !self.value.is_finite() || !(0.0..=1.0).contains(&self.value) {
            return Err(GridsecError::InvalidReduction(format!(
                "reduction value should be in [0, 1], got {}",
                self.value
            )));
        }
        if !self.limit_type.is_reducible() {
            return Err(GridsecError::InvalidReduction(format!(
                "{} is not a supported limit type for limit reduction",
                self.limit_type
            )));
        }
        for criterion in &self.network_element_criteria {
            criterion.validate()?;
        }
        for criterion in &self.duration_criteria {
            criterion.validate()?;
        }
        Ok(LimitReduction {
            limit_type: self.limit_type,
            value: self.value,
            monitoring_only: self.monitoring_only,
            contingency_contexts: self.contingency_contexts,
            network_element_criteria: self.network_element_criteria,
            duration_criteria: self.duration_criteria,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_out_of_range_is_rejected() {
        for value in [-0.1, 1.1, f64::NAN, f64::INFINITY] {
            let err = LimitReduction::new(LimitType::Current, value).unwrap_err();
            assert!(matches!(err, GridsecError::InvalidReduction(_)), "{value}");
        }
        assert!(LimitReduction::new(LimitType::Current, 0.0).is_ok());
        assert!(LimitReduction::new(LimitType::Current, 1.0).is_ok());
    }

    #[test]
    fn test_non_reducible_type_is_rejected() {
        let err = LimitReduction::new(LimitType::Voltage, 0.9).unwrap_err();
        assert!(err.to_string().contains("VOLTAGE is not a supported limit type"));
    }

    #[test]
    fn test_builder_keeps_criteria_order() {
        let reduction = LimitReduction::builder(LimitType::Current, 0.9)
            .with_monitoring_only(true)
            .with_contingency_context(ContingencyContext::NoContingency)
            .with_contingency_context(ContingencyContext::specific("c1"))
            .with_duration_criterion(DurationCriterion::Permanent)
            .build()
            .unwrap();

        assert!(reduction.is_monitoring_only());
        assert_eq!(reduction.contingency_contexts().len(), 2);
        assert!(reduction.is_applicable_to_contingency(None));
        assert!(reduction.is_applicable_to_contingency(Some("c1")));
        assert!(!reduction.is_applicable_to_contingency(Some("c2")));
        assert!(reduction.matches_duration(LimitDuration::Permanent));
        assert!(!reduction.matches_duration(LimitDuration::Temporary(60)));
    }
}
