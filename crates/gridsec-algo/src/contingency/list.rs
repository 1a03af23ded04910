//! Contingency lists expanded against a network.
//!
//! | List | Yields |
//! |------|--------|
//! | [`CriterionContingencyList`] | one single-element contingency per element of the list's type matching every criterion, in network order |
//! | [`IdentifierContingencyList`] | the listed contingencies, with unknown element ids dropped and reported |

use std::collections::{BTreeMap, BTreeSet};

use gridsec_core::{GridsecError, GridsecResult, IdentifiableRef, Network};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::definition::{Contingency, ContingencyElement, ContingencyElementType};
use crate::limit_reduction::{
    CountryCriterion, ElementFacts, IdPattern, NominalVoltageCriterion, PropertyScope,
};

/// A property that must take one of `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCondition {
    pub key: String,
    pub values: BTreeSet<String>,
    #[serde(default)]
    pub scope: PropertyScope,
}

/// Elements of one type selected by criteria. A missing criterion accepts
/// every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionContingencyList {
    pub name: String,
    pub element_type: ContingencyElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCriterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_voltage: Option<NominalVoltageCriterion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<IdPattern>,
}

impl CriterionContingencyList {
    pub fn new(name: impl Into<String>, element_type: ContingencyElementType) -> Self {
        Self {
            name: name.into(),
            element_type,
            country: None,
            nominal_voltage: None,
            properties: Vec::new(),
            regex: None,
        }
    }

    pub fn with_country(mut self, criterion: CountryCriterion) -> Self {
        self.country = Some(criterion);
        self
    }

    pub fn with_nominal_voltage(mut self, criterion: NominalVoltageCriterion) -> Self {
        self.nominal_voltage = Some(criterion);
        self
    }

    pub fn with_property<I, S>(mut self, key: impl Into<String>, values: I, scope: PropertyScope) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.push(PropertyCondition {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
            scope,
        });
        self
    }

    pub fn with_regex(mut self, pattern: &str) -> GridsecResult<Self> {
        self.regex = Some(IdPattern::new(pattern)?);
        Ok(self)
    }

    /// Only equipment families and HVDC lines can be listed by criteria.
    pub fn validate(&self) -> GridsecResult<()> {
        if self.element_type != ContingencyElementType::HvdcLine
            && self.element_type.equipment_kinds().is_empty()
        {
            return Err(GridsecError::Validation(format!(
                "contingency list '{}': {} elements cannot be selected by criteria",
                self.name,
                self.element_type.label()
            )));
        }
        if let Some(criterion) = &self.nominal_voltage {
            criterion.validate()?;
        }
        if self.properties.iter().any(|p| p.key.trim().is_empty()) {
            return Err(GridsecError::Validation(format!(
                "contingency list '{}': property criterion needs a key",
                self.name
            )));
        }
        Ok(())
    }

    pub fn matches(&self, facts: &ElementFacts<'_>) -> bool {
        self.country.as_ref().map_or(true, |c| c.matches(facts))
            && self.nominal_voltage.as_ref().map_or(true, |v| v.matches(facts))
            && self
                .properties
                .iter()
                .all(|p| facts.has_property_in(&p.key, &p.values, p.scope))
            && self.regex.as_ref().map_or(true, |r| r.is_match(facts.id()))
    }

    /// One contingency per matching element, named after it.
    pub fn contingencies(&self, network: &Network) -> GridsecResult<Vec<Contingency>> {
        self.validate()?;
        let element_type = self.element_type;
        let contingencies: Vec<Contingency> = if element_type == ContingencyElementType::HvdcLine {
            network
                .hvdc_lines()
                .iter()
                .map(|line| ElementFacts::hvdc_line(network, line))
                .filter(|facts| self.matches(facts))
                .map(|facts| Contingency::single(facts.id(), element_type))
                .collect()
        } else {
            let kinds = element_type.equipment_kinds();
            network
                .equipment_iter()
                .filter(|(_, equipment)| kinds.contains(&equipment.kind))
                .map(|(id, _)| ElementFacts::new(network, id))
                .filter(|facts| self.matches(facts))
                .map(|facts| Contingency::single(facts.id(), element_type))
                .collect()
        };
        debug!(list = %self.name, count = contingencies.len(), "criterion contingency list expanded");
        Ok(contingencies)
    }
}

/// Elements named explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkElementIdentifier {
    /// One element, lost alone. The contingency takes the element id unless
    /// `contingency_id` is given.
    Id {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contingency_id: Option<String>,
    },
    /// Elements lost together
    List {
        contingency_id: String,
        ids: Vec<String>,
    },
}

impl NetworkElementIdentifier {
    pub fn id(id: impl Into<String>) -> Self {
        NetworkElementIdentifier::Id {
            id: id.into(),
            contingency_id: None,
        }
    }

    pub fn list<I, S>(contingency_id: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NetworkElementIdentifier::List {
            contingency_id: contingency_id.into(),
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contingency_id(&self) -> &str {
        match self {
            NetworkElementIdentifier::Id { id, contingency_id } => contingency_id.as_deref().unwrap_or(id),
            NetworkElementIdentifier::List { contingency_id, .. } => contingency_id,
        }
    }

    fn element_ids(&self) -> &[String] {
        match self {
            NetworkElementIdentifier::Id { id, .. } => std::slice::from_ref(id),
            NetworkElementIdentifier::List { ids, .. } => ids,
        }
    }
}

/// Contingencies given element by element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierContingencyList {
    pub name: String,
    pub identifiers: Vec<NetworkElementIdentifier>,
}

/// Outcome of resolving an [`IdentifierContingencyList`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedContingencies {
    pub contingencies: Vec<Contingency>,
    /// Ids that do not name a trippable element, by contingency id
    pub not_found: BTreeMap<String, BTreeSet<String>>,
}

impl IdentifierContingencyList {
    pub fn new(name: impl Into<String>, identifiers: Vec<NetworkElementIdentifier>) -> Self {
        Self {
            name: name.into(),
            identifiers,
        }
    }

    /// Resolve every id. Unknown ids are dropped, and a contingency left
    /// without any element is dropped too.
    pub fn resolve(&self, network: &Network) -> ResolvedContingencies {
        let mut resolved = ResolvedContingencies::default();
        for identifier in &self.identifiers {
            let contingency_id = identifier.contingency_id();
            let mut elements = Vec::new();
            for id in identifier.element_ids() {
                match element_type_of(network, id) {
                    Some(element_type) => elements.push(ContingencyElement::new(id.as_str(), element_type)),
                    None => {
                        resolved
                            .not_found
                            .entry(contingency_id.to_string())
                            .or_default()
                            .insert(id.clone());
                    }
                }
            }
            if elements.is_empty() {
                warn!(list = %self.name, contingency = contingency_id, "no element found, contingency dropped");
                continue;
            }
            resolved.contingencies.push(Contingency::new(contingency_id, elements));
        }
        resolved
    }

    pub fn contingencies(&self, network: &Network) -> Vec<Contingency> {
        self.resolve(network).contingencies
    }
}

/// Element type to trip the identifiable named `id` with.
pub fn element_type_of(network: &Network, id: &str) -> Option<ContingencyElementType> {
    match network.identifiable(id)? {
        IdentifiableRef::Equipment(equipment) => {
            ContingencyElementType::from_equipment_kind(network.equipment(equipment).kind)
        }
        IdentifiableRef::Bus { .. } => Some(ContingencyElementType::Bus),
        IdentifiableRef::Switch(_) => Some(ContingencyElementType::Switch),
        IdentifiableRef::HvdcLine(_) => Some(ContingencyElementType::HvdcLine),
        IdentifiableRef::DcNode(_) => Some(ContingencyElementType::DcNode),
        IdentifiableRef::Substation(_)
        | IdentifiableRef::VoltageLevel(_)
        | IdentifiableRef::DcSwitch(_) => None,
    }
}
