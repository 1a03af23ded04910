//! Network element criteria.
//!
//! A criterion is a pure predicate over an [`ElementFacts`] view: the
//! equipment itself plus, for each of its sides, the nominal voltage, the
//! country and the properties of the voltage level and substation it sits in.
//!
//! Side-wise criteria come in two flavours:
//!
//! | Flavour | Matches when |
//! |---------|--------------|
//! | per side | each listed condition holds on a distinct side, in any order |
//! | at least one | the condition holds on one side |
//!
//! When the view is focused on one side (limit reduction works side by side),
//! "at least one" conditions only look at that side.

use std::collections::{BTreeMap, BTreeSet};

use gridsec_core::{
    Equipment, EquipmentId, EquipmentKind, GridsecError, GridsecResult, HvdcLine, Network,
    Substation, ThreeSides, VoltageLevel,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Nominal voltage interval in kV. A missing bound is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageInterval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default = "default_closed")]
    pub low_closed: bool,
    #[serde(default = "default_closed")]
    pub high_closed: bool,
}

fn default_closed() -> bool {
    true
}

impl VoltageInterval {
    pub fn between(low: f64, high: f64, low_closed: bool, high_closed: bool) -> GridsecResult<Self> {
        let interval = Self {
            low: Some(low),
            high: Some(high),
            low_closed,
            high_closed,
        };
        interval.validate()?;
        Ok(interval)
    }

    pub fn greater_than(low: f64, closed: bool) -> Self {
        Self {
            low: Some(low),
            high: None,
            low_closed: closed,
            high_closed: false,
        }
    }

    pub fn lower_than(high: f64, closed: bool) -> Self {
        Self {
            low: None,
            high: Some(high),
            low_closed: false,
            high_closed: closed,
        }
    }

    /// Rejects NaN bounds and inverted or empty intervals.
    pub fn validate(&self) -> GridsecResult<()> {
        if self.low.is_some_and(f64::is_nan) || self.high.is_some_and(f64::is_nan) {
            return Err(GridsecError::Validation(
                "voltage interval bounds must be numbers".into(),
            ));
        }
        if let (Some(low), Some(high)) = (self.low, self.high) {
            let empty = low > high || (low == high && !(self.low_closed && self.high_closed));
            if empty {
                return Err(GridsecError::Validation(format!(
                    "voltage interval [{low}, {high}] is empty"
                )));
            }
        }
        Ok(())
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_low = match self.low {
            Some(low) if self.low_closed => value >= low,
            Some(low) => value > low,
            None => true,
        };
        let below_high = match self.high {
            Some(high) if self.high_closed => value <= high,
            Some(high) => value < high,
            None => true,
        };
        above_low && below_high
    }
}

/// Nominal voltage condition on an element's sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NominalVoltageCriterion {
    /// One interval per side, matched against distinct sides in any order
    PerSide { intervals: Vec<VoltageInterval> },
    AtLeastOne { interval: VoltageInterval },
}

impl NominalVoltageCriterion {
    pub fn matches(&self, facts: &ElementFacts<'_>) -> bool {
        match self {
            NominalVoltageCriterion::PerSide { intervals } => {
                let values: Vec<f64> = facts.sides.iter().map(|s| s.nominal_v).collect();
                assign_to_distinct_sides(intervals, &values, |interval, v| interval.contains(*v))
            }
            NominalVoltageCriterion::AtLeastOne { interval } => facts
                .candidate_sides()
                .any(|side| interval.contains(side.nominal_v)),
        }
    }

    pub fn validate(&self) -> GridsecResult<()> {
        match self {
            NominalVoltageCriterion::PerSide { intervals } => {
                intervals.iter().try_for_each(VoltageInterval::validate)
            }
            NominalVoltageCriterion::AtLeastOne { interval } => interval.validate(),
        }
    }
}

/// Country condition on an element's sides. An empty country set accepts any
/// country, including none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CountryCriterion {
    PerSide { countries: Vec<BTreeSet<String>> },
    AtLeastOne { countries: BTreeSet<String> },
}

fn country_in(countries: &BTreeSet<String>, country: Option<&str>) -> bool {
    countries.is_empty() || country.is_some_and(|c| countries.contains(c))
}

impl CountryCriterion {
    pub fn matches(&self, facts: &ElementFacts<'_>) -> bool {
        match self {
            CountryCriterion::PerSide { countries } => {
                let values: Vec<Option<&str>> = facts.sides.iter().map(|s| s.country).collect();
                assign_to_distinct_sides(countries, &values, |set, c| country_in(set, *c))
            }
            CountryCriterion::AtLeastOne { countries } => facts
                .candidate_sides()
                .any(|side| country_in(countries, side.country)),
        }
    }
}

/// Whether every condition can be paired with a distinct side value it holds on.
fn assign_to_distinct_sides<C, V>(conditions: &[C], values: &[V], holds: impl Fn(&C, &V) -> bool) -> bool {
    fn search<C, V>(
        conditions: &[C],
        values: &[V],
        used: &mut Vec<bool>,
        holds: &dyn Fn(&C, &V) -> bool,
    ) -> bool {
        let Some((first, rest)) = conditions.split_first() else {
            return true;
        };
        for (i, value) in values.iter().enumerate() {
            if !used[i] && holds(first, value) {
                used[i] = true;
                if search(rest, values, used, holds) {
                    return true;
                }
                used[i] = false;
            }
        }
        false
    }

    if conditions.len() > values.len() {
        return false;
    }
    let mut used = vec![false; values.len()];
    search(conditions, values, &mut used, &holds)
}

/// Where a property criterion looks the key up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyScope {
    #[default]
    Element,
    VoltageLevel,
    Substation,
}

/// Compiled identifier pattern, (de)serialized as its source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdPattern(Regex);

impl IdPattern {
    pub fn new(pattern: &str) -> GridsecResult<Self> {
        Regex::new(pattern)
            .map(IdPattern)
            .map_err(|err| GridsecError::Validation(format!("invalid id pattern '{pattern}': {err}")))
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.0.is_match(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for IdPattern {
    type Error = GridsecError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        IdPattern::new(&pattern)
    }
}

impl From<IdPattern> for String {
    fn from(pattern: IdPattern) -> Self {
        pattern.0.as_str().to_string()
    }
}

impl PartialEq for IdPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Predicate selecting the elements a reduction applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkElementCriterion {
    /// Exact identifiers
    IdList { ids: BTreeSet<String> },
    /// Equipment families, optionally narrowed by country and nominal voltage.
    /// An empty family list accepts every family.
    Typed {
        #[serde(default)]
        element_types: Vec<EquipmentKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country: Option<CountryCriterion>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nominal_voltage: Option<NominalVoltageCriterion>,
    },
    /// A free-form property taking one of the listed values
    Property {
        key: String,
        values: BTreeSet<String>,
        #[serde(default)]
        scope: PropertyScope,
    },
    /// Identifier matched by a regular expression
    Regex { pattern: IdPattern },
}

impl NetworkElementCriterion {
    pub fn id_list<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NetworkElementCriterion::IdList {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn nominal_voltage(criterion: NominalVoltageCriterion) -> Self {
        NetworkElementCriterion::Typed {
            element_types: Vec::new(),
            country: None,
            nominal_voltage: Some(criterion),
        }
    }

    pub fn regex(pattern: &str) -> GridsecResult<Self> {
        Ok(NetworkElementCriterion::Regex {
            pattern: IdPattern::new(pattern)?,
        })
    }

    pub fn matches(&self, facts: &ElementFacts<'_>) -> bool {
        match self {
            NetworkElementCriterion::IdList { ids } => ids.contains(facts.id()),
            NetworkElementCriterion::Typed {
                element_types,
                country,
                nominal_voltage,
            } => {
                (element_types.is_empty()
                    || facts.kind().is_some_and(|kind| element_types.contains(&kind)))
                    && country.as_ref().map_or(true, |c| c.matches(facts))
                    && nominal_voltage.as_ref().map_or(true, |v| v.matches(facts))
            }
            NetworkElementCriterion::Property { key, values, scope } => {
                facts.has_property_in(key, values, *scope)
            }
            NetworkElementCriterion::Regex { pattern } => pattern.is_match(facts.id()),
        }
    }

    /// Checks run when a criterion enters a reduction.
    pub fn validate(&self) -> GridsecResult<()> {
        match self {
            NetworkElementCriterion::Typed {
                nominal_voltage: Some(criterion),
                ..
            } => criterion.validate(),
            NetworkElementCriterion::Property { key, .. } if key.trim().is_empty() => Err(
                GridsecError::Validation("property criterion needs a key".into()),
            ),
            _ => Ok(()),
        }
    }
}

/// Facts about one side of an element.
#[derive(Debug, Clone)]
pub struct SideFacts<'n> {
    pub side: ThreeSides,
    pub nominal_v: f64,
    pub country: Option<&'n str>,
    pub voltage_level: &'n VoltageLevel,
    pub substation: Option<&'n Substation>,
}

/// Read-only view of an element that criteria are evaluated against.
#[derive(Debug, Clone)]
pub struct ElementFacts<'n> {
    id: &'n str,
    /// `None` for elements that are not equipment (HVDC lines)
    kind: Option<EquipmentKind>,
    properties: Option<&'n BTreeMap<String, String>>,
    sides: Vec<SideFacts<'n>>,
    focus: Option<ThreeSides>,
}

fn side_facts<'n>(network: &'n Network, id: EquipmentId, side: ThreeSides, as_side: ThreeSides) -> Option<SideFacts<'n>> {
    let voltage_level = network.side_voltage_level(id, side)?;
    let substation = voltage_level
        .substation
        .as_deref()
        .and_then(|s| network.substation(s));
    Some(SideFacts {
        side: as_side,
        nominal_v: voltage_level.nominal_v.value(),
        country: substation.and_then(|s| s.country.as_deref()),
        voltage_level,
        substation,
    })
}

impl<'n> ElementFacts<'n> {
    pub fn new(network: &'n Network, id: EquipmentId) -> Self {
        let equipment: &'n Equipment = network.equipment(id);
        let sides = ThreeSides::ALL
            .iter()
            .filter_map(|&side| side_facts(network, id, side, side))
            .collect();
        Self {
            id: &equipment.id,
            kind: Some(equipment.kind),
            properties: Some(&equipment.properties),
            sides,
            focus: None,
        }
    }

    /// An HVDC line seen through its converter stations: side ONE is where
    /// station 1 connects, side TWO where station 2 does.
    pub fn hvdc_line(network: &'n Network, line: &'n HvdcLine) -> Self {
        let sides = [ThreeSides::One, ThreeSides::Two]
            .into_iter()
            .filter_map(|side| {
                let station = line.converter_station(side)?;
                side_facts(network, station, ThreeSides::One, side)
            })
            .collect();
        Self {
            id: &line.id,
            kind: None,
            properties: None,
            sides,
            focus: None,
        }
    }

    /// Restrict "at least one side" conditions to `side`.
    pub fn focused(mut self, side: ThreeSides) -> Self {
        self.focus = Some(side);
        self
    }

    pub fn id(&self) -> &'n str {
        self.id
    }

    pub fn kind(&self) -> Option<EquipmentKind> {
        self.kind
    }

    pub fn sides(&self) -> &[SideFacts<'n>] {
        &self.sides
    }

    fn candidate_sides(&self) -> impl Iterator<Item = &SideFacts<'n>> + '_ {
        let focus = self.focus;
        self.sides
            .iter()
            .filter(move |s| focus.map_or(true, |f| s.side == f))
    }

    /// Whether `key` takes one of `values` in `scope`.
    pub fn has_property_in(&self, key: &str, values: &BTreeSet<String>, scope: PropertyScope) -> bool {
        self.property_values(key, scope).any(|v| values.contains(v))
    }

    fn property_values<'a>(
        &'a self,
        key: &'a str,
        scope: PropertyScope,
    ) -> Box<dyn Iterator<Item = &'n str> + 'a> {
        match scope {
            PropertyScope::Element => Box::new(
                self.properties
                    .and_then(|properties| properties.get(key))
                    .map(String::as_str)
                    .into_iter(),
            ),
            PropertyScope::VoltageLevel => Box::new(
                self.candidate_sides()
                    .filter_map(move |s| s.voltage_level.properties.get(key).map(String::as_str)),
            ),
            PropertyScope::Substation => Box::new(self.candidate_sides().filter_map(move |s| {
                s.substation
                    .and_then(|sub| sub.properties.get(key))
                    .map(String::as_str)
            })),
        }
    }
}

/// Empty list, or any member matches.
pub fn any_element_criterion_matches(criteria: &[NetworkElementCriterion], facts: &ElementFacts<'_>) -> bool {
    criteria.is_empty() || criteria.iter().any(|c| c.matches(facts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::tutorial_network;

    fn facts<'n>(network: &'n Network, id: &str) -> ElementFacts<'n> {
        ElementFacts::new(network, network.find_equipment(id).unwrap())
    }

    #[test]
    fn test_interval_bounds() {
        let closed = VoltageInterval::between(150.0, 160.0, true, true).unwrap();
        assert!(closed.contains(150.0));
        assert!(closed.contains(160.0));
        assert!(!closed.contains(160.1));

        let open = VoltageInterval::between(150.0, 160.0, false, false).unwrap();
        assert!(!open.contains(150.0));
        assert!(open.contains(155.0));

        assert!(VoltageInterval::greater_than(225.0, false).contains(380.0));
        assert!(!VoltageInterval::lower_than(225.0, false).contains(225.0));
        assert!(VoltageInterval::between(160.0, 150.0, true, true).is_err());
        assert!(VoltageInterval::between(150.0, 150.0, true, false).is_err());
    }

    #[test]
    fn test_at_least_one_voltage_respects_focus() {
        let network = tutorial_network();
        let criterion = NominalVoltageCriterion::AtLeastOne {
            interval: VoltageInterval::between(150.0, 160.0, true, true).unwrap(),
        };
        let transformer = facts(&network, "NHV2_NLOAD");
        assert!(criterion.matches(&transformer));
        assert!(!criterion.matches(&transformer.clone().focused(ThreeSides::One)));
        assert!(criterion.matches(&transformer.focused(ThreeSides::Two)));
    }

    #[test]
    fn test_per_side_voltage_in_any_order() {
        let network = tutorial_network();
        let criterion = NominalVoltageCriterion::PerSide {
            intervals: vec![
                VoltageInterval::between(140.0, 160.0, true, true).unwrap(),
                VoltageInterval::greater_than(300.0, true),
            ],
        };
        assert!(criterion.matches(&facts(&network, "NHV2_NLOAD")));
        assert!(!criterion.matches(&facts(&network, "NHV1_NHV2_1")));
    }

    #[test]
    fn test_country_criteria() {
        let network = tutorial_network();
        let line = facts(&network, "NHV1_NHV2_1");
        let fr_be = CountryCriterion::PerSide {
            countries: vec![BTreeSet::from(["BE".to_string()]), BTreeSet::from(["FR".to_string()])],
        };
        assert!(fr_be.matches(&line));

        let only_be = CountryCriterion::AtLeastOne {
            countries: BTreeSet::from(["BE".to_string()]),
        };
        assert!(only_be.matches(&line));
        assert!(!only_be.matches(&line.focused(ThreeSides::One)));
    }

    #[test]
    fn test_element_criteria() {
        let network = tutorial_network();
        let transformer = facts(&network, "NHV2_NLOAD");

        assert!(NetworkElementCriterion::id_list(["NHV2_NLOAD"]).matches(&transformer));
        assert!(NetworkElementCriterion::regex("^NHV2_").unwrap().matches(&transformer));
        assert!(!NetworkElementCriterion::regex("^NHV1_").unwrap().matches(&transformer));

        let lines_only = NetworkElementCriterion::Typed {
            element_types: vec![EquipmentKind::Line],
            country: None,
            nominal_voltage: None,
        };
        assert!(!lines_only.matches(&transformer));

        let operator = NetworkElementCriterion::Property {
            key: "operator".into(),
            values: BTreeSet::from(["RTE".to_string()]),
            scope: PropertyScope::Element,
        };
        assert!(operator.matches(&transformer));
        assert!(!operator.matches(&facts(&network, "NHV1_NHV2_1")));

        assert!(any_element_criterion_matches(&[], &transformer));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = NetworkElementCriterion::regex("(").unwrap_err();
        assert!(matches!(err, GridsecError::Validation(_)));
    }

    #[test]
    fn test_criterion_yaml() {
        let yaml = "type: REGEX\npattern: '^NHV1_.*'\n";
        let criterion: NetworkElementCriterion = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(criterion, NetworkElementCriterion::regex("^NHV1_.*").unwrap());
    }
}
