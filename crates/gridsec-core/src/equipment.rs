//! Equipment families and their connection points.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::limits::{LimitType, LoadingLimits, ThreeSides};
use crate::{DcTerminalId, EquipmentId, TerminalId, VoltageLevelId};

/// Every equipment family that owns terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentKind {
    Load,
    Generator,
    Battery,
    ShuntCompensator,
    StaticVarCompensator,
    DanglingLine,
    LccConverterStation,
    VscConverterStation,
    BusbarSection,
    Line,
    TieLine,
    TwoWindingsTransformer,
    ThreeWindingsTransformer,
    DcLine,
    DcGround,
    AcDcConverter,
}

impl EquipmentKind {
    /// Human readable family name, as used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentKind::Load => "Load",
            EquipmentKind::Generator => "Generator",
            EquipmentKind::Battery => "Battery",
            EquipmentKind::ShuntCompensator => "Shunt compensator",
            EquipmentKind::StaticVarCompensator => "Static var compensator",
            EquipmentKind::DanglingLine => "Dangling line",
            EquipmentKind::LccConverterStation => "LCC converter station",
            EquipmentKind::VscConverterStation => "VSC converter station",
            EquipmentKind::BusbarSection => "Busbar section",
            EquipmentKind::Line => "Line",
            EquipmentKind::TieLine => "Tie line",
            EquipmentKind::TwoWindingsTransformer => "Two windings transformer",
            EquipmentKind::ThreeWindingsTransformer => "Three windings transformer",
            EquipmentKind::DcLine => "DC line",
            EquipmentKind::DcGround => "DC ground",
            EquipmentKind::AcDcConverter => "AC/DC converter",
        }
    }

    /// Number of AC terminals equipment of this family carries.
    pub fn ac_terminal_count(self) -> usize {
        match self {
            EquipmentKind::Line
            | EquipmentKind::TieLine
            | EquipmentKind::TwoWindingsTransformer => 2,
            EquipmentKind::ThreeWindingsTransformer => 3,
            EquipmentKind::DcLine | EquipmentKind::DcGround => 0,
            _ => 1,
        }
    }

    pub fn dc_terminal_count(self) -> usize {
        match self {
            EquipmentKind::DcLine | EquipmentKind::AcDcConverter => 2,
            EquipmentKind::DcGround => 1,
            _ => 0,
        }
    }

    /// Two-terminal AC branches.
    pub fn is_branch(self) -> bool {
        self.ac_terminal_count() == 2
    }
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AC connection point of one equipment side.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub equipment: EquipmentId,
    pub side: ThreeSides,
    pub voltage_level: VoltageLevelId,
    pub vertex: NodeIndex,
    /// Bus/breaker connectivity. Node/breaker terminals derive their
    /// connectivity from the switches around them and keep this set.
    pub connected: bool,
}

#[derive(Debug, Clone)]
pub struct Equipment {
    pub id: String,
    pub name: Option<String>,
    pub kind: EquipmentKind,
    /// AC terminals, indexed by side
    pub terminals: Vec<TerminalId>,
    /// DC terminals, indexed by side
    pub dc_terminals: Vec<DcTerminalId>,
    pub properties: BTreeMap<String, String>,
    pub(crate) limits: BTreeMap<(LimitType, ThreeSides), LoadingLimits>,
}

impl Equipment {
    pub fn new(id: impl Into<String>, kind: EquipmentKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            terminals: Vec::new(),
            dc_terminals: Vec::new(),
            properties: BTreeMap::new(),
            limits: BTreeMap::new(),
        }
    }

    pub fn terminal(&self, side: ThreeSides) -> Option<TerminalId> {
        self.terminals.get(side.index()).copied()
    }

    pub fn dc_terminal(&self, side: ThreeSides) -> Option<DcTerminalId> {
        self.dc_terminals.get(side.index()).copied()
    }

    /// Limits of one category on one side, if any were defined.
    pub fn limits(&self, limit_type: LimitType, side: ThreeSides) -> Option<&LoadingLimits> {
        self.limits.get(&(limit_type, side))
    }

    pub fn limit_sets(&self) -> impl Iterator<Item = (LimitType, ThreeSides, &LoadingLimits)> {
        self.limits
            .iter()
            .map(|(&(limit_type, side), limits)| (limit_type, side, limits))
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// HVDC link between two converter stations. Owns no terminal itself.
#[derive(Debug, Clone, PartialEq)]
pub struct HvdcLine {
    pub id: String,
    pub converter_station1: EquipmentId,
    pub converter_station2: EquipmentId,
}

impl HvdcLine {
    pub fn converter_station(&self, side: ThreeSides) -> Option<EquipmentId> {
        match side {
            ThreeSides::One => Some(self.converter_station1),
            ThreeSides::Two => Some(self.converter_station2),
            ThreeSides::Three => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Substation {
    pub id: String,
    /// ISO country code
    pub country: Option<String>,
    pub properties: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_counts() {
        assert_eq!(EquipmentKind::Line.ac_terminal_count(), 2);
        assert_eq!(EquipmentKind::ThreeWindingsTransformer.ac_terminal_count(), 3);
        assert_eq!(EquipmentKind::DcGround.ac_terminal_count(), 0);
        assert_eq!(EquipmentKind::AcDcConverter.dc_terminal_count(), 2);
        assert!(EquipmentKind::TieLine.is_branch());
        assert!(!EquipmentKind::DanglingLine.is_branch());
    }

    #[test]
    fn test_limits_lookup() {
        let mut line = Equipment::new("L1", EquipmentKind::Line);
        line.limits.insert(
            (LimitType::Current, ThreeSides::Two),
            LoadingLimits::new(1100.0),
        );
        assert!(line.limits(LimitType::Current, ThreeSides::One).is_none());
        assert_eq!(
            line.limits(LimitType::Current, ThreeSides::Two)
                .map(|l| l.permanent_limit()),
            Some(1100.0)
        );
        assert_eq!(line.limit_sets().count(), 1);
    }
}
