//! Contingency definitions: which elements are lost together.

use gridsec_core::{EquipmentKind, GridsecResult, Network, ThreeSides};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::traverser::TrippingResult;
use super::tripping::trip_element;

/// Family of a contingency element, selecting the trip strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyElementType {
    /// Any two-terminal AC branch (line, tie line, two windings transformer)
    Branch,
    Line,
    TieLine,
    TwoWindingsTransformer,
    ThreeWindingsTransformer,
    Generator,
    Load,
    Battery,
    ShuntCompensator,
    StaticVarCompensator,
    DanglingLine,
    BusbarSection,
    /// Configured bus of a bus/breaker voltage level
    Bus,
    HvdcLine,
    Switch,
    DcLine,
    DcNode,
    DcGround,
    AcDcConverter,
}

impl ContingencyElementType {
    /// Name used in "not found" errors.
    pub fn label(self) -> &'static str {
        match self {
            ContingencyElementType::Branch => "Branch",
            ContingencyElementType::Line => "Line",
            ContingencyElementType::TieLine => "Tie line",
            ContingencyElementType::TwoWindingsTransformer => "Two windings transformer",
            ContingencyElementType::ThreeWindingsTransformer => "Three windings transformer",
            ContingencyElementType::Generator => "Generator",
            ContingencyElementType::Load => "Load",
            ContingencyElementType::Battery => "Battery",
            ContingencyElementType::ShuntCompensator => "Shunt compensator",
            ContingencyElementType::StaticVarCompensator => "Static var compensator",
            ContingencyElementType::DanglingLine => "Dangling line",
            ContingencyElementType::BusbarSection => "Busbar section",
            ContingencyElementType::Bus => "Bus",
            ContingencyElementType::HvdcLine => "HVDC line",
            ContingencyElementType::Switch => "Switch",
            ContingencyElementType::DcLine => "DC line",
            ContingencyElementType::DcNode => "DC node",
            ContingencyElementType::DcGround => "DC ground",
            ContingencyElementType::AcDcConverter => "AC/DC converter",
        }
    }

    /// Element type tripping an equipment of this family, if it can be tripped
    /// on its own. Converter stations go through their HVDC line.
    pub fn from_equipment_kind(kind: EquipmentKind) -> Option<Self> {
        let element_type = match kind {
            EquipmentKind::Line => ContingencyElementType::Line,
            EquipmentKind::TieLine => ContingencyElementType::TieLine,
            EquipmentKind::TwoWindingsTransformer => ContingencyElementType::TwoWindingsTransformer,
            EquipmentKind::ThreeWindingsTransformer => ContingencyElementType::ThreeWindingsTransformer,
            EquipmentKind::Generator => ContingencyElementType::Generator,
            EquipmentKind::Load => ContingencyElementType::Load,
            EquipmentKind::Battery => ContingencyElementType::Battery,
            EquipmentKind::ShuntCompensator => ContingencyElementType::ShuntCompensator,
            EquipmentKind::StaticVarCompensator => ContingencyElementType::StaticVarCompensator,
            EquipmentKind::DanglingLine => ContingencyElementType::DanglingLine,
            EquipmentKind::BusbarSection => ContingencyElementType::BusbarSection,
            EquipmentKind::DcLine => ContingencyElementType::DcLine,
            EquipmentKind::DcGround => ContingencyElementType::DcGround,
            EquipmentKind::AcDcConverter => ContingencyElementType::AcDcConverter,
            EquipmentKind::LccConverterStation | EquipmentKind::VscConverterStation => return None,
        };
        Some(element_type)
    }

    /// Equipment families this element type resolves to. Empty for
    /// identifiables that are not equipment (bus, switch, HVDC line, DC node).
    pub fn equipment_kinds(self) -> &'static [EquipmentKind] {
        match self {
            ContingencyElementType::Branch => &[
                EquipmentKind::Line,
                EquipmentKind::TieLine,
                EquipmentKind::TwoWindingsTransformer,
            ],
            ContingencyElementType::Line => &[EquipmentKind::Line],
            ContingencyElementType::TieLine => &[EquipmentKind::TieLine],
            ContingencyElementType::TwoWindingsTransformer => &[EquipmentKind::TwoWindingsTransformer],
            ContingencyElementType::ThreeWindingsTransformer => &[EquipmentKind::ThreeWindingsTransformer],
            ContingencyElementType::Generator => &[EquipmentKind::Generator],
            ContingencyElementType::Load => &[EquipmentKind::Load],
            ContingencyElementType::Battery => &[EquipmentKind::Battery],
            ContingencyElementType::ShuntCompensator => &[EquipmentKind::ShuntCompensator],
            ContingencyElementType::StaticVarCompensator => &[EquipmentKind::StaticVarCompensator],
            ContingencyElementType::DanglingLine => &[EquipmentKind::DanglingLine],
            ContingencyElementType::BusbarSection => &[EquipmentKind::BusbarSection],
            ContingencyElementType::DcLine => &[EquipmentKind::DcLine],
            ContingencyElementType::DcGround => &[EquipmentKind::DcGround],
            ContingencyElementType::AcDcConverter => &[EquipmentKind::AcDcConverter],
            ContingencyElementType::Bus
            | ContingencyElementType::HvdcLine
            | ContingencyElementType::Switch
            | ContingencyElementType::DcNode => &[],
        }
    }
}

/// Disambiguates which side of a multi-terminal element is isolated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Side(ThreeSides),
    /// The side(s) connected to this voltage level
    VoltageLevel(String),
    /// The DC side connected to this DC node
    DcNode(String),
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::Side(side) => write!(f, "side {side}"),
            Anchor::VoltageLevel(vl) => write!(f, "voltage level '{vl}'"),
            Anchor::DcNode(node) => write!(f, "DC node '{node}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyElement {
    pub id: String,
    pub element_type: ContingencyElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

impl ContingencyElement {
    pub fn new(id: impl Into<String>, element_type: ContingencyElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            anchor: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Whether the id resolves to an element of the declared type.
    pub fn exists_in(&self, network: &Network) -> bool {
        match self.element_type {
            ContingencyElementType::Bus => network.bus(&self.id).is_some(),
            ContingencyElementType::HvdcLine => network.hvdc_line(&self.id).is_some(),
            ContingencyElementType::Switch => network.find_switch(&self.id).is_some(),
            ContingencyElementType::DcNode => network.find_dc_node(&self.id).is_some(),
            element_type => network
                .get_equipment(&self.id)
                .is_some_and(|e| element_type.equipment_kinds().contains(&e.kind)),
        }
    }

    /// Switches and terminals isolating this element.
    pub fn trip(&self, network: &Network) -> GridsecResult<TrippingResult> {
        trip_element(network, &self.id, self.element_type, self.anchor.as_ref())
    }
}

/// A set of elements lost together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contingency {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub elements: Vec<ContingencyElement>,
}

impl Contingency {
    pub fn new(id: impl Into<String>, elements: Vec<ContingencyElement>) -> Self {
        Self {
            id: id.into(),
            name: None,
            elements,
        }
    }

    /// Single-element contingency named after the element.
    pub fn single(id: impl Into<String>, element_type: ContingencyElementType) -> Self {
        let id = id.into();
        Self::new(id.clone(), vec![ContingencyElement::new(id, element_type)])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Every element exists with its declared type.
    pub fn is_valid(&self, network: &Network) -> bool {
        !self.elements.is_empty() && self.elements.iter().all(|e| e.exists_in(network))
    }

    /// Keeps the contingencies valid on `network`, logging the others.
    pub fn check_validity(contingencies: &[Contingency], network: &Network) -> Vec<Contingency> {
        contingencies
            .iter()
            .filter(|contingency| {
                let valid = contingency.is_valid(network);
                if !valid {
                    warn!(contingency = %contingency.id, "contingency is invalid on this network, skipped");
                }
                valid
            })
            .cloned()
            .collect()
    }

    /// Union of the tripping results of all elements. Any element that cannot
    /// be tripped fails the whole contingency.
    pub fn trip(&self, network: &Network) -> GridsecResult<TrippingResult> {
        let mut result = TrippingResult::new();
        for element in &self.elements {
            result.merge(element.trip(network)?);
        }
        Ok(result)
    }
}
