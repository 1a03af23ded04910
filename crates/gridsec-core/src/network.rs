//! The network container and its read-only queries.
//!
//! A [`Network`] stores every element in an arena (`Vec`) and hands out typed
//! indices ([`TerminalId`], [`SwitchId`], ...). String identifiers resolve
//! through a single index, so "does equipment X exist" is one lookup no
//! matter the element family.
//!
//! Contingency tripping only ever reads a network; the mutation helpers at
//! the bottom of this module are meant for working copies, after a trip has
//! been computed.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::dc::{DcNode, DcSwitch, DcTerminal, DcTopology};
use crate::diagnostics::Diagnostics;
use crate::equipment::{Equipment, HvdcLine, Substation, Terminal};
use crate::limits::{LimitType, LoadingLimits, ThreeSides};
use crate::topology::{Switch, TopologyKind, VertexKey, VoltageLevel};
use crate::units::Kilovolts;
use crate::{DcNodeId, DcSwitchId, DcTerminalId, EquipmentId, SwitchId, TerminalId, VoltageLevelId};

/// What a string identifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifiableRef {
    Substation(usize),
    VoltageLevel(VoltageLevelId),
    /// Configured bus of a bus/breaker voltage level
    Bus {
        voltage_level: VoltageLevelId,
        vertex: NodeIndex,
    },
    Switch(SwitchId),
    Equipment(EquipmentId),
    HvdcLine(usize),
    DcNode(DcNodeId),
    DcSwitch(DcSwitchId),
}

/// Basic element counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub voltage_levels: usize,
    pub switches: usize,
    pub equipment: usize,
    pub terminals: usize,
    pub dc_nodes: usize,
    pub dc_switches: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(crate) substations: Vec<Substation>,
    pub(crate) voltage_levels: Vec<VoltageLevel>,
    pub(crate) switches: Vec<Switch>,
    pub(crate) terminals: Vec<Terminal>,
    pub(crate) equipment: Vec<Equipment>,
    pub(crate) hvdc_lines: Vec<HvdcLine>,
    pub(crate) dc_nodes: Vec<DcNode>,
    pub(crate) dc_switches: Vec<DcSwitch>,
    pub(crate) dc_terminals: Vec<DcTerminal>,
    pub(crate) dc_topology: DcTopology,
    pub(crate) index: HashMap<String, IdentifiableRef>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifiable(&self, id: &str) -> Option<IdentifiableRef> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            voltage_levels: self.voltage_levels.len(),
            switches: self.switches.len(),
            equipment: self.equipment.len(),
            terminals: self.terminals.len(),
            dc_nodes: self.dc_nodes.len(),
            dc_switches: self.dc_switches.len(),
        }
    }

    // ---- substations and voltage levels ----

    pub fn substation(&self, id: &str) -> Option<&Substation> {
        match self.identifiable(id)? {
            IdentifiableRef::Substation(index) => self.substations.get(index),
            _ => None,
        }
    }

    pub fn find_voltage_level(&self, id: &str) -> Option<VoltageLevelId> {
        match self.identifiable(id)? {
            IdentifiableRef::VoltageLevel(vl) => Some(vl),
            _ => None,
        }
    }

    #[inline]
    pub fn voltage_level(&self, id: VoltageLevelId) -> &VoltageLevel {
        &self.voltage_levels[id.value()]
    }

    pub fn voltage_levels(&self) -> impl Iterator<Item = (VoltageLevelId, &VoltageLevel)> {
        self.voltage_levels
            .iter()
            .enumerate()
            .map(|(i, vl)| (VoltageLevelId::new(i), vl))
    }

    /// Country of the substation holding a voltage level.
    pub fn country_of(&self, vl: VoltageLevelId) -> Option<&str> {
        let substation = self.voltage_level(vl).substation.as_deref()?;
        self.substation(substation)?.country.as_deref()
    }

    /// Voltage level and vertex of a configured bus.
    pub fn bus(&self, id: &str) -> Option<(VoltageLevelId, NodeIndex)> {
        match self.identifiable(id)? {
            IdentifiableRef::Bus {
                voltage_level,
                vertex,
            } => Some((voltage_level, vertex)),
            _ => None,
        }
    }

    // ---- switches and terminals ----

    pub fn find_switch(&self, id: &str) -> Option<SwitchId> {
        match self.identifiable(id)? {
            IdentifiableRef::Switch(switch) => Some(switch),
            _ => None,
        }
    }

    #[inline]
    pub fn switch(&self, id: SwitchId) -> &Switch {
        &self.switches[id.value()]
    }

    #[inline]
    pub fn terminal(&self, id: TerminalId) -> &Terminal {
        &self.terminals[id.value()]
    }

    pub fn terminal_topology_kind(&self, id: TerminalId) -> TopologyKind {
        self.voltage_level(self.terminal(id).voltage_level).topology_kind
    }

    /// Terminals attached at one vertex of a voltage level.
    pub fn terminals_at(&self, vl: VoltageLevelId, vertex: NodeIndex) -> &[TerminalId] {
        self.voltage_level(vl).terminals_at(vertex)
    }

    // ---- equipment ----

    pub fn find_equipment(&self, id: &str) -> Option<EquipmentId> {
        match self.identifiable(id)? {
            IdentifiableRef::Equipment(equipment) => Some(equipment),
            _ => None,
        }
    }

    #[inline]
    pub fn equipment(&self, id: EquipmentId) -> &Equipment {
        &self.equipment[id.value()]
    }

    pub fn get_equipment(&self, id: &str) -> Option<&Equipment> {
        self.find_equipment(id).map(|e| self.equipment(e))
    }

    pub fn equipment_iter(&self) -> impl Iterator<Item = (EquipmentId, &Equipment)> {
        self.equipment
            .iter()
            .enumerate()
            .map(|(i, e)| (EquipmentId::new(i), e))
    }

    pub fn hvdc_line(&self, id: &str) -> Option<&HvdcLine> {
        match self.identifiable(id)? {
            IdentifiableRef::HvdcLine(index) => self.hvdc_lines.get(index),
            _ => None,
        }
    }

    pub fn hvdc_lines(&self) -> &[HvdcLine] {
        &self.hvdc_lines
    }

    /// Loading limits of an equipment side.
    pub fn limits(
        &self,
        equipment_id: &str,
        limit_type: LimitType,
        side: ThreeSides,
    ) -> Option<&LoadingLimits> {
        self.get_equipment(equipment_id)?.limits(limit_type, side)
    }

    pub fn side_voltage_level(&self, equipment: EquipmentId, side: ThreeSides) -> Option<&VoltageLevel> {
        let terminal = self.equipment(equipment).terminal(side)?;
        Some(self.voltage_level(self.terminal(terminal).voltage_level))
    }

    pub fn side_nominal_v(&self, equipment: EquipmentId, side: ThreeSides) -> Option<Kilovolts> {
        self.side_voltage_level(equipment, side).map(|vl| vl.nominal_v)
    }

    pub fn side_country(&self, equipment: EquipmentId, side: ThreeSides) -> Option<&str> {
        let terminal = self.equipment(equipment).terminal(side)?;
        self.country_of(self.terminal(terminal).voltage_level)
    }

    // ---- DC ----

    pub fn find_dc_node(&self, id: &str) -> Option<DcNodeId> {
        match self.identifiable(id)? {
            IdentifiableRef::DcNode(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub fn dc_node(&self, id: DcNodeId) -> &DcNode {
        &self.dc_nodes[id.value()]
    }

    pub fn find_dc_switch(&self, id: &str) -> Option<DcSwitchId> {
        match self.identifiable(id)? {
            IdentifiableRef::DcSwitch(switch) => Some(switch),
            _ => None,
        }
    }

    #[inline]
    pub fn dc_switch(&self, id: DcSwitchId) -> &DcSwitch {
        &self.dc_switches[id.value()]
    }

    #[inline]
    pub fn dc_terminal(&self, id: DcTerminalId) -> &DcTerminal {
        &self.dc_terminals[id.value()]
    }

    pub fn dc_topology(&self) -> &DcTopology {
        &self.dc_topology
    }

    /// DC switches around a DC node, with the DC node on their other side.
    pub fn dc_neighbors(&self, node: DcNodeId) -> impl Iterator<Item = (DcSwitchId, DcNodeId)> + '_ {
        self.dc_topology.neighbors(self.dc_node(node).vertex)
    }

    // ---- working-copy mutation ----

    /// Opens a switch. Returns `false` if it was already open.
    pub fn open_switch(&mut self, id: SwitchId) -> bool {
        let switch = &mut self.switches[id.value()];
        !std::mem::replace(&mut switch.open, true)
    }

    /// Disconnects a terminal. Returns `false` if it was already disconnected.
    pub fn disconnect_terminal(&mut self, id: TerminalId) -> bool {
        let terminal = &mut self.terminals[id.value()];
        std::mem::replace(&mut terminal.connected, false)
    }

    pub fn open_dc_switch(&mut self, id: DcSwitchId) -> bool {
        let switch = &mut self.dc_switches[id.value()];
        !std::mem::replace(&mut switch.open, true)
    }

    pub fn disconnect_dc_terminal(&mut self, id: DcTerminalId) -> bool {
        let terminal = &mut self.dc_terminals[id.value()];
        std::mem::replace(&mut terminal.connected, false)
    }

    /// Report model inconsistencies that would make tripping or limit
    /// reduction misleading.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.voltage_levels.is_empty() && self.dc_nodes.is_empty() {
            diag.add_error("structure", "Network is empty");
            return;
        }

        for vl in &self.voltage_levels {
            if vl.topology_kind == TopologyKind::NodeBreaker {
                for vertex in vl.graph.node_weights() {
                    if vertex.terminals.len() > 1 {
                        diag.add_warning_with_entity(
                            "topology",
                            &format!(
                                "{} is shared by {} terminals",
                                vertex.key,
                                vertex.terminals.len()
                            ),
                            &vl.id,
                        );
                    }
                }
            }
            if vl.substation.is_none() {
                diag.add_warning_with_entity("reference", "Voltage level has no substation", &vl.id);
            }
        }

        for equipment in &self.equipment {
            for (limit_type, side, limits) in equipment.limit_sets() {
                if !limits.is_ladder_monotonic() {
                    diag.add_warning_with_entity(
                        "limits",
                        &format!("{limit_type} limits on side {side} are not strictly increasing as duration decreases"),
                        &equipment.id,
                    );
                }
                if side.index() >= equipment.terminals.len() {
                    diag.add_error_with_entity(
                        "limits",
                        &format!("{limit_type} limits defined on missing side {side}"),
                        &equipment.id,
                    );
                }
            }
        }

        for hvdc in &self.hvdc_lines {
            for station in [hvdc.converter_station1, hvdc.converter_station2] {
                let kind = self.equipment(station).kind;
                if !matches!(
                    kind,
                    crate::EquipmentKind::LccConverterStation | crate::EquipmentKind::VscConverterStation
                ) {
                    diag.add_error_with_entity(
                        "reference",
                        &format!("HVDC line end is a {kind}, not a converter station"),
                        &hvdc.id,
                    );
                }
            }
        }
    }

    /// Vertex key of a terminal, for messages.
    pub fn describe_terminal(&self, id: TerminalId) -> String {
        let terminal = self.terminal(id);
        let vl = self.voltage_level(terminal.voltage_level);
        let key = vl
            .vertex_key(terminal.vertex)
            .map(VertexKey::to_string)
            .unwrap_or_default();
        format!(
            "{} side {} at {} of '{}'",
            self.equipment(terminal.equipment).id,
            terminal.side,
            key,
            vl.id
        )
    }
}
