//! Builder for assembling a [`Network`].
//!
//! Elements are added one at a time through plain input structs. An element
//! that references something unknown (voltage level, bus, DC node, converter
//! station) or reuses an existing identifier is skipped and recorded in the
//! builder's [`Diagnostics`]; [`NetworkBuilder::build`] then refuses to hand
//! out a network that lost elements.
//!
//! # Example
//! ```
//! use gridsec_core::builder::{Connection, EquipmentInput, NetworkBuilder, SwitchInput, VoltageLevelInput};
//! use gridsec_core::EquipmentKind;
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add_voltage_level(VoltageLevelInput::node_breaker("VL1", 400.0));
//! builder.add_switch(SwitchInput::breaker("VL1", "BR1", 0, 1));
//! builder.add_equipment(EquipmentInput::injection(
//!     EquipmentKind::Load,
//!     "LOAD",
//!     Connection::node("VL1", 1),
//! ));
//! let network = builder.build().unwrap();
//! assert!(network.get_equipment("LOAD").is_some());
//! ```

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::dc::{DcNode, DcSwitch, DcTerminal};
use crate::diagnostics::Diagnostics;
use crate::equipment::{Equipment, EquipmentKind, HvdcLine, Substation, Terminal};
use crate::error::{GridsecError, GridsecResult};
use crate::limits::{LimitType, LoadingLimits, ThreeSides};
use crate::network::{IdentifiableRef, Network};
use crate::topology::{Switch, SwitchKind, TopologyEdge, TopologyKind, VertexKey, VoltageLevel};
use crate::units::Kilovolts;
use crate::{DcNodeId, DcSwitchId, DcTerminalId, EquipmentId, SwitchId, TerminalId, VoltageLevelId};

/// Result of adding an element to the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    /// Element was successfully added
    Added,
    /// Element was skipped (see diagnostics)
    Skipped,
}

/// Where one AC side of an equipment attaches.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub voltage_level: String,
    pub vertex: VertexKey,
    pub connected: bool,
}

impl Connection {
    /// Attach to a node of a node/breaker voltage level.
    pub fn node(voltage_level: impl Into<String>, node: u32) -> Self {
        Self {
            voltage_level: voltage_level.into(),
            vertex: VertexKey::Node(node),
            connected: true,
        }
    }

    /// Attach to a configured bus of a bus/breaker voltage level.
    pub fn bus(voltage_level: impl Into<String>, bus: impl Into<String>) -> Self {
        Self {
            voltage_level: voltage_level.into(),
            vertex: VertexKey::Bus(bus.into()),
            connected: true,
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DcConnection {
    pub dc_node: String,
    pub connected: bool,
}

impl DcConnection {
    pub fn new(dc_node: impl Into<String>) -> Self {
        Self {
            dc_node: dc_node.into(),
            connected: true,
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct VoltageLevelInput {
    pub id: String,
    pub substation: Option<String>,
    pub nominal_kv: f64,
    pub topology_kind: TopologyKind,
    pub properties: BTreeMap<String, String>,
}

impl VoltageLevelInput {
    pub fn node_breaker(id: impl Into<String>, nominal_kv: f64) -> Self {
        Self::new(id, nominal_kv, TopologyKind::NodeBreaker)
    }

    pub fn bus_breaker(id: impl Into<String>, nominal_kv: f64) -> Self {
        Self::new(id, nominal_kv, TopologyKind::BusBreaker)
    }

    fn new(id: impl Into<String>, nominal_kv: f64, topology_kind: TopologyKind) -> Self {
        Self {
            id: id.into(),
            substation: None,
            nominal_kv,
            topology_kind,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_substation(mut self, substation: impl Into<String>) -> Self {
        self.substation = Some(substation.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct SwitchInput {
    pub voltage_level: String,
    pub id: String,
    pub kind: SwitchKind,
    pub open: bool,
    pub fictitious: bool,
    pub end1: VertexKey,
    pub end2: VertexKey,
}

impl SwitchInput {
    pub fn new(
        voltage_level: impl Into<String>,
        id: impl Into<String>,
        kind: SwitchKind,
        end1: VertexKey,
        end2: VertexKey,
    ) -> Self {
        Self {
            voltage_level: voltage_level.into(),
            id: id.into(),
            kind,
            open: false,
            fictitious: false,
            end1,
            end2,
        }
    }

    /// Node/breaker breaker between two nodes.
    pub fn breaker(voltage_level: impl Into<String>, id: impl Into<String>, node1: u32, node2: u32) -> Self {
        Self::new(
            voltage_level,
            id,
            SwitchKind::Breaker,
            VertexKey::Node(node1),
            VertexKey::Node(node2),
        )
    }

    /// Node/breaker disconnector between two nodes.
    pub fn disconnector(voltage_level: impl Into<String>, id: impl Into<String>, node1: u32, node2: u32) -> Self {
        Self::new(
            voltage_level,
            id,
            SwitchKind::Disconnector,
            VertexKey::Node(node1),
            VertexKey::Node(node2),
        )
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn fictitious(mut self) -> Self {
        self.fictitious = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct EquipmentInput {
    pub id: String,
    pub name: Option<String>,
    pub kind: EquipmentKind,
    /// AC sides, in side order
    pub connections: Vec<Connection>,
    /// DC sides, in side order
    pub dc_connections: Vec<DcConnection>,
    pub properties: BTreeMap<String, String>,
}

impl EquipmentInput {
    fn new(kind: EquipmentKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            connections: Vec::new(),
            dc_connections: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Single-terminal equipment (load, generator, busbar section, converter station...).
    pub fn injection(kind: EquipmentKind, id: impl Into<String>, connection: Connection) -> Self {
        let mut input = Self::new(kind, id);
        input.connections.push(connection);
        input
    }

    /// Two-terminal branch (line, tie line, two windings transformer).
    pub fn branch(kind: EquipmentKind, id: impl Into<String>, side1: Connection, side2: Connection) -> Self {
        let mut input = Self::new(kind, id);
        input.connections.extend([side1, side2]);
        input
    }

    pub fn three_windings_transformer(
        id: impl Into<String>,
        leg1: Connection,
        leg2: Connection,
        leg3: Connection,
    ) -> Self {
        let mut input = Self::new(EquipmentKind::ThreeWindingsTransformer, id);
        input.connections.extend([leg1, leg2, leg3]);
        input
    }

    pub fn dc_line(id: impl Into<String>, side1: DcConnection, side2: DcConnection) -> Self {
        let mut input = Self::new(EquipmentKind::DcLine, id);
        input.dc_connections.extend([side1, side2]);
        input
    }

    pub fn dc_ground(id: impl Into<String>, dc_node: DcConnection) -> Self {
        let mut input = Self::new(EquipmentKind::DcGround, id);
        input.dc_connections.push(dc_node);
        input
    }

    pub fn ac_dc_converter(
        id: impl Into<String>,
        ac: Connection,
        dc1: DcConnection,
        dc2: DcConnection,
    ) -> Self {
        let mut input = Self::new(EquipmentKind::AcDcConverter, id);
        input.connections.push(ac);
        input.dc_connections.extend([dc1, dc2]);
        input
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct DcSwitchInput {
    pub id: String,
    pub kind: SwitchKind,
    pub open: bool,
    pub fictitious: bool,
    pub node1: String,
    pub node2: String,
}

impl DcSwitchInput {
    pub fn breaker(id: impl Into<String>, node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SwitchKind::Breaker,
            open: false,
            fictitious: false,
            node1: node1.into(),
            node2: node2.into(),
        }
    }

    pub fn disconnector(id: impl Into<String>, node1: impl Into<String>, node2: impl Into<String>) -> Self {
        Self {
            kind: SwitchKind::Disconnector,
            ..Self::breaker(id, node1, node2)
        }
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }
}

/// Builder for constructing a [`Network`] with diagnostics tracking.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    network: Network,
    diag: Diagnostics,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    fn register(&mut self, id: &str, target: IdentifiableRef) -> bool {
        if self.network.index.contains_key(id) {
            self.diag
                .add_error_with_entity("identifier", "Duplicate identifier", id);
            return false;
        }
        self.network.index.insert(id.to_string(), target);
        true
    }

    fn is_taken(&mut self, id: &str) -> bool {
        if self.network.index.contains_key(id) {
            self.diag
                .add_error_with_entity("identifier", "Duplicate identifier", id);
            return true;
        }
        false
    }

    /// Resolves a voltage level vertex, creating node/breaker nodes on demand.
    fn resolve_vertex(
        &mut self,
        owner: &str,
        voltage_level: &str,
        key: &VertexKey,
    ) -> Option<(VoltageLevelId, NodeIndex)> {
        let Some(vl) = self.network.find_voltage_level(voltage_level) else {
            self.diag.add_error_with_entity(
                "reference",
                &format!("Unknown voltage level '{voltage_level}'"),
                owner,
            );
            return None;
        };
        let level = &mut self.network.voltage_levels[vl.value()];
        match (level.topology_kind, key) {
            (TopologyKind::NodeBreaker, VertexKey::Node(_)) => {
                Some((vl, level.ensure_vertex(key.clone())))
            }
            (TopologyKind::BusBreaker, VertexKey::Bus(_)) => match level.vertex(key) {
                Some(vertex) => Some((vl, vertex)),
                None => {
                    self.diag.add_error_with_entity(
                        "reference",
                        &format!("Unknown {key} in voltage level '{voltage_level}'"),
                        owner,
                    );
                    None
                }
            },
            (kind, key) => {
                self.diag.add_error_with_entity(
                    "topology",
                    &format!("Cannot attach to {key} in {kind} voltage level '{voltage_level}'"),
                    owner,
                );
                None
            }
        }
    }

    pub fn add_substation(&mut self, substation: Substation) -> AddResult {
        let index = self.network.substations.len();
        if !self.register(&substation.id, IdentifiableRef::Substation(index)) {
            return AddResult::Skipped;
        }
        self.network.substations.push(substation);
        AddResult::Added
    }

    pub fn add_voltage_level(&mut self, input: VoltageLevelInput) -> AddResult {
        if let Some(substation) = &input.substation {
            if self.network.substation(substation).is_none() {
                self.diag.add_error_with_entity(
                    "reference",
                    &format!("Unknown substation '{substation}'"),
                    &input.id,
                );
                return AddResult::Skipped;
            }
        }
        let id = VoltageLevelId::new(self.network.voltage_levels.len());
        if !self.register(&input.id, IdentifiableRef::VoltageLevel(id)) {
            return AddResult::Skipped;
        }
        let mut vl = VoltageLevel::new(
            input.id,
            input.substation,
            Kilovolts(input.nominal_kv),
            input.topology_kind,
        );
        vl.properties = input.properties;
        self.network.voltage_levels.push(vl);
        AddResult::Added
    }

    /// Adds a configured bus to a bus/breaker voltage level.
    pub fn add_bus(&mut self, voltage_level: &str, bus_id: &str) -> AddResult {
        let Some(vl) = self.network.find_voltage_level(voltage_level) else {
            self.diag.add_error_with_entity(
                "reference",
                &format!("Unknown voltage level '{voltage_level}'"),
                bus_id,
            );
            return AddResult::Skipped;
        };
        if self.network.voltage_level(vl).topology_kind != TopologyKind::BusBreaker {
            self.diag.add_error_with_entity(
                "topology",
                &format!("Voltage level '{voltage_level}' is not bus/breaker"),
                bus_id,
            );
            return AddResult::Skipped;
        }
        if self.is_taken(bus_id) {
            return AddResult::Skipped;
        }
        let vertex = self.network.voltage_levels[vl.value()]
            .ensure_vertex(VertexKey::Bus(bus_id.to_string()));
        self.network.index.insert(
            bus_id.to_string(),
            IdentifiableRef::Bus {
                voltage_level: vl,
                vertex,
            },
        );
        AddResult::Added
    }

    pub fn add_switch(&mut self, input: SwitchInput) -> AddResult {
        if self.is_taken(&input.id) {
            return AddResult::Skipped;
        }
        let Some((vl, a)) = self.resolve_vertex(&input.id, &input.voltage_level, &input.end1) else {
            return AddResult::Skipped;
        };
        let Some((_, b)) = self.resolve_vertex(&input.id, &input.voltage_level, &input.end2) else {
            return AddResult::Skipped;
        };
        let id = SwitchId::new(self.network.switches.len());
        let edge = self.network.voltage_levels[vl.value()]
            .graph
            .add_edge(a, b, TopologyEdge::Switch(id));
        self.network
            .index
            .insert(input.id.clone(), IdentifiableRef::Switch(id));
        self.network.switches.push(Switch {
            id: input.id,
            kind: input.kind,
            open: input.open,
            fictitious: input.fictitious,
            voltage_level: vl,
            edge,
        });
        AddResult::Added
    }

    /// Zero-impedance link between two nodes of a node/breaker voltage level.
    pub fn add_internal_connection(&mut self, voltage_level: &str, node1: u32, node2: u32) -> AddResult {
        let owner = format!("{voltage_level} internal connection {node1}-{node2}");
        let Some((vl, a)) = self.resolve_vertex(&owner, voltage_level, &VertexKey::Node(node1)) else {
            return AddResult::Skipped;
        };
        let Some((_, b)) = self.resolve_vertex(&owner, voltage_level, &VertexKey::Node(node2)) else {
            return AddResult::Skipped;
        };
        self.network.voltage_levels[vl.value()]
            .graph
            .add_edge(a, b, TopologyEdge::InternalConnection);
        AddResult::Added
    }

    pub fn add_equipment(&mut self, input: EquipmentInput) -> AddResult {
        if self.is_taken(&input.id) {
            return AddResult::Skipped;
        }
        let kind = input.kind;
        if input.connections.len() != kind.ac_terminal_count()
            || input.dc_connections.len() != kind.dc_terminal_count()
        {
            self.diag.add_error_with_entity(
                "structure",
                &format!(
                    "{kind} expects {} AC and {} DC connections, got {} and {}",
                    kind.ac_terminal_count(),
                    kind.dc_terminal_count(),
                    input.connections.len(),
                    input.dc_connections.len()
                ),
                &input.id,
            );
            return AddResult::Skipped;
        }

        let mut ac = Vec::with_capacity(input.connections.len());
        for connection in &input.connections {
            match self.resolve_vertex(&input.id, &connection.voltage_level, &connection.vertex) {
                Some(resolved) => ac.push((resolved, connection.connected)),
                None => return AddResult::Skipped,
            }
        }
        let mut dc = Vec::with_capacity(input.dc_connections.len());
        for connection in &input.dc_connections {
            match self.network.find_dc_node(&connection.dc_node) {
                Some(node) => dc.push((node, connection.connected)),
                None => {
                    self.diag.add_error_with_entity(
                        "reference",
                        &format!("Unknown DC node '{}'", connection.dc_node),
                        &input.id,
                    );
                    return AddResult::Skipped;
                }
            }
        }

        let equipment_id = EquipmentId::new(self.network.equipment.len());
        let mut equipment = Equipment::new(input.id.clone(), kind);
        equipment.name = input.name;
        equipment.properties = input.properties;

        for (side, ((vl, vertex), connected)) in ThreeSides::ALL.into_iter().zip(ac) {
            let terminal_id = TerminalId::new(self.network.terminals.len());
            self.network.terminals.push(Terminal {
                equipment: equipment_id,
                side,
                voltage_level: vl,
                vertex,
                connected,
            });
            if let Some(weight) = self.network.voltage_levels[vl.value()]
                .graph
                .node_weight_mut(vertex)
            {
                weight.terminals.push(terminal_id);
            }
            equipment.terminals.push(terminal_id);
        }

        for (side, (node, connected)) in ThreeSides::ALL.into_iter().zip(dc) {
            let terminal_id = DcTerminalId::new(self.network.dc_terminals.len());
            self.network.dc_terminals.push(DcTerminal {
                equipment: equipment_id,
                side,
                dc_node: node,
                connected,
            });
            self.network.dc_nodes[node.value()].terminals.push(terminal_id);
            equipment.dc_terminals.push(terminal_id);
        }

        self.network
            .index
            .insert(input.id, IdentifiableRef::Equipment(equipment_id));
        self.network.equipment.push(equipment);
        AddResult::Added
    }

    pub fn add_hvdc_line(&mut self, id: &str, converter_station1: &str, converter_station2: &str) -> AddResult {
        if self.is_taken(id) {
            return AddResult::Skipped;
        }
        let mut stations = Vec::with_capacity(2);
        for station in [converter_station1, converter_station2] {
            let resolved = self.network.find_equipment(station).filter(|&e| {
                matches!(
                    self.network.equipment(e).kind,
                    EquipmentKind::LccConverterStation | EquipmentKind::VscConverterStation
                )
            });
            match resolved {
                Some(e) => stations.push(e),
                None => {
                    self.diag.add_error_with_entity(
                        "reference",
                        &format!("Unknown converter station '{station}'"),
                        id,
                    );
                    return AddResult::Skipped;
                }
            }
        }
        let index = self.network.hvdc_lines.len();
        self.network
            .index
            .insert(id.to_string(), IdentifiableRef::HvdcLine(index));
        self.network.hvdc_lines.push(HvdcLine {
            id: id.to_string(),
            converter_station1: stations[0],
            converter_station2: stations[1],
        });
        AddResult::Added
    }

    pub fn add_dc_node(&mut self, id: &str, nominal_kv: f64) -> AddResult {
        if self.is_taken(id) {
            return AddResult::Skipped;
        }
        let node_id = DcNodeId::new(self.network.dc_nodes.len());
        let vertex = self.network.dc_topology.graph.add_node(node_id);
        self.network
            .index
            .insert(id.to_string(), IdentifiableRef::DcNode(node_id));
        self.network.dc_nodes.push(DcNode {
            id: id.to_string(),
            nominal_v: Kilovolts(nominal_kv),
            vertex,
            terminals: Vec::new(),
        });
        AddResult::Added
    }

    pub fn add_dc_switch(&mut self, input: DcSwitchInput) -> AddResult {
        if self.is_taken(&input.id) {
            return AddResult::Skipped;
        }
        let (Some(node1), Some(node2)) = (
            self.network.find_dc_node(&input.node1),
            self.network.find_dc_node(&input.node2),
        ) else {
            self.diag.add_error_with_entity(
                "reference",
                &format!("Unknown DC node '{}' or '{}'", input.node1, input.node2),
                &input.id,
            );
            return AddResult::Skipped;
        };
        let switch_id = DcSwitchId::new(self.network.dc_switches.len());
        let edge = self.network.dc_topology.graph.add_edge(
            self.network.dc_node(node1).vertex,
            self.network.dc_node(node2).vertex,
            switch_id,
        );
        self.network
            .index
            .insert(input.id.clone(), IdentifiableRef::DcSwitch(switch_id));
        self.network.dc_switches.push(DcSwitch {
            id: input.id,
            kind: input.kind,
            open: input.open,
            fictitious: input.fictitious,
            node1,
            node2,
            edge,
        });
        AddResult::Added
    }

    /// Attaches loading limits to one side of an existing equipment.
    pub fn add_limits(
        &mut self,
        equipment_id: &str,
        limit_type: LimitType,
        side: ThreeSides,
        limits: LoadingLimits,
    ) -> AddResult {
        let Some(equipment) = self.network.find_equipment(equipment_id) else {
            self.diag.add_error_with_entity(
                "reference",
                "Limits reference unknown equipment",
                equipment_id,
            );
            return AddResult::Skipped;
        };
        self.network.equipment[equipment.value()]
            .limits
            .insert((limit_type, side), limits);
        AddResult::Added
    }

    /// Consume the builder, running network validation into the collected
    /// diagnostics.
    pub fn finish(self) -> (Network, Diagnostics) {
        let Self { network, mut diag } = self;
        network.validate_into(&mut diag);
        (network, diag)
    }

    /// Consume the builder, failing if any element was rejected.
    pub fn build(self) -> GridsecResult<Network> {
        let (network, diag) = self.finish();
        if let Some(first) = diag.errors().next() {
            return Err(GridsecError::Network(format!(
                "{} while building network, first: {first}",
                diag.summary()
            )));
        }
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_builder() -> NetworkBuilder {
        let mut builder = NetworkBuilder::new();
        builder.add_substation(Substation {
            id: "S1".into(),
            country: Some("FR".into()),
            ..Default::default()
        });
        builder.add_voltage_level(VoltageLevelInput::node_breaker("VLNB", 225.0).with_substation("S1"));
        builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLBB", 63.0).with_substation("S1"));
        builder.add_bus("VLBB", "B1");
        builder
    }

    #[test]
    fn test_build_small_network() {
        let mut builder = two_level_builder();
        assert_eq!(
            builder.add_switch(SwitchInput::breaker("VLNB", "BR", 0, 1)),
            AddResult::Added
        );
        assert_eq!(
            builder.add_equipment(EquipmentInput::branch(
                EquipmentKind::TwoWindingsTransformer,
                "TR",
                Connection::node("VLNB", 1),
                Connection::bus("VLBB", "B1"),
            )),
            AddResult::Added
        );
        let network = builder.build().unwrap();

        let tr = network.get_equipment("TR").unwrap();
        assert_eq!(tr.terminals.len(), 2);
        let t2 = network.terminal(tr.terminals[1]);
        assert_eq!(t2.side, ThreeSides::Two);
        assert_eq!(network.terminal_topology_kind(tr.terminals[1]), TopologyKind::BusBreaker);
        assert_eq!(
            network.side_country(network.find_equipment("TR").unwrap(), ThreeSides::One),
            Some("FR")
        );
        assert!(network.find_switch("BR").is_some());
        assert!(network.bus("B1").is_some());
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let mut builder = two_level_builder();
        builder.add_equipment(EquipmentInput::injection(
            EquipmentKind::Load,
            "B1",
            Connection::bus("VLBB", "B1"),
        ));
        assert_eq!(builder.diagnostics().error_count(), 1);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_attach_mismatch_is_rejected() {
        let mut builder = two_level_builder();
        let result = builder.add_equipment(EquipmentInput::injection(
            EquipmentKind::Generator,
            "GEN",
            Connection::node("VLBB", 3),
        ));
        assert_eq!(result, AddResult::Skipped);
        let issue = builder.diagnostics().errors().next().unwrap();
        assert_eq!(issue.category, "topology");
    }

    #[test]
    fn test_hvdc_line_requires_converter_stations() {
        let mut builder = two_level_builder();
        builder.add_equipment(EquipmentInput::injection(
            EquipmentKind::VscConverterStation,
            "CS1",
            Connection::bus("VLBB", "B1"),
        ));
        builder.add_equipment(EquipmentInput::injection(
            EquipmentKind::Load,
            "LOAD",
            Connection::node("VLNB", 5),
        ));
        assert_eq!(builder.add_hvdc_line("HVDC", "CS1", "LOAD"), AddResult::Skipped);
        assert!(builder.diagnostics().has_errors());
    }

    #[test]
    fn test_dc_elements() {
        let mut builder = NetworkBuilder::new();
        builder.add_dc_node("DN1", 320.0);
        builder.add_dc_node("DN2", 320.0);
        builder.add_dc_switch(DcSwitchInput::breaker("DSW", "DN1", "DN2"));
        builder.add_equipment(EquipmentInput::dc_ground("GND", DcConnection::new("DN2")));
        let network = builder.build().unwrap();

        let dn2 = network.find_dc_node("DN2").unwrap();
        assert_eq!(network.dc_node(dn2).terminals().len(), 1);
        let neighbors: Vec<_> = network.dc_neighbors(dn2).collect();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].1, network.find_dc_node("DN1").unwrap());
    }

    #[test]
    fn test_validation_reports_shared_node() {
        let mut builder = two_level_builder();
        builder.add_equipment(EquipmentInput::injection(
            EquipmentKind::Load,
            "L1",
            Connection::node("VLNB", 2),
        ));
        builder.add_equipment(EquipmentInput::injection(
            EquipmentKind::Load,
            "L2",
            Connection::node("VLNB", 2),
        ));
        let (_, diag) = builder.finish();
        assert_eq!(diag.issues_by_category("topology").count(), 1);
        assert!(!diag.has_errors());
    }
}
