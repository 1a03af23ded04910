//! Voltage-level internal topology.
//!
//! Every voltage level owns a small undirected graph. In a `NODE_BREAKER`
//! voltage level the vertices are numbered nodes and the edges are switches
//! or internal connections; this is the graph contingency tripping walks. In a
//! `BUS_BREAKER` voltage level the vertices are configured buses and the
//! edges are bus-coupling switches, but switch identity behind a terminal is
//! not modeled, so tripping never walks it.

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::units::Kilovolts;
use crate::{SwitchId, TerminalId};

/// How a voltage level describes its internal wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopologyKind {
    /// Explicit nodes and switches
    NodeBreaker,
    /// Configured buses only; switches behind terminals are unknown
    BusBreaker,
}

impl std::fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyKind::NodeBreaker => f.write_str("NODE_BREAKER"),
            TopologyKind::BusBreaker => f.write_str("BUS_BREAKER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchKind {
    Breaker,
    Disconnector,
    LoadBreakSwitch,
}

/// An AC switch, stored as one edge of its voltage level graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub id: String,
    pub kind: SwitchKind,
    pub open: bool,
    pub fictitious: bool,
    pub voltage_level: crate::VoltageLevelId,
    pub(crate) edge: EdgeIndex,
}

impl Switch {
    /// A closed, real breaker: opening it interrupts the path it sits on.
    #[inline]
    pub fn is_openable(&self) -> bool {
        !self.open && !self.fictitious && self.kind == SwitchKind::Breaker
    }
}

/// Vertex identity inside one voltage level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKey {
    /// Node number of a node/breaker voltage level
    Node(u32),
    /// Configured bus of a bus/breaker voltage level
    Bus(String),
}

impl std::fmt::Display for VertexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexKey::Node(node) => write!(f, "node {node}"),
            VertexKey::Bus(bus) => write!(f, "bus '{bus}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyVertex {
    pub key: VertexKey,
    /// Terminals attached at this vertex
    pub terminals: Vec<TerminalId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyEdge {
    Switch(SwitchId),
    /// Zero-impedance connection without a switch
    InternalConnection,
}

#[derive(Debug, Clone)]
pub struct VoltageLevel {
    pub id: String,
    pub substation: Option<String>,
    pub nominal_v: Kilovolts,
    pub topology_kind: TopologyKind,
    pub properties: BTreeMap<String, String>,
    pub(crate) graph: UnGraph<TopologyVertex, TopologyEdge>,
    pub(crate) vertices: HashMap<VertexKey, NodeIndex>,
}

impl VoltageLevel {
    pub fn new(
        id: impl Into<String>,
        substation: Option<String>,
        nominal_v: Kilovolts,
        topology_kind: TopologyKind,
    ) -> Self {
        Self {
            id: id.into(),
            substation,
            nominal_v,
            topology_kind,
            properties: BTreeMap::new(),
            graph: UnGraph::new_undirected(),
            vertices: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &UnGraph<TopologyVertex, TopologyEdge> {
        &self.graph
    }

    pub fn vertex(&self, key: &VertexKey) -> Option<NodeIndex> {
        self.vertices.get(key).copied()
    }

    /// Returns the vertex for `key`, creating it on first use.
    pub(crate) fn ensure_vertex(&mut self, key: VertexKey) -> NodeIndex {
        if let Some(&index) = self.vertices.get(&key) {
            return index;
        }
        let index = self.graph.add_node(TopologyVertex {
            key: key.clone(),
            terminals: Vec::new(),
        });
        self.vertices.insert(key, index);
        index
    }

    pub fn terminals_at(&self, vertex: NodeIndex) -> &[TerminalId] {
        self.graph
            .node_weight(vertex)
            .map(|v| v.terminals.as_slice())
            .unwrap_or(&[])
    }

    pub fn vertex_key(&self, vertex: NodeIndex) -> Option<&VertexKey> {
        self.graph.node_weight(vertex).map(|v| &v.key)
    }

    /// Edges leaving `vertex`, paired with the vertex at their other end.
    pub fn neighbors(&self, vertex: NodeIndex) -> impl Iterator<Item = (TopologyEdge, NodeIndex)> + '_ {
        self.graph.edges(vertex).map(move |edge| {
            let other = if edge.source() == vertex {
                edge.target()
            } else {
                edge.source()
            };
            (*edge.weight(), other)
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }
}
