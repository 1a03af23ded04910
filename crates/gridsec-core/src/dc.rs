//! Detailed DC topology: DC nodes joined by DC switches.
//!
//! The DC graph is network wide (DC nodes do not belong to voltage levels)
//! and is never mixed with the AC voltage level graphs.

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::limits::ThreeSides;
use crate::topology::SwitchKind;
use crate::units::Kilovolts;
use crate::{DcNodeId, DcSwitchId, DcTerminalId, EquipmentId};

#[derive(Debug, Clone, PartialEq)]
pub struct DcNode {
    pub id: String,
    pub nominal_v: Kilovolts,
    pub(crate) vertex: NodeIndex,
    pub(crate) terminals: Vec<DcTerminalId>,
}

impl DcNode {
    pub fn terminals(&self) -> &[DcTerminalId] {
        &self.terminals
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DcSwitch {
    pub id: String,
    pub kind: SwitchKind,
    pub open: bool,
    pub fictitious: bool,
    pub node1: DcNodeId,
    pub node2: DcNodeId,
    pub(crate) edge: EdgeIndex,
}

impl DcSwitch {
    #[inline]
    pub fn is_openable(&self) -> bool {
        !self.open && !self.fictitious && self.kind == SwitchKind::Breaker
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DcTerminal {
    pub equipment: EquipmentId,
    pub side: ThreeSides,
    pub dc_node: DcNodeId,
    pub connected: bool,
}

/// DC node graph: vertices carry the node id, edges the switch joining them.
#[derive(Debug, Clone, Default)]
pub struct DcTopology {
    pub(crate) graph: UnGraph<DcNodeId, DcSwitchId>,
}

impl DcTopology {
    /// DC switches around a DC node, paired with the node on their other side.
    pub fn neighbors(&self, vertex: NodeIndex) -> impl Iterator<Item = (DcSwitchId, DcNodeId)> + '_ {
        self.graph.edges(vertex).filter_map(move |edge| {
            let other = if edge.source() == vertex {
                edge.target()
            } else {
                edge.source()
            };
            self.graph
                .node_weight(other)
                .map(|&node| (*edge.weight(), node))
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_switch_openable() {
        let mut switch = DcSwitch {
            id: "DC_BR".into(),
            kind: SwitchKind::Breaker,
            open: false,
            fictitious: false,
            node1: DcNodeId::new(0),
            node2: DcNodeId::new(1),
            edge: EdgeIndex::new(0),
        };
        assert!(switch.is_openable());
        switch.kind = SwitchKind::Disconnector;
        assert!(!switch.is_openable());
    }

    #[test]
    fn test_dc_neighbors() {
        let mut topology = DcTopology::default();
        let a = topology.graph.add_node(DcNodeId::new(0));
        let b = topology.graph.add_node(DcNodeId::new(1));
        topology.graph.add_edge(a, b, DcSwitchId::new(7));

        let from_b: Vec<_> = topology.neighbors(b).collect();
        assert_eq!(from_b, vec![(DcSwitchId::new(7), DcNodeId::new(0))]);
        assert_eq!(topology.node_count(), 2);
    }
}
