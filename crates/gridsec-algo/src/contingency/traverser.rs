//! Topology traversal from seed terminals.
//!
//! Traversal walks outward from one seed over the terminal-and-switch graph
//! and decides, at every terminal and switch it meets, whether the path goes
//! on or stops there:
//!
//! | Element | Condition | Outcome |
//! |---------|-----------|---------|
//! | terminal | `BUS_BREAKER` level | stop; disconnect it if connected |
//! | terminal | `NODE_BREAKER` level | record as traversed, go on |
//! | switch | open | stop |
//! | switch | closed, real breaker | stop; open it |
//! | switch | anything else | go on |
//!
//! The walk is an explicit worklist with visited sets, so it terminates on
//! meshed topologies and never visits a terminal or vertex twice. Paths that
//! reach another multi-terminal equipment cross to its other sides; paths never
//! cross the equipment being tripped.
//!
//! The DC walk is the same without the bus/breaker case: DC topology is
//! always explicit.

use std::collections::{BTreeSet, HashSet};

use gridsec_core::{
    DcNodeId, DcSwitchId, DcTerminalId, Network, NodeIndex, SwitchId, TerminalId, TopologyEdge,
    TopologyKind, VoltageLevelId,
};
use serde::Serialize;
use tracing::trace;

/// Switches and terminals isolating the tripped equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrippingResult {
    pub switches_to_open: BTreeSet<SwitchId>,
    pub terminals_to_disconnect: BTreeSet<TerminalId>,
    /// Every node/breaker terminal the walk went through
    pub traversed_terminals: BTreeSet<TerminalId>,
    pub dc_switches_to_open: BTreeSet<DcSwitchId>,
    pub dc_terminals_to_disconnect: BTreeSet<DcTerminalId>,
}

impl TrippingResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union another result into this one.
    pub fn merge(&mut self, other: TrippingResult) {
        self.switches_to_open.extend(other.switches_to_open);
        self.terminals_to_disconnect
            .extend(other.terminals_to_disconnect);
        self.traversed_terminals.extend(other.traversed_terminals);
        self.dc_switches_to_open.extend(other.dc_switches_to_open);
        self.dc_terminals_to_disconnect
            .extend(other.dc_terminals_to_disconnect);
    }

    /// Nothing to open or disconnect.
    pub fn is_empty(&self) -> bool {
        self.switches_to_open.is_empty()
            && self.terminals_to_disconnect.is_empty()
            && self.dc_switches_to_open.is_empty()
            && self.dc_terminals_to_disconnect.is_empty()
    }

    pub fn switch_ids<'n>(&self, network: &'n Network) -> BTreeSet<&'n str> {
        self.switches_to_open
            .iter()
            .map(|&s| network.switch(s).id.as_str())
            .collect()
    }

    /// `(equipment id, side)` of every terminal to disconnect.
    pub fn terminal_ids<'n>(&self, network: &'n Network) -> BTreeSet<(&'n str, usize)> {
        describe_terminals(network, &self.terminals_to_disconnect)
    }

    pub fn traversed_terminal_ids<'n>(&self, network: &'n Network) -> BTreeSet<(&'n str, usize)> {
        describe_terminals(network, &self.traversed_terminals)
    }

    pub fn dc_switch_ids<'n>(&self, network: &'n Network) -> BTreeSet<&'n str> {
        self.dc_switches_to_open
            .iter()
            .map(|&s| network.dc_switch(s).id.as_str())
            .collect()
    }

    pub fn dc_terminal_ids<'n>(&self, network: &'n Network) -> BTreeSet<(&'n str, usize)> {
        self.dc_terminals_to_disconnect
            .iter()
            .map(|&t| {
                let terminal = network.dc_terminal(t);
                (
                    network.equipment(terminal.equipment).id.as_str(),
                    terminal.side.index() + 1,
                )
            })
            .collect()
    }
}

fn describe_terminals<'n>(network: &'n Network, terminals: &BTreeSet<TerminalId>) -> BTreeSet<(&'n str, usize)> {
    terminals
        .iter()
        .map(|&t| {
            let terminal = network.terminal(t);
            (
                network.equipment(terminal.equipment).id.as_str(),
                terminal.side.index() + 1,
            )
        })
        .collect()
}

/// Outcome of visiting one terminal or switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    TerminatePath,
}

#[derive(Debug, Clone, Copy)]
enum Visit {
    Terminal(TerminalId),
    Vertex(VoltageLevelId, NodeIndex),
}

fn visit_terminal(network: &Network, id: TerminalId, result: &mut TrippingResult) -> Step {
    let terminal = network.terminal(id);
    match network.voltage_level(terminal.voltage_level).topology_kind {
        TopologyKind::BusBreaker => {
            if terminal.connected {
                result.terminals_to_disconnect.insert(id);
            }
            Step::TerminatePath
        }
        TopologyKind::NodeBreaker => {
            result.traversed_terminals.insert(id);
            Step::Continue
        }
    }
}

fn visit_switch(network: &Network, id: SwitchId, result: &mut TrippingResult) -> Step {
    let switch = network.switch(id);
    if switch.open {
        Step::TerminatePath
    } else if switch.is_openable() {
        result.switches_to_open.insert(id);
        Step::TerminatePath
    } else {
        Step::Continue
    }
}

fn visit_dc_switch(network: &Network, id: DcSwitchId, result: &mut TrippingResult) -> Step {
    let switch = network.dc_switch(id);
    if switch.open {
        Step::TerminatePath
    } else if switch.is_openable() {
        result.dc_switches_to_open.insert(id);
        Step::TerminatePath
    } else {
        Step::Continue
    }
}

/// Walk the AC topology from `seed`, accumulating into `result`.
pub fn traverse(network: &Network, seed: TerminalId, result: &mut TrippingResult) {
    let tripped = network.terminal(seed).equipment;
    let mut visited_terminals: HashSet<TerminalId> = HashSet::new();
    let mut visited_vertices: HashSet<(VoltageLevelId, NodeIndex)> = HashSet::new();
    let mut worklist = vec![Visit::Terminal(seed)];

    while let Some(visit) = worklist.pop() {
        match visit {
            Visit::Terminal(id) => {
                let terminal = network.terminal(id);
                if id != seed && terminal.equipment == tripped {
                    continue;
                }
                if !visited_terminals.insert(id) {
                    continue;
                }
                if visit_terminal(network, id, result) == Step::TerminatePath {
                    continue;
                }
                worklist.push(Visit::Vertex(terminal.voltage_level, terminal.vertex));
                if terminal.equipment != tripped {
                    let equipment = network.equipment(terminal.equipment);
                    for &other in equipment.terminals.iter().filter(|&&t| t != id) {
                        worklist.push(Visit::Terminal(other));
                    }
                }
            }
            Visit::Vertex(vl, vertex) => {
                if !visited_vertices.insert((vl, vertex)) {
                    continue;
                }
                let level = network.voltage_level(vl);
                for &other in level.terminals_at(vertex) {
                    worklist.push(Visit::Terminal(other));
                }
                for (edge, next) in level.neighbors(vertex) {
                    let step = match edge {
                        TopologyEdge::Switch(switch) => visit_switch(network, switch, result),
                        TopologyEdge::InternalConnection => Step::Continue,
                    };
                    if step == Step::Continue {
                        worklist.push(Visit::Vertex(vl, next));
                    }
                }
            }
        }
    }

    trace!(
        seed = %network.describe_terminal(seed),
        terminals = visited_terminals.len(),
        vertices = visited_vertices.len(),
        switches_to_open = result.switches_to_open.len(),
        terminals_to_disconnect = result.terminals_to_disconnect.len(),
        "AC traversal done"
    );
}

/// Walk the DC topology from `seed`, collecting DC breakers to open.
///
/// With `disconnect_terminals`, every connected DC terminal on the DC nodes
/// reached (the electrically merged node) is disconnected as well.
pub fn traverse_dc(network: &Network, seed: DcNodeId, disconnect_terminals: bool, result: &mut TrippingResult) {
    let mut visited: HashSet<DcNodeId> = HashSet::new();
    let mut worklist = vec![seed];

    while let Some(node) = worklist.pop() {
        if !visited.insert(node) {
            continue;
        }
        if disconnect_terminals {
            for &terminal in network.dc_node(node).terminals() {
                if network.dc_terminal(terminal).connected {
                    result.dc_terminals_to_disconnect.insert(terminal);
                }
            }
        }
        for (switch, next) in network.dc_neighbors(node) {
            if visit_dc_switch(network, switch, result) == Step::Continue {
                worklist.push(next);
            }
        }
    }

    trace!(
        seed = %network.dc_node(seed).id,
        nodes = visited.len(),
        dc_switches_to_open = result.dc_switches_to_open.len(),
        "DC traversal done"
    );
}
