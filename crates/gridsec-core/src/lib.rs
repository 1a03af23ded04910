//! # gridsec-core: Network Model for Contingency Analysis
//!
//! Provides the read-only network model that contingency tripping and limit
//! reduction work against.
//!
//! ## Design Philosophy
//!
//! A network is a set of **voltage levels**, each owning an undirected
//! `petgraph` graph of its internal wiring:
//! - **NODE_BREAKER** levels: vertices are numbered nodes, edges are switches
//!   (breakers, disconnectors) or internal connections
//! - **BUS_BREAKER** levels: vertices are configured buses; which switch sits
//!   behind a terminal is unknown
//!
//! Equipment (loads, lines, transformers, converters...) owns **terminals**,
//! each attached to one vertex of one voltage level. DC equipment owns DC
//! terminals attached to **DC nodes**, joined by DC switches in a separate
//! network-wide graph.
//!
//! Every element lives in an arena and is addressed by a typed index
//! ([`TerminalId`], [`SwitchId`], [`EquipmentId`], ...), while string
//! identifiers resolve through [`Network::identifiable`].
//!
//! ## Quick Start
//!
//! ```rust
//! use gridsec_core::builder::{Connection, EquipmentInput, NetworkBuilder, VoltageLevelInput};
//! use gridsec_core::{EquipmentKind, LimitType, LoadingLimits, ThreeSides};
//!
//! let mut builder = NetworkBuilder::new();
//! builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLHV1", 380.0));
//! builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLHV2", 380.0));
//! builder.add_bus("VLHV1", "NHV1");
//! builder.add_bus("VLHV2", "NHV2");
//! builder.add_equipment(EquipmentInput::branch(
//!     EquipmentKind::Line,
//!     "NHV1_NHV2_1",
//!     Connection::bus("VLHV1", "NHV1"),
//!     Connection::bus("VLHV2", "NHV2"),
//! ));
//! builder.add_limits(
//!     "NHV1_NHV2_1",
//!     LimitType::Current,
//!     ThreeSides::Two,
//!     LoadingLimits::new(1100.0).with_temporary("10'", 600, 1200.0),
//! );
//!
//! let network = builder.build().unwrap();
//! let limits = network
//!     .limits("NHV1_NHV2_1", LimitType::Current, ThreeSides::Two)
//!     .unwrap();
//! assert_eq!(limits.temporary_limit_value(600), Some(1200.0));
//! ```
//!
//! ## Modules
//!
//! - [`builder`] - Fluent, diagnosed network construction
//! - [`limits`] - Limit categories, sides and limit ladders
//! - [`topology`] - Voltage level graphs and switches
//! - [`equipment`] - Equipment families and terminals
//! - [`dc`] - DC nodes, DC switches and DC terminals
//! - [`diagnostics`] - Validation and diagnostic reporting

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod dc;
pub mod diagnostics;
pub mod equipment;
pub mod error;
pub mod limits;
pub mod network;
pub mod topology;
pub mod units;

pub use builder::{AddResult, NetworkBuilder};
pub use dc::{DcNode, DcSwitch, DcTerminal, DcTopology};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use equipment::{Equipment, EquipmentKind, HvdcLine, Substation, Terminal};
pub use error::{GridsecError, GridsecResult};
pub use limits::{LimitDuration, LimitType, LoadingLimits, TemporaryLimit, ThreeSides};
pub use network::{IdentifiableRef, Network, NetworkStats};
pub use petgraph::graph::NodeIndex;
pub use topology::{Switch, SwitchKind, TopologyEdge, TopologyKind, VertexKey, VoltageLevel};
pub use units::Kilovolts;

// Newtype wrappers for arena indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoltageLevelId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DcNodeId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DcSwitchId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DcTerminalId(usize);

macro_rules! impl_arena_id {
    ($($name:ident),*) => {
        $(
            impl $name {
                #[inline]
                pub fn new(value: usize) -> Self {
                    $name(value)
                }
                #[inline]
                pub fn value(&self) -> usize {
                    self.0
                }
            }
        )*
    };
}

impl_arena_id!(
    VoltageLevelId,
    SwitchId,
    TerminalId,
    EquipmentId,
    DcNodeId,
    DcSwitchId,
    DcTerminalId
);
