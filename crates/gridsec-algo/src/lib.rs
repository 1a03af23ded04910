//! # gridsec-algo: Contingency Tripping and Limit Reduction
//!
//! This crate provides the two algorithms run back-to-back for every
//! contingency of a security analysis, plus the driver that chains them.
//!
//! ## Contingency Tripping
//!
//! [`contingency`] turns "equipment X is lost" into the switches to open and
//! the terminals to disconnect:
//!
//! | Topology kind | What tripping yields |
//! |---------------|----------------------|
//! | `NODE_BREAKER` | the first closed, real breaker on every path |
//! | `BUS_BREAKER` | the connected terminals themselves |
//! | DC | DC breakers, and DC terminals for lines, nodes and converters |
//!
//! ## Limit Reduction
//!
//! [`limit_reduction`] derates operating limits with ordered rules selected by
//! element, duration and contingency criteria. The
//! [`ReducedLimitsComputer`] keeps a cursor on the active contingency and only
//! rebuilds its rule subsets when the applicable rules actually change.
//!
//! ## Security Analysis
//!
//! [`security`] fans contingencies out over a Rayon pool, each worker owning
//! its computer clone and its working copy of the network.
//!
//! ## Example
//!
//! ```rust
//! use gridsec_algo::contingency::{Contingency, ContingencyElementType};
//! use gridsec_algo::test_utils::node_breaker_network;
//! use std::collections::BTreeSet;
//!
//! let network = node_breaker_network();
//! let result = Contingency::single("LD1", ContingencyElementType::Load)
//!     .trip(&network)
//!     .unwrap();
//! assert_eq!(result.switch_ids(&network), BTreeSet::from(["B_LD1"]));
//! ```

pub mod contingency;
pub mod limit_reduction;
pub mod security;
pub mod test_utils;

pub use contingency::{
    apply_tripping, Anchor, Contingency, ContingencyElement, ContingencyElementType,
    CriterionContingencyList, IdentifierContingencyList, TrippingResult,
};
pub use limit_reduction::{
    ContingencyContext, DurationCriterion, LimitReduction, LimitsContainer,
    NetworkElementCriterion, ReducedLimitsComputer,
};
pub use security::{
    LimitViolation, OperatingPointProvider, SecurityAnalysis, SecurityAnalysisConfig,
    SecurityAnalysisReport,
};
