//! Context-sensitive limit reduction.
//!
//! Operating limits can be derated depending on where the element sits, which
//! limit rung is considered and which contingency is being evaluated. A
//! [`LimitReduction`] bundles a factor in `[0, 1]` with three criteria lists:
//!
//! - **Contingency contexts** ([`ContingencyContext`]): OR-combined, empty = everywhere
//! - **Network element criteria** ([`NetworkElementCriterion`]): ids, families,
//!   countries, nominal voltages, properties or an id pattern
//! - **Duration criteria** ([`DurationCriterion`]): permanent, exact, interval
//!   or any temporary limit
//!
//! ## Evaluation
//!
//! For every rung of a ladder, the factor of the *last* reduction in list order
//! whose criteria all match is applied (1.0 if none does). The reduced ladder
//! is then repaired so it stays strictly increasing as the acceptable duration
//! shrinks (see [`reduce_limits`]).
//!
//! ```rust
//! use gridsec_algo::limit_reduction::{
//!     ContingencyContext, DurationCriterion, LimitReduction, NetworkElementCriterion,
//!     ReducedLimitsComputer,
//! };
//! use gridsec_algo::test_utils::tutorial_network;
//! use gridsec_core::{LimitType, ThreeSides};
//!
//! let network = tutorial_network();
//! let reduction = LimitReduction::builder(LimitType::Current, 0.9)
//!     .with_contingency_context(ContingencyContext::specific("contingency1"))
//!     .with_network_element_criterion(NetworkElementCriterion::id_list(["NHV1_NHV2_1"]))
//!     .with_duration_criterion(DurationCriterion::Permanent)
//!     .build()
//!     .unwrap();
//!
//! let mut computer = ReducedLimitsComputer::new(vec![reduction]);
//! computer.set_active_contingency(Some("contingency1"));
//! let limits = computer
//!     .compute_limits(&network, "NHV1_NHV2_1", LimitType::Current, ThreeSides::Two, false)
//!     .unwrap();
//! assert!((limits.reduced.permanent_limit() - 990.0).abs() < 1e-9);
//! assert_eq!(limits.reduced.temporary_limit_value(600), Some(1200.0));
//! ```

pub mod computer;
pub mod context;
pub mod criteria;
pub mod definitions;
pub mod duration;
pub mod reducer;
pub mod reduction;

pub use computer::{LimitsContainer, ReducedLimitsComputer};
pub use context::{is_context_list_applicable, ContingencyContext};
pub use criteria::{
    CountryCriterion, ElementFacts, IdPattern, NetworkElementCriterion, NominalVoltageCriterion,
    PropertyScope, VoltageInterval,
};
pub use definitions::{load_limit_reductions, LimitReductionDocument, LimitReductionSpec};
pub use duration::DurationCriterion;
pub use reducer::reduce_limits;
pub use reduction::{LimitReduction, LimitReductionBuilder};
