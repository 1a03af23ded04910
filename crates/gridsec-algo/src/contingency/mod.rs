//! Contingency definitions and topology-aware tripping.
//!
//! Tripping answers one question: which switches must open and which
//! terminals must disconnect so that an equipment is electrically isolated?
//!
//! ## Pipeline
//!
//! 1. **Trip strategies** ([`trip_element`]): resolve an element id and
//!    optional [`Anchor`] to seed terminals, one strategy per equipment family
//! 2. **Traversal** ([`traverse`], [`traverse_dc`]): walk outward from each
//!    seed, stopping at open switches, at the first openable breaker, and at
//!    bus/breaker terminals
//! 3. **Application** ([`apply_tripping`]): open/disconnect on a working copy
//!
//! Contingencies come one by one or from lists expanded against the network
//! ([`CriterionContingencyList`], [`IdentifierContingencyList`]).
//!
//! ## Topology kinds
//!
//! In a `NODE_BREAKER` voltage level switch identity is known, so tripping
//! yields breakers to open. In a `BUS_BREAKER` voltage level it is not: the
//! best that can be said is "disconnect this terminal", and traversal never
//! proposes a switch there.
//!
//! ```text
//!   BBS1 ──D_LD1── n1 ──B_LD1── n2 ── LD1        trip LD1   → open B_LD1
//!     │                                           trip BBS1  → open B_LD1, B_GEN1
//!     └──D_GEN1── n3 ──B_GEN1── n4 ── GEN1
//! ```

pub mod apply;
pub mod definition;
pub mod list;
pub mod traverser;
pub mod tripping;

pub use apply::{apply_tripping, AppliedTripping};
pub use definition::{Anchor, Contingency, ContingencyElement, ContingencyElementType};
pub use list::{
    element_type_of, CriterionContingencyList, IdentifierContingencyList, NetworkElementIdentifier,
    PropertyCondition, ResolvedContingencies,
};
pub use traverser::{traverse, traverse_dc, TrippingResult};
pub use tripping::trip_element;
