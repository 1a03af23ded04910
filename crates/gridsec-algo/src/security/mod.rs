//! Security analysis: contingencies, reduced limits and violations together.
//!
//! ```text
//! ┌─────────────┐   trip + apply   ┌──────────────┐  operating point  ┌──────────────┐
//! │ Contingency │ ───────────────▶ │ working copy │ ────────────────▶ │   provider   │
//! └─────────────┘                  └──────────────┘                   └──────┬───────┘
//!                                                                            │ values
//!        ┌──────────────────────────┐   reduced limits   ┌───────────────────▼──┐
//!        │ ReducedLimitsComputer    │ ─────────────────▶ │  detect_violation    │
//!        │ (cursor on contingency)  │                    └──────────────────────┘
//!        └──────────────────────────┘
//! ```

pub mod analysis;
pub mod provider;
pub mod violation;

pub use analysis::{
    ComputationStatus, PostContingencyResult, SecurityAnalysis, SecurityAnalysisConfig,
    SecurityAnalysisReport,
};
pub use provider::{FixedOperatingPoints, MonitoredQuantity, OperatingPoint, OperatingPointProvider};
pub use violation::{detect_violation, LimitViolation};
