//! Unit newtypes for network quantities.
//!
//! Nominal voltages flow through voltage levels, DC nodes and the
//! nominal-voltage criteria of limit reductions. Wrapping them keeps a bare
//! `f64` threshold (amperes, MW, MVA) from being compared against a voltage by
//! accident.
//!
//! ```
//! use gridsec_core::units::Kilovolts;
//!
//! let hv = Kilovolts(380.0);
//! assert!(hv > Kilovolts(225.0));
//! assert_eq!(hv.value(), 380.0);
//! ```

use serde::{Deserialize, Serialize};

/// Voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl Kilovolts {
    /// Get the raw numeric value
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}
