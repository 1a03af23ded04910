//! Applying a tripping result to a working copy of the network.

use gridsec_core::Network;
use serde::Serialize;
use tracing::debug;

use super::traverser::TrippingResult;

/// How many elements actually changed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppliedTripping {
    pub switches_opened: usize,
    pub terminals_disconnected: usize,
    pub dc_switches_opened: usize,
    pub dc_terminals_disconnected: usize,
}

impl AppliedTripping {
    pub fn total(&self) -> usize {
        self.switches_opened
            + self.terminals_disconnected
            + self.dc_switches_opened
            + self.dc_terminals_disconnected
    }
}

/// Open the switches and disconnect the terminals of `result`.
///
/// Elements already open or disconnected are left alone and not counted.
pub fn apply_tripping(network: &mut Network, result: &TrippingResult) -> AppliedTripping {
    let mut applied = AppliedTripping::default();
    for &switch in &result.switches_to_open {
        applied.switches_opened += usize::from(network.open_switch(switch));
    }
    for &terminal in &result.terminals_to_disconnect {
        applied.terminals_disconnected += usize::from(network.disconnect_terminal(terminal));
    }
    for &switch in &result.dc_switches_to_open {
        applied.dc_switches_opened += usize::from(network.open_dc_switch(switch));
    }
    for &terminal in &result.dc_terminals_to_disconnect {
        applied.dc_terminals_disconnected += usize::from(network.disconnect_dc_terminal(terminal));
    }
    debug!(?applied, "tripping applied");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contingency::{Contingency, ContingencyElementType};
    use crate::test_utils::tutorial_network;

    #[test]
    fn test_apply_disconnects_once() {
        let mut network = tutorial_network();
        let result = Contingency::single("NHV1_NHV2_1", ContingencyElementType::Line)
            .trip(&network)
            .unwrap();

        let first = apply_tripping(&mut network, &result);
        assert_eq!(first.terminals_disconnected, 2);
        assert_eq!(first.total(), 2);

        let line = network.get_equipment("NHV1_NHV2_1").unwrap();
        assert!(line.terminals.iter().all(|&t| !network.terminal(t).connected));

        let second = apply_tripping(&mut network, &result);
        assert_eq!(second.total(), 0);
    }
}
