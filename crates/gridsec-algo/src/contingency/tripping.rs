//! Equipment-specific trip strategies.
//!
//! Each strategy resolves an identifier (and optional anchor) to the seeds
//! fed to the traverser: AC terminals, DC nodes or DC terminals. Resolution
//! is all-or-nothing: an unknown id fails with `NotFound`, an anchor that
//! matches no side fails with `NotConnected`, and nothing is traversed in
//! either case.

use gridsec_core::{
    EquipmentId, GridsecError, GridsecResult, Network, TerminalId, ThreeSides,
};
use tracing::debug;

use super::definition::{Anchor, ContingencyElementType};
use super::traverser::{traverse, traverse_dc, TrippingResult};

/// Trip one element, dispatching on its type.
pub fn trip_element(
    network: &Network,
    id: &str,
    element_type: ContingencyElementType,
    anchor: Option<&Anchor>,
) -> GridsecResult<TrippingResult> {
    let mut result = TrippingResult::new();
    match element_type {
        ContingencyElementType::Switch => {
            let switch = network
                .find_switch(id)
                .ok_or_else(|| GridsecError::not_found(element_type.label(), id))?;
            result.switches_to_open.insert(switch);
        }
        ContingencyElementType::Bus => trip_bus(network, id, &mut result)?,
        ContingencyElementType::HvdcLine => trip_hvdc_line(network, id, anchor, &mut result)?,
        ContingencyElementType::DcNode => {
            let node = network
                .find_dc_node(id)
                .ok_or_else(|| GridsecError::not_found(element_type.label(), id))?;
            traverse_dc(network, node, true, &mut result);
        }
        ContingencyElementType::DcGround => {
            let ground = resolve_equipment(network, id, element_type)?;
            for &terminal in &network.equipment(ground).dc_terminals {
                let dc_terminal = network.dc_terminal(terminal);
                if dc_terminal.connected {
                    result.dc_terminals_to_disconnect.insert(terminal);
                }
                traverse_dc(network, dc_terminal.dc_node, false, &mut result);
            }
        }
        ContingencyElementType::DcLine => {
            let line = resolve_equipment(network, id, element_type)?;
            disconnect_dc_sides(network, line, anchor, element_type, &mut result)?;
        }
        ContingencyElementType::AcDcConverter => {
            let converter = resolve_equipment(network, id, element_type)?;
            match anchor {
                Some(Anchor::DcNode(_)) => {
                    disconnect_dc_sides(network, converter, anchor, element_type, &mut result)?
                }
                _ => {
                    for seed in anchored_terminals(network, converter, anchor, element_type)? {
                        traverse(network, seed, &mut result);
                    }
                    disconnect_dc_sides(network, converter, None, element_type, &mut result)?;
                }
            }
        }
        _ => {
            let equipment = resolve_equipment(network, id, element_type)?;
            for seed in anchored_terminals(network, equipment, anchor, element_type)? {
                traverse(network, seed, &mut result);
            }
        }
    }

    debug!(
        element = id,
        switches = result.switches_to_open.len(),
        terminals = result.terminals_to_disconnect.len(),
        dc_switches = result.dc_switches_to_open.len(),
        dc_terminals = result.dc_terminals_to_disconnect.len(),
        "tripped {}",
        element_type.label()
    );
    Ok(result)
}

fn resolve_equipment(
    network: &Network,
    id: &str,
    element_type: ContingencyElementType,
) -> GridsecResult<EquipmentId> {
    network
        .find_equipment(id)
        .filter(|&e| {
            element_type
                .equipment_kinds()
                .contains(&network.equipment(e).kind)
        })
        .ok_or_else(|| GridsecError::not_found(element_type.label(), id))
}

/// AC terminals to seed from, restricted by the anchor if any.
fn anchored_terminals(
    network: &Network,
    equipment: EquipmentId,
    anchor: Option<&Anchor>,
    element_type: ContingencyElementType,
) -> GridsecResult<Vec<TerminalId>> {
    let eq = network.equipment(equipment);
    let Some(anchor) = anchor else {
        return Ok(eq.terminals.clone());
    };
    let seeds: Vec<TerminalId> = match anchor {
        Anchor::Side(side) => eq.terminal(*side).into_iter().collect(),
        Anchor::VoltageLevel(vl) => eq
            .terminals
            .iter()
            .copied()
            .filter(|&t| network.voltage_level(network.terminal(t).voltage_level).id == *vl)
            .collect(),
        Anchor::DcNode(_) => Vec::new(),
    };
    if seeds.is_empty() {
        return Err(GridsecError::not_connected(
            element_type.label(),
            &eq.id,
            anchor.to_string(),
        ));
    }
    Ok(seeds)
}

/// Disconnect the connected DC terminals of an equipment, or only the one on
/// the anchored DC node.
fn disconnect_dc_sides(
    network: &Network,
    equipment: EquipmentId,
    anchor: Option<&Anchor>,
    element_type: ContingencyElementType,
    result: &mut TrippingResult,
) -> GridsecResult<()> {
    let eq = network.equipment(equipment);
    let selected: Vec<_> = match anchor {
        None => eq.dc_terminals.clone(),
        Some(Anchor::DcNode(node)) => eq
            .dc_terminals
            .iter()
            .copied()
            .filter(|&t| network.dc_node(network.dc_terminal(t).dc_node).id == *node)
            .collect(),
        Some(Anchor::Side(side)) => eq.dc_terminal(*side).into_iter().collect(),
        Some(Anchor::VoltageLevel(_)) => Vec::new(),
    };
    if let (Some(a), true) = (anchor, selected.is_empty()) {
        return Err(GridsecError::not_connected(element_type.label(), &eq.id, a.to_string()));
    }
    for terminal in selected {
        if network.dc_terminal(terminal).connected {
            result.dc_terminals_to_disconnect.insert(terminal);
        }
    }
    Ok(())
}

fn trip_bus(network: &Network, id: &str, result: &mut TrippingResult) -> GridsecResult<()> {
    let (vl, vertex) = network
        .bus(id)
        .ok_or_else(|| GridsecError::not_found(ContingencyElementType::Bus.label(), id))?;
    for &terminal in network.terminals_at(vl, vertex) {
        if network.terminal(terminal).connected {
            result.terminals_to_disconnect.insert(terminal);
        }
    }
    Ok(())
}

/// An HVDC line is isolated from its converter stations' AC sides.
fn trip_hvdc_line(
    network: &Network,
    id: &str,
    anchor: Option<&Anchor>,
    result: &mut TrippingResult,
) -> GridsecResult<()> {
    let label = ContingencyElementType::HvdcLine.label();
    let hvdc = network
        .hvdc_line(id)
        .ok_or_else(|| GridsecError::not_found(label, id))?;

    let both = [hvdc.converter_station1, hvdc.converter_station2];
    let stations: Vec<EquipmentId> = match anchor {
        None => both.to_vec(),
        Some(Anchor::Side(side)) => hvdc.converter_station(*side).into_iter().collect(),
        Some(Anchor::VoltageLevel(vl)) => both
            .into_iter()
            .filter(|&station| {
                network
                    .side_voltage_level(station, ThreeSides::One)
                    .is_some_and(|level| level.id == *vl)
            })
            .collect(),
        Some(Anchor::DcNode(_)) => Vec::new(),
    };
    if let (Some(anchor), true) = (anchor, stations.is_empty()) {
        return Err(GridsecError::not_connected(label, id, anchor.to_string()));
    }

    for station in stations {
        for &seed in &network.equipment(station).terminals {
            traverse(network, seed, result);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{node_breaker_network, tutorial_network};
    use std::collections::BTreeSet;

    #[test]
    fn test_switch_trips_only_itself() {
        let network = node_breaker_network();
        let result = trip_element(&network, "D_LD1", ContingencyElementType::Switch, None).unwrap();
        assert_eq!(result.switch_ids(&network), BTreeSet::from(["D_LD1"]));
        assert!(result.terminals_to_disconnect.is_empty());
        assert!(result.traversed_terminals.is_empty());
    }

    #[test]
    fn test_unknown_equipment_is_not_found() {
        let network = tutorial_network();
        let err = trip_element(&network, "GEN", ContingencyElementType::Load, None).unwrap_err();
        assert!(matches!(err, GridsecError::NotFound { .. }));
        assert_eq!(err.to_string(), "Load 'GEN' not found");
    }

    #[test]
    fn test_side_anchor_out_of_range_is_not_connected() {
        let network = tutorial_network();
        let err = trip_element(
            &network,
            "NHV1_NHV2_1",
            ContingencyElementType::Line,
            Some(&Anchor::Side(ThreeSides::Three)),
        )
        .unwrap_err();
        assert!(matches!(err, GridsecError::NotConnected { .. }));
    }
}
