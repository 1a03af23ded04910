use std::collections::BTreeSet;

use gridsec_algo::contingency::{
    apply_tripping, trip_element, Anchor, Contingency, ContingencyElement, ContingencyElementType,
};
use gridsec_algo::test_utils::{dc_network, node_breaker_network, tutorial_network};
use gridsec_core::{GridsecError, Network, ThreeSides};

fn trip(network: &Network, id: &str, element_type: ContingencyElementType) -> gridsec_algo::TrippingResult {
    trip_element(network, id, element_type, None).unwrap()
}

#[test]
fn busbar_section_opens_every_feeder_breaker() {
    let network = node_breaker_network();
    let result = trip(&network, "BBS1", ContingencyElementType::BusbarSection);

    assert_eq!(
        result.switch_ids(&network),
        BTreeSet::from(["B_CS1", "B_GEN1", "B_LD1", "B_LINE1", "B_SVC", "B_TWT3"])
    );
    // LINE2 has no breaker in S1VL1: the walk crosses it to the bus/breaker side
    assert_eq!(result.terminal_ids(&network), BTreeSet::from([("LINE2", 2)]));
    assert_eq!(
        result.traversed_terminal_ids(&network),
        BTreeSet::from([("BBS1", 1), ("LINE2", 1)])
    );
}

#[test]
fn open_breaker_is_never_proposed() {
    let network = node_breaker_network();
    let busbar = trip(&network, "BBS1", ContingencyElementType::BusbarSection);
    assert!(!busbar.switch_ids(&network).contains("B_SH1"));

    let shunt = trip(&network, "SH1", ContingencyElementType::ShuntCompensator);
    assert!(shunt.is_empty());
    assert_eq!(shunt.traversed_terminal_ids(&network), BTreeSet::from([("SH1", 1)]));
}

#[test]
fn fictitious_breaker_is_crossed() {
    let network = node_breaker_network();
    let result = trip(&network, "SVC1", ContingencyElementType::StaticVarCompensator);
    assert_eq!(result.switch_ids(&network), BTreeSet::from(["B_SVC"]));

    let busbar = trip(&network, "BBS1", ContingencyElementType::BusbarSection);
    assert!(!busbar.switch_ids(&network).contains("FB"));
}

#[test]
fn line_sides_are_tripped_independently() {
    let network = node_breaker_network();
    let result = trip(&network, "LINE1", ContingencyElementType::Line);
    assert_eq!(result.switch_ids(&network), BTreeSet::from(["B_LINE1"]));
    assert_eq!(result.terminal_ids(&network), BTreeSet::from([("LINE1", 2)]));

    let anchored = trip_element(
        &network,
        "LINE1",
        ContingencyElementType::Branch,
        Some(&Anchor::VoltageLevel("S1VL1".into())),
    )
    .unwrap();
    assert_eq!(anchored.switch_ids(&network), BTreeSet::from(["B_LINE1"]));
    assert!(anchored.terminals_to_disconnect.is_empty());

    let far_side = trip_element(
        &network,
        "LINE1",
        ContingencyElementType::Line,
        Some(&Anchor::Side(ThreeSides::Two)),
    )
    .unwrap();
    assert!(far_side.switches_to_open.is_empty());
    assert_eq!(far_side.terminal_ids(&network), BTreeSet::from([("LINE1", 2)]));
}

#[test]
fn feeder_without_breaker_reaches_the_busbar() {
    let network = node_breaker_network();
    let result = trip(&network, "LINE2", ContingencyElementType::Line);
    assert_eq!(
        result.switch_ids(&network),
        BTreeSet::from(["B_CS1", "B_GEN1", "B_LD1", "B_LINE1", "B_SVC", "B_TWT3"])
    );
    assert_eq!(result.terminal_ids(&network), BTreeSet::from([("LINE2", 2)]));
    assert!(result.traversed_terminal_ids(&network).contains(&("BBS1", 1)));
}

#[test]
fn three_windings_transformer_legs() {
    let network = node_breaker_network();
    let result = trip(&network, "TWT3", ContingencyElementType::ThreeWindingsTransformer);
    assert_eq!(result.switch_ids(&network), BTreeSet::from(["B_TWT3"]));
    // leg 3 is already disconnected
    assert_eq!(result.terminal_ids(&network), BTreeSet::from([("TWT3", 2)]));

    let third = trip_element(
        &network,
        "TWT3",
        ContingencyElementType::ThreeWindingsTransformer,
        Some(&Anchor::Side(ThreeSides::Three)),
    )
    .unwrap();
    assert!(third.is_empty());
}

#[test]
fn hvdc_line_isolates_converter_stations() {
    let network = node_breaker_network();
    let result = trip(&network, "HVDC1", ContingencyElementType::HvdcLine);
    assert_eq!(result.switch_ids(&network), BTreeSet::from(["B_CS1"]));
    assert_eq!(result.terminal_ids(&network), BTreeSet::from([("CS2", 1)]));

    let side_one = trip_element(
        &network,
        "HVDC1",
        ContingencyElementType::HvdcLine,
        Some(&Anchor::Side(ThreeSides::One)),
    )
    .unwrap();
    assert_eq!(side_one.switch_ids(&network), BTreeSet::from(["B_CS1"]));
    assert!(side_one.terminals_to_disconnect.is_empty());

    let remote = trip_element(
        &network,
        "HVDC1",
        ContingencyElementType::HvdcLine,
        Some(&Anchor::VoltageLevel("S2VL1".into())),
    )
    .unwrap();
    assert!(remote.switches_to_open.is_empty());
    assert_eq!(remote.terminal_ids(&network), BTreeSet::from([("CS2", 1)]));

    let err = trip_element(
        &network,
        "HVDC1",
        ContingencyElementType::HvdcLine,
        Some(&Anchor::VoltageLevel("S1VL2".into())),
    )
    .unwrap_err();
    assert!(matches!(err, GridsecError::NotConnected { .. }));
}

#[test]
fn bus_disconnects_every_connected_terminal() {
    let network = node_breaker_network();
    let result = trip(&network, "S2B1", ContingencyElementType::Bus);
    assert!(result.switches_to_open.is_empty());
    assert_eq!(
        result.terminal_ids(&network),
        BTreeSet::from([("CS2", 1), ("LINE1", 2), ("LINE2", 2)])
    );
}

#[test]
fn bus_breaker_levels_never_yield_switches() {
    let network = tutorial_network();
    for (id, element_type) in [
        ("GEN", ContingencyElementType::Generator),
        ("LOAD", ContingencyElementType::Load),
        ("NHV1_NHV2_1", ContingencyElementType::Line),
        ("NGEN_NHV1", ContingencyElementType::TwoWindingsTransformer),
        ("NHV1", ContingencyElementType::Bus),
    ] {
        let result = trip(&network, id, element_type);
        assert!(result.switches_to_open.is_empty(), "{id}");
        assert!(!result.terminals_to_disconnect.is_empty(), "{id}");
    }
}

#[test]
fn disconnected_terminal_is_not_reported() {
    let mut network = tutorial_network();
    let first = trip(&network, "LOAD", ContingencyElementType::Load);
    apply_tripping(&mut network, &first);

    let second = trip(&network, "LOAD", ContingencyElementType::Load);
    assert!(second.is_empty());
}

#[test]
fn dc_node_collects_breakers_and_merged_terminals() {
    let network = dc_network();
    let result = trip(&network, "DN2", ContingencyElementType::DcNode);
    assert_eq!(result.dc_switch_ids(&network), BTreeSet::from(["DBR1", "DBR3"]));
    assert_eq!(
        result.dc_terminal_ids(&network),
        BTreeSet::from([("DL1", 1), ("GND", 1)])
    );
    assert!(result.switches_to_open.is_empty());
}

#[test]
fn dc_ground_keeps_other_terminals() {
    let network = dc_network();
    let result = trip(&network, "GND", ContingencyElementType::DcGround);
    assert_eq!(result.dc_switch_ids(&network), BTreeSet::from(["DBR1", "DBR3"]));
    assert_eq!(result.dc_terminal_ids(&network), BTreeSet::from([("GND", 1)]));
}

#[test]
fn dc_line_sides() {
    let network = dc_network();
    let result = trip(&network, "DL1", ContingencyElementType::DcLine);
    assert_eq!(result.dc_terminal_ids(&network), BTreeSet::from([("DL1", 1), ("DL1", 2)]));
    assert!(result.dc_switches_to_open.is_empty());

    let anchored = trip_element(
        &network,
        "DL1",
        ContingencyElementType::DcLine,
        Some(&Anchor::DcNode("DN4".into())),
    )
    .unwrap();
    assert_eq!(anchored.dc_terminal_ids(&network), BTreeSet::from([("DL1", 2)]));

    let err = trip_element(
        &network,
        "DL1",
        ContingencyElementType::DcLine,
        Some(&Anchor::DcNode("DN1".into())),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "DC line 'DL1' is not connected to DC node 'DN1'");
}

#[test]
fn converter_trips_both_sides() {
    let network = dc_network();
    let result = trip(&network, "CONV1", ContingencyElementType::AcDcConverter);
    assert_eq!(result.terminal_ids(&network), BTreeSet::from([("CONV1", 1)]));
    // DC side 2 is already disconnected
    assert_eq!(result.dc_terminal_ids(&network), BTreeSet::from([("CONV1", 1)]));

    let dc_only = trip_element(
        &network,
        "CONV1",
        ContingencyElementType::AcDcConverter,
        Some(&Anchor::DcNode("DN1".into())),
    )
    .unwrap();
    assert!(dc_only.terminals_to_disconnect.is_empty());
    assert_eq!(dc_only.dc_terminal_ids(&network), BTreeSet::from([("CONV1", 1)]));
}

#[test]
fn contingency_is_all_or_nothing() {
    let network = node_breaker_network();
    let both = Contingency::new(
        "N-2",
        vec![
            ContingencyElement::new("LD1", ContingencyElementType::Load),
            ContingencyElement::new("GEN1", ContingencyElementType::Generator),
        ],
    );
    let result = both.trip(&network).unwrap();
    assert_eq!(result.switch_ids(&network), BTreeSet::from(["B_GEN1", "B_LD1"]));

    let broken = Contingency::new(
        "N-2 broken",
        vec![
            ContingencyElement::new("LD1", ContingencyElementType::Load),
            ContingencyElement::new("GEN1", ContingencyElementType::Load),
        ],
    );
    let err = broken.trip(&network).unwrap_err();
    assert_eq!(err.to_string(), "Load 'GEN1' not found");
}

#[test]
fn applying_busbar_trip_opens_breakers_on_working_copy() {
    let base = node_breaker_network();
    let result = trip(&base, "BBS1", ContingencyElementType::BusbarSection);

    let mut working = base.clone();
    let applied = apply_tripping(&mut working, &result);
    assert_eq!(applied.switches_opened, 6);
    assert_eq!(applied.terminals_disconnected, 1);

    for &switch in &result.switches_to_open {
        assert!(working.switch(switch).open);
        assert!(!base.switch(switch).open);
    }
}
