//! Network factories shared by unit and integration tests.

use gridsec_core::builder::{
    Connection, DcConnection, DcSwitchInput, EquipmentInput, NetworkBuilder, SwitchInput,
    VoltageLevelInput,
};
use gridsec_core::{EquipmentKind, LimitType, LoadingLimits, Network, Substation, ThreeSides};

fn substation(id: &str, country: &str) -> Substation {
    Substation {
        id: id.to_string(),
        country: Some(country.to_string()),
        ..Default::default()
    }
}

/// Two-substation bus/breaker grid with fixed current limits.
///
/// ```text
///  GEN ─ NGEN ═NGEN_NHV1═ NHV1 ══NHV1_NHV2_1══ NHV2 ═NHV2_NLOAD═ NLOAD ─ LOAD
///                              ══NHV1_NHV2_2══
/// ```
///
/// Current limits of `NHV1_NHV2_1`: side ONE permanent 500; side TWO
/// permanent 1100, `10'` 1200 A for 600 s, `1'` 1500 A for 60 s, and an
/// unbounded rung for 0 s. `NHV1_NHV2_2` is the mirror image: side ONE
/// permanent 1100, `20'` 1200 A for 1200 s and an unbounded rung for 60 s; side
/// TWO permanent 500. `NHV2_NLOAD` (380/150 kV) carries permanent 1000 A and a
/// `1'` 1200 A rung on both sides. `NGEN_NHV1` has no limits.
pub fn tutorial_network() -> Network {
    let mut builder = NetworkBuilder::new();
    builder.add_substation(substation("P1", "FR"));
    builder.add_substation(substation("P2", "BE"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLGEN", 24.0).with_substation("P1"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLHV1", 380.0).with_substation("P1"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLHV2", 380.0).with_substation("P2"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("VLLOAD", 150.0).with_substation("P2"));
    builder.add_bus("VLGEN", "NGEN");
    builder.add_bus("VLHV1", "NHV1");
    builder.add_bus("VLHV2", "NHV2");
    builder.add_bus("VLLOAD", "NLOAD");

    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::Generator,
        "GEN",
        Connection::bus("VLGEN", "NGEN"),
    ));
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::Load,
        "LOAD",
        Connection::bus("VLLOAD", "NLOAD"),
    ));
    builder.add_equipment(EquipmentInput::branch(
        EquipmentKind::TwoWindingsTransformer,
        "NGEN_NHV1",
        Connection::bus("VLGEN", "NGEN"),
        Connection::bus("VLHV1", "NHV1"),
    ));
    builder.add_equipment(
        EquipmentInput::branch(
            EquipmentKind::TwoWindingsTransformer,
            "NHV2_NLOAD",
            Connection::bus("VLHV2", "NHV2"),
            Connection::bus("VLLOAD", "NLOAD"),
        )
        .with_property("operator", "RTE"),
    );
    for line in ["NHV1_NHV2_1", "NHV1_NHV2_2"] {
        builder.add_equipment(EquipmentInput::branch(
            EquipmentKind::Line,
            line,
            Connection::bus("VLHV1", "NHV1"),
            Connection::bus("VLHV2", "NHV2"),
        ));
    }

    builder.add_limits(
        "NHV1_NHV2_1",
        LimitType::Current,
        ThreeSides::One,
        LoadingLimits::new(500.0),
    );
    builder.add_limits(
        "NHV1_NHV2_1",
        LimitType::Current,
        ThreeSides::Two,
        LoadingLimits::new(1100.0)
            .with_temporary("10'", 600, 1200.0)
            .with_temporary("1'", 60, 1500.0)
            .with_temporary("N/A", 0, f64::MAX),
    );
    builder.add_limits(
        "NHV1_NHV2_2",
        LimitType::Current,
        ThreeSides::One,
        LoadingLimits::new(1100.0)
            .with_temporary("20'", 1200, 1200.0)
            .with_temporary("N/A", 60, f64::MAX),
    );
    builder.add_limits(
        "NHV1_NHV2_2",
        LimitType::Current,
        ThreeSides::Two,
        LoadingLimits::new(500.0),
    );
    for side in [ThreeSides::One, ThreeSides::Two] {
        builder.add_limits(
            "NHV2_NLOAD",
            LimitType::Current,
            side,
            LoadingLimits::new(1000.0).with_temporary("1'", 60, 1200.0),
        );
    }

    builder
        .build()
        .unwrap_or_else(|err| panic!("tutorial network is consistent: {err}"))
}

/// Node/breaker substation `S1VL1` (225 kV) tied to bus/breaker levels.
///
/// ```text
///             ┌─D_LD1─(1)─B_LD1─(2) LD1
///             ├─D_GEN1─(3)─B_GEN1─(4) GEN1
///             ├─D_LINE1─(5)─B_LINE1─(6) LINE1 ──── S2B1 (S2VL1, bus/breaker)
///  BBS1 (0) ──┼─D_SH1─(7)─B_SH1[open]─(8) SH1
///             ├─FB[fictitious breaker]─(9)─B_SVC─(10) SVC1
///             ├─D_LINE2─(11) LINE2 ─────────────── S2B1   (no breaker on this feeder)
///             ├─D_TWT3─(12)─B_TWT3─(13) TWT3 ─┬─ S1B2 (S1VL2, 63 kV)
///             │                               └─ S1B3 (S1VL3, 20 kV, disconnected)
///             └─D_CS1─(14)─B_CS1─(15) CS1 ═HVDC1═ CS2 ── S2B1
/// ```
pub fn node_breaker_network() -> Network {
    let mut builder = NetworkBuilder::new();
    builder.add_substation(substation("S1", "FR"));
    builder.add_substation(substation("S2", "FR"));
    builder.add_voltage_level(VoltageLevelInput::node_breaker("S1VL1", 225.0).with_substation("S1"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("S1VL2", 63.0).with_substation("S1"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("S1VL3", 20.0).with_substation("S1"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("S2VL1", 225.0).with_substation("S2"));
    builder.add_bus("S1VL2", "S1B2");
    builder.add_bus("S1VL3", "S1B3");
    builder.add_bus("S2VL1", "S2B1");

    let vl = "S1VL1";
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::BusbarSection,
        "BBS1",
        Connection::node(vl, 0),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_LD1", 0, 1));
    builder.add_switch(SwitchInput::breaker(vl, "B_LD1", 1, 2));
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::Load,
        "LD1",
        Connection::node(vl, 2),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_GEN1", 0, 3));
    builder.add_switch(SwitchInput::breaker(vl, "B_GEN1", 3, 4));
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::Generator,
        "GEN1",
        Connection::node(vl, 4),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_LINE1", 0, 5));
    builder.add_switch(SwitchInput::breaker(vl, "B_LINE1", 5, 6));
    builder.add_equipment(EquipmentInput::branch(
        EquipmentKind::Line,
        "LINE1",
        Connection::node(vl, 6),
        Connection::bus("S2VL1", "S2B1"),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_SH1", 0, 7));
    builder.add_switch(SwitchInput::breaker(vl, "B_SH1", 7, 8).opened());
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::ShuntCompensator,
        "SH1",
        Connection::node(vl, 8),
    ));

    builder.add_switch(SwitchInput::breaker(vl, "FB", 0, 9).fictitious());
    builder.add_switch(SwitchInput::breaker(vl, "B_SVC", 9, 10));
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::StaticVarCompensator,
        "SVC1",
        Connection::node(vl, 10),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_LINE2", 0, 11));
    builder.add_equipment(EquipmentInput::branch(
        EquipmentKind::Line,
        "LINE2",
        Connection::node(vl, 11),
        Connection::bus("S2VL1", "S2B1"),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_TWT3", 0, 12));
    builder.add_switch(SwitchInput::breaker(vl, "B_TWT3", 12, 13));
    builder.add_equipment(EquipmentInput::three_windings_transformer(
        "TWT3",
        Connection::node(vl, 13),
        Connection::bus("S1VL2", "S1B2"),
        Connection::bus("S1VL3", "S1B3").disconnected(),
    ));

    builder.add_switch(SwitchInput::disconnector(vl, "D_CS1", 0, 14));
    builder.add_switch(SwitchInput::breaker(vl, "B_CS1", 14, 15));
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::VscConverterStation,
        "CS1",
        Connection::node(vl, 15),
    ));
    builder.add_equipment(EquipmentInput::injection(
        EquipmentKind::VscConverterStation,
        "CS2",
        Connection::bus("S2VL1", "S2B1"),
    ));
    builder.add_hvdc_line("HVDC1", "CS1", "CS2");

    builder
        .build()
        .unwrap_or_else(|err| panic!("node/breaker network is consistent: {err}"))
}

/// Detailed DC grid around one AC/DC converter.
///
/// ```text
///  DN1 ─DBR1─ DN2 ─DDIS─ DN3 ─DBR_OPEN[open]─ DN4
///   │          │          ├─DBR3─ DN5
///  CONV1.1    DL1.1      GND            DL1.2 on DN4, CONV1.2 on DN5 (disconnected)
/// ```
///
/// `CONV1` is connected on the AC side to bus `ACB` of bus/breaker level `ACVL`.
pub fn dc_network() -> Network {
    let mut builder = NetworkBuilder::new();
    builder.add_substation(substation("SDC", "DE"));
    builder.add_voltage_level(VoltageLevelInput::bus_breaker("ACVL", 400.0).with_substation("SDC"));
    builder.add_bus("ACVL", "ACB");
    for node in ["DN1", "DN2", "DN3", "DN4", "DN5"] {
        builder.add_dc_node(node, 320.0);
    }
    builder.add_dc_switch(DcSwitchInput::breaker("DBR1", "DN1", "DN2"));
    builder.add_dc_switch(DcSwitchInput::disconnector("DDIS", "DN2", "DN3"));
    builder.add_dc_switch(DcSwitchInput::breaker("DBR_OPEN", "DN3", "DN4").opened());
    builder.add_dc_switch(DcSwitchInput::breaker("DBR3", "DN3", "DN5"));

    builder.add_equipment(EquipmentInput::dc_line(
        "DL1",
        DcConnection::new("DN2"),
        DcConnection::new("DN4"),
    ));
    builder.add_equipment(EquipmentInput::dc_ground("GND", DcConnection::new("DN3")));
    builder.add_equipment(EquipmentInput::ac_dc_converter(
        "CONV1",
        Connection::bus("ACVL", "ACB"),
        DcConnection::new("DN1"),
        DcConnection::new("DN5").disconnected(),
    ));

    builder
        .build()
        .unwrap_or_else(|err| panic!("DC network is consistent: {err}"))
}
