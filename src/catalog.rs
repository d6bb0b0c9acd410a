// Built-in incident reconstructions. Compiled-in mock data, validated on load.

use serde::Serialize;

use crate::error::EngineError;
use crate::scenario::{Equipment, EquipmentStatus, IncidentMeta, Personnel, Scenario};
use crate::scene::SceneLayout;
use crate::script::{Action, Script, ScriptStep};
use crate::timeline::{Timeline, TimelineEvent};
use crate::types::{EventStatus, Intensity, PersonnelGroup, ScenarioId, Vec3};

const VESSEL_START: Vec3 = Vec3::new(-20.0, 0.0, 4.5);
const BERTH: Vec3 = Vec3::new(-4.0, 0.0, 4.5);

/// Entry for the scenario picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub reference: String,
    pub title: String,
    pub site: String,
    pub steps: usize,
    pub nominal_duration_ms: u64,
}

/// Load a built-in scenario.
pub fn scenario(id: ScenarioId) -> Result<Scenario, EngineError> {
    match id {
        ScenarioId::JettyHoseFailure => jetty_hose_failure(),
        ScenarioId::MooringLineParting => mooring_line_parting(),
    }
}

pub fn summaries() -> Result<Vec<ScenarioSummary>, EngineError> {
    ScenarioId::ALL
        .iter()
        .map(|id| {
            let scenario = scenario(*id)?;
            Ok(ScenarioSummary {
                id: *id,
                reference: scenario.meta().reference.clone(),
                title: scenario.meta().title.clone(),
                site: scenario.meta().site.clone(),
                steps: scenario.timeline().len(),
                nominal_duration_ms: scenario.script().nominal_duration().as_millis() as u64,
            })
        })
        .collect()
}

fn equipment(
    id: &str,
    name: &str,
    kind: &str,
    status: EquipmentStatus,
    integrity_pct: u8,
    last_inspection: &str,
) -> Equipment {
    Equipment {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        status,
        integrity_pct,
        last_inspection: last_inspection.to_string(),
    }
}

fn person(id: &str, name: &str, role: &str, group: PersonnelGroup) -> Personnel {
    Personnel {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        group,
    }
}

fn jetty_layout() -> SceneLayout {
    SceneLayout {
        vessel_start: VESSEL_START,
        jetty_position: Vec3::new(0.0, 1.0, 0.0),
        jetty_length: 40.0,
        coupling_point: Vec3::new(-4.0, 1.6, 2.2),
        spill_origin: Vec3::new(-4.0, 0.0, 3.2),
        boom_stowed: Vec3::new(8.0, 1.2, -1.0),
        boom_radius: 8.0,
        warning_light: Vec3::new(2.0, 5.0, -0.5),
        personnel_posts: vec![
            (PersonnelGroup::TerminalOperators, Vec3::new(1.0, 1.2, -0.5)),
            (PersonnelGroup::MooringCrew, Vec3::new(-10.0, 1.2, -0.8)),
            (PersonnelGroup::EmergencyResponse, Vec3::new(4.0, 1.2, -1.2)),
            (PersonnelGroup::BoomCrew, Vec3::new(8.0, 1.2, -1.8)),
            (PersonnelGroup::RecoveryCrew, Vec3::new(-8.0, 1.2, -1.8)),
        ],
    }
}

fn jetty_hose_failure() -> Result<Scenario, EngineError> {
    let meta = IncidentMeta {
        reference: "INC-2024-0117".to_string(),
        title: "Quick-release coupling failure during crude discharge".to_string(),
        site: "Marine Terminal, Jetty 3".to_string(),
        date: "2024-03-14".to_string(),
        summary: "A pressure surge during discharge parted the quick-release coupling on \
                  loading arm 2, releasing crude onto the water before shutdown."
            .to_string(),
    };

    let timeline = Timeline::new(vec![
        TimelineEvent::new(
            0,
            "14:05:00",
            "Discharge Commenced",
            "Vessel all fast at Jetty 3; crude discharge started through loading arm 2.",
            EventStatus::Normal,
        )?
        .with_equipment(&["EQ-CRG-01", "EQ-MLA-02"])
        .with_personnel(&["P-001", "P-002"]),
        TimelineEvent::new(
            990,
            "14:21:30",
            "Pressure Surge Detected",
            "PT-104 registered a line pressure spike above the 12 bar alarm setpoint.",
            EventStatus::Warning,
        )?
        .with_equipment(&["EQ-PRS-01", "EQ-QRC-02"])
        .with_personnel(&["P-001"]),
        TimelineEvent::new(
            1030,
            "14:22:10",
            "Coupling Failure",
            "Quick-release coupling QC-2 parted under load; crude released at the manifold.",
            EventStatus::Critical,
        )?
        .with_equipment(&["EQ-QRC-02", "EQ-MLA-02"])
        .with_personnel(&["P-001", "P-003"])
        .with_spill_volume("~1.5 m³"),
        TimelineEvent::new(
            1060,
            "14:22:40",
            "Emergency Shutdown Activated",
            "ESD valve closed from the jetty control room; cargo pumps tripped.",
            EventStatus::Response,
        )?
        .with_equipment(&["EQ-ESD-01", "EQ-CRG-01"])
        .with_personnel(&["P-002", "P-004"]),
        TimelineEvent::new(
            1500,
            "14:30:00",
            "Vessel Resecured at Berth",
            "Mooring lines re-tensioned after the vessel ranged off the fenders.",
            EventStatus::Response,
        )?
        .with_personnel(&["P-003"]),
        TimelineEvent::new(
            1860,
            "14:36:00",
            "Containment Boom Deployed",
            "200 m boom launched and towed around the slick on the seaward side.",
            EventStatus::Mitigation,
        )?
        .with_equipment(&["EQ-BOOM-01"])
        .with_personnel(&["P-005"]),
        TimelineEvent::new(
            3180,
            "14:58:00",
            "Spill Contained",
            "Slick fully enclosed by the boom; no further release from the manifold.",
            EventStatus::Contained,
        )?
        .with_equipment(&["EQ-BOOM-01"])
        .with_personnel(&["P-004", "P-005"])
        .with_spill_volume("4.2 m³"),
        TimelineEvent::new(
            4200,
            "15:15:00",
            "Authorities Notified",
            "Harbour master and environmental regulator notified; initial report filed.",
            EventStatus::Reporting,
        )?
        .with_personnel(&["P-007"]),
        TimelineEvent::new(
            16500,
            "18:40:00",
            "Bulk Recovery Completed",
            "Weir skimmer recovered the bulk of the released crude; residual sheen monitored.",
            EventStatus::Recovery,
        )?
        .with_equipment(&["EQ-SKM-01", "EQ-BOOM-01"])
        .with_personnel(&["P-006"])
        .with_spill_volume("4.2 m³")
        .with_recovered_volume("3.6 m³"),
    ])?;

    let drift = Vec3::new(-2.5, 0.0, 5.5);
    let script = Script::new(vec![
        ScriptStep::new(1500)
            .then(Action::MoveVessel { to: BERTH })
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::TerminalOperators,
            })
            .ramp(10, 120),
        ScriptStep::new(1800).then(Action::SetWarning { active: true }),
        ScriptStep::new(2000)
            .then(Action::BreakCoupling)
            .then(Action::MoveVessel { to: drift })
            .then(Action::SetSpill {
                to: Intensity::new(0.8),
            })
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::MooringCrew,
            })
            .ramp(8, 100),
        ScriptStep::new(1500).then(Action::ShowPersonnel {
            group: PersonnelGroup::EmergencyResponse,
        }),
        ScriptStep::new(1200)
            .then(Action::MoveVessel { to: BERTH })
            .ramp(6, 150),
        ScriptStep::new(2000)
            .then(Action::DeployBoom)
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::BoomCrew,
            })
            .then(Action::SetSpill {
                to: Intensity::new(0.5),
            })
            .ramp(5, 120),
        ScriptStep::new(1500)
            .then(Action::SetSpill {
                to: Intensity::new(0.3),
            })
            .then(Action::SetWarning { active: false })
            .ramp(4, 150),
        ScriptStep::new(1200).then(Action::HidePersonnel {
            group: PersonnelGroup::MooringCrew,
        }),
        ScriptStep::new(2500)
            .then(Action::HidePersonnel {
                group: PersonnelGroup::EmergencyResponse,
            })
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::RecoveryCrew,
            }),
    ])?;

    let equipment = vec![
        equipment("EQ-CRG-01", "Cargo Pump CP-1", "pump", EquipmentStatus::Degraded, 74, "2023-11-02"),
        equipment("EQ-MLA-02", "Marine Loading Arm 2", "loading arm", EquipmentStatus::Degraded, 62, "2023-09-18"),
        equipment("EQ-QRC-02", "Quick-Release Coupling QC-2", "coupling", EquipmentStatus::Failed, 18, "2023-06-30"),
        equipment("EQ-PRS-01", "Surge Pressure Transmitter PT-104", "sensor", EquipmentStatus::Operational, 88, "2024-01-12"),
        equipment("EQ-ESD-01", "Emergency Shutdown Valve ESD-3", "valve", EquipmentStatus::Operational, 95, "2024-02-01"),
        equipment("EQ-BOOM-01", "Containment Boom (200 m)", "boom", EquipmentStatus::Deployed, 100, "2024-01-25"),
        equipment("EQ-SKM-01", "Weir Skimmer WS-2", "skimmer", EquipmentStatus::Deployed, 92, "2023-12-08"),
    ];

    let personnel = vec![
        person("P-001", "R. Okafor", "Jetty Operator", PersonnelGroup::TerminalOperators),
        person("P-002", "M. Lindqvist", "Loading Master", PersonnelGroup::TerminalOperators),
        person("P-003", "J. Alvarez", "Chief Officer (vessel)", PersonnelGroup::MooringCrew),
        person("P-004", "S. Tanaka", "Emergency Response Lead", PersonnelGroup::EmergencyResponse),
        person("P-005", "K. Mensah", "Boom Team Lead", PersonnelGroup::BoomCrew),
        person("P-006", "A. Novak", "Recovery Supervisor", PersonnelGroup::RecoveryCrew),
        person("P-007", "L. Brennan", "HSE Manager", PersonnelGroup::EmergencyResponse),
    ];

    Scenario::new(
        ScenarioId::JettyHoseFailure,
        meta,
        timeline,
        script,
        equipment,
        personnel,
        jetty_layout(),
    )
}

fn mooring_line_parting() -> Result<Scenario, EngineError> {
    let meta = IncidentMeta {
        reference: "INC-2024-0142".to_string(),
        title: "Forward spring line parted in squall".to_string(),
        site: "Marine Terminal, Jetty 1".to_string(),
        date: "2024-04-02".to_string(),
        summary: "A gust front parted the forward spring line; the emergency release \
                  coupling separated the arm with a minor sheen."
            .to_string(),
    };

    let timeline = Timeline::new(vec![
        TimelineEvent::new(
            0,
            "03:10:00",
            "Cargo Transfer in Progress",
            "Night-shift gasoline loading through arm 1 at reduced rate.",
            EventStatus::Normal,
        )?
        .with_equipment(&["EQ-MLA-01"])
        .with_personnel(&["P-102"]),
        TimelineEvent::new(
            420,
            "03:17:00",
            "Gust Front Arrives",
            "Anemometer recorded gusts of 42 knots beam-on to the berth.",
            EventStatus::Warning,
        )?
        .with_equipment(&["EQ-WND-01"])
        .with_personnel(&["P-102"]),
        TimelineEvent::new(
            445,
            "03:17:25",
            "Forward Spring Line Parted",
            "FS-1 parted at the bollard; vessel surged aft and off the berth.",
            EventStatus::Critical,
        )?
        .with_equipment(&["EQ-MOOR-01"])
        .with_personnel(&["P-101"])
        .with_spill_volume("~0.1 m³"),
        TimelineEvent::new(
            470,
            "03:17:50",
            "Emergency Release Activated",
            "ERC dry-break separated the arm before it reached its envelope limit.",
            EventStatus::Response,
        )?
        .with_equipment(&["EQ-ERC-01", "EQ-MLA-01"])
        .with_personnel(&["P-102", "P-104"]),
        TimelineEvent::new(
            1500,
            "03:35:00",
            "Tugs Return Vessel to Berth",
            "Two harbour tugs pushed the vessel back alongside; boom laid as a precaution.",
            EventStatus::Mitigation,
        )?
        .with_equipment(&["EQ-BOOM-01"])
        .with_personnel(&["P-103", "P-105"]),
        TimelineEvent::new(
            2700,
            "03:55:00",
            "Sheen Contained",
            "Residual sheen held inside the boom and absorbed.",
            EventStatus::Contained,
        )?
        .with_equipment(&["EQ-BOOM-01"])
        .with_personnel(&["P-104", "P-105"])
        .with_spill_volume("0.2 m³")
        .with_recovered_volume("0.15 m³"),
    ])?;

    let off_berth = Vec3::new(-7.0, 0.0, 8.0);
    let script = Script::new(vec![
        ScriptStep::new(1500)
            .then(Action::MoveVessel { to: BERTH })
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::TerminalOperators,
            })
            .ramp(8, 120),
        ScriptStep::new(1200).then(Action::SetWarning { active: true }),
        ScriptStep::new(2000)
            .then(Action::MoveVessel { to: off_berth })
            .then(Action::SetSpill {
                to: Intensity::new(0.15),
            })
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::MooringCrew,
            })
            .ramp(10, 100),
        ScriptStep::new(1500)
            .then(Action::BreakCoupling)
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::EmergencyResponse,
            }),
        ScriptStep::new(2000)
            .then(Action::MoveVessel { to: BERTH })
            .then(Action::DeployBoom)
            .then(Action::ShowPersonnel {
                group: PersonnelGroup::BoomCrew,
            })
            .ramp(10, 150),
        ScriptStep::new(2500)
            .then(Action::SetSpill {
                to: Intensity::new(0.05),
            })
            .then(Action::SetWarning { active: false })
            .ramp(4, 150),
    ])?;

    let equipment = vec![
        equipment("EQ-MLA-01", "Marine Loading Arm 1", "loading arm", EquipmentStatus::Operational, 84, "2024-01-09"),
        equipment("EQ-WND-01", "Jetty Anemometer", "sensor", EquipmentStatus::Operational, 97, "2024-03-01"),
        equipment("EQ-MOOR-01", "Forward Spring Line FS-1", "mooring line", EquipmentStatus::Failed, 0, "2023-10-22"),
        equipment("EQ-ERC-01", "Emergency Release Coupling ERC-1", "coupling", EquipmentStatus::Operational, 91, "2024-02-14"),
        equipment("EQ-BOOM-01", "Containment Boom (200 m)", "boom", EquipmentStatus::Deployed, 100, "2024-01-25"),
    ];

    let personnel = vec![
        person("P-101", "D. Haddad", "Mooring Master", PersonnelGroup::MooringCrew),
        person("P-102", "E. Varga", "Night Shift Jetty Operator", PersonnelGroup::TerminalOperators),
        person("P-103", "T. Osei", "Tug Master", PersonnelGroup::MooringCrew),
        person("P-104", "S. Tanaka", "Emergency Response Lead", PersonnelGroup::EmergencyResponse),
        person("P-105", "K. Mensah", "Boom Team Lead", PersonnelGroup::BoomCrew),
    ];

    Scenario::new(
        ScenarioId::MooringLineParting,
        meta,
        timeline,
        script,
        equipment,
        personnel,
        jetty_layout(),
    )
}
