// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use rstest::rstest;

use super::{
    export_topology, load_topology, load_topology_file, save_topology_file, DescriptorIssue,
    Problem, TopologyError,
};
use crate::model::fixtures::{
    east_switch_merge, eid, nid, tid, train, train_heading, west_switch_fan,
};
use crate::model::{
    AttributeIssue, Connector, ConnectorRole, EdgeId, NodeKind, ObjectKind, Route, SensorStatus,
    TrackError, TrackNetwork, TrainRef, TravelDirection,
};
use crate::occupancy::{advance, toggle_occupancy};

const FAN: &str = r#"{
  "nodes": [
    { "id": "entry", "kind": "sensor", "label": "Entry" },
    { "id": "S", "kind": "switch", "orientation": "west", "route": "diverging" },
    { "id": "A", "kind": "stop", "platform": "Platform 1" },
    { "id": "B", "kind": "stop", "occupied": true }
  ],
  "edges": [
    { "id": "e-entry", "source": "entry", "target": "S",
      "train": { "id": "1002", "name": "Local", "direction": "right" } },
    { "id": "e-straight", "source": "S", "source_connector": "straight", "target": "A" },
    { "id": "e-diverging", "source": "S", "source_connector": "diverging", "target": "B",
      "train": { "id": "1002", "name": "Local" } }
  ]
}"#;

fn issues(err: TopologyError) -> Vec<DescriptorIssue> {
    match err {
        TopologyError::Invalid(issues) => issues,
        other => panic!("expected invalid topology, got {other}"),
    }
}

fn occupancies(network: &TrackNetwork) -> Vec<(EdgeId, Option<TrainRef>)> {
    network
        .edges()
        .iter()
        .map(|(edge_id, edge)| (edge_id.clone(), edge.occupancy().cloned()))
        .collect()
}

fn branch_toggled_while_unrouted() -> TrackNetwork {
    let mut network = west_switch_fan();
    network
        .set_occupancy(&eid("e-entry"), Some(train("T1")))
        .expect("occupy");
    toggle_occupancy(&mut network, &eid("e-diverging")).expect("toggle");
    network
}

fn manual_train_toggled_onto_the_merge() -> TrackNetwork {
    let mut network = east_switch_merge();
    for (edge, train_id) in [("p1-to-e", "T1"), ("p2-to-e", "T2")] {
        network
            .set_occupancy(&eid(edge), Some(train(train_id)))
            .expect("occupy");
    }
    toggle_occupancy(&mut network, &eid("e-to-x")).expect("toggle");
    network
}

fn train_set_on_an_unrouted_branch() -> TrackNetwork {
    let mut network = west_switch_fan();
    network
        .set_occupancy(
            &eid("e-diverging"),
            Some(train_heading("T1", TravelDirection::Left)),
        )
        .expect("occupy");
    network
}

fn train_advanced_through_the_merge() -> TrackNetwork {
    let mut network = east_switch_merge();
    network
        .set_occupancy(&eid("p1-to-e"), Some(train("T1")))
        .expect("occupy");
    advance(&mut network, &train("T1"), &eid("p1-to-e")).expect("into merge");
    advance(&mut network, &train("T1"), &eid("e-to-x")).expect("onward");
    network
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("signalbox-{}-{name}", std::process::id()))
}

#[test]
fn loads_nodes_edges_and_trains() {
    let network = load_topology(FAN).expect("load");

    assert_eq!(network.rev(), 0);
    assert_eq!(network.nodes().len(), 4);
    assert_eq!(network.edges().len(), 3);

    let entry = network.node(&nid("entry")).expect("entry");
    assert_eq!(entry.label(), "Entry");
    assert_eq!(entry.sensor_status(), Some(SensorStatus::Active));
    assert_eq!(network.node(&nid("S")).expect("S").label(), "S");
    assert_eq!(
        network.node(&nid("S")).expect("S").as_switch().map(|s| s.route),
        Some(Route::Diverging)
    );
    assert_eq!(network.node(&nid("B")).expect("B").stop_occupied(), Some(true));

    let trains = network.trains();
    assert_eq!(trains.len(), 1);
    assert_eq!(trains[0].id(), &tid("1002"));
    assert_eq!(trains[0].direction(), TravelDirection::Right);

    let edge = network.edge(&eid("e-straight")).expect("edge");
    assert_eq!(edge.source_connector(), Some(Connector::Straight));
}

#[test]
fn reports_every_problem_in_one_error() {
    let json = r#"{
      "nodes": [
        { "id": "bad id", "kind": "sensor" },
        { "id": "s1", "kind": "signal" },
        { "id": "s3", "kind": "sensor", "route": "straight" },
        { "id": "s2", "kind": "sensor" },
        { "id": "s2", "kind": "sensor" },
        { "id": "W", "kind": "switch", "orientation": "west" }
      ],
      "edges": [
        { "id": "to-ghost", "source": "s2", "target": "ghost" },
        { "id": "w-branch", "source": "W", "target": "s2" },
        { "id": "w-in", "source": "s2", "target": "W", "target_connector": "sideways" },
        { "id": "t-a", "source": "s2", "target": "W",
          "train": { "id": "7", "name": "Seven" } },
        { "id": "t-b", "source": "W", "source_connector": "diverging", "target": "s2",
          "train": { "id": "8", "name": "Eight" } },
        { "id": "t-c", "source": "W", "source_connector": "straight", "target": "s2",
          "train": { "id": "7", "name": "Seven", "direction": "left" } }
      ]
    }"#;

    let issues = issues(load_topology(json).unwrap_err());
    let descriptors = issues
        .iter()
        .map(|issue| issue.descriptor.as_str())
        .collect::<Vec<_>>();

    assert_eq!(
        descriptors,
        [
            "nodes[0]",
            "node/s1",
            "node/s3",
            "node/s2",
            "edge/to-ghost",
            "edge/w-branch",
            "edge/w-in",
            "edge/t-c",
        ]
    );
    assert_eq!(
        issues[2].problem,
        Problem::Track(TrackError::InvalidAttribute {
            node_id: nid("s3"),
            node_kind: NodeKind::Sensor,
            attribute: "route",
            issue: AttributeIssue::NotApplicable,
        })
    );
    assert_eq!(
        issues[3].problem,
        Problem::Track(TrackError::AlreadyExists {
            kind: ObjectKind::Node,
            id: "s2".to_owned(),
        })
    );
    assert_eq!(
        issues[5].problem,
        Problem::Track(TrackError::InvalidConnector {
            node_id: nid("W"),
            node_kind: NodeKind::Switch,
            role: ConnectorRole::Source,
            connector: None,
        })
    );
    assert!(matches!(issues[6].problem, Problem::InvalidConnectorName(_)));
    assert_eq!(
        issues[7].problem,
        Problem::Track(TrackError::ConflictingTrain {
            edge_id: eid("t-c"),
            train_id: tid("7"),
        })
    );
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = load_topology("{ \"nodes\": [").unwrap_err();
    assert!(matches!(err, TopologyError::Json { path: None, .. }));

    let err = load_topology(r#"{ "nodes": [], "edges": [], "extra": 1 }"#).unwrap_err();
    assert!(matches!(err, TopologyError::Json { .. }));
}

#[rstest]
#[case::document(FAN)]
#[case::empty("{}")]
fn export_then_load_is_identity(#[case] json: &str) {
    let loaded = load_topology(json).expect("load");

    let exported = export_topology(&loaded).expect("export");
    let reloaded = load_topology(&exported).expect("reload");

    assert_eq!(reloaded, loaded);
    assert_eq!(export_topology(&reloaded).expect("export"), exported);
}

#[rstest]
#[case::toggled_unrouted_branch(branch_toggled_while_unrouted())]
#[case::toggled_manual_train(manual_train_toggled_onto_the_merge())]
#[case::set_on_unrouted_branch(train_set_on_an_unrouted_branch())]
#[case::advanced(train_advanced_through_the_merge())]
fn edited_networks_export_to_loadable_documents(#[case] network: TrackNetwork) {
    let exported = export_topology(&network).expect("export");
    let reloaded = load_topology(&exported).expect("reload");

    assert_eq!(occupancies(&reloaded), occupancies(&network));
    assert_eq!(reloaded.trains(), network.trains());

    let again = load_topology(&export_topology(&reloaded).expect("export")).expect("reload");
    assert_eq!(again, reloaded);
}

#[test]
fn manual_train_id_is_reserved() {
    let json = r#"{
      "nodes": [
        { "id": "a", "kind": "sensor" },
        { "id": "b", "kind": "sensor" },
        { "id": "c", "kind": "sensor" }
      ],
      "edges": [
        { "id": "a-b", "source": "a", "target": "b",
          "train": { "id": "manual", "name": "Manual override" } },
        { "id": "b-c", "source": "b", "target": "c",
          "train": { "id": "manual", "name": "Shunter" } }
      ]
    }"#;

    let issues = issues(load_topology(json).unwrap_err());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].descriptor, "edge/b-c");
    assert_eq!(
        issues[0].problem,
        Problem::Track(TrackError::ConflictingTrain {
            edge_id: eid("b-c"),
            train_id: tid("manual"),
        })
    );
}

#[test]
fn exports_fixture_network() {
    let exported = export_topology(&west_switch_fan()).expect("export");
    let value: serde_json::Value = serde_json::from_str(&exported).expect("json");

    let switch = &value["nodes"][2];
    assert_eq!(switch["id"], "S");
    assert_eq!(switch["orientation"], "west");
    assert_eq!(switch["route"], "straight");
    assert!(switch.get("status").is_none());

    let diverging = &value["edges"][0];
    assert_eq!(diverging["id"], "e-diverging");
    assert_eq!(diverging["source_connector"], "diverging");
    assert!(diverging.get("train").is_none());
}

#[test]
fn file_helpers_round_trip_and_report_paths() {
    let path = temp_path("topology.json");
    let network = load_topology(FAN).expect("load");

    save_topology_file(&path, &network).expect("save");
    let loaded = load_topology_file(&path).expect("load file");
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, network);

    let missing = temp_path("missing.json");
    let err = load_topology_file(&missing).unwrap_err();
    let TopologyError::Io { path, .. } = &err else {
        panic!("expected io error, got {err}");
    };
    assert_eq!(path, &missing);
    assert!(err.to_string().contains("missing.json"));
}
