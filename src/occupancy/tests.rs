// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{advance, clear_train, clear_trailing, footprint, refresh_sensors, toggle_occupancy};
use crate::model::fixtures::{
    east_switch_merge, eid, nid, tid, train, train_heading, west_switch_fan,
};
use crate::model::{
    BlockReason, NodeAttributes, Route, SensorStatus, TrackError, TrackNetwork, TravelDirection,
};
use crate::routing::set_route;

fn occupy(network: &mut TrackNetwork, edge: &str, train_id: &str) {
    network
        .set_occupancy(&eid(edge), Some(train(train_id)))
        .expect("occupy");
}

fn occupant(network: &TrackNetwork, edge: &str) -> Option<String> {
    network
        .edge(&eid(edge))
        .expect("edge")
        .occupancy()
        .map(|train| train.id().to_string())
}

fn sensor(network: &TrackNetwork, node: &str) -> SensorStatus {
    network
        .node(&nid(node))
        .expect("node")
        .sensor_status()
        .expect("sensor")
}

#[fixture]
fn fan_with_t1() -> TrackNetwork {
    let mut network = west_switch_fan();
    occupy(&mut network, "e-entry", "T1");
    network
}

#[rstest]
fn advance_moves_onto_the_routed_edge_and_keeps_the_trailing_edge(mut fan_with_t1: TrackNetwork) {
    let rev = fan_with_t1.rev();

    let moved = advance(&mut fan_with_t1, &train("T1"), &eid("e-entry")).expect("advance");

    assert_eq!(moved, vec![eid("e-straight")]);
    assert_eq!(occupant(&fan_with_t1, "e-straight").as_deref(), Some("T1"));
    assert_eq!(occupant(&fan_with_t1, "e-entry").as_deref(), Some("T1"));
    assert_eq!(occupant(&fan_with_t1, "e-diverging"), None);
    assert_eq!(fan_with_t1.rev(), rev + 1);
}

#[test]
fn advance_follows_the_diverging_route() {
    let mut network = west_switch_fan();
    set_route(&mut network, &nid("S"), Route::Diverging).expect("set route");
    occupy(&mut network, "e-entry", "T1");

    let moved = advance(&mut network, &train("T1"), &eid("e-entry")).expect("advance");

    assert_eq!(moved, vec![eid("e-diverging")]);
}

#[rstest]
fn advance_into_a_stop_without_continuation_is_a_dead_end(mut fan_with_t1: TrackNetwork) {
    occupy(&mut fan_with_t1, "e-straight", "T1");
    let before = fan_with_t1.clone();

    let err = advance(&mut fan_with_t1, &train("T1"), &eid("e-straight")).unwrap_err();

    assert_eq!(
        err,
        TrackError::Blocked {
            train_id: tid("T1"),
            from_edge_id: eid("e-straight"),
            node_id: nid("A"),
            reason: BlockReason::DeadEnd,
        }
    );
    assert_eq!(fan_with_t1, before);
}

#[rstest]
#[case::leaving_through_closed_branch("p2-to-e", TravelDirection::Right, "E")]
#[case::reversing_into_closed_branch("e-diverging", TravelDirection::Left, "S")]
fn advance_through_an_unrouted_branch_is_blocked(
    #[case] from: &str,
    #[case] direction: TravelDirection,
    #[case] node: &str,
) {
    let mut network = if node == "E" {
        east_switch_merge()
    } else {
        west_switch_fan()
    };
    let moving = train_heading("T1", direction);
    network
        .set_occupancy(&eid(from), Some(moving.clone()))
        .expect("occupy");
    let before = network.clone();

    let err = advance(&mut network, &moving, &eid(from)).unwrap_err();

    assert_eq!(
        err,
        TrackError::Blocked {
            train_id: tid("T1"),
            from_edge_id: eid(from),
            node_id: nid(node),
            reason: BlockReason::RouteNotSet,
        }
    );
    assert_eq!(network, before);
}

#[test]
fn advance_without_a_routed_continuation_is_blocked() {
    let mut network = TrackNetwork::new();
    network
        .create_node(nid("entry"), "Entry", NodeAttributes::sensor())
        .expect("entry");
    network
        .create_node(
            nid("S"),
            "Switch",
            NodeAttributes::switch(Route::Straight, crate::model::Orientation::West),
        )
        .expect("switch");
    network
        .create_node(nid("B"), "Siding", NodeAttributes::stop(None))
        .expect("stop");
    network
        .create_edge(eid("in"), nid("entry"), None, nid("S"), None)
        .expect("in");
    network
        .create_edge(
            eid("siding"),
            nid("S"),
            Some(crate::model::Connector::Diverging),
            nid("B"),
            None,
        )
        .expect("siding");
    occupy(&mut network, "in", "T1");

    let err = advance(&mut network, &train("T1"), &eid("in")).unwrap_err();

    assert!(matches!(
        err,
        TrackError::Blocked {
            reason: BlockReason::RouteNotSet,
            ..
        }
    ));
}

#[test]
fn advance_is_blocked_by_another_train_on_the_continuation() {
    let mut network = east_switch_merge();
    occupy(&mut network, "p1-to-e", "T1");
    occupy(&mut network, "e-to-x", "T2");
    let before = network.clone();

    let err = advance(&mut network, &train("T1"), &eid("p1-to-e")).unwrap_err();

    assert_eq!(
        err,
        TrackError::Blocked {
            train_id: tid("T1"),
            from_edge_id: eid("p1-to-e"),
            node_id: nid("E"),
            reason: BlockReason::Occupied {
                edge_id: eid("e-to-x"),
                train_id: tid("T2"),
            },
        }
    );
    assert_eq!(network, before);
}

#[test]
fn advance_with_two_open_continuations_is_ambiguous() {
    let mut network = TrackNetwork::new();
    for id in ["a", "hub", "x", "y"] {
        network
            .create_node(nid(id), id, NodeAttributes::sensor())
            .expect("sensor");
    }
    for (id, source, target) in [("in", "a", "hub"), ("to-y", "hub", "y"), ("to-x", "hub", "x")] {
        network
            .create_edge(eid(id), nid(source), None, nid(target), None)
            .expect("edge");
    }
    occupy(&mut network, "in", "T1");

    let err = advance(&mut network, &train("T1"), &eid("in")).unwrap_err();

    assert_eq!(
        err,
        TrackError::AmbiguousRoute {
            train_id: tid("T1"),
            node_id: nid("hub"),
            candidates: vec![eid("to-x"), eid("to-y")],
        }
    );
}

#[rstest]
fn advance_onto_an_edge_the_train_already_holds_is_a_no_op(mut fan_with_t1: TrackNetwork) {
    advance(&mut fan_with_t1, &train("T1"), &eid("e-entry")).expect("first");
    let before = fan_with_t1.clone();

    let moved = advance(&mut fan_with_t1, &train("T1"), &eid("e-entry")).expect("second");

    assert!(moved.is_empty());
    assert_eq!(fan_with_t1, before);
}

#[rstest]
fn advance_rejects_an_edge_held_by_another_train(mut fan_with_t1: TrackNetwork) {
    let err = advance(&mut fan_with_t1, &train("T2"), &eid("e-entry")).unwrap_err();

    assert_eq!(
        err,
        TrackError::TrainMismatch {
            edge_id: eid("e-entry"),
            expected: tid("T2"),
            found: Some(tid("T1")),
        }
    );
}

#[test]
fn advance_rejects_an_edge_the_train_does_not_hold() {
    let mut network = east_switch_merge();
    occupy(&mut network, "x-to-y", "T1");
    let before = network.clone();

    let err = advance(&mut network, &train("T1"), &eid("p1-to-e")).unwrap_err();

    assert_eq!(
        err,
        TrackError::TrainMismatch {
            edge_id: eid("p1-to-e"),
            expected: tid("T1"),
            found: None,
        }
    );
    assert_eq!(network, before);
}

#[rstest]
fn advance_rejects_a_train_that_differs_from_the_holder(mut fan_with_t1: TrackNetwork) {
    let before = fan_with_t1.clone();
    let reversed = train_heading("T1", TravelDirection::Left);

    let err = advance(&mut fan_with_t1, &reversed, &eid("e-entry")).unwrap_err();

    assert_eq!(
        err,
        TrackError::ConflictingTrain {
            edge_id: eid("e-entry"),
            train_id: tid("T1"),
        }
    );
    assert_eq!(fan_with_t1, before);
}

#[rstest]
fn advance_is_deterministic(fan_with_t1: TrackNetwork) {
    let mut first = fan_with_t1.clone();
    let mut second = fan_with_t1;

    let a = advance(&mut first, &train("T1"), &eid("e-entry"));
    let b = advance(&mut second, &train("T1"), &eid("e-entry"));

    assert_eq!(a, b);
    assert_eq!(first, second);
}

#[test]
fn right_bound_train_runs_through_the_merge_and_marks_sensors() {
    let mut network = east_switch_merge();
    occupy(&mut network, "p1-to-e", "T1");

    assert_eq!(
        advance(&mut network, &train("T1"), &eid("p1-to-e")).expect("into merge"),
        vec![eid("e-to-x")]
    );
    assert_eq!(sensor(&network, "X"), SensorStatus::Inactive);

    assert_eq!(
        advance(&mut network, &train("T1"), &eid("e-to-x")).expect("past X"),
        vec![eid("x-to-y")]
    );
    assert_eq!(sensor(&network, "X"), SensorStatus::Active);
}

#[test]
fn left_bound_train_travels_against_edge_direction() {
    let mut network = east_switch_merge();
    let westbound = train_heading("T9", TravelDirection::Left);
    network
        .set_occupancy(&eid("x-to-y"), Some(westbound.clone()))
        .expect("occupy");

    assert_eq!(
        advance(&mut network, &westbound, &eid("x-to-y")).expect("to X"),
        vec![eid("e-to-x")]
    );
    assert_eq!(
        advance(&mut network, &westbound, &eid("e-to-x")).expect("through E"),
        vec![eid("p1-to-e")]
    );
    assert_eq!(sensor(&network, "X"), SensorStatus::Active);
}

#[rstest]
fn clear_trailing_releases_the_rear_node(mut fan_with_t1: TrackNetwork) {
    refresh_sensors(&mut fan_with_t1);
    assert_eq!(sensor(&fan_with_t1, "entry"), SensorStatus::Active);
    advance(&mut fan_with_t1, &train("T1"), &eid("e-entry")).expect("advance");

    let released = clear_trailing(&mut fan_with_t1, &train("T1"), &eid("e-entry")).expect("clear");

    assert_eq!(released, Some(nid("entry")));
    assert_eq!(occupant(&fan_with_t1, "e-entry"), None);
    assert_eq!(sensor(&fan_with_t1, "entry"), SensorStatus::Inactive);
}

#[test]
fn clear_trailing_keeps_a_node_still_under_the_train() {
    let mut network = east_switch_merge();
    occupy(&mut network, "p1-to-e", "T1");
    advance(&mut network, &train("T1"), &eid("p1-to-e")).expect("into merge");
    advance(&mut network, &train("T1"), &eid("e-to-x")).expect("past X");

    let released = clear_trailing(&mut network, &train("T1"), &eid("e-to-x")).expect("clear");

    assert_eq!(released, None);
    assert_eq!(occupant(&network, "p1-to-e").as_deref(), Some("T1"));
}

#[rstest]
fn clear_trailing_rejects_a_foreign_edge(mut fan_with_t1: TrackNetwork) {
    let before = fan_with_t1.clone();

    let err = clear_trailing(&mut fan_with_t1, &train("T2"), &eid("e-entry")).unwrap_err();
    assert_eq!(
        err,
        TrackError::TrainMismatch {
            edge_id: eid("e-entry"),
            expected: tid("T2"),
            found: Some(tid("T1")),
        }
    );

    let err = clear_trailing(&mut fan_with_t1, &train("T1"), &eid("e-straight")).unwrap_err();
    assert!(matches!(err, TrackError::TrainMismatch { found: None, .. }));
    assert_eq!(fan_with_t1, before);
}

#[test]
fn clear_train_detaches_every_edge_and_releases_nodes() {
    let mut network = east_switch_merge();
    occupy(&mut network, "p1-to-e", "T1");
    occupy(&mut network, "p2-to-e", "T2");
    advance(&mut network, &train("T1"), &eid("p1-to-e")).expect("into merge");
    advance(&mut network, &train("T1"), &eid("e-to-x")).expect("past X");

    let cleared = clear_train(&mut network, &tid("T1")).expect("clear train");

    assert_eq!(cleared, vec![eid("e-to-x"), eid("p1-to-e"), eid("x-to-y")]);
    assert_eq!(network.trains().len(), 1);
    assert_eq!(sensor(&network, "X"), SensorStatus::Inactive);

    let err = clear_train(&mut network, &tid("T1")).unwrap_err();
    assert!(matches!(err, TrackError::NotFound { .. }));
}

#[test]
fn footprint_lists_edges_and_touched_nodes() {
    let mut network = east_switch_merge();
    occupy(&mut network, "p1-to-e", "T1");
    advance(&mut network, &train("T1"), &eid("p1-to-e")).expect("advance");

    let print = footprint(&network, &tid("T1")).expect("footprint");

    assert_eq!(print.train, train("T1"));
    assert_eq!(print.edges, vec![eid("e-to-x"), eid("p1-to-e")]);
    assert_eq!(print.nodes, vec![nid("E"), nid("P1"), nid("X")]);
    assert!(footprint(&network, &tid("T7")).is_err());
}

#[rstest]
fn toggle_off_and_on_restores_the_last_occupant(mut fan_with_t1: TrackNetwork) {
    assert!(!toggle_occupancy(&mut fan_with_t1, &eid("e-entry")).expect("off"));
    assert_eq!(occupant(&fan_with_t1, "e-entry"), None);

    assert!(toggle_occupancy(&mut fan_with_t1, &eid("e-entry")).expect("on"));
    assert_eq!(occupant(&fan_with_t1, "e-entry").as_deref(), Some("T1"));
}

#[rstest]
fn toggle_on_borrows_the_single_adjacent_train(mut fan_with_t1: TrackNetwork) {
    assert!(toggle_occupancy(&mut fan_with_t1, &eid("e-diverging")).expect("on"));
    assert_eq!(occupant(&fan_with_t1, "e-diverging").as_deref(), Some("T1"));
}

#[test]
fn toggle_on_falls_back_to_a_manual_train() {
    let mut network = east_switch_merge();
    occupy(&mut network, "p1-to-e", "T1");
    occupy(&mut network, "p2-to-e", "T2");

    toggle_occupancy(&mut network, &eid("e-to-x")).expect("on");
    let edge = network.edge(&eid("e-to-x")).expect("edge");
    assert!(edge.occupancy().is_some_and(|train| train.is_manual()));

    toggle_occupancy(&mut network, &eid("x-to-y")).expect("on");
    assert_eq!(
        occupant(&network, "x-to-y").as_deref(),
        Some("manual"),
        "x-to-y only touches the manual train on e-to-x"
    );
}

#[rstest]
fn toggle_on_rejects_a_remembered_occupant_that_now_differs(mut fan_with_t1: TrackNetwork) {
    toggle_occupancy(&mut fan_with_t1, &eid("e-entry")).expect("off");
    fan_with_t1
        .set_occupancy(
            &eid("e-straight"),
            Some(train_heading("T1", TravelDirection::Left)),
        )
        .expect("re-place T1");
    let before = fan_with_t1.clone();

    let err = toggle_occupancy(&mut fan_with_t1, &eid("e-entry")).unwrap_err();

    assert_eq!(
        err,
        TrackError::ConflictingTrain {
            edge_id: eid("e-entry"),
            train_id: tid("T1"),
        }
    );
    assert_eq!(fan_with_t1, before);
}

#[test]
fn toggle_reports_unknown_edges() {
    let mut network = west_switch_fan();
    let err = toggle_occupancy(&mut network, &eid("ghost")).unwrap_err();
    assert!(matches!(err, TrackError::NotFound { .. }));
}

#[rstest]
fn refresh_sensors_derives_status_from_edges(mut fan_with_t1: TrackNetwork) {
    let rev = fan_with_t1.rev();

    assert_eq!(refresh_sensors(&mut fan_with_t1), 1);
    assert_eq!(sensor(&fan_with_t1, "entry"), SensorStatus::Active);
    assert_eq!(fan_with_t1.rev(), rev + 1);

    assert_eq!(refresh_sensors(&mut fan_with_t1), 0);
    assert_eq!(fan_with_t1.rev(), rev + 1);
}
