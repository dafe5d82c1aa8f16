// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::connector::Connector;
use super::ids::{EdgeId, NodeId, TrainId};
use super::network::TrackNetwork;
use super::node::{NodeAttributes, Orientation, Route};
use super::train::{TrainRef, TravelDirection};

pub(crate) fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

pub(crate) fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

pub(crate) fn tid(value: &str) -> TrainId {
    TrainId::new(value).expect("train id")
}

pub(crate) fn train(id: &str) -> TrainRef {
    TrainRef::new(tid(id), format!("Train {id}"), TravelDirection::Right)
}

pub(crate) fn train_heading(id: &str, direction: TravelDirection) -> TrainRef {
    TrainRef::new(tid(id), format!("Train {id}"), direction)
}

/// `entry -> S`, then a west-facing switch `S` fanning out to stops `A`
/// (straight) and `B` (diverging). Route starts straight.
pub(crate) fn west_switch_fan() -> TrackNetwork {
    let mut network = TrackNetwork::new();

    network
        .create_node(nid("entry"), "Entry", NodeAttributes::sensor())
        .expect("entry");
    network
        .create_node(nid("S"), "Switch", NodeAttributes::switch(Route::Straight, Orientation::West))
        .expect("switch");
    network
        .create_node(nid("A"), "Stop A", NodeAttributes::stop(Some("Platform 1".to_owned())))
        .expect("stop A");
    network
        .create_node(nid("B"), "Stop B", NodeAttributes::stop(Some("Platform 2".to_owned())))
        .expect("stop B");

    network
        .create_edge(eid("e-entry"), nid("entry"), None, nid("S"), None)
        .expect("e-entry");
    network
        .create_edge(eid("e-straight"), nid("S"), Some(Connector::Straight), nid("A"), None)
        .expect("e-straight");
    network
        .create_edge(eid("e-diverging"), nid("S"), Some(Connector::Diverging), nid("B"), None)
        .expect("e-diverging");

    network
}

/// Sensors `P1` and `P2` merge through an east-facing switch `E` (branches on
/// the entry side) onto `X`, followed by `X -> Y`. Route starts straight.
pub(crate) fn east_switch_merge() -> TrackNetwork {
    let mut network = TrackNetwork::new();

    for (id, label) in [("P1", "Platform 1 east"), ("P2", "Platform 2 east"), ("X", "Exit"), ("Y", "Line")] {
        network
            .create_node(nid(id), label, NodeAttributes::sensor())
            .expect("sensor");
    }
    network
        .create_node(nid("E"), "Merge", NodeAttributes::switch(Route::Straight, Orientation::East))
        .expect("switch");

    network
        .create_edge(eid("p1-to-e"), nid("P1"), None, nid("E"), Some(Connector::Straight))
        .expect("p1-to-e");
    network
        .create_edge(eid("p2-to-e"), nid("P2"), None, nid("E"), Some(Connector::Diverging))
        .expect("p2-to-e");
    network
        .create_edge(eid("e-to-x"), nid("E"), Some(Connector::Trunk), nid("X"), None)
        .expect("e-to-x");
    network
        .create_edge(eid("x-to-y"), nid("X"), None, nid("Y"), None)
        .expect("x-to-y");

    network
}
