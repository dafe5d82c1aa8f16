// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Switch routing: which edges through a switch are valid paths, and the only
//! state transition in the model (`set_route`).
//!
//! A trunk-bound edge end is always traversable. A branch-bound end is traversable
//! iff the switch's route selects that branch. Routes move only through
//! [`set_route`], and never while a train stands on an edge attached to the switch.

use log::{debug, warn};

use crate::model::{
    AttributeIssue, EdgeEnd, EdgeId, NodeId, Route, SwitchAttributes, TrackEdge, TrackError,
    TrackNetwork, TrainId,
};

/// Whether the edge is a valid path through every switch it touches.
pub fn is_traversable(network: &TrackNetwork, edge_id: &EdgeId) -> Result<bool, TrackError> {
    let edge = network.edge(edge_id)?;
    Ok(edge_is_traversable(network, edge))
}

pub fn edge_is_traversable(network: &TrackNetwork, edge: &TrackEdge) -> bool {
    end_is_traversable(network, &edge.source_end())
        && end_is_traversable(network, &edge.target_end())
}

/// Whether one end of an edge may be used given the route of the node it attaches
/// to. Ends on sensors and stops always may.
pub fn end_is_traversable(network: &TrackNetwork, end: &EdgeEnd<'_>) -> bool {
    let Ok(node) = network.node(end.node_id) else {
        return false;
    };
    let Some(switch) = node.as_switch() else {
        return true;
    };
    let Some(connector) = network.resolved_connector(end) else {
        return false;
    };

    match connector.branch_route() {
        None => true,
        Some(branch) => branch == switch.route,
    }
}

pub fn switch_state(
    network: &TrackNetwork,
    switch_id: &NodeId,
) -> Result<SwitchAttributes, TrackError> {
    let node = network.node(switch_id)?;
    node.as_switch()
        .copied()
        .ok_or_else(|| TrackError::InvalidAttribute {
            node_id: switch_id.clone(),
            node_kind: node.kind(),
            attribute: "route",
            issue: AttributeIssue::NotASwitch,
        })
}

/// The first occupied edge attached to the switch, if any. While one exists the
/// route cannot move.
pub fn route_lock(network: &TrackNetwork, switch_id: &NodeId) -> Option<(EdgeId, TrainId)> {
    network
        .edges_touching(switch_id)
        .find_map(|(edge_id, edge)| {
            edge.occupancy()
                .map(|train| (edge_id.clone(), train.id().clone()))
        })
}

/// Sets the route of a switch. Returns the previous route.
///
/// Fails with `RouteLocked` while any attached edge is occupied, even when the
/// requested route is already set.
pub fn set_route(
    network: &mut TrackNetwork,
    switch_id: &NodeId,
    route: Route,
) -> Result<Route, TrackError> {
    let previous = switch_state(network, switch_id)?.route;

    if let Some((edge_id, train_id)) = route_lock(network, switch_id) {
        warn!("route change on {switch_id} refused: train {train_id} on {edge_id}");
        return Err(TrackError::RouteLocked {
            switch_id: switch_id.clone(),
            edge_id,
            train_id,
        });
    }

    if previous == route {
        return Ok(previous);
    }

    network.node_mut(switch_id)?.set_route(route);
    network.bump_rev();
    debug!("switch {switch_id} set {previous} -> {route}");
    Ok(previous)
}
