// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Occupancy propagation: moving trains across traversable edges and keeping
//! node occupancy in step with edge occupancy.
//!
//! Nothing here runs in the background. Node flags are synchronised only by the
//! operations below: entering a node on [`advance`], releasing it on
//! [`clear_trailing`] / [`clear_train`], and re-deriving sensors on
//! [`refresh_sensors`]. Every operation validates before it mutates.

use std::collections::BTreeSet;

use log::{debug, warn};
use smallvec::SmallVec;

use crate::model::{
    BlockReason, EdgeId, NodeId, NodeKind, SensorStatus, TrackEdge, TrackError, TrackNetwork,
    TrainId, TrainRef, TravelDirection,
};
use crate::routing::{edge_is_traversable, end_is_traversable};

/// The segments a train currently occupies, and the nodes those segments touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub train: TrainRef,
    pub edges: Vec<EdgeId>,
    pub nodes: Vec<NodeId>,
}

/// Moves `train` from `from_edge_id` onto the single routed continuation beyond
/// the node it is heading into.
///
/// `from_edge_id` must be held by `train` itself, otherwise `TrainMismatch`.
///
/// Returns the newly occupied edges: one edge, or none when the train already
/// holds the continuation. The trailing edge keeps its occupancy; clearing it is
/// a separate [`clear_trailing`] call.
pub fn advance(
    network: &mut TrackNetwork,
    train: &TrainRef,
    from_edge_id: &EdgeId,
) -> Result<Vec<EdgeId>, TrackError> {
    let next_edge_id = match resolve_continuation(network, train, from_edge_id) {
        Ok(next) => next,
        Err(err) => {
            warn!("advance of train {} from {from_edge_id} rejected: {err}", train.id());
            return Err(err);
        }
    };

    let next_edge = network.edge(&next_edge_id)?;
    if next_edge.is_occupied_by(train) {
        return Ok(Vec::new());
    }
    let entered = next_edge.tail(train.direction()).node_id.clone();

    network
        .edge_mut(&next_edge_id)?
        .set_occupancy(Some(train.clone()));
    network.node_mut(&entered)?.mark_occupied(true);
    network.bump_rev();

    debug!("train {} advanced {from_edge_id} -> {next_edge_id} via {entered}", train.id());
    Ok(vec![next_edge_id])
}

fn resolve_continuation(
    network: &TrackNetwork,
    train: &TrainRef,
    from_edge_id: &EdgeId,
) -> Result<EdgeId, TrackError> {
    let from_edge = network.edge(from_edge_id)?;
    match from_edge.occupancy() {
        Some(current) if current == train => {}
        Some(current) if current.same_train(train) => {
            return Err(TrackError::ConflictingTrain {
                edge_id: from_edge_id.clone(),
                train_id: train.id().clone(),
            });
        }
        current => {
            return Err(TrackError::TrainMismatch {
                edge_id: from_edge_id.clone(),
                expected: train.id().clone(),
                found: current.map(|current| current.id().clone()),
            });
        }
    }

    let direction = train.direction();
    let head = from_edge.head(direction);
    let node_id = head.node_id;
    network.node(node_id)?;

    let blocked = |reason: BlockReason| TrackError::Blocked {
        train_id: train.id().clone(),
        from_edge_id: from_edge_id.clone(),
        node_id: node_id.clone(),
        reason,
    };

    if !end_is_traversable(network, &head) {
        return Err(blocked(BlockReason::RouteNotSet));
    }

    let continuations = continuations(network, node_id, direction, from_edge_id);
    if continuations.is_empty() {
        return Err(blocked(BlockReason::DeadEnd));
    }

    let routed: SmallVec<[(&EdgeId, &TrackEdge); 2]> = continuations
        .into_iter()
        .filter(|(_, edge)| edge_is_traversable(network, edge))
        .collect();

    match routed.as_slice() {
        [] => Err(blocked(BlockReason::RouteNotSet)),
        [(edge_id, edge)] => match edge.occupancy() {
            Some(other) if !other.same_train(train) => Err(blocked(BlockReason::Occupied {
                edge_id: (*edge_id).clone(),
                train_id: other.id().clone(),
            })),
            _ => Ok((*edge_id).clone()),
        },
        candidates => Err(TrackError::AmbiguousRoute {
            train_id: train.id().clone(),
            node_id: node_id.clone(),
            candidates: candidates
                .iter()
                .map(|(edge_id, _)| (*edge_id).clone())
                .collect(),
        }),
    }
}

/// Edges a train heading in `direction` could take after entering `node_id`.
fn continuations<'a>(
    network: &'a TrackNetwork,
    node_id: &NodeId,
    direction: TravelDirection,
    from_edge_id: &EdgeId,
) -> SmallVec<[(&'a EdgeId, &'a TrackEdge); 2]> {
    let candidates = match direction {
        TravelDirection::Right => network.edges_from(node_id, None),
        TravelDirection::Left => network.edges_to(node_id, None),
    };
    candidates
        .into_iter()
        .filter(|(edge_id, _)| *edge_id != from_edge_id)
        .collect()
}

/// Manual override: flips an edge between active and inactive.
///
/// Deactivating detaches the train. Activating re-attaches the edge's last
/// occupant, else the single train on an adjacent edge, else
/// [`TrainRef::manual`]. Returns the new active flag.
///
/// A remembered occupant whose id is now carried differently elsewhere is
/// `ConflictingTrain`.
pub fn toggle_occupancy(network: &mut TrackNetwork, edge_id: &EdgeId) -> Result<bool, TrackError> {
    let edge = network.edge(edge_id)?;

    let occupancy = if edge.is_active() {
        None
    } else {
        let train = edge
            .last_occupant()
            .cloned()
            .or_else(|| adjacent_train(network, edge_id, edge))
            .unwrap_or_else(TrainRef::manual);
        network.check_train(edge_id, &train)?;
        Some(train)
    };

    let active = occupancy.is_some();
    network.edge_mut(edge_id)?.set_occupancy(occupancy);
    network.bump_rev();
    debug!("edge {edge_id} toggled {}", if active { "on" } else { "off" });
    Ok(active)
}

fn adjacent_train(network: &TrackNetwork, edge_id: &EdgeId, edge: &TrackEdge) -> Option<TrainRef> {
    let mut found: Option<&TrainRef> = None;
    for node_id in [edge.source(), edge.target()] {
        for (other_id, other) in network.edges_touching(node_id) {
            if other_id == edge_id {
                continue;
            }
            let Some(train) = other.occupancy() else {
                continue;
            };
            match found {
                None => found = Some(train),
                Some(known) if known.same_train(train) => {}
                Some(_) => return None,
            }
        }
    }
    found.cloned()
}

/// Caller-issued clear of a train's trailing edge.
///
/// The node the train leaves behind (the edge's source for a right-bound train,
/// its target for a left-bound one) is released unless another occupied edge
/// still touches it. Returns the released node.
pub fn clear_trailing(
    network: &mut TrackNetwork,
    train: &TrainRef,
    edge_id: &EdgeId,
) -> Result<Option<NodeId>, TrackError> {
    let edge = network.edge(edge_id)?;
    let Some(current) = edge.occupancy().filter(|current| current.same_train(train)) else {
        return Err(TrackError::TrainMismatch {
            edge_id: edge_id.clone(),
            expected: train.id().clone(),
            found: edge.occupancy().map(|current| current.id().clone()),
        });
    };
    let rear = edge.tail(current.direction()).node_id.clone();

    network.edge_mut(edge_id)?.set_occupancy(None);
    let released = if node_is_touched_by_occupied_edge(network, &rear) {
        None
    } else {
        network.node_mut(&rear)?.mark_occupied(false);
        Some(rear)
    };
    network.bump_rev();

    debug!("train {} cleared from trailing edge {edge_id}", train.id());
    Ok(released)
}

/// Removes a train from the network entirely, as an external occupancy update
/// would. Returns the edges it was cleared from.
pub fn clear_train(
    network: &mut TrackNetwork,
    train_id: &TrainId,
) -> Result<Vec<EdgeId>, TrackError> {
    let edges = occupied_edges(network, train_id);
    if edges.is_empty() {
        return Err(TrackError::train_not_found(train_id));
    }

    let mut touched = BTreeSet::new();
    for edge_id in &edges {
        let edge = network.edge_mut(edge_id)?;
        touched.insert(edge.source().clone());
        touched.insert(edge.target().clone());
        edge.set_occupancy(None);
    }
    for node_id in touched {
        if !node_is_touched_by_occupied_edge(network, &node_id) {
            network.node_mut(&node_id)?.mark_occupied(false);
        }
    }
    network.bump_rev();

    debug!("train {train_id} cleared from {} edges", edges.len());
    Ok(edges)
}

pub fn footprint(network: &TrackNetwork, train_id: &TrainId) -> Result<Footprint, TrackError> {
    let mut train = None;
    let mut edges = Vec::new();
    let mut nodes = BTreeSet::new();

    for (edge_id, edge) in network.edges() {
        let Some(occupant) = edge.occupancy().filter(|occupant| occupant.id() == train_id) else {
            continue;
        };
        train.get_or_insert_with(|| occupant.clone());
        edges.push(edge_id.clone());
        nodes.insert(edge.source().clone());
        nodes.insert(edge.target().clone());
    }

    let train = train.ok_or_else(|| TrackError::train_not_found(train_id))?;
    Ok(Footprint {
        train,
        edges,
        nodes: nodes.into_iter().collect(),
    })
}

/// Re-derives every sensor's status from the occupancy of the edges touching it.
/// Returns the number of sensors whose status changed.
pub fn refresh_sensors(network: &mut TrackNetwork) -> usize {
    let updates = network
        .nodes()
        .iter()
        .filter(|(_, node)| node.kind() == NodeKind::Sensor)
        .filter_map(|(node_id, node)| {
            let active = node_is_touched_by_occupied_edge(network, node_id);
            (node.sensor_status() != Some(SensorStatus::from_active(active)))
                .then(|| (node_id.clone(), active))
        })
        .collect::<Vec<_>>();

    for (node_id, active) in &updates {
        if let Ok(node) = network.node_mut(node_id) {
            node.mark_occupied(*active);
        }
    }
    if !updates.is_empty() {
        network.bump_rev();
        debug!("refreshed {} sensor statuses", updates.len());
    }
    updates.len()
}

fn occupied_edges(network: &TrackNetwork, train_id: &TrainId) -> Vec<EdgeId> {
    network
        .edges()
        .iter()
        .filter(|(_, edge)| edge.occupancy().is_some_and(|train| train.id() == train_id))
        .map(|(edge_id, _)| edge_id.clone())
        .collect()
}

fn node_is_touched_by_occupied_edge(network: &TrackNetwork, node_id: &NodeId) -> bool {
    network
        .edges_touching(node_id)
        .any(|(_, edge)| edge.is_active())
}

#[cfg(test)]
mod tests;
