// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Routes one op to the registry, routing or occupancy operation that implements it.
fn apply_op(network: &mut TrackNetwork, op: &Op) -> Result<(), TrackError> {
    match op {
        Op::AddNode {
            node_id,
            label,
            attributes,
        } => {
            network.create_node(node_id.clone(), label.clone(), attributes.clone())?;
        }
        Op::UpdateNode { node_id, patch } => {
            network.update_node(node_id, patch)?;
        }
        Op::AddEdge {
            edge_id,
            source,
            source_connector,
            target,
            target_connector,
        } => {
            network.create_edge(
                edge_id.clone(),
                source.clone(),
                *source_connector,
                target.clone(),
                *target_connector,
            )?;
        }
        Op::SetOccupancy { edge_id, train } => {
            network.set_occupancy(edge_id, train.clone())?;
        }
        Op::SetRoute { switch_id, route } => {
            routing::set_route(network, switch_id, *route)?;
        }
        Op::Advance {
            train_id,
            from_edge_id,
        } => {
            let train = train_on_network(network, train_id)?;
            occupancy::advance(network, &train, from_edge_id)?;
        }
        Op::ClearTrailing { train_id, edge_id } => {
            let train = train_on_network(network, train_id)?;
            occupancy::clear_trailing(network, &train, edge_id)?;
        }
        Op::ClearTrain { train_id } => {
            occupancy::clear_train(network, train_id)?;
        }
        Op::ToggleOccupancy { edge_id } => {
            occupancy::toggle_occupancy(network, edge_id)?;
        }
    }
    Ok(())
}

/// The full train reference for an id, taken from whichever edge carries it.
fn train_on_network(network: &TrackNetwork, train_id: &TrainId) -> Result<TrainRef, TrackError> {
    network
        .trains()
        .into_iter()
        .find(|train| train.id() == train_id)
        .cloned()
        .ok_or_else(|| TrackError::train_not_found(train_id))
}

fn record_changes(before: &TrackNetwork, after: &TrackNetwork, delta: &mut DeltaBuilder) {
    for (node_id, node) in after.nodes() {
        let object_ref = ObjectRef::Node(node_id.clone());
        match before.nodes().get(node_id) {
            None => delta.record_added(object_ref),
            Some(previous) if previous != node => delta.record_updated(object_ref),
            Some(_) => {}
        }
    }
    for (edge_id, edge) in after.edges() {
        let object_ref = ObjectRef::Edge(edge_id.clone());
        match before.edges().get(edge_id) {
            None => delta.record_added(object_ref),
            Some(previous) if previous != edge => delta.record_updated(object_ref),
            Some(_) => {}
        }
    }
}
