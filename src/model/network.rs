// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use log::debug;

use super::connector::{resolve_connector, Connector, ConnectorRole};
use super::edge::{EdgeEnd, TrackEdge};
use super::error::{AttributeIssue, TrackError};
use super::ids::{EdgeId, NodeId};
use super::node::{NodeAttributes, NodePatch, TrackNode};
use super::object_ref::ObjectKind;
use super::train::TrainRef;

/// The node and edge registries of one track diagram.
///
/// Owns every node and edge. Mutators check all preconditions before touching any
/// field, so a returned error means nothing changed. Each successful mutation
/// bumps `rev`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackNetwork {
    nodes: BTreeMap<NodeId, TrackNode>,
    edges: BTreeMap<EdgeId, TrackEdge>,
    rev: u64,
}

impl TrackNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, TrackNode> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeMap<EdgeId, TrackEdge> {
        &self.edges
    }

    pub fn node(&self, node_id: &NodeId) -> Result<&TrackNode, TrackError> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| TrackError::node_not_found(node_id))
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Result<&TrackEdge, TrackError> {
        self.edges
            .get(edge_id)
            .ok_or_else(|| TrackError::edge_not_found(edge_id))
    }

    pub(crate) fn node_mut(&mut self, node_id: &NodeId) -> Result<&mut TrackNode, TrackError> {
        self.nodes
            .get_mut(node_id)
            .ok_or_else(|| TrackError::node_not_found(node_id))
    }

    pub(crate) fn edge_mut(&mut self, edge_id: &EdgeId) -> Result<&mut TrackEdge, TrackError> {
        self.edges
            .get_mut(edge_id)
            .ok_or_else(|| TrackError::edge_not_found(edge_id))
    }

    pub fn create_node(
        &mut self,
        node_id: NodeId,
        label: impl Into<String>,
        attributes: NodeAttributes,
    ) -> Result<NodeId, TrackError> {
        if self.nodes.contains_key(&node_id) {
            return Err(TrackError::AlreadyExists {
                kind: ObjectKind::Node,
                id: node_id.into_string(),
            });
        }

        debug!("create node {node_id} ({})", attributes.kind());
        self.nodes
            .insert(node_id.clone(), TrackNode::new(label, attributes));
        self.bump_rev();
        Ok(node_id)
    }

    pub fn update_node(
        &mut self,
        node_id: &NodeId,
        patch: &NodePatch,
    ) -> Result<&TrackNode, TrackError> {
        let node = self.node(node_id)?;
        let mut updated = node.clone();
        apply_node_patch(node_id, &mut updated, patch, self.has_edges(node_id))?;

        if &updated != node {
            debug!("update node {node_id}");
            self.nodes.insert(node_id.clone(), updated);
            self.bump_rev();
        }
        self.node(node_id)
    }

    /// Checks that an edge with these endpoints could be created. Does not check the
    /// edge id.
    pub fn validate_edge(
        &self,
        source: &NodeId,
        source_connector: Option<Connector>,
        target: &NodeId,
        target_connector: Option<Connector>,
    ) -> Result<(), TrackError> {
        let source_node = self.node(source)?;
        let target_node = self.node(target)?;
        check_connector(source, source_node, ConnectorRole::Source, source_connector)?;
        check_connector(target, target_node, ConnectorRole::Sink, target_connector)?;
        Ok(())
    }

    pub fn create_edge(
        &mut self,
        edge_id: EdgeId,
        source: NodeId,
        source_connector: Option<Connector>,
        target: NodeId,
        target_connector: Option<Connector>,
    ) -> Result<EdgeId, TrackError> {
        if self.edges.contains_key(&edge_id) {
            return Err(TrackError::AlreadyExists {
                kind: ObjectKind::Edge,
                id: edge_id.into_string(),
            });
        }
        self.validate_edge(&source, source_connector, &target, target_connector)?;

        debug!("create edge {edge_id} ({source} -> {target})");
        let edge = TrackEdge::new(source, source_connector, target, target_connector);
        self.edges.insert(edge_id.clone(), edge);
        self.bump_rev();
        Ok(edge_id)
    }

    /// Edges leaving `node_id`, optionally restricted to one source connector.
    /// Ordered by edge id.
    pub fn edges_from(
        &self,
        node_id: &NodeId,
        connector: Option<Connector>,
    ) -> Vec<(&EdgeId, &TrackEdge)> {
        self.edges
            .iter()
            .filter(|(_, edge)| edge.source() == node_id)
            .filter(|(_, edge)| {
                connector.is_none() || self.resolved_connector(&edge.source_end()) == connector
            })
            .collect()
    }

    /// Edges entering `node_id`, optionally restricted to one target connector.
    /// Ordered by edge id.
    pub fn edges_to(
        &self,
        node_id: &NodeId,
        connector: Option<Connector>,
    ) -> Vec<(&EdgeId, &TrackEdge)> {
        self.edges
            .iter()
            .filter(|(_, edge)| edge.target() == node_id)
            .filter(|(_, edge)| {
                connector.is_none() || self.resolved_connector(&edge.target_end()) == connector
            })
            .collect()
    }

    pub fn edges_touching<'a>(
        &'a self,
        node_id: &'a NodeId,
    ) -> impl Iterator<Item = (&'a EdgeId, &'a TrackEdge)> + 'a {
        self.edges.iter().filter(move |(_, edge)| edge.touches(node_id))
    }

    fn has_edges(&self, node_id: &NodeId) -> bool {
        self.edges_touching(node_id).next().is_some()
    }

    /// The connector an edge end is bound to once omitted names are resolved.
    pub fn resolved_connector(&self, end: &EdgeEnd<'_>) -> Option<Connector> {
        let node = self.nodes.get(end.node_id)?;
        resolve_connector(node.attributes(), end.role, end.connector)
    }

    /// Attaches or clears the train on an edge. Returns the previous occupant.
    ///
    /// A train id names one train: attaching a ref whose name or direction differs
    /// from the same id on another edge is `ConflictingTrain`.
    pub fn set_occupancy(
        &mut self,
        edge_id: &EdgeId,
        occupancy: Option<TrainRef>,
    ) -> Result<Option<TrainRef>, TrackError> {
        self.edge(edge_id)?;
        if let Some(train) = &occupancy {
            self.check_train(edge_id, train)?;
        }

        let edge = self.edge_mut(edge_id)?;
        if edge.occupancy() == occupancy.as_ref() {
            return Ok(occupancy);
        }

        match &occupancy {
            Some(train) => debug!("edge {edge_id} occupied by train {}", train.id()),
            None => debug!("edge {edge_id} cleared"),
        }
        let previous = edge.set_occupancy(occupancy);
        self.bump_rev();
        Ok(previous)
    }

    /// Fails with `ConflictingTrain` when `train` disagrees with the ref already
    /// carried under its id by any edge other than `edge_id`. The manual-override
    /// id is reserved for [`TrainRef::manual`].
    pub(crate) fn check_train(&self, edge_id: &EdgeId, train: &TrainRef) -> Result<(), TrackError> {
        let reserved = train.is_manual().then(TrainRef::manual);
        let known = reserved.as_ref().or_else(|| {
            self.edges
                .iter()
                .filter(|(other_id, _)| *other_id != edge_id)
                .filter_map(|(_, edge)| edge.occupancy())
                .find(|other| other.same_train(train))
        });

        match known {
            Some(known) if known != train => Err(TrackError::ConflictingTrain {
                edge_id: edge_id.clone(),
                train_id: train.id().clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Every train referenced by at least one edge, in edge id order of first
    /// appearance.
    pub fn trains(&self) -> Vec<&TrainRef> {
        let mut trains: Vec<&TrainRef> = Vec::new();
        for train in self.edges.values().filter_map(TrackEdge::occupancy) {
            if !trains.iter().any(|known| known.same_train(train)) {
                trains.push(train);
            }
        }
        trains
    }
}

fn check_connector(
    node_id: &NodeId,
    node: &TrackNode,
    role: ConnectorRole,
    connector: Option<Connector>,
) -> Result<(), TrackError> {
    if resolve_connector(node.attributes(), role, connector).is_some() {
        return Ok(());
    }
    Err(TrackError::InvalidConnector {
        node_id: node_id.clone(),
        node_kind: node.kind(),
        role,
        connector,
    })
}

fn apply_node_patch(
    node_id: &NodeId,
    node: &mut TrackNode,
    patch: &NodePatch,
    has_edges: bool,
) -> Result<(), TrackError> {
    let node_kind = node.kind();
    let invalid = |attribute: &'static str, issue: AttributeIssue| TrackError::InvalidAttribute {
        node_id: node_id.clone(),
        node_kind,
        attribute,
        issue,
    };

    match node.attributes_mut() {
        NodeAttributes::Sensor(sensor) => {
            if patch.route.is_some() {
                return Err(invalid("route", AttributeIssue::NotApplicable));
            }
            if patch.orientation.is_some() {
                return Err(invalid("orientation", AttributeIssue::NotApplicable));
            }
            if patch.occupied.is_some() {
                return Err(invalid("occupied", AttributeIssue::NotApplicable));
            }
            if patch.platform.is_some() {
                return Err(invalid("platform", AttributeIssue::NotApplicable));
            }
            if let Some(status) = patch.status {
                sensor.status = status;
            }
        }
        NodeAttributes::Switch(switch) => {
            if patch.status.is_some() {
                return Err(invalid("status", AttributeIssue::NotApplicable));
            }
            if patch.occupied.is_some() {
                return Err(invalid("occupied", AttributeIssue::NotApplicable));
            }
            if patch.platform.is_some() {
                return Err(invalid("platform", AttributeIssue::NotApplicable));
            }
            if patch.route.is_some() {
                return Err(invalid("route", AttributeIssue::RouteRequiresSetRoute));
            }
            if let Some(orientation) = patch.orientation {
                if orientation != switch.orientation && has_edges {
                    return Err(invalid("orientation", AttributeIssue::EdgesAttached));
                }
                switch.orientation = orientation;
            }
        }
        NodeAttributes::Stop(stop) => {
            if patch.status.is_some() {
                return Err(invalid("status", AttributeIssue::NotApplicable));
            }
            if patch.route.is_some() {
                return Err(invalid("route", AttributeIssue::NotApplicable));
            }
            if patch.orientation.is_some() {
                return Err(invalid("orientation", AttributeIssue::NotApplicable));
            }
            if let Some(occupied) = patch.occupied {
                stop.occupied = occupied;
            }
            if let Some(platform) = &patch.platform {
                stop.platform = platform.clone();
            }
        }
    }

    if let Some(label) = &patch.label {
        node.set_label(label.clone());
    }
    Ok(())
}
