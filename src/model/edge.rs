// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::connector::{Connector, ConnectorRole};
use super::ids::NodeId;
use super::train::{TrainRef, TravelDirection};

/// One end of an edge: the node it attaches to, the connector as written and the
/// role the node plays for this edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEnd<'a> {
    pub node_id: &'a NodeId,
    pub connector: Option<Connector>,
    pub role: ConnectorRole,
}

/// A directed track segment between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEdge {
    source: NodeId,
    source_connector: Option<Connector>,
    target: NodeId,
    target_connector: Option<Connector>,
    occupancy: Option<TrainRef>,
    last_occupant: Option<TrainRef>,
}

impl TrackEdge {
    pub fn new(
        source: NodeId,
        source_connector: Option<Connector>,
        target: NodeId,
        target_connector: Option<Connector>,
    ) -> Self {
        Self {
            source,
            source_connector,
            target,
            target_connector,
            occupancy: None,
            last_occupant: None,
        }
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn source_connector(&self) -> Option<Connector> {
        self.source_connector
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn target_connector(&self) -> Option<Connector> {
        self.target_connector
    }

    pub fn source_end(&self) -> EdgeEnd<'_> {
        EdgeEnd {
            node_id: &self.source,
            connector: self.source_connector,
            role: ConnectorRole::Source,
        }
    }

    pub fn target_end(&self) -> EdgeEnd<'_> {
        EdgeEnd {
            node_id: &self.target,
            connector: self.target_connector,
            role: ConnectorRole::Sink,
        }
    }

    /// The end a train travelling in `direction` reaches last.
    pub fn head(&self, direction: TravelDirection) -> EdgeEnd<'_> {
        match direction {
            TravelDirection::Right => self.target_end(),
            TravelDirection::Left => self.source_end(),
        }
    }

    /// The end a train travelling in `direction` leaves behind.
    pub fn tail(&self, direction: TravelDirection) -> EdgeEnd<'_> {
        match direction {
            TravelDirection::Right => self.source_end(),
            TravelDirection::Left => self.target_end(),
        }
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    pub fn occupancy(&self) -> Option<&TrainRef> {
        self.occupancy.as_ref()
    }

    /// An edge is active exactly when a train is attached to it.
    pub fn is_active(&self) -> bool {
        self.occupancy.is_some()
    }

    pub fn is_occupied_by(&self, train: &TrainRef) -> bool {
        self.occupancy
            .as_ref()
            .is_some_and(|current| current.same_train(train))
    }

    pub fn last_occupant(&self) -> Option<&TrainRef> {
        self.last_occupant.as_ref()
    }

    /// Replaces the occupying train, remembering whoever was there before.
    pub(crate) fn set_occupancy(&mut self, occupancy: Option<TrainRef>) -> Option<TrainRef> {
        let previous = std::mem::replace(&mut self.occupancy, occupancy);
        if let Some(previous) = &previous {
            self.last_occupant = Some(previous.clone());
        }
        previous
    }
}
