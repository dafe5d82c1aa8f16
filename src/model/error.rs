// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::connector::{Connector, ConnectorRole};
use super::ids::{EdgeId, NodeId, TrainId};
use super::node::NodeKind;
use super::object_ref::ObjectKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeIssue {
    /// The attribute does not exist on this node kind.
    NotApplicable,
    /// Switch routes only change through the routing model.
    RouteRequiresSetRoute,
    /// Orientation cannot change while edges are bound to the switch connectors.
    EdgesAttached,
    /// The operation needs a switch.
    NotASwitch,
}

impl fmt::Display for AttributeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => f.write_str("not applicable to this node kind"),
            Self::RouteRequiresSetRoute => f.write_str("route changes must go through set_route"),
            Self::EdgesAttached => f.write_str("edges are attached to the switch"),
            Self::NotASwitch => f.write_str("node is not a switch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// The entered node has no continuation at all.
    DeadEnd,
    /// Continuations exist but the switch route does not lead onto any of them.
    RouteNotSet,
    /// The only routed continuation already holds another train.
    Occupied { edge_id: EdgeId, train_id: TrainId },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadEnd => f.write_str("dead end"),
            Self::RouteNotSet => f.write_str("route not set"),
            Self::Occupied { edge_id, train_id } => {
                write!(f, "edge {edge_id} is occupied by train {train_id}")
            }
        }
    }
}

/// Every way a registry, routing or propagation operation can fail.
///
/// A failed operation leaves the network untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    NotFound {
        kind: ObjectKind,
        id: String,
    },
    AlreadyExists {
        kind: ObjectKind,
        id: String,
    },
    InvalidConnector {
        node_id: NodeId,
        node_kind: NodeKind,
        role: ConnectorRole,
        connector: Option<Connector>,
    },
    InvalidAttribute {
        node_id: NodeId,
        node_kind: NodeKind,
        attribute: &'static str,
        issue: AttributeIssue,
    },
    RouteLocked {
        switch_id: NodeId,
        edge_id: EdgeId,
        train_id: TrainId,
    },
    Blocked {
        train_id: TrainId,
        from_edge_id: EdgeId,
        node_id: NodeId,
        reason: BlockReason,
    },
    AmbiguousRoute {
        train_id: TrainId,
        node_id: NodeId,
        candidates: Vec<EdgeId>,
    },
    TrainMismatch {
        edge_id: EdgeId,
        expected: TrainId,
        found: Option<TrainId>,
    },
    /// The train id is already on the network (or reserved) with a different name
    /// or direction.
    ConflictingTrain {
        edge_id: EdgeId,
        train_id: TrainId,
    },
}

impl TrackError {
    pub(crate) fn node_not_found(node_id: &NodeId) -> Self {
        Self::NotFound {
            kind: ObjectKind::Node,
            id: node_id.to_string(),
        }
    }

    pub(crate) fn edge_not_found(edge_id: &EdgeId) -> Self {
        Self::NotFound {
            kind: ObjectKind::Edge,
            id: edge_id.to_string(),
        }
    }

    pub(crate) fn train_not_found(train_id: &TrainId) -> Self {
        Self::NotFound {
            kind: ObjectKind::Train,
            id: train_id.to_string(),
        }
    }
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found (id={id})"),
            Self::AlreadyExists { kind, id } => write!(f, "{kind} already exists (id={id})"),
            Self::InvalidConnector { node_id, node_kind, role, connector } => match connector {
                Some(connector) => write!(
                    f,
                    "invalid connector '{connector}' on the {role} side of {node_kind} {node_id}"
                ),
                None => write!(
                    f,
                    "{node_kind} {node_id} needs an explicit connector on its {role} side"
                ),
            },
            Self::InvalidAttribute { node_id, node_kind, attribute, issue } => {
                write!(f, "invalid attribute '{attribute}' for {node_kind} {node_id}: {issue}")
            }
            Self::RouteLocked { switch_id, edge_id, train_id } => write!(
                f,
                "switch {switch_id} is locked: edge {edge_id} is occupied by train {train_id}"
            ),
            Self::Blocked { train_id, from_edge_id, node_id, reason } => write!(
                f,
                "train {train_id} cannot leave edge {from_edge_id} through {node_id}: {reason}"
            ),
            Self::AmbiguousRoute { train_id, node_id, candidates } => {
                write!(f, "ambiguous route for train {train_id} at {node_id} (candidates: ")?;
                for (index, candidate) in candidates.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{candidate}")?;
                }
                f.write_str(")")
            }
            Self::TrainMismatch { edge_id, expected, found } => match found {
                Some(found) => write!(
                    f,
                    "edge {edge_id} is occupied by train {found}, not train {expected}"
                ),
                None => write!(f, "edge {edge_id} is not occupied (expected train {expected})"),
            },
            Self::ConflictingTrain { edge_id, train_id } => write!(
                f,
                "train {train_id} on edge {edge_id} differs from train {train_id} elsewhere on the network"
            ),
        }
    }
}

impl std::error::Error for TrackError {}
