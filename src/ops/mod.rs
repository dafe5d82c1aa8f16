// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command-style mutations for a track network.
//!
//! Ops are applied as a batch with optimistic concurrency (revision checks) against a
//! staged copy; the network is only replaced when every op succeeds. The result carries
//! a minimal delta that a renderer can use to refresh derived state.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, warn};

use crate::model::{
    Connector, EdgeId, NodeAttributes, NodeId, NodePatch, ObjectRef, Route, TrackError,
    TrackNetwork, TrainId, TrainRef,
};
use crate::{occupancy, routing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    AddNode {
        node_id: NodeId,
        label: String,
        attributes: NodeAttributes,
    },
    UpdateNode {
        node_id: NodeId,
        patch: NodePatch,
    },
    AddEdge {
        edge_id: EdgeId,
        source: NodeId,
        source_connector: Option<Connector>,
        target: NodeId,
        target_connector: Option<Connector>,
    },
    SetOccupancy {
        edge_id: EdgeId,
        train: Option<TrainRef>,
    },
    SetRoute {
        switch_id: NodeId,
        route: Route,
    },
    Advance {
        train_id: TrainId,
        from_edge_id: EdgeId,
    },
    ClearTrailing {
        train_id: TrainId,
        edge_id: EdgeId,
    },
    ClearTrain {
        train_id: TrainId,
    },
    ToggleOccupancy {
        edge_id: EdgeId,
    },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddNode { .. } => "add_node",
            Self::UpdateNode { .. } => "update_node",
            Self::AddEdge { .. } => "add_edge",
            Self::SetOccupancy { .. } => "set_occupancy",
            Self::SetRoute { .. } => "set_route",
            Self::Advance { .. } => "advance",
            Self::ClearTrailing { .. } => "clear_trailing",
            Self::ClearTrain { .. } => "clear_train",
            Self::ToggleOccupancy { .. } => "toggle_occupancy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Which nodes and edges a batch created or changed. Sorted, nodes first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ObjectRef>,
    updated: BTreeSet<ObjectRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, object_ref: ObjectRef) {
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies `ops` in order as one atomic batch.
///
/// `base_rev` must match the network's current revision. A successful non-empty batch
/// advances the revision by exactly one.
pub fn apply_ops(
    network: &mut TrackNetwork,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = network.rev();
    if base_rev != current_rev {
        warn!("rejecting ops at stale rev {base_rev} (current {current_rev})");
        return Err(ApplyError::Conflict {
            base_rev,
            current_rev,
        });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut staged = network.clone();
    let mut delta = DeltaBuilder::default();

    for (index, op) in ops.iter().enumerate() {
        apply_op(&mut staged, op).map_err(|error| {
            warn!("op #{index} ({}) failed: {error}", op.name());
            ApplyError::Op { index, error }
        })?;
    }
    record_changes(network, &staged, &mut delta);

    staged.set_rev(current_rev);
    staged.bump_rev();
    *network = staged;
    let new_rev = network.rev();
    debug!("applied {} ops, rev {current_rev} -> {new_rev}", ops.len());

    Ok(ApplyResult {
        new_rev,
        applied: ops.len(),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    Op { index: usize, error: TrackError },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::Op { index, error } => write!(f, "op #{index} failed: {error}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Conflict { .. } => None,
            Self::Op { error, .. } => Some(error),
        }
    }
}

// Per-op dispatch and delta bookkeeping.
include!("ops_impl.rs");
