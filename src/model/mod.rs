// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: track nodes, connectors, edges, trains and the registries
//! that own them.

pub mod connector;
pub mod edge;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod network;
pub mod node;
pub mod object_ref;
pub mod train;

pub use connector::{connectors_for, resolve_connector, Connector, ConnectorRole, ParseConnectorError};
pub use edge::{EdgeEnd, TrackEdge};
pub use error::{AttributeIssue, BlockReason, TrackError};
pub use ids::{EdgeId, Id, IdError, NodeId, TrainId};
pub use network::TrackNetwork;
pub use node::{
    NodeAttributes, NodeKind, NodePatch, Orientation, ParseValueError, Route, SensorAttributes,
    SensorStatus, StopAttributes, SwitchAttributes, TrackNode,
};
pub use object_ref::{ObjectKind, ObjectRef, ParseObjectRefError};
pub use train::{TrainRef, TravelDirection};
