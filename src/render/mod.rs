// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Projection of the track model into renderable primitives.
//!
//! The render graph is what an external diagram renderer consumes: flat node and edge
//! records with derived display state (`active`, `traversable`) and optional positions
//! from a [`LayoutTable`]. The core never reads renderer state; renderer-initiated
//! changes come back through [`events`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::topology::{network_from_json, EdgeJson, NodeJson, TopologyJson, TrainJson};
use crate::format::TopologyError;
use crate::layout::{LayoutTable, Position};
use crate::model::{EdgeId, NodeAttributes, NodeId, TrackEdge, TrackNetwork, TrackNode};
use crate::routing::edge_is_traversable;

pub mod events;
pub mod text;

pub use events::{on_user_connect, on_user_set_route, on_user_toggle, AdapterError};
pub use text::render_status;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderNode {
    pub id: String,
    /// `sensor`, `switch` or `stop`.
    pub kind: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    /// Connector name on the source node, as the edge was drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// A train is attached to the edge.
    #[serde(default)]
    pub active: bool,
    /// The edge is a valid path through every switch it touches.
    #[serde(default)]
    pub traversable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train: Option<RenderTrain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenderTrain {
    pub id: String,
    pub name: String,
    /// `left` or `right`.
    pub direction: String,
    /// Name followed by the direction arrow, as drawn next to the edge.
    #[serde(default)]
    pub label: String,
}

/// Pure projection of the network. Positions come from `layout` when given.
pub fn to_render_graph(network: &TrackNetwork, layout: Option<&LayoutTable>) -> RenderGraph {
    RenderGraph {
        nodes: network
            .nodes()
            .iter()
            .map(|(node_id, node)| render_node(node_id, node, layout))
            .collect(),
        edges: network
            .edges()
            .iter()
            .map(|(edge_id, edge)| render_edge(network, edge_id, edge))
            .collect(),
    }
}

/// Rebuilds a network from a projection. Positions and the derived `active` /
/// `traversable` flags are ignored; validation is the same as for a topology load.
pub fn from_render_graph(graph: &RenderGraph) -> Result<TrackNetwork, TopologyError> {
    let document = TopologyJson {
        nodes: graph
            .nodes
            .iter()
            .map(|node| NodeJson {
                id: node.id.clone(),
                kind: node.kind.clone(),
                label: Some(node.label.clone()),
                status: node.status.clone(),
                route: node.route.clone(),
                orientation: node.orientation.clone(),
                occupied: node.occupied,
                platform: node.platform.clone(),
            })
            .collect(),
        edges: graph
            .edges
            .iter()
            .map(|edge| EdgeJson {
                id: edge.id.clone(),
                source: edge.source.clone(),
                source_connector: edge.source_handle.clone(),
                target: edge.target.clone(),
                target_connector: edge.target_handle.clone(),
                train: edge.train.as_ref().map(|train| TrainJson {
                    id: train.id.clone(),
                    name: train.name.clone(),
                    direction: Some(train.direction.clone()),
                }),
            })
            .collect(),
    };
    network_from_json(document)
}

/// JSON schema describing [`RenderGraph`].
pub fn render_graph_schema() -> schemars::Schema {
    schemars::schema_for!(RenderGraph)
}

pub(crate) fn render_node(
    node_id: &NodeId,
    node: &TrackNode,
    layout: Option<&LayoutTable>,
) -> RenderNode {
    let mut rendered = RenderNode {
        id: node_id.to_string(),
        kind: node.kind().as_str().to_owned(),
        label: node.label().to_owned(),
        status: None,
        route: None,
        orientation: None,
        occupied: None,
        platform: None,
        position: layout.and_then(|layout| layout.position(node_id)),
    };
    match node.attributes() {
        NodeAttributes::Sensor(sensor) => rendered.status = Some(sensor.status.as_str().to_owned()),
        NodeAttributes::Switch(switch) => {
            rendered.route = Some(switch.route.as_str().to_owned());
            rendered.orientation = Some(switch.orientation.as_str().to_owned());
        }
        NodeAttributes::Stop(stop) => {
            rendered.occupied = Some(stop.occupied);
            rendered.platform = stop.platform.clone();
        }
    }
    rendered
}

pub(crate) fn render_edge(network: &TrackNetwork, edge_id: &EdgeId, edge: &TrackEdge) -> RenderEdge {
    RenderEdge {
        id: edge_id.to_string(),
        source: edge.source().to_string(),
        source_handle: edge.source_connector().map(|c| c.as_str().to_owned()),
        target: edge.target().to_string(),
        target_handle: edge.target_connector().map(|c| c.as_str().to_owned()),
        active: edge.is_active(),
        traversable: edge_is_traversable(network, edge),
        train: edge.occupancy().map(|train| RenderTrain {
            id: train.id().to_string(),
            name: train.display_name().to_owned(),
            direction: train.direction().as_str().to_owned(),
            label: format!("{} {}", train.display_name(), train.direction().arrow()),
        }),
    }
}
