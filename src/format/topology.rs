// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON topology descriptions.
//!
//! A document lists node descriptors followed by edge descriptors:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "sensor-west-1", "kind": "sensor", "label": "West 1" },
//!     { "id": "switch-west-1", "kind": "switch", "orientation": "west", "route": "straight" }
//!   ],
//!   "edges": [
//!     { "id": "west-entry-to-switch1", "source": "sensor-west-1", "target": "switch-west-1",
//!       "train": { "id": "1004", "name": "Local for Central", "direction": "right" } }
//!   ]
//! }
//! ```
//!
//! Loading is all-or-nothing. Every descriptor is checked and every problem found is
//! reported together in [`TopologyError::Invalid`]. Descriptors go through the same
//! registry operations as live edits, so any network reachable by those operations
//! exports to a document that loads back unchanged. A train may stand on a branch its
//! switch is not set for (it is waiting for the route); a train id must carry the same
//! name and direction on every edge.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::model::{
    AttributeIssue, Connector, EdgeId, Id, IdError, NodeAttributes, NodeId, NodeKind,
    ParseConnectorError, ParseValueError, SensorAttributes, StopAttributes, TrackError,
    TrackNetwork, TrainId, TrainRef, TravelDirection,
};
use crate::occupancy::refresh_sensors;

#[derive(Debug)]
pub enum TopologyError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Invalid(Vec<DescriptorIssue>),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json {
                path: Some(path),
                source,
            } => write!(f, "json error at {path:?}: {source}"),
            Self::Json { path: None, source } => write!(f, "json error: {source}"),
            Self::Invalid(issues) => {
                write!(f, "invalid topology ({} issue", issues.len())?;
                if issues.len() != 1 {
                    f.write_str("s")?;
                }
                f.write_str(")")?;
                for issue in issues {
                    write!(f, "\n  {issue}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for TopologyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// One problem with one descriptor.
///
/// `descriptor` is `node/<id>` or `edge/<id>`, or `nodes[<index>]` / `edges[<index>]`
/// when the descriptor's own id is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIssue {
    pub descriptor: String,
    pub problem: Problem,
}

impl fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.descriptor, self.problem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidValue(ParseValueError),
    InvalidConnectorName(ParseConnectorError),
    Track(TrackError),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::InvalidValue(err) => write!(f, "{err}"),
            Self::InvalidConnectorName(err) => write!(f, "{err}"),
            Self::Track(err) => write!(f, "{err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TopologyJson {
    #[serde(default)]
    pub(crate) nodes: Vec<NodeJson>,
    #[serde(default)]
    pub(crate) edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NodeJson {
    pub(crate) id: String,
    pub(crate) kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) occupied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EdgeJson {
    pub(crate) id: String,
    pub(crate) source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) source_connector: Option<String>,
    pub(crate) target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) target_connector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) train: Option<TrainJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TrainJson {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) direction: Option<String>,
}

pub fn load_topology(json: &str) -> Result<TrackNetwork, TopologyError> {
    let document: TopologyJson =
        serde_json::from_str(json).map_err(|source| TopologyError::Json { path: None, source })?;
    network_from_json(document)
}

pub fn load_topology_file(path: &Path) -> Result<TrackNetwork, TopologyError> {
    let text = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: TopologyJson =
        serde_json::from_str(&text).map_err(|source| TopologyError::Json {
            path: Some(path.to_path_buf()),
            source,
        })?;
    debug!("loaded topology document from {path:?}");
    network_from_json(document)
}

/// Writes the network back out in the format [`load_topology`] reads.
pub fn export_topology(network: &TrackNetwork) -> Result<String, TopologyError> {
    serde_json::to_string_pretty(&network_to_json(network))
        .map_err(|source| TopologyError::Json { path: None, source })
}

pub fn save_topology_file(path: &Path, network: &TrackNetwork) -> Result<(), TopologyError> {
    let mut text = export_topology(network)?;
    text.push('\n');
    std::fs::write(path, text).map_err(|source| TopologyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds a fresh network (revision 0) from a parsed document, with sensor statuses
/// derived from the initial occupancy.
pub(crate) fn network_from_json(document: TopologyJson) -> Result<TrackNetwork, TopologyError> {
    let mut network = TrackNetwork::new();
    let mut issues = Vec::new();

    for (index, node) in document.nodes.into_iter().enumerate() {
        load_node(&mut network, index, node, &mut issues);
    }

    for (index, edge) in document.edges.into_iter().enumerate() {
        load_edge(&mut network, index, edge, &mut issues);
    }

    if !issues.is_empty() {
        warn!("topology rejected with {} issues", issues.len());
        return Err(TopologyError::Invalid(issues));
    }

    refresh_sensors(&mut network);
    network.set_rev(0);
    debug!(
        "topology loaded: {} nodes, {} edges, {} trains",
        network.nodes().len(),
        network.edges().len(),
        network.trains().len()
    );
    Ok(network)
}

fn load_node(
    network: &mut TrackNetwork,
    index: usize,
    node: NodeJson,
    issues: &mut Vec<DescriptorIssue>,
) {
    let node_id = match NodeId::new(node.id.clone()) {
        Ok(node_id) => node_id,
        Err(source) => {
            issues.push(DescriptorIssue {
                descriptor: format!("nodes[{index}]"),
                problem: Problem::InvalidId {
                    field: "id",
                    value: node.id,
                    source,
                },
            });
            return;
        }
    };
    let descriptor = format!("node/{node_id}");

    let mut problems = Vec::new();
    if let Some(attributes) = attributes_from_json(&node_id, &node, &mut problems) {
        let label = node.label.unwrap_or_else(|| node_id.to_string());
        if let Err(err) = network.create_node(node_id, label, attributes) {
            problems.push(Problem::Track(err));
        }
    }

    issues.extend(problems.into_iter().map(|problem| DescriptorIssue {
        descriptor: descriptor.clone(),
        problem,
    }));
}

fn attributes_from_json(
    node_id: &NodeId,
    node: &NodeJson,
    problems: &mut Vec<Problem>,
) -> Option<NodeAttributes> {
    let kind = match node.kind.parse::<NodeKind>() {
        Ok(kind) => kind,
        Err(err) => {
            problems.push(Problem::InvalidValue(err));
            return None;
        }
    };

    let present = [
        ("status", node.status.is_some()),
        ("route", node.route.is_some()),
        ("orientation", node.orientation.is_some()),
        ("occupied", node.occupied.is_some()),
        ("platform", node.platform.is_some()),
    ];
    let applicable: &[&str] = match kind {
        NodeKind::Sensor => &["status"],
        NodeKind::Switch => &["route", "orientation"],
        NodeKind::Stop => &["occupied", "platform"],
    };
    let before = problems.len();
    for (attribute, is_set) in present {
        if is_set && !applicable.contains(&attribute) {
            problems.push(Problem::Track(TrackError::InvalidAttribute {
                node_id: node_id.clone(),
                node_kind: kind,
                attribute,
                issue: AttributeIssue::NotApplicable,
            }));
        }
    }

    let attributes = match kind {
        NodeKind::Sensor => NodeAttributes::Sensor(SensorAttributes {
            status: parse_or_default(node.status.as_deref(), problems),
        }),
        NodeKind::Switch => NodeAttributes::switch(
            parse_or_default(node.route.as_deref(), problems),
            parse_or_default(node.orientation.as_deref(), problems),
        ),
        NodeKind::Stop => NodeAttributes::Stop(StopAttributes {
            occupied: node.occupied.unwrap_or(false),
            platform: node.platform.clone(),
        }),
    };

    (problems.len() == before).then_some(attributes)
}

fn parse_or_default<T>(value: Option<&str>, problems: &mut Vec<Problem>) -> T
where
    T: FromStr<Err = ParseValueError> + Default,
{
    match value.map(str::parse::<T>).transpose() {
        Ok(parsed) => parsed.unwrap_or_default(),
        Err(err) => {
            problems.push(Problem::InvalidValue(err));
            T::default()
        }
    }
}

fn load_edge(
    network: &mut TrackNetwork,
    index: usize,
    edge: EdgeJson,
    issues: &mut Vec<DescriptorIssue>,
) {
    let edge_id = match EdgeId::new(edge.id.clone()) {
        Ok(edge_id) => edge_id,
        Err(source) => {
            issues.push(DescriptorIssue {
                descriptor: format!("edges[{index}]"),
                problem: Problem::InvalidId {
                    field: "id",
                    value: edge.id,
                    source,
                },
            });
            return;
        }
    };
    let descriptor = format!("edge/{edge_id}");

    let mut problems = Vec::new();
    let source: Option<NodeId> = parse_id("source", &edge.source, &mut problems);
    let target: Option<NodeId> = parse_id("target", &edge.target, &mut problems);
    let source_connector = parse_connector(edge.source_connector.as_deref(), &mut problems);
    let target_connector = parse_connector(edge.target_connector.as_deref(), &mut problems);
    let train = edge
        .train
        .and_then(|train| train_from_json(train, &mut problems));

    if let (true, Some(source), Some(target)) = (problems.is_empty(), source, target) {
        let created =
            network.create_edge(edge_id.clone(), source, source_connector, target, target_connector);
        let occupied = created.and_then(|edge_id| match train {
            Some(train) => network.set_occupancy(&edge_id, Some(train)).map(|_| ()),
            None => Ok(()),
        });
        if let Err(err) = occupied {
            problems.push(Problem::Track(err));
        }
    }

    issues.extend(problems.into_iter().map(|problem| DescriptorIssue {
        descriptor: descriptor.clone(),
        problem,
    }));
}

fn parse_id<T>(field: &'static str, value: &str, problems: &mut Vec<Problem>) -> Option<Id<T>> {
    match Id::new(value) {
        Ok(id) => Some(id),
        Err(source) => {
            problems.push(Problem::InvalidId {
                field,
                value: value.to_owned(),
                source,
            });
            None
        }
    }
}

fn parse_connector(value: Option<&str>, problems: &mut Vec<Problem>) -> Option<Connector> {
    match value.map(str::parse::<Connector>).transpose() {
        Ok(connector) => connector,
        Err(err) => {
            problems.push(Problem::InvalidConnectorName(err));
            None
        }
    }
}

fn train_from_json(train: TrainJson, problems: &mut Vec<Problem>) -> Option<TrainRef> {
    let train_id: TrainId = parse_id("train.id", &train.id, problems)?;
    let direction = match train
        .direction
        .as_deref()
        .map(str::parse::<TravelDirection>)
        .transpose()
    {
        Ok(direction) => direction.unwrap_or_default(),
        Err(err) => {
            problems.push(Problem::InvalidValue(err));
            return None;
        }
    };

    Some(TrainRef::new(train_id, train.name, direction))
}

fn network_to_json(network: &TrackNetwork) -> TopologyJson {
    TopologyJson {
        nodes: network
            .nodes()
            .iter()
            .map(|(node_id, node)| {
                let mut json = NodeJson {
                    id: node_id.to_string(),
                    kind: node.kind().as_str().to_owned(),
                    label: Some(node.label().to_owned()),
                    status: None,
                    route: None,
                    orientation: None,
                    occupied: None,
                    platform: None,
                };
                match node.attributes() {
                    NodeAttributes::Sensor(sensor) => {
                        json.status = Some(sensor.status.as_str().to_owned());
                    }
                    NodeAttributes::Switch(switch) => {
                        json.route = Some(switch.route.as_str().to_owned());
                        json.orientation = Some(switch.orientation.as_str().to_owned());
                    }
                    NodeAttributes::Stop(stop) => {
                        json.occupied = Some(stop.occupied);
                        json.platform = stop.platform.clone();
                    }
                }
                json
            })
            .collect(),
        edges: network
            .edges()
            .iter()
            .map(|(edge_id, edge)| EdgeJson {
                id: edge_id.to_string(),
                source: edge.source().to_string(),
                source_connector: edge.source_connector().map(|c| c.as_str().to_owned()),
                target: edge.target().to_string(),
                target_connector: edge.target_connector().map(|c| c.as_str().to_owned()),
                train: edge.occupancy().map(train_to_json),
            })
            .collect(),
    }
}

fn train_to_json(train: &TrainRef) -> TrainJson {
    TrainJson {
        id: train.id().to_string(),
        name: train.display_name().to_owned(),
        direction: Some(train.direction().as_str().to_owned()),
    }
}

#[cfg(test)]
mod tests;
