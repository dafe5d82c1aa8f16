// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Renderer-initiated events.
//!
//! A renderer speaks in strings (ids and handle names as drawn). Each handler parses
//! them, forwards to the model operation, and answers with the refreshed render record
//! so the renderer can update just that element.

use std::fmt;

use log::debug;

use super::{render_edge, render_node, RenderEdge, RenderNode};
use crate::model::{
    Connector, EdgeId, Id, IdError, ParseConnectorError, ParseValueError, Route, TrackError,
    TrackNetwork,
};
use crate::{occupancy, routing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidHandle(ParseConnectorError),
    InvalidRoute(ParseValueError),
    Track(TrackError),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::InvalidHandle(err) => write!(f, "{err}"),
            Self::InvalidRoute(err) => write!(f, "{err}"),
            Self::Track(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidHandle(err) => Some(err),
            Self::InvalidRoute(err) => Some(err),
            Self::Track(err) => Some(err),
        }
    }
}

impl From<TrackError> for AdapterError {
    fn from(err: TrackError) -> Self {
        Self::Track(err)
    }
}

/// A connection the user drew between two node handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectRequest<'a> {
    /// Requested edge id; derived from the endpoints when absent.
    pub edge_id: Option<&'a str>,
    pub source: &'a str,
    pub source_handle: Option<&'a str>,
    pub target: &'a str,
    pub target_handle: Option<&'a str>,
}

/// Validates a drawn connection and registers it as a new edge.
///
/// A rejected connection (unknown node, connector invalid for the node, duplicate id)
/// leaves the network unchanged; the renderer should drop the drawn line.
pub fn on_user_connect(
    network: &mut TrackNetwork,
    request: ConnectRequest<'_>,
) -> Result<RenderEdge, AdapterError> {
    let source = parse_id("source", request.source)?;
    let target = parse_id("target", request.target)?;
    let source_connector = parse_handle(request.source_handle)?;
    let target_connector = parse_handle(request.target_handle)?;
    let edge_id = match request.edge_id {
        Some(edge_id) => parse_id("edge_id", edge_id)?,
        None => free_edge_id(network, request.source, request.target)?,
    };

    network.create_edge(
        edge_id.clone(),
        source,
        source_connector,
        target,
        target_connector,
    )?;
    debug!("user connected {edge_id}");

    let edge = network.edge(&edge_id)?;
    Ok(render_edge(network, &edge_id, edge))
}

/// Manual occupancy override for a clicked edge.
pub fn on_user_toggle(network: &mut TrackNetwork, edge_id: &str) -> Result<RenderEdge, AdapterError> {
    let edge_id: EdgeId = parse_id("edge_id", edge_id)?;
    occupancy::toggle_occupancy(network, &edge_id)?;

    let edge = network.edge(&edge_id)?;
    Ok(render_edge(network, &edge_id, edge))
}

pub fn on_user_set_route(
    network: &mut TrackNetwork,
    switch_id: &str,
    route: &str,
) -> Result<RenderNode, AdapterError> {
    let switch_id = parse_id("switch_id", switch_id)?;
    let route = route.parse::<Route>().map_err(AdapterError::InvalidRoute)?;
    routing::set_route(network, &switch_id, route)?;

    let node = network.node(&switch_id)?;
    Ok(render_node(&switch_id, node, None))
}

fn parse_id<T>(field: &'static str, value: &str) -> Result<Id<T>, AdapterError> {
    Id::new(value).map_err(|source| AdapterError::InvalidId {
        field,
        value: value.to_owned(),
        source,
    })
}

fn parse_handle(handle: Option<&str>) -> Result<Option<Connector>, AdapterError> {
    handle
        .map(str::parse::<Connector>)
        .transpose()
        .map_err(AdapterError::InvalidHandle)
}

fn free_edge_id(network: &TrackNetwork, source: &str, target: &str) -> Result<EdgeId, AdapterError> {
    let base = format!("{source}-to-{target}");
    let mut candidate: EdgeId = parse_id("edge_id", &base)?;
    let mut suffix = 2;
    while network.edges().contains_key(&candidate) {
        candidate = parse_id("edge_id", &format!("{base}-{suffix}"))?;
        suffix += 1;
    }
    Ok(candidate)
}
