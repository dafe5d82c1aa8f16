// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Named attachment points on track nodes.
//!
//! Every node has connectors on two roles: the `Sink` side where edges enter and the
//! `Source` side where edges leave. Sensors and stops carry a single trunk on each
//! role. A switch carries its trunk on one role and the two branches on the other,
//! decided by its [`Orientation`].

use std::fmt;
use std::str::FromStr;

use super::node::{NodeAttributes, Orientation, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Connector {
    Trunk,
    Straight,
    Diverging,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trunk => "trunk",
            Self::Straight => "straight",
            Self::Diverging => "diverging",
        }
    }

    /// The route that selects this connector, or `None` for the trunk.
    pub fn branch_route(self) -> Option<Route> {
        match self {
            Self::Trunk => None,
            Self::Straight => Some(Route::Straight),
            Self::Diverging => Some(Route::Diverging),
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a connector name. Diagram handles call the trunk `input` or `output`
/// depending on which side it sits, so both spellings are accepted.
impl FromStr for Connector {
    type Err = ParseConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trunk" | "input" | "output" => Ok(Self::Trunk),
            "straight" => Ok(Self::Straight),
            "diverging" => Ok(Self::Diverging),
            _ => Err(ParseConnectorError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConnectorError {
    value: String,
}

impl fmt::Display for ParseConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown connector '{}'", self.value)
    }
}

impl std::error::Error for ParseConnectorError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorRole {
    /// The edge leaves the node.
    Source,
    /// The edge enters the node.
    Sink,
}

impl ConnectorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Sink => "sink",
        }
    }
}

impl fmt::Display for ConnectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TRUNK_ONLY: &[Connector] = &[Connector::Trunk];
const BRANCHES: &[Connector] = &[Connector::Straight, Connector::Diverging];

/// The connectors a node offers on the given role.
pub fn connectors_for(attributes: &NodeAttributes, role: ConnectorRole) -> &'static [Connector] {
    match attributes {
        NodeAttributes::Sensor(_) | NodeAttributes::Stop(_) => TRUNK_ONLY,
        NodeAttributes::Switch(switch) => match (switch.orientation, role) {
            (Orientation::West, ConnectorRole::Sink) => TRUNK_ONLY,
            (Orientation::West, ConnectorRole::Source) => BRANCHES,
            (Orientation::East, ConnectorRole::Sink) => BRANCHES,
            (Orientation::East, ConnectorRole::Source) => TRUNK_ONLY,
        },
    }
}

/// Resolves an optional connector name against what the node offers on `role`.
///
/// An omitted connector means the trunk, which is only unambiguous when the role
/// actually has a trunk. Returns `None` when the connector does not exist there.
pub fn resolve_connector(
    attributes: &NodeAttributes,
    role: ConnectorRole,
    connector: Option<Connector>,
) -> Option<Connector> {
    let offered = connectors_for(attributes, role);
    match connector {
        Some(connector) => offered.contains(&connector).then_some(connector),
        None => offered.contains(&Connector::Trunk).then_some(Connector::Trunk),
    }
}
