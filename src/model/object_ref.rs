// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::{EdgeId, IdError, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Node,
    Edge,
    Train,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Train => "train",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a registry object, rendered as `node/<id>` or `edge/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl ObjectRef {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Node(_) => ObjectKind::Node,
            Self::Edge(_) => ObjectKind::Edge,
        }
    }

    pub fn id_str(&self) -> &str {
        match self {
            Self::Node(node_id) => node_id.as_str(),
            Self::Edge(edge_id) => edge_id.as_str(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.id_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseObjectRefError {
    MissingSeparator,
    UnknownKind(String),
    InvalidId(IdError),
}

impl fmt::Display for ParseObjectRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("object ref must look like '<kind>/<id>'"),
            Self::UnknownKind(kind) => write!(f, "unknown object kind '{kind}'"),
            Self::InvalidId(err) => write!(f, "invalid object id: {err}"),
        }
    }
}

impl std::error::Error for ParseObjectRefError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            _ => None,
        }
    }
}

impl FromStr for ObjectRef {
    type Err = ParseObjectRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once('/').ok_or(ParseObjectRefError::MissingSeparator)?;
        match kind {
            "node" => NodeId::new(id).map(Self::Node).map_err(ParseObjectRefError::InvalidId),
            "edge" => EdgeId::new(id).map(Self::Edge).map_err(ParseObjectRefError::InvalidId),
            other => Err(ParseObjectRefError::UnknownKind(other.to_owned())),
        }
    }
}
