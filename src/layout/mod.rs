// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Static layout table: where each node is drawn.
//!
//! Positions are purely visual and live outside the track model. A layout document is
//! a JSON object mapping node ids to `{ "x": .., "y": .. }`.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{IdError, NodeId, TrackNetwork};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutTable {
    positions: BTreeMap<NodeId, Position>,
}

impl LayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let raw: BTreeMap<String, Position> =
            serde_json::from_str(json).map_err(|source| LayoutError::Json { path: None, source })?;
        Self::from_raw(raw)
    }

    pub fn load_file(path: &Path) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, Position> =
            serde_json::from_str(&text).map_err(|source| LayoutError::Json {
                path: Some(path.to_path_buf()),
                source,
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: BTreeMap<String, Position>) -> Result<Self, LayoutError> {
        let mut positions = BTreeMap::new();
        for (node_id, position) in raw {
            let node_id = NodeId::new(node_id.clone()).map_err(|source| LayoutError::InvalidId {
                value: node_id,
                source,
            })?;
            positions.insert(node_id, position);
        }
        Ok(Self { positions })
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        let raw = self
            .positions
            .iter()
            .map(|(node_id, position)| (node_id.as_str(), *position))
            .collect::<BTreeMap<_, _>>();
        serde_json::to_string_pretty(&raw).map_err(|source| LayoutError::Json { path: None, source })
    }

    pub fn insert(&mut self, node_id: NodeId, position: Position) -> Option<Position> {
        self.positions.insert(node_id, position)
    }

    pub fn position(&self, node_id: &NodeId) -> Option<Position> {
        self.positions.get(node_id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Nodes of `network` the table has no position for.
    pub fn unplaced<'a>(&self, network: &'a TrackNetwork) -> Vec<&'a NodeId> {
        network
            .nodes()
            .keys()
            .filter(|node_id| !self.positions.contains_key(*node_id))
            .collect()
    }
}

#[derive(Debug)]
pub enum LayoutError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    InvalidId {
        value: String,
        source: IdError,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json {
                path: Some(path),
                source,
            } => write!(f, "layout json error at {path:?}: {source}"),
            Self::Json { path: None, source } => write!(f, "layout json error: {source}"),
            Self::InvalidId { value, source } => {
                write!(f, "invalid node id in layout: {value:?}: {source}")
            }
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
        }
    }
}
