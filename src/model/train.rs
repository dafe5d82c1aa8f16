// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::TrainId;
use super::node::ParseValueError;

const MANUAL_TRAIN_ID: &str = "manual";
const MANUAL_TRAIN_NAME: &str = "Manual override";

/// Direction of travel relative to edge orientation.
///
/// `Right` moves along edges from source to target, `Left` against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TravelDirection {
    Left,
    #[default]
    Right,
}

impl TravelDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Self::Left => '←',
            Self::Right => '→',
        }
    }
}

impl fmt::Display for TravelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelDirection {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParseValueError::new("direction", s)),
        }
    }
}

/// A train as referenced from the edges it occupies.
///
/// Edges hold their own copy; two refs denote the same train when their ids match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRef {
    id: TrainId,
    display_name: String,
    direction: TravelDirection,
}

impl TrainRef {
    pub fn new(id: TrainId, display_name: impl Into<String>, direction: TravelDirection) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            direction,
        }
    }

    /// The placeholder train attached by a manual toggle when no real train can
    /// be inferred for the segment.
    pub fn manual() -> Self {
        Self {
            id: TrainId::from_static(MANUAL_TRAIN_ID),
            display_name: MANUAL_TRAIN_NAME.to_owned(),
            direction: TravelDirection::Right,
        }
    }

    pub fn id(&self) -> &TrainId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn direction(&self) -> TravelDirection {
        self.direction
    }

    pub fn is_manual(&self) -> bool {
        self.id.as_str() == MANUAL_TRAIN_ID
    }

    pub fn same_train(&self, other: &TrainRef) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for TrainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.display_name, self.direction.arrow())
    }
}
