// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bundled two-station demo diagram.
//!
//! A west station with two platforms, a four-block line section, and a central
//! station whose four platforms are fanned out by west and east switch ladders.
//! Trains 1004, 1002 and 1003 start on the line.

use crate::format::{load_topology, TopologyError};
use crate::layout::{LayoutError, LayoutTable};
use crate::model::TrackNetwork;

pub const DEMO_TOPOLOGY: &str = include_str!("../demo/topology.json");
pub const DEMO_LAYOUT: &str = include_str!("../demo/layout.json");

pub fn demo_network() -> Result<TrackNetwork, TopologyError> {
    load_topology(DEMO_TOPOLOGY)
}

pub fn demo_layout() -> Result<LayoutTable, LayoutError> {
    LayoutTable::from_json(DEMO_LAYOUT)
}
