// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! On-disk interchange formats.
//!
//! Currently this is the JSON topology description a network is built from.

pub mod topology;

pub use topology::{
    export_topology, load_topology, load_topology_file, save_topology_file, DescriptorIssue,
    Problem, TopologyError,
};
