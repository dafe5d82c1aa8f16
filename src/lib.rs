// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Signalbox: track model and occupancy core for railway interlocking diagrams.
//!
//! The crate owns the authoritative track state (nodes, edges, switch routes, train
//! occupancy) and exposes a render projection for an external diagram renderer.
//! Mutations go through [`ops::apply_ops`] or the direct operations in [`routing`]
//! and [`occupancy`].

pub mod demo;
pub mod format;
pub mod layout;
pub mod model;
pub mod occupancy;
pub mod ops;
pub mod render;
pub mod routing;
