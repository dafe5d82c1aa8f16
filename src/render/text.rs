// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use crate::model::TrackNetwork;
use crate::routing::{edge_is_traversable, route_lock};

const NAME_MAX: usize = 32;

/// Plain-text occupancy board: one line per edge, then one line per switch.
///
/// ```text
/// edges
///   [#] e-entry     T1 Train T1 →
///   [ ] e-straight
///   [x] e-diverging
/// switches
///   S  straight  west  locked by T1 on e-entry
/// ```
///
/// `#` marks an occupied edge, `x` an edge that is not routed through its switches.
pub fn render_status(network: &TrackNetwork) -> String {
    let mut out = String::new();

    let edge_width = network
        .edges()
        .keys()
        .map(|edge_id| text_len(edge_id.as_str()))
        .max()
        .unwrap_or(0);
    out.push_str("edges\n");
    for (edge_id, edge) in network.edges() {
        let marker = if edge.is_active() {
            '#'
        } else if !edge_is_traversable(network, edge) {
            'x'
        } else {
            ' '
        };
        let line = match edge.occupancy() {
            Some(train) => format!(
                "  [{marker}] {:<edge_width$}  {} {} {}",
                edge_id.as_str(),
                train.id(),
                truncate_with_ellipsis(train.display_name(), NAME_MAX),
                train.direction().arrow(),
            ),
            None => format!("  [{marker}] {}", edge_id.as_str()),
        };
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let switches = network
        .nodes()
        .iter()
        .filter_map(|(node_id, node)| node.as_switch().map(|switch| (node_id, switch)))
        .collect::<Vec<_>>();
    let switch_width = switches
        .iter()
        .map(|(node_id, _)| text_len(node_id.as_str()))
        .max()
        .unwrap_or(0);
    out.push_str("switches\n");
    for (node_id, switch) in switches {
        let mut line = format!(
            "  {:<switch_width$}  {:<9}  {}",
            node_id.as_str(),
            switch.route.as_str(),
            switch.orientation.as_str(),
        );
        if let Some((edge_id, train_id)) = route_lock(network, node_id) {
            let _ = write!(line, "  locked by {train_id} on {edge_id}");
        }
        let _ = writeln!(out, "{line}");
    }

    out
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    let len = text_len(text);
    if len <= max_len {
        return text.to_owned();
    }

    if max_len == 1 {
        return "…".to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}
