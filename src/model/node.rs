// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Signalbox-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Signalbox and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

/// The kind of trackside element. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Sensor,
    Switch,
    Stop,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Switch => "switch",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensor" => Ok(Self::Sensor),
            "switch" => Ok(Self::Switch),
            "stop" => Ok(Self::Stop),
            _ => Err(ParseValueError::new("kind", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorStatus {
    #[default]
    Inactive,
    Active,
}

impl SensorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }

    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl FromStr for SensorStatus {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            _ => Err(ParseValueError::new("status", s)),
        }
    }
}

/// Which branch a switch currently routes trains through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Straight,
    Diverging,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Diverging => "diverging",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "diverging" => Ok(Self::Diverging),
            _ => Err(ParseValueError::new("route", s)),
        }
    }
}

/// Which side of a switch carries the single trunk connector.
///
/// `West`: the trunk is the entry (sink) side and the two branches leave the
/// switch. `East`: the two branches enter the switch and the trunk leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    West,
    East,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::West => "west",
            Self::East => "east",
        }
    }
}

impl FromStr for Orientation {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "west" => Ok(Self::West),
            "east" => Ok(Self::East),
            _ => Err(ParseValueError::new("orientation", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorAttributes {
    pub status: SensorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchAttributes {
    pub route: Route,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopAttributes {
    pub occupied: bool,
    pub platform: Option<String>,
}

/// Kind-specific attributes. The variant determines the node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAttributes {
    Sensor(SensorAttributes),
    Switch(SwitchAttributes),
    Stop(StopAttributes),
}

impl NodeAttributes {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Sensor(_) => NodeKind::Sensor,
            Self::Switch(_) => NodeKind::Switch,
            Self::Stop(_) => NodeKind::Stop,
        }
    }

    pub fn sensor() -> Self {
        Self::Sensor(SensorAttributes::default())
    }

    pub fn switch(route: Route, orientation: Orientation) -> Self {
        Self::Switch(SwitchAttributes { route, orientation })
    }

    pub fn stop(platform: Option<String>) -> Self {
        Self::Stop(StopAttributes {
            occupied: false,
            platform,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackNode {
    label: String,
    attributes: NodeAttributes,
}

impl TrackNode {
    pub fn new(label: impl Into<String>, attributes: NodeAttributes) -> Self {
        Self {
            label: label.into(),
            attributes,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.attributes.kind()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.attributes
    }

    pub fn as_switch(&self) -> Option<&SwitchAttributes> {
        match &self.attributes {
            NodeAttributes::Switch(switch) => Some(switch),
            _ => None,
        }
    }

    pub fn sensor_status(&self) -> Option<SensorStatus> {
        match &self.attributes {
            NodeAttributes::Sensor(sensor) => Some(sensor.status),
            _ => None,
        }
    }

    pub fn stop_occupied(&self) -> Option<bool> {
        match &self.attributes {
            NodeAttributes::Stop(stop) => Some(stop.occupied),
            _ => None,
        }
    }

    /// Marks the node as holding (or no longer holding) a train.
    ///
    /// Sensors flip their status, stops their occupied flag; switches carry no
    /// occupancy of their own. Returns whether anything changed.
    pub(crate) fn mark_occupied(&mut self, occupied: bool) -> bool {
        match &mut self.attributes {
            NodeAttributes::Sensor(sensor) => {
                let status = SensorStatus::from_active(occupied);
                let changed = sensor.status != status;
                sensor.status = status;
                changed
            }
            NodeAttributes::Stop(stop) => {
                let changed = stop.occupied != occupied;
                stop.occupied = occupied;
                changed
            }
            NodeAttributes::Switch(_) => false,
        }
    }

    pub(crate) fn set_route(&mut self, route: Route) {
        if let NodeAttributes::Switch(switch) = &mut self.attributes {
            switch.route = route;
        }
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut NodeAttributes {
        &mut self.attributes
    }
}

/// Partial node update. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub label: Option<String>,
    pub status: Option<SensorStatus>,
    pub route: Option<Route>,
    pub orientation: Option<Orientation>,
    pub occupied: Option<bool>,
    pub platform: Option<Option<String>>,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    field: &'static str,
    value: String,
}

impl ParseValueError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} '{}'", self.field, self.value)
    }
}

impl std::error::Error for ParseValueError {}
