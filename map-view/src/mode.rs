use serde::{Deserialize, Serialize};
use std::fmt;

/// Which dataset the map is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Stops,
    Routes,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Stops
    }
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Stops, ViewMode::Routes];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Stops => "stops",
            ViewMode::Routes => "routes",
        }
    }

    /// Path of the endpoint serving this mode's feature collection
    pub fn endpoint(self) -> &'static str {
        match self {
            ViewMode::Stops => "/stops",
            ViewMode::Routes => "/routes",
        }
    }

    pub fn has_legend(self) -> bool {
        self == ViewMode::Stops
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stops" => Ok(ViewMode::Stops),
            "routes" => Ok(ViewMode::Routes),
            other => Err(ModeParseError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeParseError(String);

impl fmt::Display for ModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown view mode {:?}, expected stops or routes", self.0)
    }
}

impl std::error::Error for ModeParseError {}
