use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::bridge::ChannelKind;

/// Which channels a session passes through the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<ChannelKind>")]
pub struct ChannelSelection {
    /// Transform X
    pub x: bool,
    /// Transform Y
    pub y: bool,
    /// Transform Z
    pub z: bool,
}

impl ChannelSelection {
    /// Every channel
    pub fn all() -> Self {
        Self {
            x: true,
            y: true,
            z: true,
        }
    }

    /// Only the Y rows, leaving the axes untouched
    pub fn y_only() -> Self {
        Self {
            x: false,
            y: true,
            z: false,
        }
    }

    /// Whether `channel` is selected
    pub fn contains(&self, channel: ChannelKind) -> bool {
        match channel {
            ChannelKind::X => self.x,
            ChannelKind::Y => self.y,
            ChannelKind::Z => self.z,
        }
    }
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Vec<ChannelKind>> for ChannelSelection {
    fn from(channels: Vec<ChannelKind>) -> Self {
        Self {
            x: channels.contains(&ChannelKind::X),
            y: channels.contains(&ChannelKind::Y),
            z: channels.contains(&ChannelKind::Z),
        }
    }
}

impl FromStr for ChannelSelection {
    type Err = String;

    /// Parse a comma-separated list such as `x,y`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.parse::<ChannelKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from(channels))
    }
}

impl fmt::Display for ChannelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = ChannelKind::ALL
            .iter()
            .filter(|c| self.contains(**c))
            .map(ChannelKind::as_str)
            .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

/// Configuration for a rescaling session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Reject datasets whose nz is not 1
    pub require_single_row: bool,

    /// Channels passed through the transform; the rest are copied
    ///
    /// Z sets nz, which must still equal the number of Y rows. A transform
    /// that changes length therefore leaves Z unselected unless it maps a
    /// single sample to a single sample; otherwise the rebuilt dataset fails
    /// validation with `InvalidDataset`.
    pub channels: ChannelSelection,

    /// Write to a temporary file beside the output and move it into place
    /// only once the whole run succeeded
    pub atomic_output: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            require_single_row: true,
            channels: ChannelSelection::default(),
            atomic_output: true,
        }
    }
}

impl SessionConfig {
    /// Allow datasets with any number of Y rows
    pub fn allow_multi_row(mut self) -> Self {
        self.require_single_row = false;
        self
    }

    /// Restrict the transform to the given channels
    pub fn with_channels(mut self, channels: ChannelSelection) -> Self {
        self.channels = channels;
        self
    }

    /// Write the output in place instead of through a temporary file
    pub fn direct_output(mut self) -> Self {
        self.atomic_output = false;
        self
    }
}
