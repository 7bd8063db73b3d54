//! Page capture types: orientation correction and acquisition errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clockwise rotation applied to every captured frame.
///
/// Document cameras are frequently mounted upside down relative to the
/// reader, so frames arrive in a fixed but wrong orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "90")]
    Cw90,
    #[serde(rename = "180")]
    Cw180,
    #[serde(rename = "270")]
    Cw270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Rotation::None),
            "90" => Ok(Rotation::Cw90),
            "180" => Ok(Rotation::Cw180),
            "270" => Ok(Rotation::Cw270),
            other => Err(format!("invalid rotation: '{other}' (expected 0, 90, 180 or 270)")),
        }
    }
}

/// Errors raised while acquiring a frame.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("frame source unavailable: {0}")]
    Unavailable(String),

    #[error("frame source is not open")]
    NotOpen,

    #[error("failed to decode page image '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
