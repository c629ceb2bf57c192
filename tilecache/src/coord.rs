//! Tile coordinate keys.
//!
//! A [`TileKey`] identifies one cacheable tile by zoom level, column and row
//! in the standard XYZ tiling scheme:
//! - X: Column (0 to 2^zoom - 1, west to east)
//! - Y: Row (0 to 2^zoom - 1, north to south)
//! - Z: Zoom level (0 to [`MAX_ZOOM`])
//!
//! Keys render as `z/x/y`, the same form used for remote store paths.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum zoom level supported by the system.
///
/// Used as the default write gate for cache backends.
pub const MAX_ZOOM: u8 = 22;

/// Errors from parsing a `z/x/y` tile key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// The input did not have exactly three `/`-separated components.
    #[error("expected z/x/y, got '{0}'")]
    Format(String),

    /// A component was not an unsigned decimal integer in range.
    #[error("invalid {component} component '{value}'")]
    Component {
        component: &'static str,
        value: String,
    },
}

/// Identifies a single tile by zoom level, column and row.
///
/// Keys are plain values: they are created per request and dropped after use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Zoom level
    pub z: u8,
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl TileKey {
    /// Creates a new tile key.
    pub const fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Returns the remote path for this key below `base`.
    ///
    /// Components are decimal with no padding, joined by single slashes.
    pub fn path_under(&self, base: &str) -> String {
        format!("{}/{}/{}/{}", base, self.z, self.x, self.y)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl FromStr for TileKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 3 {
            return Err(KeyParseError::Format(s.to_string()));
        }

        fn component<T: FromStr>(name: &'static str, value: &str) -> Result<T, KeyParseError> {
            // `u32::from_str` accepts a leading '+'; keys are digits only.
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(KeyParseError::Component {
                    component: name,
                    value: value.to_string(),
                });
            }
            value.parse().map_err(|_| KeyParseError::Component {
                component: name,
                value: value.to_string(),
            })
        }

        Ok(Self {
            z: component("zoom", parts[0])?,
            x: component("column", parts[1])?,
            y: component("row", parts[2])?,
        })
    }
}
