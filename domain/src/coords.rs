use serde::{Deserialize, Serialize};
use std::fmt;

/// A pixel coordinate in the board's own coordinate space, not yet validated
/// against the board's configured dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u16,
    pub y: u16,
}

impl PixelCoord {
    #[must_use]
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// `None` if out of bounds for a board of the given width/height, otherwise
    /// the row-major pixel index `y * width + x`.
    #[must_use]
    pub fn to_index(self, width: u16, height: u16) -> Option<usize> {
        if self.x >= width || self.y >= height {
            return None;
        }
        Some(usize::from(self.y) * usize::from(width) + usize::from(self.x))
    }

    #[must_use]
    pub fn from_index(index: usize, width: u16) -> Self {
        let width = usize::from(width).max(1);
        Self {
            x: u16::try_from(index % width).unwrap_or(u16::MAX),
            y: u16::try_from(index / width).unwrap_or(u16::MAX),
        }
    }
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
