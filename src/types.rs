//! Core types for spark-components.
//!
//! Identifiers, screen geometry and the dimension notation used by layout
//! options. Everything else builds on these.

use std::fmt;
use std::str::FromStr;

use crate::error::DimensionParseError;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque component identifier, stable for the lifetime of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win:{}", self.0)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Screen rectangle in terminal cells.
///
/// Edges are inclusive cell coordinates: a rect at `x = 0` with `width = 10`
/// covers columns `0..=9`, so its right edge is 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x as i32
    }

    pub fn right(&self) -> i32 {
        self.x as i32 + self.width as i32 - 1
    }

    pub fn top(&self) -> i32 {
        self.y as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y as i32 + self.height as i32 - 1
    }
}

/// Cardinal direction for spatial focus navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Whether navigation in this direction moves along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A size or offset: absolute cells or a percentage of the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Cells(u16),
    /// Percentage in the 0-100 range.
    Percent(f32),
}

impl Dimension {
    /// Resolve against a container extent.
    pub fn resolve(self, container: u16) -> u16 {
        match self {
            Dimension::Cells(n) => n.min(container),
            Dimension::Percent(p) => {
                let p = p.clamp(0.0, 100.0);
                (container as f32 * p / 100.0).round() as u16
            }
        }
    }

    /// Resolve as a placement offset for a box of `size` inside `container`.
    ///
    /// Percentages position the box within the free space, so `50%` centers it.
    /// The result never pushes the box past the container's far edge.
    pub fn resolve_offset(self, container: u16, size: u16) -> u16 {
        let free = container.saturating_sub(size);
        match self {
            Dimension::Cells(n) => n.min(free),
            Dimension::Percent(p) => {
                let p = p.clamp(0.0, 100.0);
                (free as f32 * p / 100.0).floor() as u16
            }
        }
    }
}

impl From<u16> for Dimension {
    fn from(cells: u16) -> Self {
        Dimension::Cells(cells)
    }
}

impl FromStr for Dimension {
    type Err = DimensionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || DimensionParseError(s.to_string());
        if let Some(pct) = trimmed.strip_suffix('%') {
            let value: f32 = pct.trim().parse().map_err(|_| err())?;
            if !(0.0..=100.0).contains(&value) {
                return Err(err());
            }
            Ok(Dimension::Percent(value))
        } else {
            trimmed.parse::<u16>().map(Dimension::Cells).map_err(|_| err())
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Cells(n) => write!(f, "{n}"),
            Dimension::Percent(p) => write!(f, "{p}%"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
