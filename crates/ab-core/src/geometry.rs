//! Canvas geometry and grid snapping.
//!
//! All coordinates are canvas pixels. Snapping rounds each axis to the
//! nearest multiple of the grid cell (`f32::round`, half away from zero),
//! so `snap(snap(p)) == snap(p)` for any positive grid.

use crate::error::{BuilderError, Result};
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize may produce.
pub const MIN_DIMENSION: f32 = 20.0;

/// Grid cell dimensions in pixels. Both components are finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub x: f32,
    pub y: f32,
}

impl GridSize {
    /// Build a validated grid size.
    pub fn new(x: f32, y: f32) -> Result<Self> {
        let size = Self { x, y };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.x.is_finite() && self.x > 0.0) {
            return Err(BuilderError::InvalidGeometry(format!("grid x = {}", self.x)));
        }
        if !(self.y.is_finite() && self.y > 0.0) {
            return Err(BuilderError::InvalidGeometry(format!("grid y = {}", self.y)));
        }
        Ok(())
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self { x: 100.0, y: 80.0 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Position, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

fn snap_axis(v: f32, cell: f32) -> f32 {
    (v / cell).round() * cell
}

/// Snap a position to the grid. Returns `position` unchanged when disabled.
pub fn snap(position: Position, grid: GridSize, enabled: bool) -> Position {
    if !enabled {
        return position;
    }
    Position {
        x: snap_axis(position.x, grid.x),
        y: snap_axis(position.y, grid.y),
    }
}

/// Snap a size to the grid, then clamp each side to at least `floor`.
///
/// The floor applies even when snapping is disabled.
pub fn snap_size(size: Size, grid: GridSize, enabled: bool, floor: f32) -> Size {
    let (w, h) = if enabled {
        (snap_axis(size.width, grid.x), snap_axis(size.height, grid.y))
    } else {
        (size.width, size.height)
    };
    Size {
        width: w.max(floor),
        height: h.max(floor),
    }
}

/// Grid display and snapping settings for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub size: GridSize,
    pub show: bool,
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: GridSize::default(),
            show: true,
            snap: true,
        }
    }
}

/// Partial update of [`GridSettings`]; `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSettingsPatch {
    pub size: Option<GridSize>,
    pub show: Option<bool>,
    pub snap: Option<bool>,
}

impl GridSettings {
    pub fn snap_position(&self, position: Position) -> Position {
        snap(position, self.size, self.snap)
    }

    pub fn snap_size(&self, size: Size, floor: f32) -> Size {
        snap_size(size, self.size, self.snap, floor)
    }

    /// The grid cell containing `position`, regardless of the snap toggle.
    /// Used for hover highlights.
    pub fn cell_at(&self, position: Position) -> Rect {
        let origin = snap(position, self.size, true);
        Rect::new(origin.x, origin.y, self.size.x, self.size.y)
    }

    /// Apply a patch. An invalid size rejects the whole patch.
    pub fn apply(&mut self, patch: GridSettingsPatch) -> Result<()> {
        if let Some(size) = patch.size {
            size.validate()?;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(show) = patch.show {
            self.show = show;
        }
        if let Some(snap) = patch.snap {
            self.snap = snap;
        }
        Ok(())
    }
}
