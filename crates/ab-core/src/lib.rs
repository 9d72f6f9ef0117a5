pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod palette;
pub mod schema;

pub use config::{BuilderConfig, ReorderPolicy};
pub use error::{BuilderError, Result};
pub use geometry::{
    GridSettings, GridSettingsPatch, GridSize, MIN_DIMENSION, Position, Rect, Size, snap,
    snap_size,
};
pub use id::{ItemId, RowId};
pub use model::*;
pub use palette::{Palette, PaletteItem};
pub use schema::{FieldKind, PropertyField, coerce_property, fields_for};
