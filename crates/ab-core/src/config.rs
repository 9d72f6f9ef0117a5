//! Builder session configuration.

use crate::error::{BuilderError, Result};
use crate::geometry::{GridSettings, MIN_DIMENSION};
use serde::{Deserialize, Serialize};

/// How a same-row move interprets its destination index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderPolicy {
    /// The destination is a drop slot in the row as rendered before the
    /// move: slot `k` means "before the item currently at `k`". Moving
    /// forward inside one row lands at `k - 1` once the item is lifted out.
    #[default]
    Slot,
    /// The destination is an index into the row after the item is lifted
    /// out, with no correction.
    Naive,
}

impl ReorderPolicy {
    /// Final insertion index for a move within a single sequence.
    pub fn insertion_index(self, from: usize, to: usize) -> usize {
        match self {
            Self::Slot if from < to => to - 1,
            _ => to,
        }
    }
}

/// Configuration for a builder session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub grid: GridSettings,
    /// Resize floor for both width and height, in pixels.
    pub min_dimension: f32,
    pub reorder: ReorderPolicy,
    pub item_id_prefix: String,
    pub row_id_prefix: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            min_dimension: MIN_DIMENSION,
            reorder: ReorderPolicy::Slot,
            item_id_prefix: "item".to_string(),
            row_id_prefix: "row".to_string(),
        }
    }
}

impl BuilderConfig {
    /// Decode and validate a JSON config. Missing fields take defaults.
    ///
    /// # Errors
    /// `Config` on malformed JSON, `InvalidGeometry` on a bad grid or floor.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| BuilderError::Config(e.to_string()))?;
        config.validate()?;
        log::debug!(
            "builder config: grid {}x{} snap={} reorder={:?}",
            config.grid.size.x,
            config.grid.size.y,
            config.grid.snap,
            config.reorder
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.size.validate()?;
        if !(self.min_dimension.is_finite() && self.min_dimension >= 0.0) {
            return Err(BuilderError::InvalidGeometry(format!(
                "min_dimension = {}",
                self.min_dimension
            )));
        }
        if self.item_id_prefix.is_empty() || self.row_id_prefix.is_empty() {
            return Err(BuilderError::Config("id prefixes must not be empty".into()));
        }
        Ok(())
    }
}
