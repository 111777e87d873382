//! Poly-data mapper: pulls geometry from a source and maps scalars to colors.

use std::sync::Arc;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::lookup_table::LookupTable;
use crate::poly_data::{Bounds, PolyData};
use crate::source::PolyDataSource;

/// Which scalars drive coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScalarMode {
    /// Point scalars if present, otherwise cell scalars.
    #[default]
    Default,
    /// Point scalars only.
    UsePointData,
    /// Cell scalars only.
    UseCellData,
}

/// Colors produced by scalar mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarColors {
    /// One color per point.
    PerPoint(Vec<Vec4>),
    /// One color per cell, in verts, lines, polys, strips order.
    PerCell(Vec<Vec4>),
}

/// Connects a [`PolyDataSource`] to an actor.
#[derive(Debug, Clone)]
pub struct PolyDataMapper {
    input: Option<Arc<dyn PolyDataSource>>,
    cache: Option<PolyData>,
    scalar_visibility: bool,
    scalar_range: (f32, f32),
    scalar_mode: ScalarMode,
    lookup_table: LookupTable,
    mtime: u64,
}

impl Default for PolyDataMapper {
    fn default() -> Self {
        Self {
            input: None,
            cache: None,
            scalar_visibility: true,
            scalar_range: (0.0, 1.0),
            scalar_mode: ScalarMode::Default,
            lookup_table: LookupTable::default(),
            mtime: 0,
        }
    }
}

impl PolyDataMapper {
    /// Creates a mapper with no input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects the mapper to a source. Cached output is discarded.
    pub fn set_input_connection(&mut self, source: Arc<dyn PolyDataSource>) {
        log::debug!("mapper connected to {}", source.name());
        self.input = Some(source);
        self.modified();
    }

    /// The connected source, if any.
    pub fn input_connection(&self) -> Option<&Arc<dyn PolyDataSource>> {
        self.input.as_ref()
    }

    /// The connected source downcast to a concrete type.
    pub fn input_as<T: PolyDataSource>(&self) -> Option<&T> {
        self.input.as_ref()?.as_any().downcast_ref::<T>()
    }

    /// Marks cached output stale.
    pub fn modified(&mut self) {
        self.cache = None;
        self.mtime += 1;
    }

    /// Modification counter; bumps whenever the mapper changes.
    pub fn modified_time(&self) -> u64 {
        self.mtime
    }

    /// Pulls output from the source if nothing is cached.
    pub fn update(&mut self) -> Result<()> {
        if self.cache.is_some() {
            return Ok(());
        }
        let source = self.input.as_ref().ok_or(SceneError::NoInput)?;
        let data = source.output()?;
        data.validate()?;
        log::debug!(
            "mapper updated from {}: {} points, {} cells",
            source.name(),
            data.number_of_points(),
            data.number_of_cells()
        );
        self.cache = Some(data);
        Ok(())
    }

    /// Cached output from the last [`update`](Self::update).
    pub fn input(&self) -> Option<&PolyData> {
        self.cache.as_ref()
    }

    /// Bounds of the cached output.
    pub fn bounds(&self) -> Option<Bounds> {
        self.cache.as_ref()?.bounds()
    }

    /// Whether scalars color the geometry.
    pub fn scalar_visibility(&self) -> bool {
        self.scalar_visibility
    }

    /// Turns scalar coloring on or off.
    pub fn set_scalar_visibility(&mut self, visible: bool) {
        self.scalar_visibility = visible;
        self.mtime += 1;
    }

    /// Scalar range mapped onto the lookup table.
    pub fn scalar_range(&self) -> (f32, f32) {
        self.scalar_range
    }

    /// Sets the scalar range mapped onto the lookup table.
    pub fn set_scalar_range(&mut self, min: f32, max: f32) -> Result<()> {
        self.lookup_table.set_table_range(min, max)?;
        self.scalar_range = (min, max);
        self.mtime += 1;
        Ok(())
    }

    /// Scalar mode.
    pub fn scalar_mode(&self) -> ScalarMode {
        self.scalar_mode
    }

    /// Sets the scalar mode.
    pub fn set_scalar_mode(&mut self, mode: ScalarMode) {
        self.scalar_mode = mode;
        self.mtime += 1;
    }

    /// The lookup table.
    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup_table
    }

    /// Replaces the lookup table; the mapper's scalar range is kept.
    pub fn set_lookup_table(&mut self, mut lookup_table: LookupTable) -> Result<()> {
        lookup_table.set_table_range(self.scalar_range.0, self.scalar_range.1)?;
        self.lookup_table = lookup_table;
        self.mtime += 1;
        Ok(())
    }

    /// Maps the cached output's scalars to colors.
    ///
    /// Returns `None` when scalar visibility is off, nothing is cached, or the
    /// data carries no scalars usable under the current mode.
    pub fn map_scalars(&self) -> Option<ScalarColors> {
        if !self.scalar_visibility {
            return None;
        }
        let data = self.cache.as_ref()?;
        let map = |values: &[f32]| -> Vec<Vec4> {
            values
                .iter()
                .map(|&v| self.lookup_table.map_value(v))
                .collect()
        };
        match self.scalar_mode {
            ScalarMode::UsePointData => data
                .point_scalars
                .as_deref()
                .map(|s| ScalarColors::PerPoint(map(s))),
            ScalarMode::UseCellData => data
                .cell_scalars
                .as_deref()
                .map(|s| ScalarColors::PerCell(map(s))),
            ScalarMode::Default => match (&data.point_scalars, &data.cell_scalars) {
                (Some(s), _) => Some(ScalarColors::PerPoint(map(s))),
                (None, Some(s)) => Some(ScalarColors::PerCell(map(s))),
                (None, None) => None,
            },
        }
    }
}
