//! Scalar-to-color lookup table.

use glam::{Vec3, Vec4};

use crate::error::{Result, SceneError};

/// Maps scalar values to RGBA colors through a table built from HSV ranges.
///
/// The default table runs from red at the low end of the range to blue at
/// the high end.
#[derive(Debug, Clone)]
pub struct LookupTable {
    hue_range: (f32, f32),
    saturation_range: (f32, f32),
    value_range: (f32, f32),
    alpha_range: (f32, f32),
    table_range: (f32, f32),
    table: Vec<Vec4>,
}

impl Default for LookupTable {
    fn default() -> Self {
        let mut lut = Self {
            hue_range: (0.0, 0.6667),
            saturation_range: (1.0, 1.0),
            value_range: (1.0, 1.0),
            alpha_range: (1.0, 1.0),
            table_range: (0.0, 1.0),
            table: Vec::new(),
        };
        lut.build(256);
        lut
    }
}

impl LookupTable {
    /// Creates the default red-to-blue table with 256 entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hue range (each in `[0, 1]`) and rebuilds the table.
    pub fn set_hue_range(&mut self, min: f32, max: f32) {
        self.hue_range = (min.clamp(0.0, 1.0), max.clamp(0.0, 1.0));
        self.build(self.table.len());
    }

    /// Sets the saturation range and rebuilds the table.
    pub fn set_saturation_range(&mut self, min: f32, max: f32) {
        self.saturation_range = (min.clamp(0.0, 1.0), max.clamp(0.0, 1.0));
        self.build(self.table.len());
    }

    /// Sets the value range and rebuilds the table.
    pub fn set_value_range(&mut self, min: f32, max: f32) {
        self.value_range = (min.clamp(0.0, 1.0), max.clamp(0.0, 1.0));
        self.build(self.table.len());
    }

    /// Sets the alpha range and rebuilds the table.
    pub fn set_alpha_range(&mut self, min: f32, max: f32) {
        self.alpha_range = (min.clamp(0.0, 1.0), max.clamp(0.0, 1.0));
        self.build(self.table.len());
    }

    /// Sets the number of table entries (at least one) and rebuilds.
    pub fn set_number_of_colors(&mut self, count: usize) {
        self.build(count.max(1));
    }

    /// Number of table entries.
    pub fn number_of_colors(&self) -> usize {
        self.table.len()
    }

    /// Sets the scalar range covered by the table.
    pub fn set_table_range(&mut self, min: f32, max: f32) -> Result<()> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(SceneError::InvalidParameter(format!(
                "lookup table range must satisfy min <= max, got ({min}, {max})"
            )));
        }
        self.table_range = (min, max);
        Ok(())
    }

    /// Scalar range covered by the table.
    pub fn table_range(&self) -> (f32, f32) {
        self.table_range
    }

    /// Table entry at `index`.
    pub fn table_value(&self, index: usize) -> Option<Vec4> {
        self.table.get(index).copied()
    }

    /// Maps a scalar to a color, clamping to the table range.
    pub fn map_value(&self, value: f32) -> Vec4 {
        self.table[self.index_of(value)]
    }

    fn index_of(&self, value: f32) -> usize {
        let n = self.table.len();
        let (min, max) = self.table_range;
        if max <= min {
            return if value <= min { 0 } else { n - 1 };
        }
        let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
        ((t * n as f32) as usize).min(n - 1)
    }

    fn build(&mut self, count: usize) {
        let lerp = |(a, b): (f32, f32), t: f32| a + (b - a) * t;
        self.table = (0..count)
            .map(|i| {
                let t = if count > 1 {
                    i as f32 / (count - 1) as f32
                } else {
                    0.0
                };
                let rgb = hsv_to_rgb(
                    lerp(self.hue_range, t),
                    lerp(self.saturation_range, t),
                    lerp(self.value_range, t),
                );
                rgb.extend(lerp(self.alpha_range, t))
            })
            .collect();
    }
}

/// Converts HSV (all components in `[0, 1]`) to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = (h.rem_euclid(1.0)) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let lut = LookupTable::new();
        assert_eq!(lut.number_of_colors(), 256);

        let low = lut.map_value(0.0);
        assert!((low - Vec4::new(1.0, 0.0, 0.0, 1.0)).length() < 1e-5);

        let high = lut.map_value(1.0);
        assert!(high.z > 0.99);
        assert!(high.x < 0.01);
    }

    #[test]
    fn test_clamps_outside_range() {
        let lut = LookupTable::new();
        assert_eq!(lut.map_value(-5.0), lut.map_value(0.0));
        assert_eq!(lut.map_value(5.0), lut.map_value(1.0));
    }

    #[test]
    fn test_table_range() {
        let mut lut = LookupTable::new();
        lut.set_table_range(0.0, 7.0).unwrap();
        assert_eq!(lut.map_value(7.0), lut.table_value(255).unwrap());
        assert!(lut.set_table_range(2.0, 1.0).is_err());
    }

    #[test]
    fn test_degenerate_range_splits_at_the_value() {
        let mut lut = LookupTable::new();
        lut.set_table_range(2.0, 2.0).unwrap();
        assert_eq!(lut.map_value(2.0), lut.table_value(0).unwrap());
        assert_eq!(lut.map_value(1.0), lut.table_value(0).unwrap());
        assert_eq!(lut.map_value(2.1), lut.table_value(255).unwrap());
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!((hsv_to_rgb(1.0 / 3.0, 1.0, 1.0) - Vec3::Y).length() < 1e-5);
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.25), Vec3::splat(0.25));
    }
}
