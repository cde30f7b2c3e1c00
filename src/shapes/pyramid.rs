//! The N-dimensional pyramid over a cube base.

use super::{check_dimension, check_length, check_point, scaled_power, NShape};
use crate::errors::GeometryResult;
use crate::types::ShapeKind;
use std::collections::BTreeMap;

/// Pyramid with an (N-1)-cube base of side `s` and apex at height `h`
/// over the base center: `volume = s^(N-1)·h/N`.
///
/// The boundary is the base plus `2(N-1)` lateral facets, each an
/// (N-1)-dimensional pyramid over an (N-2)-cube facet with slant height
/// `l = √(h² + (s/2)²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperPyramid {
    dimension: u32,
    base_side: f64,
    height: f64,
}

impl HyperPyramid {
    pub fn new(dimension: u32, base_side: f64, height: f64) -> GeometryResult<Self> {
        check_dimension(dimension, 1)?;
        check_length("base_side", base_side)?;
        check_length("height", height)?;
        Ok(HyperPyramid {
            dimension,
            base_side,
            height,
        })
    }

    pub fn base_side(&self) -> f64 {
        self.base_side
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn slant_height(&self) -> f64 {
        (self.height * self.height + (self.base_side / 2.0) * (self.base_side / 2.0)).sqrt()
    }

    /// (N-1)-measure of one lateral facet.
    fn lateral_facet_area(&self) -> f64 {
        let n = self.dimension;
        if n < 2 {
            return 0.0;
        }
        scaled_power(
            self.slant_height() / (n as f64 - 1.0),
            (self.slant_height() / (n as f64 - 1.0)).ln(),
            self.base_side,
            n - 2,
        )
    }
}

impl NShape for HyperPyramid {
    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.base_side, self.height]
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Pyramid
    }

    fn volume(&self) -> f64 {
        let n = self.dimension;
        if self.height == 0.0 {
            return 0.0;
        }
        scaled_power(
            self.height / n as f64,
            (self.height / n as f64).ln(),
            self.base_side,
            n - 1,
        )
    }

    fn surface(&self) -> f64 {
        let n = self.dimension;
        if self.height == 0.0 {
            return 0.0;
        }
        if n == 1 {
            // Apex and base point of the segment
            return 2.0;
        }
        if self.base_side == 0.0 {
            return 0.0;
        }
        let base = scaled_power(1.0, 0.0, self.base_side, n - 1);
        // 2(N-1) facets, each s^(N-2)·l/(N-1): total 2·s^(N-2)·l
        let lateral = scaled_power(
            2.0 * self.slant_height(),
            (2.0 * self.slant_height()).ln(),
            self.base_side,
            n - 2,
        );
        base + lateral
    }

    fn volume_formula(&self) -> String {
        let n = self.dimension;
        format!("V_{} = s^{} × h/{}", n, n - 1, n)
    }

    fn surface_formula(&self) -> String {
        let n = self.dimension;
        if n == 1 {
            "S_1 = 2".to_string()
        } else {
            format!(
                "S_{} = s^{} + 2 × s^{} × √(h² + (s/2)²)",
                n,
                n - 1,
                n - 2
            )
        }
    }

    fn derived(&self) -> BTreeMap<String, f64> {
        let mut derived = BTreeMap::new();
        let n = self.dimension;
        derived.insert("slant_height".to_string(), self.slant_height());
        if n >= 2 {
            derived.insert(
                "base_volume".to_string(),
                scaled_power(1.0, 0.0, self.base_side, n - 1),
            );
            derived.insert(
                "lateral_facet_count".to_string(),
                2.0 * (n as f64 - 1.0),
            );
            derived.insert(
                "lateral_facet_area".to_string(),
                self.lateral_facet_area(),
            );
        }
        derived
    }

    fn contains(&self, point: &[f64]) -> GeometryResult<bool> {
        check_point(self.dimension, point)?;
        let n = self.dimension as usize;
        let z = point[n - 1];
        if z < 0.0 || z > self.height {
            return Ok(false);
        }
        if self.height == 0.0 {
            return Ok(point[..n - 1]
                .iter()
                .all(|&c| c >= 0.0 && c <= self.base_side));
        }
        // Cross-section at height z is a cube of side s·(1 - z/h),
        // centered over the base center
        let shrink = 1.0 - z / self.height;
        let half = self.base_side * shrink / 2.0;
        let center = self.base_side / 2.0;
        Ok(point[..n - 1]
            .iter()
            .all(|&c| (c - center).abs() <= half))
    }
}
