//! Soft resource budgets.
//!
//! Every dispatched operation is bounded by its declared inputs; these
//! budgets are checked before any work starts and exceeding one fails fast
//! with `ResourceLimit`. The kernel never preempts running work.

use crate::errors::{GeometryError, GeometryResult};
use serde::{Deserialize, Serialize};

/// Configurable soft budgets for a kernel instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Budgets {
    /// Maximum dimension for single shape calculations.
    pub max_dimension: u32,
    /// Maximum span (inclusive) of a scaling sweep.
    pub max_sweep_span: u32,
    /// Maximum number of items per batch request.
    pub max_batch: usize,
    /// Maximum number of tiles a tiling may generate.
    pub max_tiles: usize,
    /// Voronoi seed cap; cell construction is quadratic in seed count.
    pub max_voronoi_seeds: usize,
}

impl Default for Budgets {
    fn default() -> Self {
        Budgets {
            max_dimension: 1000,
            max_sweep_span: 100,
            max_batch: 50,
            max_tiles: 1_000_000,
            max_voronoi_seeds: 5_000,
        }
    }
}

impl Budgets {
    pub fn check_dimension(&self, dimension: u32) -> GeometryResult<()> {
        if dimension > self.max_dimension {
            return Err(GeometryError::resource_limit(format!(
                "Dimension {} exceeds the budget of {}",
                dimension, self.max_dimension
            )));
        }
        Ok(())
    }

    pub fn check_sweep(&self, lo: u32, hi: u32) -> GeometryResult<()> {
        if hi < lo {
            return Err(GeometryError::domain(format!(
                "Dimension range [{}, {}] is empty",
                lo, hi
            )));
        }
        let span = hi - lo + 1;
        if span > self.max_sweep_span {
            return Err(GeometryError::resource_limit(format!(
                "Sweep span {} exceeds the budget of {}",
                span, self.max_sweep_span
            )));
        }
        self.check_dimension(hi)
    }

    pub fn check_batch(&self, items: usize) -> GeometryResult<()> {
        if items > self.max_batch {
            return Err(GeometryError::resource_limit(format!(
                "Batch of {} items exceeds the budget of {}",
                items, self.max_batch
            )));
        }
        Ok(())
    }

    pub fn check_tiles(&self, estimated: usize) -> GeometryResult<()> {
        if estimated > self.max_tiles {
            return Err(GeometryError::resource_limit(format!(
                "Estimated {} tiles exceeds the budget of {}",
                estimated, self.max_tiles
            )));
        }
        Ok(())
    }

    pub fn check_voronoi_seeds(&self, seeds: usize) -> GeometryResult<()> {
        if seeds > self.max_voronoi_seeds {
            return Err(GeometryError::resource_limit(format!(
                "{} Voronoi seeds exceeds the budget of {}",
                seeds, self.max_voronoi_seeds
            )));
        }
        Ok(())
    }
}
