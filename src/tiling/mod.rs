//! The tiling engine.
//!
//! All current patterns are 2-D; `dimension()` is an attribute on the
//! pattern protocol so higher-dimensional families can slot in later.
//! Generators produce bounded, clipped tile sets plus an adjacency
//! relation; the analyzer derives efficiency, coordination, and symmetry.

pub mod analyzer;
pub mod polygon;

mod hexagonal;
mod regular;
mod voronoi;

pub use analyzer::TilingAnalyzer;
pub use hexagonal::HexagonalTiling;
pub use regular::{RegularKind, RegularTiling};
pub use voronoi::VoronoiTiling;

use crate::errors::{GeometryError, GeometryResult};
use crate::limits::Budgets;
use crate::types::{Region, SymmetryProfile, TileRecord, TilingKind};
use polygon::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One generated tile: the clipped polygon plus the lattice/seed center
/// the generator placed it at.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Original lattice or seed point, used for adjacency wiring.
    pub center: Point2,
    /// Boundary polygon after clipping to the region.
    pub polygon: Vec<Point2>,
    /// Centroid of the clipped polygon; always inside the region.
    pub centroid: Point2,
    /// Clipped area.
    pub area: f64,
}

impl Tile {
    pub(crate) fn from_polygon(center: Point2, polygon: Vec<Point2>) -> Tile {
        let centroid = polygon::centroid(&polygon);
        let area = polygon::area(&polygon);
        Tile {
            center,
            polygon,
            centroid,
            area,
        }
    }

    pub fn record(&self) -> TileRecord {
        TileRecord {
            centroid: self.centroid,
            polygon: self.polygon.clone(),
        }
    }
}

/// Capability set every tiling pattern exposes.
pub trait TilingPattern: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> TilingKind;
    fn dimension(&self) -> u32 {
        2
    }
    fn region(&self) -> Region;
    fn tiles(&self) -> &[Tile];
    /// Symmetric edge-sharing (or contact, for circle packing) relation.
    fn adjacency(&self) -> &[Vec<usize>];
    /// Lattice constant for patterns that have one.
    fn theoretical_efficiency(&self) -> Option<f64>;
    fn symmetry(&self) -> SymmetryProfile;
}

/// Seed input for Voronoi patterns: explicit points or `(count, rng_seed)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SeedSpec {
    Points(Vec<[f64; 2]>),
    Random { count: usize, rng_seed: u64 },
}

/// Wire record for `tiling.generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TilingRequest {
    pub kind: TilingKind,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<SeedSpec>,
}

/// Build the pattern a request describes, enforcing budgets up front.
pub fn generate(
    request: &TilingRequest,
    budgets: &Budgets,
) -> GeometryResult<Box<dyn TilingPattern>> {
    // Re-validate; deserialized regions bypass the constructor
    let region = Region::new(request.region.width, request.region.height)?;

    match request.kind {
        TilingKind::Square | TilingKind::Triangular | TilingKind::CirclePack => {
            let unit = require_unit(request)?;
            budgets.check_tiles(estimate_tiles(request.kind, &region, unit))?;
            let kind = match request.kind {
                TilingKind::Square => RegularKind::Square,
                TilingKind::Triangular => RegularKind::Triangular,
                _ => RegularKind::CirclePack,
            };
            Ok(Box::new(RegularTiling::new(kind, region, unit)?))
        }
        TilingKind::Hexagonal => {
            let unit = require_unit(request)?;
            budgets.check_tiles(estimate_tiles(request.kind, &region, unit))?;
            Ok(Box::new(HexagonalTiling::new(region, unit)?))
        }
        TilingKind::Voronoi => match &request.seeds {
            None => Err(GeometryError::domain(
                "Voronoi tiling requires seed points or (count, rng_seed)",
            )),
            Some(SeedSpec::Points(points)) => {
                budgets.check_voronoi_seeds(points.len())?;
                Ok(Box::new(VoronoiTiling::from_seeds(region, points.clone())?))
            }
            Some(SeedSpec::Random { count, rng_seed }) => {
                budgets.check_voronoi_seeds(*count)?;
                Ok(Box::new(VoronoiTiling::random(region, *count, *rng_seed)?))
            }
        },
    }
}

fn require_unit(request: &TilingRequest) -> GeometryResult<f64> {
    let unit = request.unit.ok_or_else(|| {
        GeometryError::domain(format!(
            "{} tiling requires a unit length",
            request.kind
        ))
    })?;
    if !unit.is_finite() || unit <= 0.0 {
        return Err(GeometryError::domain("Unit length must be positive"));
    }
    Ok(unit)
}

/// Upper estimate of the number of generated tiles, for budget checks.
fn estimate_tiles(kind: TilingKind, region: &Region, unit: f64) -> usize {
    let w = region.width / unit + 3.0;
    let h = region.height / unit + 3.0;
    let estimate = match kind {
        TilingKind::Square => w * h,
        // Two triangles per lattice cell, rows are u·√3/2 tall
        TilingKind::Triangular => 2.0 * w * (region.height / (unit * 0.75) + 3.0),
        TilingKind::CirclePack => w * (region.height / (unit * 0.75) + 3.0),
        TilingKind::Hexagonal => {
            (region.width / (1.5 * unit) + 3.0) * (region.height / (unit * 1.5) + 3.0)
        }
        TilingKind::Voronoi => 0.0,
    };
    estimate.ceil() as usize
}

/// Wire adjacency between tiles whose generator centers sit at the
/// pattern's neighbor distance. Grid-bucketed so large tilings stay linear.
pub(crate) fn adjacency_by_distance(tiles: &[Tile], target: f64, tolerance: f64) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); tiles.len()];
    if tiles.is_empty() || target <= 0.0 {
        return adjacency;
    }
    let cell = target * 1.5;
    let key = |p: Point2| -> (i64, i64) {
        ((p[0] / cell).floor() as i64, (p[1] / cell).floor() as i64)
    };
    let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, tile) in tiles.iter().enumerate() {
        buckets.entry(key(tile.center)).or_default().push(i);
    }
    for (i, tile) in tiles.iter().enumerate() {
        let (kx, ky) = key(tile.center);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = buckets.get(&(kx + dx, ky + dy)) else {
                    continue;
                };
                for &j in candidates {
                    if j <= i {
                        continue;
                    }
                    let other = &tiles[j];
                    let d = ((tile.center[0] - other.center[0]).powi(2)
                        + (tile.center[1] - other.center[1]).powi(2))
                    .sqrt();
                    if (d - target).abs() <= tolerance {
                        adjacency[i].push(j);
                        adjacency[j].push(i);
                    }
                }
            }
        }
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_requires_unit() {
        let request = TilingRequest {
            kind: TilingKind::Square,
            region: Region::new(4.0, 4.0).unwrap(),
            unit: None,
            seeds: None,
        };
        assert!(generate(&request, &Budgets::default()).is_err());
    }

    #[test]
    fn test_generate_rejects_bad_unit() {
        let request = TilingRequest {
            kind: TilingKind::Hexagonal,
            region: Region::new(4.0, 4.0).unwrap(),
            unit: Some(0.0),
            seeds: None,
        };
        assert!(generate(&request, &Budgets::default()).is_err());
    }

    #[test]
    fn test_tile_budget_enforced() {
        let request = TilingRequest {
            kind: TilingKind::Square,
            region: Region::new(10_000.0, 10_000.0).unwrap(),
            unit: Some(0.001),
            seeds: None,
        };
        let err = generate(&request, &Budgets::default()).unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::ResourceLimit);
    }

    #[test]
    fn test_seed_spec_wire_forms() {
        let points: SeedSpec = serde_json::from_str("[[1.0, 2.0], [3.0, 4.0]]").unwrap();
        assert!(matches!(points, SeedSpec::Points(ref p) if p.len() == 2));
        let random: SeedSpec =
            serde_json::from_str(r#"{"count": 5, "rng_seed": 42}"#).unwrap();
        assert!(matches!(random, SeedSpec::Random { count: 5, rng_seed: 42 }));
    }
}
