//! Honeycomb tiling of flat-top hexagons.

use super::polygon::{clip_to_region, Point2};
use super::{adjacency_by_distance, Tile, TilingPattern};
use crate::errors::GeometryResult;
use crate::types::{Region, SymmetryProfile, TilingKind};

/// Flat-top hexagons of side u on a honeycomb lattice. Columns are 1.5u
/// apart; odd columns drop by half a hexagon height. Every hexagon is
/// clipped to the region so coverage is exact, and the dual lattice is the
/// triangular tiling.
#[derive(Debug)]
pub struct HexagonalTiling {
    region: Region,
    unit: f64,
    tiles: Vec<Tile>,
    adjacency: Vec<Vec<usize>>,
}

impl HexagonalTiling {
    pub fn new(region: Region, unit: f64) -> GeometryResult<Self> {
        let tiles = hexagon_tiles(&region, unit);
        // All six edge-sharing neighbors sit at distance √3·u
        let adjacency = adjacency_by_distance(&tiles, 3.0f64.sqrt() * unit, 1e-6 * unit);
        log::debug!(
            "generated hexagonal tiling: {} tiles over {}x{}",
            tiles.len(),
            region.width,
            region.height
        );
        Ok(HexagonalTiling {
            region,
            unit,
            tiles,
            adjacency,
        })
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }
}

impl TilingPattern for HexagonalTiling {
    fn kind(&self) -> TilingKind {
        TilingKind::Hexagonal
    }

    fn region(&self) -> Region {
        self.region
    }

    fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    fn theoretical_efficiency(&self) -> Option<f64> {
        None
    }

    fn symmetry(&self) -> SymmetryProfile {
        SymmetryProfile::Declared {
            rotational: 6,
            reflective: 6,
        }
    }
}

fn hexagon_vertices(center: Point2, side: f64) -> Vec<Point2> {
    (0..6)
        .map(|i| {
            let angle = std::f64::consts::PI / 3.0 * i as f64;
            [
                center[0] + side * angle.cos(),
                center[1] + side * angle.sin(),
            ]
        })
        .collect()
}

fn hexagon_tiles(region: &Region, unit: f64) -> Vec<Tile> {
    let col_spacing = 1.5 * unit;
    let row_spacing = 3.0f64.sqrt() * unit;
    let cols = (region.width / col_spacing).ceil() as i64 + 1;
    let rows = (region.height / row_spacing).ceil() as i64 + 1;
    let mut tiles = Vec::new();
    for col in -1..=cols {
        let cx = col as f64 * col_spacing;
        let y_shift = if col.rem_euclid(2) == 1 {
            row_spacing / 2.0
        } else {
            0.0
        };
        for row in -1..=rows {
            let cy = row as f64 * row_spacing + y_shift;
            // Skip hexagons whose bounding box misses the region
            if cx + unit <= 0.0
                || cx - unit >= region.width
                || cy + row_spacing / 2.0 <= 0.0
                || cy - row_spacing / 2.0 >= region.height
            {
                continue;
            }
            let clipped = clip_to_region(&hexagon_vertices([cx, cy], unit), region);
            if !clipped.is_empty() {
                tiles.push(Tile::from_polygon([cx, cy], clipped));
            }
        }
    }
    tiles
}
