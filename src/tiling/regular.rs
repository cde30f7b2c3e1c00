//! Regular tilings: square grid, triangular strip, and hexagonal circle
//! packing.

use super::polygon::{circle_polygon, clip_to_region, Point2};
use super::{adjacency_by_distance, Tile, TilingPattern};
use crate::errors::GeometryResult;
use crate::types::{Region, SymmetryProfile, TilingKind};
use std::f64::consts::PI;

/// Circle-packing lattice density: π/(2√3).
pub const CIRCLE_PACK_DENSITY: f64 = PI / (2.0 * 1.732_050_807_568_877_2);

const CIRCLE_SEGMENTS: usize = 64;

/// The three regular pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegularKind {
    Square,
    Triangular,
    CirclePack,
}

/// A regular tiling over a bounded region; boundary tiles are clipped.
#[derive(Debug)]
pub struct RegularTiling {
    kind: RegularKind,
    region: Region,
    unit: f64,
    tiles: Vec<Tile>,
    adjacency: Vec<Vec<usize>>,
}

impl RegularTiling {
    pub fn new(kind: RegularKind, region: Region, unit: f64) -> GeometryResult<Self> {
        let tiles = match kind {
            RegularKind::Square => square_tiles(&region, unit),
            RegularKind::Triangular => triangular_tiles(&region, unit),
            RegularKind::CirclePack => circle_pack_tiles(&region, unit),
        };
        // Edge-sharing neighbors sit at a fixed lattice distance per kind;
        // circle packing uses the contact distance instead
        let target = match kind {
            RegularKind::Square => unit,
            RegularKind::Triangular => unit / 3.0f64.sqrt(),
            RegularKind::CirclePack => unit,
        };
        let adjacency = adjacency_by_distance(&tiles, target, 1e-6 * unit);
        log::debug!(
            "generated {:?} tiling: {} tiles over {}x{}",
            kind,
            tiles.len(),
            region.width,
            region.height
        );
        Ok(RegularTiling {
            kind,
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

impl TilingPattern for RegularTiling {
    fn kind(&self) -> TilingKind {
        match self.kind {
            RegularKind::Square => TilingKind::Square,
            RegularKind::Triangular => TilingKind::Triangular,
            RegularKind::CirclePack => TilingKind::CirclePack,
        }
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
        match self.kind {
            RegularKind::CirclePack => Some(CIRCLE_PACK_DENSITY),
            _ => None,
        }
    }

    fn symmetry(&self) -> SymmetryProfile {
        match self.kind {
            RegularKind::Square => SymmetryProfile::Declared {
                rotational: 4,
                reflective: 4,
            },
            RegularKind::Triangular => SymmetryProfile::Declared {
                rotational: 3,
                reflective: 3,
            },
            RegularKind::CirclePack => SymmetryProfile::Declared {
                rotational: 6,
                reflective: 6,
            },
        }
    }
}

fn push_clipped(tiles: &mut Vec<Tile>, region: &Region, center: Point2, polygon: Vec<Point2>) {
    let clipped = clip_to_region(&polygon, region);
    if !clipped.is_empty() {
        tiles.push(Tile::from_polygon(center, clipped));
    }
}

/// Axis-aligned u×u squares anchored at the region origin.
fn square_tiles(region: &Region, unit: f64) -> Vec<Tile> {
    let cols = (region.width / unit).ceil() as i64;
    let rows = (region.height / unit).ceil() as i64;
    let mut tiles = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let x0 = col as f64 * unit;
            let y0 = row as f64 * unit;
            push_clipped(
                &mut tiles,
                region,
                [x0 + unit / 2.0, y0 + unit / 2.0],
                vec![
                    [x0, y0],
                    [x0 + unit, y0],
                    [x0 + unit, y0 + unit],
                    [x0, y0 + unit],
                ],
            );
        }
    }
    tiles
}

/// Equilateral triangles of side u, alternating orientation; odd rows are
/// shifted by u/2 so edges match across rows.
fn triangular_tiles(region: &Region, unit: f64) -> Vec<Tile> {
    let row_height = unit * 3.0f64.sqrt() / 2.0;
    let rows = (region.height / row_height).ceil() as i64;
    let cols = (region.width / unit).ceil() as i64;
    let mut tiles = Vec::new();
    for row in 0..rows {
        let y0 = row as f64 * row_height;
        let y1 = y0 + row_height;
        let shift = if row % 2 == 1 { unit / 2.0 } else { 0.0 };
        for col in -1..=cols {
            let x = col as f64 * unit + shift;
            // Upward triangle
            let up = vec![[x, y0], [x + unit, y0], [x + unit / 2.0, y1]];
            push_clipped(
                &mut tiles,
                region,
                super::polygon::centroid(&up),
                up.clone(),
            );
            // Downward triangle filling the gap to the right
            let down = vec![
                [x + unit, y0],
                [x + 1.5 * unit, y1],
                [x + unit / 2.0, y1],
            ];
            push_clipped(
                &mut tiles,
                region,
                super::polygon::centroid(&down),
                down.clone(),
            );
        }
    }
    tiles
}

/// Circles of radius u/2 on a hexagonal lattice, realized as 64-gons and
/// clipped at the boundary.
fn circle_pack_tiles(region: &Region, unit: f64) -> Vec<Tile> {
    let radius = unit / 2.0;
    let row_height = unit * 3.0f64.sqrt() / 2.0;
    let rows = (region.height / row_height).ceil() as i64 + 1;
    let cols = (region.width / unit).ceil() as i64 + 1;
    let mut tiles = Vec::new();
    for row in -1..=rows {
        let cy = radius + row as f64 * row_height;
        let shift = if row.rem_euclid(2) == 1 { radius } else { 0.0 };
        for col in -2..=cols {
            let cx = radius + col as f64 * unit + shift;
            if cx + radius <= 0.0
                || cx - radius >= region.width
                || cy + radius <= 0.0
                || cy - radius >= region.height
            {
                continue;
            }
            push_clipped(
                &mut tiles,
                region,
                [cx, cy],
                circle_polygon([cx, cy], radius, CIRCLE_SEGMENTS),
            );
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::analyzer::TilingAnalyzer;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_grid_covers_exactly() {
        let region = Region::new(4.0, 3.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::Square, region, 1.0).unwrap();
        assert_eq!(tiling.tiles().len(), 12);
        let covered: f64 = tiling.tiles().iter().map(|t| t.area).sum();
        assert_relative_eq!(covered, 12.0, max_relative = 1e-9);
    }

    #[test]
    fn test_square_clipping_keeps_efficiency_one() {
        let region = Region::new(4.5, 3.5).unwrap();
        let tiling = RegularTiling::new(RegularKind::Square, region, 1.0).unwrap();
        let covered: f64 = tiling.tiles().iter().map(|t| t.area).sum();
        assert_relative_eq!(covered, region.area(), max_relative = 1e-9);
    }

    #[test]
    fn test_square_coordination_is_four() {
        let region = Region::new(8.0, 8.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::Square, region, 1.0).unwrap();
        assert_eq!(TilingAnalyzer::coordination_number(&tiling), 4);
    }

    #[test]
    fn test_triangular_covers_exactly() {
        let region = Region::new(5.0, 5.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::Triangular, region, 1.0).unwrap();
        let covered: f64 = tiling.tiles().iter().map(|t| t.area).sum();
        assert_relative_eq!(covered, region.area(), max_relative = 1e-9);
    }

    #[test]
    fn test_triangular_coordination_is_three() {
        let region = Region::new(8.0, 8.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::Triangular, region, 1.0).unwrap();
        assert_eq!(TilingAnalyzer::coordination_number(&tiling), 3);
    }

    #[test]
    fn test_circle_pack_density() {
        let region = Region::new(20.0, 20.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::CirclePack, region, 1.0).unwrap();
        let covered: f64 = tiling.tiles().iter().map(|t| t.area).sum();
        let realized = covered / region.area();
        // Realized coverage within 5% of the lattice density
        assert!((realized - CIRCLE_PACK_DENSITY).abs() / CIRCLE_PACK_DENSITY < 0.05);
        assert_eq!(
            tiling.theoretical_efficiency(),
            Some(CIRCLE_PACK_DENSITY)
        );
    }

    #[test]
    fn test_circle_pack_coordination_is_six() {
        let region = Region::new(12.0, 12.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::CirclePack, region, 1.0).unwrap();
        assert_eq!(TilingAnalyzer::coordination_number(&tiling), 6);
    }

    #[test]
    fn test_centroids_inside_region() {
        let region = Region::new(5.5, 4.5).unwrap();
        for kind in [
            RegularKind::Square,
            RegularKind::Triangular,
            RegularKind::CirclePack,
        ] {
            let tiling = RegularTiling::new(kind, region, 1.0).unwrap();
            for tile in tiling.tiles() {
                assert!(
                    region.contains(tile.centroid),
                    "{:?} centroid {:?} outside region",
                    kind,
                    tile.centroid
                );
            }
        }
    }
}
