//! Voronoi tiling clipped to a bounded region.

use super::polygon::{shared_vertex_count, Point2};
use super::{polygon, Tile, TilingPattern};
use crate::errors::{GeometryError, GeometryResult};
use crate::types::{Region, SymmetryProfile, TilingKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Voronoi diagram of a seed set, clipped to the region.
///
/// Each cell is convex (an intersection of half-planes with the region
/// rectangle); cells partition the region, so coverage is exact.
/// Construction is deterministic for a fixed seed list or `(count,
/// rng_seed)` pair.
#[derive(Debug)]
pub struct VoronoiTiling {
    region: Region,
    seeds: Vec<Point2>,
    tiles: Vec<Tile>,
    adjacency: Vec<Vec<usize>>,
}

impl VoronoiTiling {
    pub fn from_seeds(region: Region, seeds: Vec<[f64; 2]>) -> GeometryResult<Self> {
        if seeds.is_empty() {
            return Err(GeometryError::domain(
                "Voronoi tiling requires at least one seed",
            ));
        }
        for seed in &seeds {
            if !seed[0].is_finite() || !seed[1].is_finite() {
                return Err(GeometryError::domain(
                    "Voronoi seeds must have finite coordinates",
                ));
            }
        }
        for i in 0..seeds.len() {
            for j in (i + 1)..seeds.len() {
                if seeds[i] == seeds[j] {
                    return Err(GeometryError::domain(format!(
                        "Duplicate Voronoi seed at ({}, {})",
                        seeds[i][0], seeds[i][1]
                    )));
                }
            }
        }
        let tiles = voronoi_cells(&region, &seeds);
        let adjacency = edge_sharing_adjacency(&tiles, &region);
        log::debug!(
            "generated voronoi tiling: {} cells from {} seeds",
            tiles.len(),
            seeds.len()
        );
        Ok(VoronoiTiling {
            region,
            seeds,
            tiles,
            adjacency,
        })
    }

    /// Deterministic seed placement from `(count, rng_seed)`.
    pub fn random(region: Region, count: usize, rng_seed: u64) -> GeometryResult<Self> {
        if count == 0 {
            return Err(GeometryError::domain(
                "Voronoi tiling requires at least one seed",
            ));
        }
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let seeds: Vec<[f64; 2]> = (0..count)
            .map(|_| {
                [
                    rng.gen_range(0.0..region.width),
                    rng.gen_range(0.0..region.height),
                ]
            })
            .collect();
        VoronoiTiling::from_seeds(region, seeds)
    }

    pub fn seeds(&self) -> &[Point2] {
        &self.seeds
    }
}

impl TilingPattern for VoronoiTiling {
    fn kind(&self) -> TilingKind {
        TilingKind::Voronoi
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
        SymmetryProfile::None
    }
}

/// Cell of each seed: the region rectangle cut by the bisector half-plane
/// against every other seed.
fn voronoi_cells(region: &Region, seeds: &[Point2]) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(seeds.len());
    for (i, seed) in seeds.iter().enumerate() {
        let mut cell = vec![
            [0.0, 0.0],
            [region.width, 0.0],
            [region.width, region.height],
            [0.0, region.height],
        ];
        for (j, other) in seeds.iter().enumerate() {
            if i == j || cell.is_empty() {
                continue;
            }
            // Keep the side closer to `seed`: 2(o-s)·p <= |o|² - |s|²
            let a = 2.0 * (other[0] - seed[0]);
            let b = 2.0 * (other[1] - seed[1]);
            let c = other[0] * other[0] + other[1] * other[1]
                - seed[0] * seed[0]
                - seed[1] * seed[1];
            cell = polygon::clip_halfplane(&cell, a, b, c);
        }
        if !cell.is_empty() {
            tiles.push(Tile::from_polygon(*seed, cell));
        }
    }
    tiles
}

/// Two cells are adjacent when they share an edge, detected as two
/// matching boundary vertices.
fn edge_sharing_adjacency(tiles: &[Tile], region: &Region) -> Vec<Vec<usize>> {
    let tolerance = 1e-9 * (region.width + region.height);
    let mut adjacency = vec![Vec::new(); tiles.len()];
    for i in 0..tiles.len() {
        for j in (i + 1)..tiles.len() {
            if shared_vertex_count(&tiles[i].polygon, &tiles[j].polygon, tolerance) >= 2 {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cells_partition_region() {
        let region = Region::new(10.0, 10.0).unwrap();
        let tiling = VoronoiTiling::random(region, 20, 7).unwrap();
        let covered: f64 = tiling.tiles().iter().map(|t| t.area).sum();
        assert_relative_eq!(covered, region.area(), max_relative = 1e-9);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let region = Region::new(10.0, 10.0).unwrap();
        let a = VoronoiTiling::random(region, 12, 42).unwrap();
        let b = VoronoiTiling::random(region, 12, 42).unwrap();
        assert_eq!(a.seeds(), b.seeds());
        assert_eq!(a.tiles().len(), b.tiles().len());
        for (ta, tb) in a.tiles().iter().zip(b.tiles()) {
            assert_eq!(ta.polygon, tb.polygon);
        }
    }

    #[test]
    fn test_single_seed_owns_region() {
        let region = Region::new(4.0, 2.0).unwrap();
        let tiling =
            VoronoiTiling::from_seeds(region, vec![[1.0, 1.0]]).unwrap();
        assert_eq!(tiling.tiles().len(), 1);
        assert_relative_eq!(tiling.tiles()[0].area, 8.0, max_relative = 1e-12);
    }

    #[test]
    fn test_two_seeds_split_by_bisector() {
        let region = Region::new(4.0, 2.0).unwrap();
        let tiling =
            VoronoiTiling::from_seeds(region, vec![[1.0, 1.0], [3.0, 1.0]]).unwrap();
        assert_eq!(tiling.tiles().len(), 2);
        assert_relative_eq!(tiling.tiles()[0].area, 4.0, max_relative = 1e-9);
        assert_relative_eq!(tiling.tiles()[1].area, 4.0, max_relative = 1e-9);
        // The two halves share the bisector edge
        assert_eq!(tiling.adjacency()[0], vec![1]);
        assert_eq!(tiling.adjacency()[1], vec![0]);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let region = Region::new(10.0, 10.0).unwrap();
        let tiling = VoronoiTiling::random(region, 15, 3).unwrap();
        for (i, neighbors) in tiling.adjacency().iter().enumerate() {
            for &j in neighbors {
                assert!(tiling.adjacency()[j].contains(&i));
            }
        }
    }

    #[test]
    fn test_validation() {
        let region = Region::new(4.0, 4.0).unwrap();
        assert!(VoronoiTiling::from_seeds(region, vec![]).is_err());
        assert!(VoronoiTiling::random(region, 0, 1).is_err());
        assert!(
            VoronoiTiling::from_seeds(region, vec![[1.0, 1.0], [1.0, 1.0]]).is_err()
        );
        assert!(VoronoiTiling::from_seeds(region, vec![[f64::NAN, 1.0]]).is_err());
    }
}
