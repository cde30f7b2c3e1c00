//! Derived tiling metrics.

use super::TilingPattern;
use crate::types::{ReportValue, SymmetryProfile, TilingReport};
use std::collections::BTreeMap;

/// Derives efficiency, coordination, symmetry, and population statistics
/// from a generated pattern.
pub struct TilingAnalyzer;

impl TilingAnalyzer {
    /// Sum of clipped tile areas over the region area.
    pub fn coverage_efficiency(pattern: &dyn TilingPattern) -> f64 {
        let covered: f64 = pattern.tiles().iter().map(|t| t.area).sum();
        covered / pattern.region().area()
    }

    /// Mode of the per-tile adjacency counts; ties break toward the
    /// smaller count.
    pub fn coordination_number(pattern: &dyn TilingPattern) -> u32 {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for neighbors in pattern.adjacency() {
            *counts.entry(neighbors.len()).or_insert(0) += 1;
        }
        let mut best = (0usize, 0usize);
        for (&degree, &occurrences) in &counts {
            if occurrences > best.1 {
                best = (degree, occurrences);
            }
        }
        best.0 as u32
    }

    pub fn symmetry_profile(pattern: &dyn TilingPattern) -> SymmetryProfile {
        pattern.symmetry()
    }

    /// Full report for a generated pattern.
    pub fn analyze(pattern: &dyn TilingPattern, handle: &str) -> TilingReport {
        let tiles = pattern.tiles();
        let covered: f64 = tiles.iter().map(|t| t.area).sum();
        let mut min_area = f64::INFINITY;
        let mut max_area: f64 = 0.0;
        for tile in tiles {
            min_area = min_area.min(tile.area);
            max_area = max_area.max(tile.area);
        }
        if tiles.is_empty() {
            min_area = 0.0;
        }

        let mut properties = BTreeMap::new();
        properties.insert(
            "tile_count".to_string(),
            ReportValue::new(tiles.len() as f64),
        );
        properties.insert("covered_area".to_string(), ReportValue::new(covered));
        properties.insert(
            "region_area".to_string(),
            ReportValue::new(pattern.region().area()),
        );
        properties.insert(
            "mean_tile_area".to_string(),
            if tiles.is_empty() {
                ReportValue::undefined()
            } else {
                ReportValue::new(covered / tiles.len() as f64)
            },
        );
        properties.insert("min_tile_area".to_string(), ReportValue::new(min_area));
        properties.insert("max_tile_area".to_string(), ReportValue::new(max_area));

        TilingReport {
            kind: pattern.kind(),
            handle: handle.to_string(),
            region: pattern.region(),
            tiles: tiles.iter().map(|t| t.record()).collect(),
            efficiency: Self::coverage_efficiency(pattern),
            theoretical_efficiency: pattern.theoretical_efficiency(),
            coordination_number: Self::coordination_number(pattern),
            symmetry: pattern.symmetry(),
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::{HexagonalTiling, RegularKind, RegularTiling, VoronoiTiling};
    use crate::types::Region;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_report() {
        let region = Region::new(4.0, 4.0).unwrap();
        let tiling = RegularTiling::new(RegularKind::Square, region, 1.0).unwrap();
        let report = TilingAnalyzer::analyze(&tiling, "tiling_test");
        assert_relative_eq!(report.efficiency, 1.0, max_relative = 1e-9);
        assert_eq!(report.tiles.len(), 16);
        assert_eq!(report.properties["tile_count"].finite(), Some(16.0));
        assert_eq!(report.handle, "tiling_test");
    }

    #[test]
    fn test_voronoi_symmetry_is_none() {
        let region = Region::new(5.0, 5.0).unwrap();
        let tiling = VoronoiTiling::random(region, 6, 11).unwrap();
        let report = TilingAnalyzer::analyze(&tiling, "h");
        assert_eq!(report.symmetry, SymmetryProfile::None);
        assert!(report.theoretical_efficiency.is_none());
    }

    #[test]
    fn test_hexagonal_statistics() {
        let region = Region::new(9.0, 9.0).unwrap();
        let tiling = HexagonalTiling::new(region, 1.0).unwrap();
        let report = TilingAnalyzer::analyze(&tiling, "h");
        let full = 1.5 * 3.0f64.sqrt();
        // Interior hexagons carry the full lattice cell area
        assert_relative_eq!(
            report.properties["max_tile_area"].finite().unwrap(),
            full,
            max_relative = 1e-9
        );
        assert!(report.properties["min_tile_area"].finite().unwrap() <= full);
    }
}
