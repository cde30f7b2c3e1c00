//! Core record types shared across the kernel.
//!
//! These are the wire-facing data structures: shape kinds, report records,
//! and the finite-or-`"undefined"` numeric wrapper used everywhere a value
//! crosses the serialization boundary. All maps are ordered so repeated
//! execution of a read-only operation yields byte-identical reports.

use crate::errors::{GeometryError, GeometryResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of shape kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Sphere,
    Cube,
    Ellipsoid,
    Simplex,
    Pyramid,
}

impl ShapeKind {
    /// Parse a kind name, accepting the common aliases of each family.
    pub fn parse(name: &str) -> GeometryResult<ShapeKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sphere" | "hypersphere" | "ball" => Ok(ShapeKind::Sphere),
            "cube" | "hypercube" | "tesseract" => Ok(ShapeKind::Cube),
            "ellipsoid" | "hyperellipsoid" => Ok(ShapeKind::Ellipsoid),
            "simplex" | "triangle" | "tetrahedron" => Ok(ShapeKind::Simplex),
            "pyramid" | "hyperpyramid" => Ok(ShapeKind::Pyramid),
            other => Err(GeometryError::domain(format!(
                "Unknown shape kind: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cube => "cube",
            ShapeKind::Ellipsoid => "ellipsoid",
            ShapeKind::Simplex => "simplex",
            ShapeKind::Pyramid => "pyramid",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property selector for property queries and scaling sweeps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Volume,
    Surface,
    Both,
}

impl PropertyKind {
    pub fn parse(name: &str) -> GeometryResult<PropertyKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "volume" => Ok(PropertyKind::Volume),
            "surface" | "area" => Ok(PropertyKind::Surface),
            "both" => Ok(PropertyKind::Both),
            other => Err(GeometryError::domain(format!(
                "Unknown property: {}",
                other
            ))),
        }
    }
}

/// A numeric report value that serializes non-finite results as the
/// sentinel string `"undefined"`. Reports never emit NaN or infinities.
#[derive(Debug, Clone, Copy)]
pub struct ReportValue(f64);

impl ReportValue {
    pub fn new(value: f64) -> Self {
        ReportValue(value)
    }

    /// The sentinel value, for divisions by zero and degenerate formulas.
    pub fn undefined() -> Self {
        ReportValue(f64::NAN)
    }

    /// The inner value when finite, `None` when the report would say
    /// `"undefined"`.
    pub fn finite(&self) -> Option<f64> {
        if self.0.is_finite() {
            Some(self.0)
        } else {
            None
        }
    }

    pub fn is_undefined(&self) -> bool {
        !self.0.is_finite()
    }
}

impl From<f64> for ReportValue {
    fn from(value: f64) -> Self {
        ReportValue(value)
    }
}

impl PartialEq for ReportValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.finite(), other.finite()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl Serialize for ReportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.finite() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_str("undefined"),
        }
    }
}

impl<'de> Deserialize<'de> for ReportValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(ReportValue(v)),
            Raw::Text(s) if s == "undefined" => Ok(ReportValue(f64::NAN)),
            Raw::Text(s) => Err(D::Error::custom(format!(
                "expected a number or \"undefined\", got {:?}",
                s
            ))),
        }
    }
}

/// Full description of one shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShapeReport {
    pub kind: ShapeKind,
    pub dimension: u32,
    pub parameters: Vec<f64>,
    pub volume: ReportValue,
    pub surface: ReportValue,
    /// Derived invariants (counts, radii, diagonals, ...), ordered by name.
    pub derived: BTreeMap<String, ReportValue>,
    pub volume_formula: String,
    pub surface_formula: String,
    /// Set when no exact closed form exists for one of the measures.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub approximate: bool,
}

/// Pairwise volume/surface ratios for a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatioPair {
    pub volume: ReportValue,
    pub surface: ReportValue,
}

/// Which shape wins each measure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LargestBy {
    pub volume: ShapeKind,
    pub surface: ShapeKind,
}

/// Result of comparing two shapes at the same dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    pub shapes: Vec<ShapeReport>,
    /// Keyed `"<kind_a>/<kind_b>"`; divisions by zero are `"undefined"`.
    pub ratios: BTreeMap<String, RatioPair>,
    pub largest_by: LargestBy,
}

/// Result of sweeping one property across a dimension range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalingReport {
    pub kind: ShapeKind,
    pub property: PropertyKind,
    pub dims: Vec<u32>,
    pub values: Vec<ReportValue>,
    /// Argmax within the range; ties break toward the smaller dimension.
    pub peak_dim: u32,
}

/// Axis-aligned bounding region for tilings, anchored at the origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(width: f64, height: f64) -> GeometryResult<Region> {
        if !width.is_finite() || !height.is_finite() {
            return Err(GeometryError::domain(
                "Region dimensions must be finite numbers",
            ));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::domain(
                "Region dimensions must be positive",
            ));
        }
        Ok(Region { width, height })
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, point: [f64; 2]) -> bool {
        point[0] >= 0.0 && point[0] <= self.width && point[1] >= 0.0 && point[1] <= self.height
    }
}

/// The closed set of tiling pattern kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TilingKind {
    Square,
    Triangular,
    #[serde(rename = "circle-pack")]
    CirclePack,
    Hexagonal,
    Voronoi,
}

impl TilingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TilingKind::Square => "square",
            TilingKind::Triangular => "triangular",
            TilingKind::CirclePack => "circle-pack",
            TilingKind::Hexagonal => "hexagonal",
            TilingKind::Voronoi => "voronoi",
        }
    }
}

impl fmt::Display for TilingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One clipped tile: its centroid and closed polygon boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileRecord {
    pub centroid: [f64; 2],
    pub polygon: Vec<[f64; 2]>,
}

/// Declared symmetry of a pattern; Voronoi diagrams have none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryProfile {
    None,
    Declared { rotational: u32, reflective: u32 },
}

/// Full description of one generated tiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TilingReport {
    pub kind: TilingKind,
    /// Content-addressed handle; identical requests share a handle.
    pub handle: String,
    pub region: Region,
    pub tiles: Vec<TileRecord>,
    /// Realized coverage: clipped tile area over region area.
    pub efficiency: f64,
    /// Lattice constant for patterns that have one (circle packing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theoretical_efficiency: Option<f64>,
    pub coordination_number: u32,
    pub symmetry: SymmetryProfile,
    /// Population statistics (tile_count, covered_area, area spread, ...).
    pub properties: BTreeMap<String, ReportValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_kind_aliases() {
        assert_eq!(ShapeKind::parse("tesseract").unwrap(), ShapeKind::Cube);
        assert_eq!(ShapeKind::parse("Hypersphere").unwrap(), ShapeKind::Sphere);
        assert_eq!(ShapeKind::parse("tetrahedron").unwrap(), ShapeKind::Simplex);
        assert!(ShapeKind::parse("dodecahedron").is_err());
    }

    #[test]
    fn test_report_value_sentinel() {
        let finite = ReportValue::new(2.5);
        let undef = ReportValue::new(f64::INFINITY);
        assert_eq!(serde_json::to_string(&finite).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&undef).unwrap(), "\"undefined\"");
    }

    #[test]
    fn test_report_value_roundtrip() {
        let undef: ReportValue = serde_json::from_str("\"undefined\"").unwrap();
        assert!(undef.is_undefined());
        let num: ReportValue = serde_json::from_str("4.0").unwrap();
        assert_eq!(num.finite(), Some(4.0));
    }

    #[test]
    fn test_region_validation() {
        assert!(Region::new(10.0, 10.0).is_ok());
        assert!(Region::new(0.0, 10.0).is_err());
        assert!(Region::new(10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_tiling_kind_wire_names() {
        let json = serde_json::to_string(&TilingKind::CirclePack).unwrap();
        assert_eq!(json, "\"circle-pack\"");
        let back: TilingKind = serde_json::from_str("\"circle-pack\"").unwrap();
        assert_eq!(back, TilingKind::CirclePack);
    }

    #[test]
    fn test_symmetry_profile_none_is_string() {
        let json = serde_json::to_string(&SymmetryProfile::None).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
