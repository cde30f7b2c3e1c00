//! The regular N-simplex.

use super::{check_dimension, check_length, NShape};
use crate::errors::{GeometryError, GeometryResult};
use crate::math;
use crate::types::ShapeKind;
use std::collections::BTreeMap;

/// Regular N-simplex of edge `a`, the convex hull of N+1 equidistant
/// vertices: `volume = a^N·√(N+1)/(N!·2^(N/2))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    dimension: u32,
    edge: f64,
}

/// Volume of a regular n-simplex with the given edge length.
fn simplex_volume(n: u32, edge: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }
    if edge == 0.0 {
        return 0.0;
    }
    if let Ok(fact) = math::factorial(n as u64) {
        let direct = edge.powi(n as i32) * ((n as f64) + 1.0).sqrt()
            / (fact as f64 * 2.0f64.powf(n as f64 / 2.0));
        if direct.is_finite() && direct != 0.0 {
            return direct;
        }
    }
    (n as f64 * edge.ln() + 0.5 * ((n as f64) + 1.0).ln()
        - math::ln_factorial(n as u64)
        - n as f64 / 2.0 * 2.0f64.ln())
    .exp()
}

impl Simplex {
    pub fn new(dimension: u32, edge: f64) -> GeometryResult<Self> {
        check_dimension(dimension, 1)?;
        check_length("edge", edge)?;
        Ok(Simplex { dimension, edge })
    }

    pub fn edge(&self) -> f64 {
        self.edge
    }

    pub fn circumradius(&self) -> f64 {
        let n = self.dimension as f64;
        self.edge * (n / (2.0 * (n + 1.0))).sqrt()
    }

    pub fn inradius(&self) -> f64 {
        let n = self.dimension as f64;
        self.edge / (2.0 * n * (n + 1.0)).sqrt()
    }
}

impl NShape for Simplex {
    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.edge]
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Simplex
    }

    fn volume(&self) -> f64 {
        simplex_volume(self.dimension, self.edge)
    }

    fn surface(&self) -> f64 {
        let n = self.dimension;
        if n == 1 {
            // Two endpoints of the segment
            return 2.0;
        }
        (n as f64 + 1.0) * simplex_volume(n - 1, self.edge)
    }

    fn volume_formula(&self) -> String {
        let n = self.dimension;
        format!(
            "V_{} = a^{} × √{}/({}! × 2^({}/2))",
            n,
            n,
            n + 1,
            n,
            n
        )
    }

    fn surface_formula(&self) -> String {
        let n = self.dimension;
        if n == 1 {
            "S_1 = 2".to_string()
        } else {
            format!(
                "S_{} = {} × a^{} × √{}/({}! × 2^({}/2))",
                n,
                n + 1,
                n - 1,
                n,
                n - 1,
                n - 1
            )
        }
    }

    fn derived(&self) -> BTreeMap<String, f64> {
        let mut derived = BTreeMap::new();
        derived.insert("vertex_count".to_string(), self.dimension as f64 + 1.0);
        derived.insert("circumradius".to_string(), self.circumradius());
        derived.insert("inradius".to_string(), self.inradius());
        derived
    }

    fn contains(&self, _point: &[f64]) -> GeometryResult<bool> {
        Err(GeometryError::domain(
            "Containment test is not supported for simplex",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment() {
        let s = Simplex::new(1, 3.0).unwrap();
        assert_relative_eq!(s.volume(), 3.0, max_relative = 1e-12);
        assert_eq!(s.surface(), 2.0);
    }

    #[test]
    fn test_equilateral_triangle() {
        let a = 2.0;
        let s = Simplex::new(2, a).unwrap();
        assert_relative_eq!(
            s.volume(),
            3.0f64.sqrt() / 4.0 * a * a,
            max_relative = 1e-12
        );
        // Perimeter of three edges
        assert_relative_eq!(s.surface(), 3.0 * a, max_relative = 1e-12);
    }

    #[test]
    fn test_regular_tetrahedron() {
        let a = 1.5;
        let s = Simplex::new(3, a).unwrap();
        assert_relative_eq!(
            s.volume(),
            a.powi(3) / (6.0 * 2.0f64.sqrt()),
            max_relative = 1e-12
        );
        // Four equilateral faces
        assert_relative_eq!(
            s.surface(),
            4.0 * 3.0f64.sqrt() / 4.0 * a * a,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_radii() {
        let s = Simplex::new(3, 1.0).unwrap();
        assert_relative_eq!(s.circumradius(), (3.0f64 / 8.0).sqrt(), max_relative = 1e-12);
        assert_relative_eq!(s.inradius(), 1.0 / 24.0f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_edge() {
        let s = Simplex::new(4, 0.0).unwrap();
        assert_eq!(s.volume(), 0.0);
        assert_eq!(s.surface(), 0.0);
    }

    #[test]
    fn test_contains_unsupported() {
        let s = Simplex::new(3, 1.0).unwrap();
        assert!(s.contains(&[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_high_dimension_underflows_to_zero_not_nan() {
        let s = Simplex::new(400, 1.0).unwrap();
        let v = s.volume();
        assert!(v >= 0.0);
        assert!(!v.is_nan());
    }
}
