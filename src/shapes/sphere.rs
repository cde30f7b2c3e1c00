//! The N-dimensional sphere (ball).

use super::{check_dimension, check_length, check_point, scaled_power, NShape};
use crate::errors::GeometryResult;
use crate::math::{ln_unit_ball_volume, unit_ball_volume};
use crate::types::ShapeKind;
use std::collections::BTreeMap;

/// An N-sphere of radius `r`: `volume = V(N)·r^N`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperSphere {
    dimension: u32,
    radius: f64,
}

impl HyperSphere {
    pub fn new(dimension: u32, radius: f64) -> GeometryResult<Self> {
        check_dimension(dimension, 1)?;
        check_length("radius", radius)?;
        Ok(HyperSphere { dimension, radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// (N-1)-volume of the slice at signed offset `t` along any axis.
    ///
    /// Zero outside the ball; for N=1 the slice is a point with measure 1.
    pub fn cross_section(&self, offset: f64) -> f64 {
        if !offset.is_finite() || offset.abs() >= self.radius {
            return 0.0;
        }
        if self.dimension == 1 {
            return 1.0;
        }
        let n = self.dimension - 1;
        let slice_radius = (self.radius * self.radius - offset * offset).sqrt();
        scaled_power(
            unit_ball_volume(n),
            ln_unit_ball_volume(n),
            slice_radius,
            n,
        )
    }

    /// Orthogonal projection to dimension N-1: a sphere of the same radius.
    pub fn project(&self) -> GeometryResult<HyperSphere> {
        check_dimension(self.dimension, 2)?;
        HyperSphere::new(self.dimension - 1, self.radius)
    }
}

impl NShape for HyperSphere {
    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.radius]
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    fn volume(&self) -> f64 {
        let n = self.dimension;
        scaled_power(unit_ball_volume(n), ln_unit_ball_volume(n), self.radius, n)
    }

    fn surface(&self) -> f64 {
        let n = self.dimension;
        if n == 1 {
            // Two endpoints of the interval
            return 2.0;
        }
        scaled_power(
            n as f64 * unit_ball_volume(n),
            (n as f64).ln() + ln_unit_ball_volume(n),
            self.radius,
            n - 1,
        )
    }

    fn volume_formula(&self) -> String {
        match self.dimension {
            1 => "V_1 = 2r".to_string(),
            2 => "V_2 = πr²".to_string(),
            3 => "V_3 = (4/3)πr³".to_string(),
            4 => "V_4 = (π²/2)r⁴".to_string(),
            n => format!("V_{} = π^({}/2)/Γ({}/2 + 1) × r^{}", n, n, n, n),
        }
    }

    fn surface_formula(&self) -> String {
        match self.dimension {
            1 => "S_1 = 2".to_string(),
            2 => "S_2 = 2πr".to_string(),
            3 => "S_3 = 4πr²".to_string(),
            4 => "S_4 = 2π²r³".to_string(),
            n => format!("S_{} = {} × π^({}/2)/Γ({}/2 + 1) × r^{}", n, n, n, n, n - 1),
        }
    }

    fn derived(&self) -> BTreeMap<String, f64> {
        let mut derived = BTreeMap::new();
        derived.insert("diameter".to_string(), 2.0 * self.radius);
        derived
    }

    fn contains(&self, point: &[f64]) -> GeometryResult<bool> {
        check_point(self.dimension, point)?;
        let dist_sq: f64 = point.iter().map(|c| c * c).sum();
        Ok(dist_sq <= self.radius * self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_low_dimension_identities() {
        let r = 1.5;
        assert_relative_eq!(
            HyperSphere::new(1, r).unwrap().volume(),
            2.0 * r,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            HyperSphere::new(2, r).unwrap().volume(),
            PI * r * r,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            HyperSphere::new(3, r).unwrap().volume(),
            4.0 * PI * r.powi(3) / 3.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            HyperSphere::new(4, r).unwrap().volume(),
            PI * PI * r.powi(4) / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_surface_identities() {
        let r = 2.0;
        assert_eq!(HyperSphere::new(1, r).unwrap().surface(), 2.0);
        assert_relative_eq!(
            HyperSphere::new(2, r).unwrap().surface(),
            2.0 * PI * r,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            HyperSphere::new(3, r).unwrap().surface(),
            4.0 * PI * r * r,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_radius_is_zero_measure() {
        let s = HyperSphere::new(5, 0.0).unwrap();
        assert_eq!(s.volume(), 0.0);
        assert_eq!(s.surface(), 0.0);
    }

    #[test]
    fn test_cross_section_edges() {
        let s = HyperSphere::new(3, 2.0).unwrap();
        assert_eq!(s.cross_section(2.0), 0.0);
        assert_eq!(s.cross_section(-3.0), 0.0);
        // Mid-slice of a 3-ball is a disk
        assert_relative_eq!(s.cross_section(0.0), PI * 4.0, max_relative = 1e-12);

        let line = HyperSphere::new(1, 1.0).unwrap();
        assert_eq!(line.cross_section(0.5), 1.0);
        assert_eq!(line.cross_section(1.0), 0.0);
    }

    #[test]
    fn test_cross_section_integrates_to_volume() {
        // Midpoint quadrature over [-r, r]
        let s = HyperSphere::new(4, 1.5).unwrap();
        let steps = 20_000;
        let h = 2.0 * s.radius() / steps as f64;
        let integral: f64 = (0..steps)
            .map(|i| s.cross_section(-s.radius() + (i as f64 + 0.5) * h) * h)
            .sum();
        assert_relative_eq!(integral, s.volume(), max_relative = 1e-6);
    }

    #[test]
    fn test_projection() {
        let s = HyperSphere::new(4, 2.5).unwrap();
        let p = s.project().unwrap();
        assert_eq!(p.dimension(), 3);
        assert_eq!(p.radius(), 2.5);
        assert!(HyperSphere::new(1, 1.0).unwrap().project().is_err());
    }

    #[test]
    fn test_contains() {
        let s = HyperSphere::new(3, 1.0).unwrap();
        assert!(s.contains(&[0.5, 0.5, 0.5]).unwrap());
        assert!(!s.contains(&[1.0, 1.0, 0.0]).unwrap());
        assert!(s.contains(&[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_formula_text_identities() {
        let s = HyperSphere::new(3, 1.0).unwrap();
        assert!(s.volume_formula().contains("V_3 = (4/3)πr³"));
        let s5 = HyperSphere::new(5, 1.0).unwrap();
        assert!(s5.volume_formula().contains("V_5"));
        assert!(s5.volume_formula().contains("r^5"));
    }
}
