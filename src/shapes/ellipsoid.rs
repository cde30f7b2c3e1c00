//! The N-dimensional ellipsoid.

use super::{check_dimension, check_length, check_point, NShape};
use crate::errors::{GeometryError, GeometryResult};
use crate::math::{ln_unit_ball_volume, unit_ball_volume};
use crate::types::ShapeKind;
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Relative tolerance under which all axes count as equal.
const SPHERE_TOLERANCE: f64 = 1e-12;

/// Exponent for Thomsen's 3-D surface formula.
const THOMSEN_P: f64 = 1.6075;

/// An N-ellipsoid with semi-axes `a_1..a_N`: `volume = V(N)·∏a_i`.
///
/// Surface area has no elementary closed form beyond N=1; 2-D uses
/// Ramanujan's first approximation, 3-D uses Thomsen's formula, and N≥4
/// falls back to a mean-axis sphere surrogate flagged `approximate`.
/// All three collapse to the exact sphere surface when the axes are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperEllipsoid {
    dimension: u32,
    axes: Vec<f64>,
}

impl HyperEllipsoid {
    pub fn new(dimension: u32, axes: Vec<f64>) -> GeometryResult<Self> {
        check_dimension(dimension, 1)?;
        if axes.len() != dimension as usize {
            return Err(GeometryError::wrong_arity(dimension as usize, axes.len()));
        }
        for axis in &axes {
            check_length("axis", *axis)?;
        }
        Ok(HyperEllipsoid { dimension, axes })
    }

    pub fn axes(&self) -> &[f64] {
        &self.axes
    }

    /// True when the axis spread is within the sphere tolerance.
    pub fn is_sphere(&self) -> bool {
        let max = self.axes.iter().cloned().fold(0.0, f64::max);
        let min = self.axes.iter().cloned().fold(f64::INFINITY, f64::min);
        max - min <= SPHERE_TOLERANCE * max
    }

    /// Degenerate when any axis is zero.
    pub fn is_degenerate(&self) -> bool {
        self.axes.iter().any(|&a| a == 0.0)
    }

    /// Eccentricity of the 2-D ellipse: √(1 - (min/max)²).
    fn eccentricity(&self) -> f64 {
        let max = self.axes.iter().cloned().fold(0.0, f64::max);
        let min = self.axes.iter().cloned().fold(f64::INFINITY, f64::min);
        if max == 0.0 {
            return 0.0;
        }
        (1.0 - (min / max) * (min / max)).max(0.0).sqrt()
    }

    fn mean_axis(&self) -> f64 {
        self.axes.iter().sum::<f64>() / self.dimension as f64
    }
}

impl NShape for HyperEllipsoid {
    fn dimension(&self) -> u32 {
        self.dimension
    }

    fn parameters(&self) -> Vec<f64> {
        self.axes.clone()
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipsoid
    }

    fn volume(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let product: f64 = self.axes.iter().product();
        let direct = unit_ball_volume(self.dimension) * product;
        if direct.is_finite() && direct != 0.0 {
            direct
        } else {
            let ln_product: f64 = self.axes.iter().map(|a| a.ln()).sum();
            (ln_unit_ball_volume(self.dimension) + ln_product).exp()
        }
    }

    fn surface(&self) -> f64 {
        match self.dimension {
            1 => 2.0,
            2 => {
                // Ramanujan I; exact 2πa in the circular limit
                let a = self.axes[0];
                let b = self.axes[1];
                PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
            }
            3 => {
                // Thomsen; exact 4πa² in the spherical limit
                let [a, b, c] = [self.axes[0], self.axes[1], self.axes[2]];
                let mean = ((a * b).powf(THOMSEN_P)
                    + (a * c).powf(THOMSEN_P)
                    + (b * c).powf(THOMSEN_P))
                    / 3.0;
                4.0 * PI * mean.powf(1.0 / THOMSEN_P)
            }
            n => {
                // Mean-axis sphere surrogate
                let r = self.mean_axis();
                super::scaled_power(
                    n as f64 * unit_ball_volume(n),
                    (n as f64).ln() + ln_unit_ball_volume(n),
                    r,
                    n - 1,
                )
            }
        }
    }

    fn volume_formula(&self) -> String {
        match self.dimension {
            1 => "V_1 = 2 × a_1".to_string(),
            3 => "V_3 = (4/3)π × a_1 × a_2 × a_3".to_string(),
            n => format!(
                "V_{} = π^({}/2)/Γ({}/2 + 1) × a_1 × ... × a_{}",
                n, n, n, n
            ),
        }
    }

    fn surface_formula(&self) -> String {
        match self.dimension {
            1 => "S_1 = 2".to_string(),
            2 => "S_2 = π × (3(a_1 + a_2) - √((3a_1 + a_2)(a_1 + 3a_2)))".to_string(),
            3 => "S_3 = 4π × (((a_1a_2)^p + (a_1a_3)^p + (a_2a_3)^p)/3)^(1/p), p = 1.6075"
                .to_string(),
            n => format!(
                "S_{} ≈ {} × π^({}/2)/Γ({}/2 + 1) × ā^{}, ā = mean axis",
                n,
                n,
                n,
                n,
                n - 1
            ),
        }
    }

    fn derived(&self) -> BTreeMap<String, f64> {
        let mut derived = BTreeMap::new();
        let max = self.axes.iter().cloned().fold(0.0, f64::max);
        let min = self.axes.iter().cloned().fold(f64::INFINITY, f64::min);
        derived.insert(
            "is_sphere".to_string(),
            if self.is_sphere() { 1.0 } else { 0.0 },
        );
        derived.insert("max_axis".to_string(), max);
        derived.insert("min_axis".to_string(), min);
        if self.dimension == 2 {
            derived.insert("eccentricity".to_string(), self.eccentricity());
        }
        derived
    }

    fn approximate(&self) -> bool {
        self.dimension >= 4
    }

    fn contains(&self, point: &[f64]) -> GeometryResult<bool> {
        check_point(self.dimension, point)?;
        let mut acc = 0.0;
        for (coord, axis) in point.iter().zip(&self.axes) {
            if *axis == 0.0 {
                if *coord != 0.0 {
                    return Ok(false);
                }
            } else {
                acc += (coord / axis) * (coord / axis);
            }
        }
        Ok(acc <= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volume_is_scaled_ball() {
        let e = HyperEllipsoid::new(3, vec![1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(e.volume(), 4.0 * PI / 3.0 * 6.0, max_relative = 1e-12);
    }

    #[test]
    fn test_reduces_to_sphere() {
        let r = 1.7;
        for n in [1u32, 2, 3, 4, 7] {
            let e = HyperEllipsoid::new(n, vec![r; n as usize]).unwrap();
            let sphere = crate::shapes::HyperSphere::new(n, r).unwrap();
            assert_relative_eq!(e.volume(), sphere.volume(), max_relative = 1e-12);
            assert_relative_eq!(e.surface(), sphere.surface(), max_relative = 1e-12);
            assert!(e.is_sphere());
        }
    }

    #[test]
    fn test_degenerate_axis() {
        let e = HyperEllipsoid::new(3, vec![1.0, 0.0, 2.0]).unwrap();
        assert_eq!(e.volume(), 0.0);
        assert!(e.is_degenerate());
    }

    #[test]
    fn test_eccentricity() {
        let e = HyperEllipsoid::new(2, vec![5.0, 3.0]).unwrap();
        let expected = (1.0f64 - (3.0f64 / 5.0).powi(2)).sqrt();
        assert_relative_eq!(
            e.derived()["eccentricity"],
            expected,
            max_relative = 1e-12
        );
        let circle = HyperEllipsoid::new(2, vec![2.0, 2.0]).unwrap();
        assert_eq!(circle.derived()["eccentricity"], 0.0);
    }

    #[test]
    fn test_high_dimension_is_flagged_approximate() {
        let e = HyperEllipsoid::new(5, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(e.approximate());
        assert!(e.describe().approximate);
        let e3 = HyperEllipsoid::new(3, vec![1.0, 2.0, 3.0]).unwrap();
        assert!(!e3.describe().approximate);
    }

    #[test]
    fn test_contains() {
        let e = HyperEllipsoid::new(2, vec![2.0, 1.0]).unwrap();
        assert!(e.contains(&[1.9, 0.0]).unwrap());
        assert!(!e.contains(&[0.0, 1.1]).unwrap());
        let flat = HyperEllipsoid::new(2, vec![2.0, 0.0]).unwrap();
        assert!(flat.contains(&[1.0, 0.0]).unwrap());
        assert!(!flat.contains(&[1.0, 0.5]).unwrap());
    }

    #[test]
    fn test_arity_must_match_dimension() {
        assert!(HyperEllipsoid::new(3, vec![1.0, 2.0]).is_err());
    }
}
