//! The N-dimensional shape library.
//!
//! Each concrete shape satisfies the `NShape` capability set; `Shape` is the
//! tagged variant over the closed set of kinds and is what the rest of the
//! kernel passes around. Constructed values are immutable and every
//! constructor validates its parameters up front.

mod cube;
mod ellipsoid;
mod pyramid;
mod simplex;
mod sphere;

pub use cube::HyperCube;
pub use ellipsoid::HyperEllipsoid;
pub use pyramid::HyperPyramid;
pub use simplex::Simplex;
pub use sphere::HyperSphere;

use crate::errors::{GeometryError, GeometryResult};
use crate::types::{ReportValue, ShapeKind, ShapeReport};
use std::collections::BTreeMap;

/// Capability set every shape exposes.
pub trait NShape {
    fn dimension(&self) -> u32;
    fn parameters(&self) -> Vec<f64>;
    fn kind(&self) -> ShapeKind;
    /// N-measure of the interior. Never NaN; zero-measure inputs yield 0.
    fn volume(&self) -> f64;
    /// (N-1)-measure of the boundary.
    fn surface(&self) -> f64;
    fn volume_formula(&self) -> String;
    fn surface_formula(&self) -> String;
    /// Derived invariants, ordered by name.
    fn derived(&self) -> BTreeMap<String, f64>;
    /// Whether any reported measure lacks an exact closed form.
    fn approximate(&self) -> bool {
        false
    }
    /// Point membership, where the shape family supports it.
    fn contains(&self, point: &[f64]) -> GeometryResult<bool>;

    fn describe(&self) -> ShapeReport {
        ShapeReport {
            kind: self.kind(),
            dimension: self.dimension(),
            parameters: self.parameters(),
            volume: ReportValue::new(self.volume()),
            surface: ReportValue::new(self.surface()),
            derived: self
                .derived()
                .into_iter()
                .map(|(k, v)| (k, ReportValue::new(v)))
                .collect(),
            volume_formula: self.volume_formula(),
            surface_formula: self.surface_formula(),
            approximate: self.approximate(),
        }
    }
}

/// Tagged variant over the closed set of shape kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(HyperSphere),
    Cube(HyperCube),
    Ellipsoid(HyperEllipsoid),
    Simplex(Simplex),
    Pyramid(HyperPyramid),
}

impl Shape {
    /// Construct a shape from its kind, dimension, and parameter vector.
    ///
    /// An ellipsoid takes either a full axis vector or a single value
    /// replicated across all axes; the other kinds take their fixed arity.
    pub fn create(kind: ShapeKind, dimension: u32, params: &[f64]) -> GeometryResult<Shape> {
        match kind {
            ShapeKind::Sphere => {
                let [r] = expect_arity::<1>(params)?;
                Ok(Shape::Sphere(HyperSphere::new(dimension, r)?))
            }
            ShapeKind::Cube => {
                let [s] = expect_arity::<1>(params)?;
                Ok(Shape::Cube(HyperCube::new(dimension, s)?))
            }
            ShapeKind::Ellipsoid => {
                let axes: Vec<f64> = if params.len() == 1 && dimension > 1 {
                    vec![params[0]; dimension as usize]
                } else {
                    params.to_vec()
                };
                Ok(Shape::Ellipsoid(HyperEllipsoid::new(dimension, axes)?))
            }
            ShapeKind::Simplex => {
                let [a] = expect_arity::<1>(params)?;
                Ok(Shape::Simplex(Simplex::new(dimension, a)?))
            }
            ShapeKind::Pyramid => {
                let [s, h] = expect_arity::<2>(params)?;
                Ok(Shape::Pyramid(HyperPyramid::new(dimension, s, h)?))
            }
        }
    }

    fn inner(&self) -> &dyn NShape {
        match self {
            Shape::Sphere(s) => s,
            Shape::Cube(s) => s,
            Shape::Ellipsoid(s) => s,
            Shape::Simplex(s) => s,
            Shape::Pyramid(s) => s,
        }
    }
}

impl NShape for Shape {
    fn dimension(&self) -> u32 {
        self.inner().dimension()
    }

    fn parameters(&self) -> Vec<f64> {
        self.inner().parameters()
    }

    fn kind(&self) -> ShapeKind {
        self.inner().kind()
    }

    fn volume(&self) -> f64 {
        self.inner().volume()
    }

    fn surface(&self) -> f64 {
        self.inner().surface()
    }

    fn volume_formula(&self) -> String {
        self.inner().volume_formula()
    }

    fn surface_formula(&self) -> String {
        self.inner().surface_formula()
    }

    fn derived(&self) -> BTreeMap<String, f64> {
        self.inner().derived()
    }

    fn approximate(&self) -> bool {
        self.inner().approximate()
    }

    fn contains(&self, point: &[f64]) -> GeometryResult<bool> {
        self.inner().contains(point)
    }
}

fn expect_arity<const N: usize>(params: &[f64]) -> GeometryResult<[f64; N]> {
    let arr: [f64; N] = params
        .try_into()
        .map_err(|_| GeometryError::wrong_arity(N, params.len()))?;
    Ok(arr)
}

/// Validate a named length-like parameter: finite and non-negative.
pub(crate) fn check_length(name: &str, value: f64) -> GeometryResult<()> {
    if !value.is_finite() {
        return Err(GeometryError::non_finite(name));
    }
    if value < 0.0 {
        return Err(GeometryError::negative(name));
    }
    Ok(())
}

/// Validate the declared dimension against a minimum.
pub(crate) fn check_dimension(dimension: u32, min: u32) -> GeometryResult<()> {
    if dimension < min {
        return Err(GeometryError::dimension_too_small(min, dimension));
    }
    Ok(())
}

/// Validate a membership-test point against the shape dimension.
pub(crate) fn check_point(dimension: u32, point: &[f64]) -> GeometryResult<()> {
    if point.len() != dimension as usize {
        return Err(GeometryError::domain(format!(
            "Point has {} coordinate(s), shape dimension is {}",
            point.len(),
            dimension
        )));
    }
    if point.iter().any(|c| !c.is_finite()) {
        return Err(GeometryError::domain(
            "Point coordinates must be finite numbers",
        ));
    }
    Ok(())
}

/// `coeff * base^exp`, falling back to log space when the direct product
/// over- or underflows. `base` must be non-negative.
pub(crate) fn scaled_power(coeff: f64, ln_coeff: f64, base: f64, exp: u32) -> f64 {
    if exp == 0 {
        return coeff;
    }
    if base == 0.0 {
        return 0.0;
    }
    let direct = coeff * base.powi(exp as i32);
    if direct.is_finite() && direct != 0.0 {
        direct
    } else {
        (ln_coeff + exp as f64 * base.ln()).exp()
    }
}
