//! Cross-shape comparison, dimensional sweeps, and the batch façade.
//!
//! Derived analytics are kept separate from the shape library itself;
//! everything here consumes the capability set and produces report
//! records.

use crate::errors::{GeometryError, GeometryResult};
use crate::limits::Budgets;
use crate::shapes::{NShape, Shape};
use crate::types::{
    ComparisonReport, LargestBy, PropertyKind, RatioPair, ReportValue, ScalingReport,
    ShapeKind, ShapeReport,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire record for one batch item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchItem {
    pub kind: ShapeKind,
    pub dimension: u32,
    pub parameters: Vec<f64>,
}

const BATCH_OPERATIONS: &[&str] = &["volume", "surface", "properties"];

/// Ratio that degrades to the `"undefined"` sentinel instead of NaN or
/// infinity.
fn ratio(numerator: f64, denominator: f64) -> ReportValue {
    if denominator == 0.0 {
        return ReportValue::undefined();
    }
    ReportValue::new(numerator / denominator)
}

/// Compare two shapes: per-measure ratios and winners.
pub fn compare(a: &Shape, b: &Shape) -> ComparisonReport {
    let report_a = a.describe();
    let report_b = b.describe();

    let volume_a = a.volume();
    let volume_b = b.volume();
    let surface_a = a.surface();
    let surface_b = b.surface();

    let mut ratios = BTreeMap::new();
    ratios.insert(
        format!("{}/{}", a.kind(), b.kind()),
        RatioPair {
            volume: ratio(volume_a, volume_b),
            surface: ratio(surface_a, surface_b),
        },
    );

    let largest_by = LargestBy {
        volume: if volume_a >= volume_b {
            a.kind()
        } else {
            b.kind()
        },
        surface: if surface_a >= surface_b {
            a.kind()
        } else {
            b.kind()
        },
    };

    ComparisonReport {
        shapes: vec![report_a, report_b],
        ratios,
        largest_by,
    }
}

/// Build the shape a sweep evaluates at one dimension, adapting the
/// parameter vector to the kind's arity.
fn shape_at_dimension(kind: ShapeKind, dimension: u32, params: &[f64]) -> GeometryResult<Shape> {
    if params.is_empty() {
        return Err(GeometryError::wrong_arity(1, 0));
    }
    match kind {
        ShapeKind::Pyramid => {
            let height = if params.len() >= 2 { params[1] } else { params[0] };
            Shape::create(kind, dimension, &[params[0], height])
        }
        ShapeKind::Ellipsoid => Shape::create(kind, dimension, &[params[0]]),
        _ => Shape::create(kind, dimension, &[params[0]]),
    }
}

/// Evaluate one property at each integer dimension in `[lo, hi]`.
///
/// The peak is the argmax over the range; ties break toward the smaller
/// dimension, and non-finite values never win.
pub fn scaling_sweep(
    kind: ShapeKind,
    property: PropertyKind,
    lo: u32,
    hi: u32,
    params: &[f64],
    budgets: &Budgets,
) -> GeometryResult<ScalingReport> {
    if lo < 1 {
        return Err(GeometryError::dimension_too_small(1, lo));
    }
    budgets.check_sweep(lo, hi)?;
    if property == PropertyKind::Both {
        return Err(GeometryError::domain(
            "Scaling sweep requires a single property: volume or surface",
        ));
    }

    let mut dims = Vec::with_capacity((hi - lo + 1) as usize);
    let mut values = Vec::with_capacity(dims.capacity());
    let mut peak_dim = lo;
    let mut peak_value = f64::NEG_INFINITY;
    for dimension in lo..=hi {
        let shape = shape_at_dimension(kind, dimension, params)?;
        let value = match property {
            PropertyKind::Volume => shape.volume(),
            _ => shape.surface(),
        };
        if value.is_finite() && value > peak_value {
            peak_value = value;
            peak_dim = dimension;
        }
        dims.push(dimension);
        values.push(ReportValue::new(value));
    }

    Ok(ScalingReport {
        kind,
        property,
        dims,
        values,
        peak_dim,
    })
}

/// Describe a batch of shapes, capped by the batch budget.
///
/// `operations` must be a subset of {volume, surface, properties}; the
/// `properties` operation controls whether the derived map is populated.
pub fn batch(
    items: &[BatchItem],
    operations: &[String],
    budgets: &Budgets,
) -> GeometryResult<Vec<ShapeReport>> {
    budgets.check_batch(items.len())?;
    for op in operations {
        if !BATCH_OPERATIONS.contains(&op.as_str()) {
            return Err(GeometryError::domain(format!(
                "Unknown batch operation: {}",
                op
            )));
        }
    }
    let include_derived = operations.iter().any(|op| op == "properties");

    let mut reports = Vec::with_capacity(items.len());
    for item in items {
        budgets.check_dimension(item.dimension)?;
        let shape = Shape::create(item.kind, item.dimension, &item.parameters)?;
        let mut report = shape.describe();
        if !include_derived {
            report.derived = BTreeMap::new();
        }
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_compare_sphere_cube() {
        let a = Shape::create(ShapeKind::Sphere, 4, &[1.0]).unwrap();
        let b = Shape::create(ShapeKind::Cube, 4, &[1.0]).unwrap();
        let report = compare(&a, &b);
        let pair = &report.ratios["sphere/cube"];
        assert_relative_eq!(
            pair.volume.finite().unwrap(),
            PI * PI / 2.0,
            max_relative = 1e-12
        );
        assert_eq!(report.largest_by.volume, ShapeKind::Sphere);
        assert_eq!(report.shapes.len(), 2);
    }

    #[test]
    fn test_compare_zero_volume_is_undefined() {
        let a = Shape::create(ShapeKind::Sphere, 3, &[1.0]).unwrap();
        let b = Shape::create(ShapeKind::Cube, 3, &[0.0]).unwrap();
        let report = compare(&a, &b);
        let pair = &report.ratios["sphere/cube"];
        assert!(pair.volume.is_undefined());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"undefined\""));
        assert!(!json.contains("NaN"));
    }

    #[test]
    fn test_sphere_volume_peaks_at_five() {
        let report = scaling_sweep(
            ShapeKind::Sphere,
            PropertyKind::Volume,
            1,
            10,
            &[1.0],
            &Budgets::default(),
        )
        .unwrap();
        assert_eq!(report.peak_dim, 5);
        assert_eq!(report.dims, (1..=10).collect::<Vec<_>>());
        // Monotone up to the peak, strictly decreasing after
        let values: Vec<f64> = report.values.iter().map(|v| v.finite().unwrap()).collect();
        for i in 0..4 {
            assert!(values[i] < values[i + 1]);
        }
        for i in 4..9 {
            assert!(values[i] > values[i + 1]);
        }
    }

    #[test]
    fn test_sweep_validation() {
        let budgets = Budgets::default();
        assert!(scaling_sweep(ShapeKind::Sphere, PropertyKind::Volume, 0, 5, &[1.0], &budgets)
            .is_err());
        assert!(scaling_sweep(ShapeKind::Sphere, PropertyKind::Both, 1, 5, &[1.0], &budgets)
            .is_err());
        assert!(
            scaling_sweep(ShapeKind::Sphere, PropertyKind::Volume, 1, 500, &[1.0], &budgets)
                .is_err()
        );
    }

    #[test]
    fn test_cube_volume_ties_break_small() {
        // Unit cube volume is 1.0 at every dimension; the peak reports
        // the smallest dimension in the range
        let report = scaling_sweep(
            ShapeKind::Cube,
            PropertyKind::Volume,
            2,
            6,
            &[1.0],
            &Budgets::default(),
        )
        .unwrap();
        assert_eq!(report.peak_dim, 2);
    }

    #[test]
    fn test_batch_reports() {
        let items = vec![
            BatchItem {
                kind: ShapeKind::Sphere,
                dimension: 3,
                parameters: vec![1.0],
            },
            BatchItem {
                kind: ShapeKind::Cube,
                dimension: 4,
                parameters: vec![2.0],
            },
        ];
        let ops = vec!["volume".to_string(), "properties".to_string()];
        let reports = batch(&items, &ops, &Budgets::default()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(!reports[1].derived.is_empty());

        let slim = batch(&items, &["volume".to_string()], &Budgets::default()).unwrap();
        assert!(slim[1].derived.is_empty());
    }

    #[test]
    fn test_batch_validation() {
        let items = vec![BatchItem {
            kind: ShapeKind::Sphere,
            dimension: 3,
            parameters: vec![1.0],
        }];
        assert!(batch(&items, &["paint".to_string()], &Budgets::default()).is_err());
        let too_many: Vec<BatchItem> = (0..51)
            .map(|_| items[0].clone())
            .collect();
        assert!(batch(&too_many, &[], &Budgets::default()).is_err());
    }
}
