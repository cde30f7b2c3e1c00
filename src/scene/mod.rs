//! Deterministic scene encoder.
//!
//! Turns shapes and tilings into structured scene descriptions keyed by
//! effective dimension: intervals in 1-D, outlines in 2-D, triangulated
//! surfaces in 3-D, and recursive cross-section trees above that. The
//! encoder returns data, never pixels; rendering is the façade's job.

mod icosphere;

use crate::errors::{GeometryError, GeometryResult};
use crate::shapes::{NShape, Shape};
use crate::tiling::TilingPattern;
use crate::types::ShapeKind;
use serde::{Deserialize, Serialize};

/// Scene budget: primitives beyond this are uniformly subsampled.
const MAX_PRIMITIVES: usize = 10_000;
/// Sample count for curved 2-D boundaries.
const CURVE_SEGMENTS: usize = 64;
const DEFAULT_SUBDIVISIONS: u32 = 2;
const MAX_SUBDIVISIONS: u32 = 4;

/// View options for `scene.encode`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SceneView {
    /// Render the shape as if it had at most this dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_cap: Option<u32>,
    /// Override the top-level cross-section offsets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_sections: Option<Vec<f64>>,
    /// Icosphere refinement for curved surfaces, clamped to [0, 4].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivisions: Option<u32>,
}

/// One node of the scene tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneNode {
    Interval {
        start: f64,
        end: f64,
    },
    Outline {
        points: Vec<[f64; 2]>,
    },
    Mesh {
        vertices: Vec<[f64; 3]>,
        triangles: Vec<[u32; 3]>,
    },
    CrossSections {
        /// Index of the axis the sections cut across.
        axis: u32,
        sections: Vec<CrossSection>,
    },
    TileSet {
        polygons: Vec<Vec<[f64; 2]>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossSection {
    pub offset: f64,
    pub scene: SceneNode,
}

/// Complete encoded scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneDescription {
    pub kind: String,
    pub dimension: u32,
    pub primitive_count: usize,
    pub subsampled: bool,
    pub root: SceneNode,
}

/// Encode one shape under the given view.
pub fn encode_shape(shape: &Shape, view: &SceneView) -> GeometryResult<SceneDescription> {
    let subdivisions = view
        .subdivisions
        .unwrap_or(DEFAULT_SUBDIVISIONS)
        .min(MAX_SUBDIVISIONS);
    if let Some(offsets) = &view.cross_sections {
        if offsets.iter().any(|t| !t.is_finite()) {
            return Err(GeometryError::domain(
                "Cross-section offsets must be finite numbers",
            ));
        }
    }
    let capped = apply_dimension_cap(shape, view.dimension_cap)?;
    let mut root = shape_node(&capped, view.cross_sections.as_deref(), subdivisions)?;
    let total = primitive_count(&root);
    let subsampled = total > MAX_PRIMITIVES;
    if subsampled {
        let factor = (total + MAX_PRIMITIVES - 1) / MAX_PRIMITIVES;
        subsample(&mut root, factor);
    }
    Ok(SceneDescription {
        kind: capped.kind().as_str().to_string(),
        dimension: capped.dimension(),
        primitive_count: primitive_count(&root),
        subsampled,
        root,
    })
}

/// Encode a tiling as a flat polygon set.
pub fn encode_tiling(
    pattern: &dyn TilingPattern,
    _view: &SceneView,
) -> GeometryResult<SceneDescription> {
    let mut root = SceneNode::TileSet {
        polygons: pattern.tiles().iter().map(|t| t.polygon.clone()).collect(),
    };
    let total = primitive_count(&root);
    let subsampled = total > MAX_PRIMITIVES;
    if subsampled {
        let factor = (total + MAX_PRIMITIVES - 1) / MAX_PRIMITIVES;
        subsample(&mut root, factor);
    }
    Ok(SceneDescription {
        kind: pattern.kind().as_str().to_string(),
        dimension: pattern.dimension(),
        primitive_count: primitive_count(&root),
        subsampled,
        root,
    })
}

/// Rebuild the shape at the capped dimension when the view asks for one.
fn apply_dimension_cap(shape: &Shape, cap: Option<u32>) -> GeometryResult<Shape> {
    let Some(cap) = cap else {
        return Ok(shape.clone());
    };
    if cap < 1 {
        return Err(GeometryError::dimension_too_small(1, cap));
    }
    if cap >= shape.dimension() {
        return Ok(shape.clone());
    }
    match shape {
        Shape::Ellipsoid(e) => {
            Shape::create(ShapeKind::Ellipsoid, cap, &e.axes()[..cap as usize])
        }
        other => Shape::create(other.kind(), cap, &other.parameters()),
    }
}

fn shape_node(
    shape: &Shape,
    top_offsets: Option<&[f64]>,
    subdivisions: u32,
) -> GeometryResult<SceneNode> {
    match shape.dimension() {
        1 => Ok(interval_node(shape)),
        2 => Ok(outline_node(shape)),
        3 => Ok(mesh_node(shape, subdivisions)),
        n => cross_section_node(shape, n, top_offsets, subdivisions),
    }
}

fn interval_node(shape: &Shape) -> SceneNode {
    let (start, end) = match shape {
        Shape::Sphere(s) => (-s.radius(), s.radius()),
        Shape::Cube(c) => (0.0, c.side()),
        Shape::Ellipsoid(e) => (-e.axes()[0], e.axes()[0]),
        Shape::Simplex(s) => (0.0, s.edge()),
        Shape::Pyramid(p) => (0.0, p.height()),
    };
    SceneNode::Interval { start, end }
}

fn outline_node(shape: &Shape) -> SceneNode {
    let points = match shape {
        Shape::Sphere(s) => ellipse_points(s.radius(), s.radius()),
        Shape::Ellipsoid(e) => ellipse_points(e.axes()[0], e.axes()[1]),
        Shape::Cube(c) => {
            let s = c.side();
            vec![[0.0, 0.0], [s, 0.0], [s, s], [0.0, s]]
        }
        Shape::Simplex(s) => {
            let a = s.edge();
            vec![[0.0, 0.0], [a, 0.0], [a / 2.0, a * 3.0f64.sqrt() / 2.0]]
        }
        Shape::Pyramid(p) => {
            let s = p.base_side();
            vec![[0.0, 0.0], [s, 0.0], [s / 2.0, p.height()]]
        }
    };
    SceneNode::Outline { points }
}

fn ellipse_points(a: f64, b: f64) -> Vec<[f64; 2]> {
    (0..CURVE_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / CURVE_SEGMENTS as f64;
            [a * angle.cos(), b * angle.sin()]
        })
        .collect()
}

fn mesh_node(shape: &Shape, subdivisions: u32) -> SceneNode {
    let (vertices, triangles) = match shape {
        Shape::Sphere(s) => icosphere::sphere_mesh(s.radius(), subdivisions),
        Shape::Ellipsoid(e) => {
            icosphere::ellipsoid_mesh([e.axes()[0], e.axes()[1], e.axes()[2]], subdivisions)
        }
        Shape::Cube(c) => box_mesh(c.side()),
        Shape::Simplex(s) => tetrahedron_mesh(s.edge()),
        Shape::Pyramid(p) => pyramid_mesh(p.base_side(), p.height()),
    };
    SceneNode::Mesh {
        vertices,
        triangles,
    }
}

/// Sections across the last axis; each child renders recursively down to
/// a 3-D mesh.
fn cross_section_node(
    shape: &Shape,
    dimension: u32,
    top_offsets: Option<&[f64]>,
    subdivisions: u32,
) -> GeometryResult<SceneNode> {
    let child_dim = dimension - 1;
    let sections: Vec<(f64, Shape)> = match shape {
        Shape::Sphere(s) => {
            let r = s.radius();
            let offsets = offsets_or(top_offsets, symmetric_offsets(r));
            offsets
                .into_iter()
                .map(|t| {
                    let slice = (r * r - t * t).max(0.0).sqrt();
                    Shape::create(ShapeKind::Sphere, child_dim, &[slice]).map(|c| (t, c))
                })
                .collect::<GeometryResult<_>>()?
        }
        Shape::Cube(c) => {
            let s = c.side();
            let offsets = offsets_or(top_offsets, slab_offsets(s));
            offsets
                .into_iter()
                .map(|t| Shape::create(ShapeKind::Cube, child_dim, &[s]).map(|ch| (t, ch)))
                .collect::<GeometryResult<_>>()?
        }
        Shape::Ellipsoid(e) => {
            let axes = e.axes();
            let last = axes[child_dim as usize];
            let offsets = offsets_or(top_offsets, symmetric_offsets(last));
            offsets
                .into_iter()
                .map(|t| {
                    let scale = if last > 0.0 {
                        (1.0 - (t / last) * (t / last)).max(0.0).sqrt()
                    } else {
                        0.0
                    };
                    let child_axes: Vec<f64> = axes[..child_dim as usize]
                        .iter()
                        .map(|a| a * scale)
                        .collect();
                    Shape::create(ShapeKind::Ellipsoid, child_dim, &child_axes)
                        .map(|c| (t, c))
                })
                .collect::<GeometryResult<_>>()?
        }
        Shape::Simplex(s) => {
            let a = s.edge();
            let n = dimension as f64;
            // Height from apex to the opposite facet
            let height = a * ((n + 1.0) / (2.0 * n)).sqrt();
            let offsets = offsets_or(top_offsets, slab_offsets(height));
            offsets
                .into_iter()
                .map(|t| {
                    let edge = if height > 0.0 {
                        a * (t / height).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                    Shape::create(ShapeKind::Simplex, child_dim, &[edge]).map(|c| (t, c))
                })
                .collect::<GeometryResult<_>>()?
        }
        Shape::Pyramid(p) => {
            let s = p.base_side();
            let h = p.height();
            let offsets = offsets_or(top_offsets, slab_offsets(h));
            offsets
                .into_iter()
                .map(|t| {
                    let side = if h > 0.0 {
                        s * (1.0 - (t / h).clamp(0.0, 1.0))
                    } else {
                        0.0
                    };
                    Shape::create(ShapeKind::Cube, child_dim, &[side]).map(|c| (t, c))
                })
                .collect::<GeometryResult<_>>()?
        }
    };

    let mut rendered = Vec::with_capacity(sections.len());
    for (offset, child) in sections {
        rendered.push(CrossSection {
            offset,
            scene: shape_node(&child, None, subdivisions)?,
        });
    }
    Ok(SceneNode::CrossSections {
        axis: child_dim,
        sections: rendered,
    })
}

fn offsets_or(top: Option<&[f64]>, default: Vec<f64>) -> Vec<f64> {
    match top {
        Some(offsets) if !offsets.is_empty() => offsets.to_vec(),
        _ => default,
    }
}

fn symmetric_offsets(extent: f64) -> Vec<f64> {
    vec![-extent, -extent / 2.0, 0.0, extent / 2.0, extent]
}

fn slab_offsets(extent: f64) -> Vec<f64> {
    vec![
        0.0,
        extent / 4.0,
        extent / 2.0,
        3.0 * extent / 4.0,
        extent,
    ]
}

fn box_mesh(s: f64) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [s, 0.0, 0.0],
        [s, s, 0.0],
        [0.0, s, 0.0],
        [0.0, 0.0, s],
        [s, 0.0, s],
        [s, s, s],
        [0.0, s, s],
    ];
    let quads: [[u32; 4]; 6] = [
        [0, 3, 2, 1], // bottom
        [4, 5, 6, 7], // top
        [0, 1, 5, 4], // front
        [2, 3, 7, 6], // back
        [0, 4, 7, 3], // left
        [1, 2, 6, 5], // right
    ];
    let mut triangles = Vec::with_capacity(12);
    for [a, b, c, d] in quads {
        triangles.push([a, b, c]);
        triangles.push([a, c, d]);
    }
    (vertices, triangles)
}

fn tetrahedron_mesh(a: f64) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [a, 0.0, 0.0],
        [a / 2.0, a * 3.0f64.sqrt() / 2.0, 0.0],
        [a / 2.0, a * 3.0f64.sqrt() / 6.0, a * (2.0f64 / 3.0).sqrt()],
    ];
    let triangles = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    (vertices, triangles)
}

fn pyramid_mesh(s: f64, h: f64) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [s, 0.0, 0.0],
        [s, s, 0.0],
        [0.0, s, 0.0],
        [s / 2.0, s / 2.0, h],
    ];
    let triangles = vec![
        [0, 2, 1],
        [0, 3, 2],
        [0, 1, 4],
        [1, 2, 4],
        [2, 3, 4],
        [3, 0, 4],
    ];
    (vertices, triangles)
}

fn primitive_count(node: &SceneNode) -> usize {
    match node {
        SceneNode::Interval { .. } => 1,
        SceneNode::Outline { points } => points.len(),
        SceneNode::Mesh { triangles, .. } => triangles.len(),
        SceneNode::TileSet { polygons } => polygons.len(),
        SceneNode::CrossSections { sections, .. } => sections
            .iter()
            .map(|section| primitive_count(&section.scene))
            .sum(),
    }
}

/// Keep every `factor`-th primitive, uniformly.
fn subsample(node: &mut SceneNode, factor: usize) {
    match node {
        SceneNode::Interval { .. } => {}
        SceneNode::Outline { points } => {
            if points.len() > 3 * factor {
                *points = points.iter().copied().step_by(factor).collect();
            }
        }
        SceneNode::Mesh { triangles, .. } => {
            *triangles = triangles.iter().copied().step_by(factor).collect();
        }
        SceneNode::TileSet { polygons } => {
            *polygons = polygons.iter().cloned().step_by(factor).collect();
        }
        SceneNode::CrossSections { sections, .. } => {
            for section in sections {
                subsample(&mut section.scene, factor);
            }
        }
    }
}
