//! Icosphere mesh generation.
//!
//! Subdivides an icosahedron and projects every vertex onto the sphere,
//! giving a near-uniform triangulation with deterministic vertex order.

use std::collections::HashMap;

/// Unit icosahedron vertices built from the golden ratio.
fn icosahedron() -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let t = (1.0 + 5.0f64.sqrt()) / 2.0;
    let raw = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let vertices = raw.iter().map(|v| normalize(*v)).collect();
    let triangles = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (vertices, triangles)
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Unit icosphere with `subdivisions` refinement levels; each level
/// splits every triangle into four.
fn unit_icosphere(subdivisions: u32) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let (mut vertices, mut triangles) = icosahedron();
    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in &triangles {
            let ab = midpoint(&mut vertices, &mut midpoints, *a, *b);
            let bc = midpoint(&mut vertices, &mut midpoints, *b, *c);
            let ca = midpoint(&mut vertices, &mut midpoints, *c, *a);
            next.push([*a, ab, ca]);
            next.push([*b, bc, ab]);
            next.push([*c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        triangles = next;
    }
    (vertices, triangles)
}

fn midpoint(
    vertices: &mut Vec<[f64; 3]>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let va = vertices[a as usize];
    let vb = vertices[b as usize];
    let mid = normalize([
        (va[0] + vb[0]) / 2.0,
        (va[1] + vb[1]) / 2.0,
        (va[2] + vb[2]) / 2.0,
    ]);
    vertices.push(mid);
    let index = (vertices.len() - 1) as u32;
    cache.insert(key, index);
    index
}

/// Icosphere triangulation scaled per axis, covering both the sphere
/// (equal axes) and the 3-D ellipsoid.
pub fn ellipsoid_mesh(axes: [f64; 3], subdivisions: u32) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    let (vertices, triangles) = unit_icosphere(subdivisions);
    let scaled = vertices
        .into_iter()
        .map(|v| [v[0] * axes[0], v[1] * axes[1], v[2] * axes[2]])
        .collect();
    (scaled, triangles)
}

pub fn sphere_mesh(radius: f64, subdivisions: u32) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
    ellipsoid_mesh([radius, radius, radius], subdivisions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_count_quadruples() {
        for (subdivisions, expected) in [(0u32, 20usize), (1, 80), (2, 320)] {
            let (_, triangles) = sphere_mesh(1.0, subdivisions);
            assert_eq!(triangles.len(), expected);
        }
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let radius = 2.5;
        let (vertices, _) = sphere_mesh(radius, 2);
        for v in vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - radius).abs() < 1e-12);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let (vertices, triangles) = sphere_mesh(1.0, 1);
        for tri in triangles {
            for index in tri {
                assert!((index as usize) < vertices.len());
            }
        }
    }

    #[test]
    fn test_ellipsoid_scaling() {
        let (vertices, _) = ellipsoid_mesh([2.0, 1.0, 0.5], 1);
        for v in vertices {
            let q = (v[0] / 2.0).powi(2) + v[1].powi(2) + (v[2] / 0.5).powi(2);
            assert!((q - 1.0).abs() < 1e-12);
        }
    }
}
