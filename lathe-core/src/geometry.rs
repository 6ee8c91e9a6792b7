/// Indexed triangle mesh and per-element views
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

/// Tolerance used when checking that stored normals are unit length
pub const UNIT_TOLERANCE: f32 = 1e-4;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized `(v1 - v0) × (v2 - v0)`; its length is twice the area
    pub fn cross(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0).cross(&(v2 - v0))
    }

    /// Face normal from the winding order, `None` for zero-area triangles
    pub fn calculate_normal(&self) -> Option<Vector3<f32>> {
        self.cross().try_normalize(f32::EPSILON)
    }

    pub fn area(&self) -> f32 {
        0.5 * self.cross().norm()
    }

    /// Area projected onto `direction`; positive when the triangle winds
    /// counter-clockwise seen from the side `direction` points to
    pub fn signed_area_along(&self, direction: &Vector3<f32>) -> f32 {
        0.5 * self.cross().dot(direction)
    }

    /// Sum of the three vertex normals
    pub fn averaged_normal(&self) -> Vector3<f32> {
        self.vertices.iter().map(|v| v.normal).sum()
    }
}

/// An indexed triangle mesh stored as three parallel buffers.
///
/// `positions` and `normals` always have the same length; every three
/// consecutive entries of `indices` form one counter-clockwise triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(vertex.position);
        self.normals.push(vertex.normal);
        index
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex::from_parts(self.positions[index], self.normals[index])
    }

    /// Resolve the `n`-th triangle of the index buffer
    pub fn triangle(&self, n: usize) -> Triangle {
        let base = n * 3;
        Triangle::new(
            self.vertex(self.indices[base] as usize),
            self.vertex(self.indices[base + 1] as usize),
            self.vertex(self.indices[base + 2] as usize),
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |n| self.triangle(n))
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Check the buffer invariants a renderer relies on
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() != self.normals.len() {
            return Err(MeshError::BufferLengthMismatch {
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.indices.len()));
        }

        let vertex_count = self.vertex_count();
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count,
            });
        }

        if let Some(index) = self
            .normals
            .iter()
            .position(|n| !is_unit(n))
        {
            return Err(MeshError::InvalidNormal { index });
        }

        Ok(())
    }
}

fn is_unit(normal: &Vector3<f32>) -> bool {
    normal.iter().all(|c| c.is_finite()) && (normal.norm() - 1.0).abs() <= UNIT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        let up = (0.0, 0.0, 1.0);
        let a = mesh.add_vertex(Vertex::new(0.0, 0.0, 0.0, up.0, up.1, up.2));
        let b = mesh.add_vertex(Vertex::new(1.0, 0.0, 0.0, up.0, up.1, up.2));
        let c = mesh.add_vertex(Vertex::new(1.0, 1.0, 0.0, up.0, up.1, up.2));
        let d = mesh.add_vertex(Vertex::new(0.0, 1.0, 0.0, up.0, up.1, up.2));
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
        mesh
    }

    #[test]
    fn test_triangle_normal_and_area() {
        let mesh = quad();
        let tri = mesh.triangle(0);
        let normal = tri.calculate_normal().unwrap();
        assert!((normal - Vector3::z()).norm() < 1e-6);
        assert!((tri.area() - 0.5).abs() < 1e-6);
        assert!(tri.signed_area_along(&Vector3::z()) > 0.0);
        assert!(tri.signed_area_along(&-Vector3::z()) < 0.0);
    }

    #[test]
    fn test_degenerate_triangle_has_no_normal() {
        let v = Vertex::new(1.0, 2.0, 3.0, 0.0, 1.0, 0.0);
        let tri = Triangle::new(v, v, v);
        assert!(tri.calculate_normal().is_none());
        assert_eq!(tri.area(), 0.0);
    }

    #[test]
    fn test_bounds() {
        let mesh = quad();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!(Mesh::new().bounds().is_none());
    }

    #[test]
    fn test_validate() {
        let mut mesh = quad();
        assert_eq!(mesh.validate(), Ok(()));
        assert_eq!(mesh.triangle_count(), 2);

        mesh.indices.push(7);
        assert_eq!(mesh.validate(), Err(MeshError::IncompleteTriangle(7)));

        mesh.indices.extend_from_slice(&[0, 1]);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfBounds {
                index: 7,
                vertex_count: 4
            })
        );

        let mut mesh = quad();
        mesh.normals[2] = Vector3::new(f32::NAN, 0.0, 0.0);
        assert_eq!(mesh.validate(), Err(MeshError::InvalidNormal { index: 2 }));

        mesh.normals.pop();
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::BufferLengthMismatch { .. })
        ));
    }
}
