/// Tessellation of general parametric surfaces `(u, v) -> point`.
///
/// Uses the same grid and triangle layout as the revolve generator with a
/// duplicated last column, so a surface closed in `v` keeps an explicit seam.
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::geometry::Mesh;
use crate::grid::{self, ColumnEdges, GridLayout, SampleGrid};
use crate::revolve::{MeshDiagnostics, DEGENERATE_AREA};

/// A parametric surface over `[0, 1] × [0, 1]`
pub trait Surface {
    fn sample(&self, u: f64, v: f64) -> Point3<f64>;
}

impl<S: Surface + ?Sized> Surface for &S {
    fn sample(&self, u: f64, v: f64) -> Point3<f64> {
        (**self).sample(u, v)
    }
}

/// Adapter turning any `Fn(f64, f64) -> Point3<f64>` into a [`Surface`]
#[derive(Debug, Clone, Copy)]
pub struct SurfaceFn<F>(pub F);

impl<F> Surface for SurfaceFn<F>
where
    F: Fn(f64, f64) -> Point3<f64>,
{
    fn sample(&self, u: f64, v: f64) -> Point3<f64> {
        (self.0)(u, v)
    }
}

pub fn surface_fn<F>(f: F) -> SurfaceFn<F>
where
    F: Fn(f64, f64) -> Point3<f64>,
{
    SurfaceFn(f)
}

/// Tessellate `surface` into `(u_steps + 1) * (v_steps + 1)` vertices
pub fn tessellate_surface<S>(surface: &S, u_steps: u32, v_steps: u32) -> Result<Mesh>
where
    S: Surface + ?Sized,
{
    tessellate_surface_with_diagnostics(surface, u_steps, v_steps).map(|(mesh, _)| mesh)
}

/// Tessellate `surface`, returning fallback and degenerate-triangle counts.
///
/// Normals are `∂P/∂u × ∂P/∂v` by finite differences, one-sided on every
/// border. A degenerate sample takes the normalized sum of its valid
/// neighbours' normals, or `+Y` when none of them is valid.
pub fn tessellate_surface_with_diagnostics<S>(
    surface: &S,
    u_steps: u32,
    v_steps: u32,
) -> Result<(Mesh, MeshDiagnostics)>
where
    S: Surface + ?Sized,
{
    let layout = GridLayout::new("u_steps", u_steps, "v_steps", v_steps, false)?;
    let columns = layout.emitted_columns();

    let mut samples = Vec::with_capacity(layout.vertex_count());
    for i in 0..layout.rows {
        let u = i as f64 / f64::from(u_steps);
        for j in 0..columns {
            let v = j as f64 / f64::from(v_steps);
            let p = surface.sample(u, v);
            if !p.iter().all(|c| c.is_finite()) {
                return Err(MeshError::NonFiniteSample { u, v });
            }
            samples.push(p);
        }
    }
    let positions = SampleGrid {
        rows: layout.rows,
        columns,
        data: samples,
    };

    let raw = SampleGrid::from_rows(
        layout.rows,
        columns,
        grid::map_rows(layout.rows, |i| {
            (0..columns)
                .map(|j| {
                    let (du, dv) = grid::difference_tangents(&positions, i, j, ColumnEdges::Clamped);
                    grid::surface_normal(du, dv)
                })
                .collect()
        }),
    );

    let mut fallback_normals = 0;
    let mut mesh = Mesh::with_capacity(layout.vertex_count(), layout.index_count());
    for i in 0..layout.rows {
        for j in 0..columns {
            let normal = raw.get(i, j).unwrap_or_else(|| {
                fallback_normals += 1;
                neighbour_normal(&raw, i, j)
            });
            mesh.positions.push(positions.get(i, j).cast::<f32>());
            mesh.normals.push(normal.cast::<f32>());
        }
    }
    layout.emit_indices(&mut mesh.indices);

    let diagnostics = MeshDiagnostics {
        fallback_normals,
        degenerate_triangles: mesh
            .triangles()
            .filter(|tri| tri.area() <= DEGENERATE_AREA)
            .count(),
    };

    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        fallback_normals,
        "tessellated surface"
    );

    Ok((mesh, diagnostics))
}

fn neighbour_normal(normals: &SampleGrid<Option<Vector3<f64>>>, i: usize, j: usize) -> Vector3<f64> {
    let mut sum = Vector3::zeros();
    for di in -1i64..=1 {
        for dj in -1i64..=1 {
            let (ni, nj) = (i as i64 + di, j as i64 + dj);
            if ni < 0 || nj < 0 || ni >= normals.rows as i64 || nj >= normals.columns as i64 {
                continue;
            }
            if let Some(n) = normals.get(ni as usize, nj as usize) {
                sum += n;
            }
        }
    }
    grid::unit_or_none(sum).unwrap_or_else(Vector3::y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn unit_sphere() -> SurfaceFn<impl Fn(f64, f64) -> Point3<f64>> {
        surface_fn(|u, v| {
            let (sp, cp) = (PI * u).sin_cos();
            let (st, ct) = (TAU * v).sin_cos();
            Point3::new(sp * ct, -cp, sp * st)
        })
    }

    #[test]
    fn test_plane_counts_and_normals() {
        let plane = surface_fn(|u, v| Point3::new(u, 0.0, -v));
        let mesh = tessellate_surface(&plane, 3, 5).unwrap();
        assert_eq!(mesh.vertex_count(), 4 * 6);
        assert_eq!(mesh.indices.len(), 6 * 3 * 5);
        assert_eq!(mesh.validate(), Ok(()));
        for n in &mesh.normals {
            assert!((n - Vector3::y()).norm() < 1e-6);
        }
        for tri in mesh.triangles() {
            assert!(tri.signed_area_along(&Vector3::y()) > 0.0);
        }
    }

    #[test]
    fn test_sphere_surface() {
        let (mesh, diagnostics) = tessellate_surface_with_diagnostics(&unit_sphere(), 12, 16).unwrap();
        assert_eq!(mesh.validate(), Ok(()));

        // Poles are degenerate in v and borrow their neighbours' normals
        assert_eq!(diagnostics.fallback_normals, 2 * 17);
        assert!(diagnostics.degenerate_triangles > 0);

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(n.dot(&p.coords) > 0.0, "normal at {:?} points inward", p);
        }
    }

    #[test]
    fn test_small_sphere_surface_keeps_radial_normals() {
        let radius = 1e-7;
        let sphere = surface_fn(move |u, v| {
            let (sp, cp) = (PI * u).sin_cos();
            let (st, ct) = (TAU * v).sin_cos();
            Point3::new(radius * sp * ct, -radius * cp, radius * sp * st)
        });
        let (mesh, diagnostics) = tessellate_surface_with_diagnostics(&sphere, 12, 16).unwrap();
        assert_eq!(diagnostics.fallback_normals, 2 * 17);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(n.dot(&(p.coords / p.coords.norm())) > 0.9, "normal at {:?} is {:?}", p, n);
        }
    }

    #[test]
    fn test_zero_steps_rejected() {
        let err = tessellate_surface(&unit_sphere(), 0, 4).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { name: "u_steps", .. }));
        let err = tessellate_surface(&unit_sphere(), 4, 0).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { name: "v_steps", .. }));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let broken = surface_fn(|u, v| Point3::new(1.0 / (u - 0.5), v, 0.0));
        let err = tessellate_surface(&broken, 2, 2).unwrap_err();
        assert_eq!(err, MeshError::NonFiniteSample { u: 0.5, v: 0.0 });
    }

    #[test]
    fn test_fully_degenerate_surface_falls_back_to_up() {
        let point = surface_fn(|_, _| Point3::new(1.0, 2.0, 3.0));
        let (mesh, diagnostics) = tessellate_surface_with_diagnostics(&point, 2, 2).unwrap();
        assert_eq!(diagnostics.fallback_normals, 9);
        assert_eq!(diagnostics.degenerate_triangles, 8);
        assert!(mesh.normals.iter().all(|n| *n == Vector3::y()));
    }
}
