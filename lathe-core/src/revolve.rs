/// Surface-of-revolution tessellation.
///
/// A profile `(radius, height)` is sampled at `t_i = i / profile_steps` and
/// swept around the vertical axis at `θ_j = 2π·j / revolution_steps`, giving
/// the position `(r cos θ, h, r sin θ)` for every grid point.
///
/// # Normals
///
/// Normals are `∂P/∂t × ∂P/∂θ`, which agrees with the triangle winding so
/// every non-degenerate triangle is counter-clockwise seen from the side its
/// normals face. When a tangent vanishes (at a pole, where the radius is 0)
/// the normal falls back to the revolution axis, pointing down when the
/// profile leaves the axis and up when it arrives at it.
use nalgebra::{Point2, Point3, Vector2, Vector3};
use std::f64::consts::TAU;
use tracing::{debug, warn};

use crate::error::{MeshError, Result};
use crate::geometry::Mesh;
use crate::grid::{self, ColumnEdges, GridLayout, SampleGrid};
use crate::profile::Profile;

/// Triangles with an area below this are reported as degenerate
pub const DEGENERATE_AREA: f32 = 1e-10;

/// How vertex normals are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalStrategy {
    /// Analytic when the profile has a derivative, finite differences otherwise
    #[default]
    Auto,
    /// Profile derivative only; a profile without one is rejected
    Analytic,
    /// Central differences of neighbouring grid samples
    FiniteDifference,
}

/// Generation policy for [`revolve_profile_with_options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevolveOptions {
    /// Share one vertex per ring at the seam instead of duplicating it
    pub share_seam: bool,
    pub normals: NormalStrategy,
}

impl RevolveOptions {
    /// One vertex per grid point, seam column duplicated
    pub const DUPLICATED_SEAM: Self = Self {
        share_seam: false,
        normals: NormalStrategy::Auto,
    };

    /// Seam vertices shared, normals from grid neighbours; suited to large grids
    pub const SHARED_SEAM: Self = Self {
        share_seam: true,
        normals: NormalStrategy::FiniteDifference,
    };
}

impl Default for RevolveOptions {
    fn default() -> Self {
        Self::DUPLICATED_SEAM
    }
}

/// Counters for numerical edge cases handled during generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshDiagnostics {
    /// Normals replaced by a fallback direction
    pub fallback_normals: usize,
    /// Zero-area triangles left in the index buffer (pole quads)
    pub degenerate_triangles: usize,
}

/// Revolve `profile` with a duplicated seam.
///
/// Produces `(profile_steps + 1) * (revolution_steps + 1)` vertices and
/// `6 * profile_steps * revolution_steps` indices.
pub fn revolve_profile<P>(profile: &P, profile_steps: u32, revolution_steps: u32) -> Result<Mesh>
where
    P: Profile + ?Sized,
{
    revolve_profile_with_options(
        profile,
        profile_steps,
        revolution_steps,
        RevolveOptions::DUPLICATED_SEAM,
    )
    .map(|(mesh, _)| mesh)
}

/// Revolve `profile` sharing the seam vertices.
///
/// Produces `(profile_steps + 1) * revolution_steps` vertices; the last quad
/// of every ring closes onto column 0.
pub fn revolve_profile_shared_seam<P>(
    profile: &P,
    profile_steps: u32,
    revolution_steps: u32,
) -> Result<Mesh>
where
    P: Profile + ?Sized,
{
    revolve_profile_with_options(
        profile,
        profile_steps,
        revolution_steps,
        RevolveOptions::SHARED_SEAM,
    )
    .map(|(mesh, _)| mesh)
}

/// Revolve `profile` with an explicit policy, returning diagnostics
pub fn revolve_profile_with_options<P>(
    profile: &P,
    profile_steps: u32,
    revolution_steps: u32,
    options: RevolveOptions,
) -> Result<(Mesh, MeshDiagnostics)>
where
    P: Profile + ?Sized,
{
    let layout = GridLayout::new(
        "profile_steps",
        profile_steps,
        "revolution_steps",
        revolution_steps,
        options.share_seam,
    )?;

    if revolution_steps < 3 {
        warn!(
            revolution_steps,
            "revolution with fewer than 3 steps encloses no volume"
        );
    }

    let rings = sample_profile(profile, layout.rows)?;
    let angles: Vec<(f64, f64)> = (0..layout.columns)
        .map(|j| (TAU * j as f64 / layout.columns as f64).sin_cos())
        .collect();

    // All positions exist before any normal is derived
    let positions = SampleGrid::from_rows(
        layout.rows,
        layout.columns,
        grid::map_rows(layout.rows, |i| {
            let p = rings[i].point;
            angles
                .iter()
                .map(|&(sin, cos)| Point3::new(p.x * cos, p.y, p.x * sin))
                .collect()
        }),
    );

    let derivatives = rings.iter().all(|ring| ring.derivative.is_some());
    let analytic = match options.normals {
        NormalStrategy::Auto => derivatives,
        NormalStrategy::Analytic if !derivatives => {
            return Err(MeshError::invalid_argument(
                "normals",
                "analytic normals need a profile with a closed-form derivative",
            ));
        }
        NormalStrategy::Analytic => true,
        NormalStrategy::FiniteDifference => false,
    };

    let rows = grid::map_rows(layout.rows, |i| {
        let mut fallbacks = 0;
        let normals: Vec<Vector3<f64>> = (0..layout.columns)
            .map(|j| {
                let (normal, radial_slope) = if analytic {
                    analytic_normal(&rings[i], angles[j])
                } else {
                    difference_normal(&positions, &rings, i, j)
                };
                normal.unwrap_or_else(|| {
                    fallbacks += 1;
                    axis_fallback(radial_slope)
                })
            })
            .collect();
        (normals, fallbacks)
    });

    let fallback_normals: usize = rows.iter().map(|(_, count)| count).sum();
    if fallback_normals > 0 {
        debug!(fallback_normals, "substituted axis normals at degenerate samples");
    }
    let normals = SampleGrid::from_rows(
        layout.rows,
        layout.columns,
        rows.into_iter().map(|(normals, _)| normals).collect(),
    );

    let mut mesh = Mesh::with_capacity(layout.vertex_count(), layout.index_count());
    for i in 0..layout.rows {
        for j in 0..layout.emitted_columns() {
            let column = j % layout.columns;
            mesh.positions.push(positions.get(i, column).cast::<f32>());
            mesh.normals.push(normals.get(i, column).cast::<f32>());
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
        share_seam = options.share_seam,
        analytic,
        degenerate_triangles = diagnostics.degenerate_triangles,
        "revolved profile"
    );

    Ok((mesh, diagnostics))
}

/// One profile sample and its derivative
#[derive(Debug, Clone, Copy)]
struct Ring {
    point: Point2<f64>,
    derivative: Option<Vector2<f64>>,
}

fn sample_profile<P>(profile: &P, rows: usize) -> Result<Vec<Ring>>
where
    P: Profile + ?Sized,
{
    let steps = (rows - 1) as f64;
    (0..rows)
        .map(|i| {
            let t = i as f64 / steps;
            let point = profile.sample(t);
            if !(point.x.is_finite() && point.y.is_finite()) {
                return Err(MeshError::NonFiniteSample { u: t, v: 0.0 });
            }
            Ok(Ring {
                point,
                derivative: profile.derivative(t),
            })
        })
        .collect()
}

/// `∂P/∂t × ∂P/∂θ` from the profile derivative, plus `dr/dt`
fn analytic_normal(ring: &Ring, (sin, cos): (f64, f64)) -> (Option<Vector3<f64>>, f64) {
    let r = ring.point.x;
    let d = ring.derivative.unwrap_or_else(Vector2::zeros);
    let along_profile = Vector3::new(d.x * cos, d.y, d.x * sin);
    let around_axis = Vector3::new(-r * sin, 0.0, r * cos);
    (grid::surface_normal(along_profile, around_axis), d.x)
}

/// Normal from neighbouring grid samples, plus the radial difference
/// across the same rows
fn difference_normal(
    positions: &SampleGrid<Point3<f64>>,
    rings: &[Ring],
    i: usize,
    j: usize,
) -> (Option<Vector3<f64>>, f64) {
    let (along_profile, around_axis) =
        grid::difference_tangents(positions, i, j, ColumnEdges::Periodic);
    let (up, down) = (i.saturating_sub(1), (i + 1).min(rings.len() - 1));
    let radial_slope = rings[down].point.x - rings[up].point.x;
    (grid::surface_normal(along_profile, around_axis), radial_slope)
}

/// Unit axis direction for a sample whose tangents vanished
fn axis_fallback(radial_slope: f64) -> Vector3<f64> {
    if radial_slope > 0.0 {
        -Vector3::y()
    } else {
        Vector3::y()
    }
}
