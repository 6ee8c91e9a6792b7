/// Sampling grid shared by the revolve and surface generators.
///
/// Rows run along the profile (`i ∈ [0, rows)`), columns around the sweep.
/// Samples are stored for the `columns` unique columns only; when the seam is
/// duplicated an extra column repeating column 0 is emitted on output.
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};

/// Squared length below which a sum of unit normals counts as cancelled
pub(crate) const DEGENERATE_EPSILON: f64 = 1e-24;
/// Tangent length, relative to the longer tangent, below which it counts as vanished
pub(crate) const TANGENT_EPSILON: f64 = 1e-9;
/// `sin²` of the angle below which two tangents count as parallel
pub(crate) const PARALLEL_EPSILON: f64 = 1e-18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridLayout {
    /// Sample rows, `steps + 1`
    pub rows: usize,
    /// Unique sample columns
    pub columns: usize,
    pub share_seam: bool,
}

impl GridLayout {
    /// Validate step counts and build the layout for a `row_steps` by
    /// `column_steps` quad grid
    pub fn new(
        row_name: &'static str,
        row_steps: u32,
        column_name: &'static str,
        column_steps: u32,
        share_seam: bool,
    ) -> Result<Self> {
        if row_steps == 0 {
            return Err(MeshError::invalid_argument(row_name, "must be at least 1"));
        }
        if column_steps == 0 {
            return Err(MeshError::invalid_argument(column_name, "must be at least 1"));
        }

        let layout = Self {
            rows: row_steps as usize + 1,
            columns: column_steps as usize,
            share_seam,
        };

        let vertices = layout.rows as u64 * layout.emitted_columns() as u64;
        if vertices > u64::from(u32::MAX) {
            return Err(MeshError::TooManyVertices { vertices });
        }

        Ok(layout)
    }

    /// Columns written to the vertex buffer
    pub fn emitted_columns(&self) -> usize {
        if self.share_seam {
            self.columns
        } else {
            self.columns + 1
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.rows * self.emitted_columns()
    }

    pub fn index_count(&self) -> usize {
        6 * (self.rows - 1) * self.columns
    }

    /// Vertex index of grid point `(i, j)` for `j ∈ [0, columns]`
    pub fn vertex_index(&self, i: usize, j: usize) -> u32 {
        let j = if self.share_seam { j % self.columns } else { j };
        (i * self.emitted_columns() + j) as u32
    }

    /// Two counter-clockwise triangles per quad:
    /// `(i,j) (i+1,j) (i+1,j+1)` and `(i,j) (i+1,j+1) (i,j+1)`
    pub fn emit_indices(&self, indices: &mut Vec<u32>) {
        indices.reserve(self.index_count());
        for i in 0..self.rows - 1 {
            for j in 0..self.columns {
                let a = self.vertex_index(i, j);
                let b = self.vertex_index(i + 1, j);
                let c = self.vertex_index(i + 1, j + 1);
                let d = self.vertex_index(i, j + 1);
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
    }
}

/// Row-major sample storage over the unique columns of a layout
#[derive(Debug, Clone)]
pub(crate) struct SampleGrid<T> {
    pub rows: usize,
    pub columns: usize,
    pub data: Vec<T>,
}

impl<T: Copy> SampleGrid<T> {
    pub fn from_rows(rows: usize, columns: usize, data: Vec<Vec<T>>) -> Self {
        let data: Vec<T> = data.into_iter().flatten().collect();
        debug_assert_eq!(data.len(), rows * columns);
        Self {
            rows,
            columns,
            data,
        }
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.columns + j]
    }
}

/// Map every row index through `f`, on the rayon pool when the `parallel`
/// feature is enabled
pub(crate) fn map_rows<T, F>(rows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..rows).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..rows).map(f).collect()
    }
}

/// Unit `a × b`, or `None` when either tangent vanished next to the other
/// or the two are parallel.
///
/// Both tests are relative to the tangent lengths, so a surface keeps its
/// normals at any scale.
pub(crate) fn surface_normal(a: Vector3<f64>, b: Vector3<f64>) -> Option<Vector3<f64>> {
    let (la, lb) = (a.norm(), b.norm());
    if !(la.is_finite() && lb.is_finite()) || la.min(lb) <= TANGENT_EPSILON * la.max(lb) {
        return None;
    }

    let normal = a.cross(&b);
    let len_sq = normal.norm_squared();
    if !(len_sq.is_finite() && len_sq > PARALLEL_EPSILON * (la * lb).powi(2)) {
        return None;
    }
    let unit = normal / len_sq.sqrt();
    unit.iter().all(|c| c.is_finite()).then_some(unit)
}

/// Normalize `v`, or return `None` when it is too short or not finite
pub(crate) fn unit_or_none(v: Vector3<f64>) -> Option<Vector3<f64>> {
    let len_sq = v.norm_squared();
    if len_sq.is_finite() && len_sq > DEGENERATE_EPSILON {
        let unit = v / len_sq.sqrt();
        unit.iter().all(|c| c.is_finite()).then_some(unit)
    } else {
        None
    }
}

/// How finite differences treat the ends of the column axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnEdges {
    /// Column `columns - 1` neighbours column 0
    Periodic,
    /// One-sided differences at the first and last column
    Clamped,
}

/// Tangents along rows and columns at `(i, j)` by central differences,
/// one-sided at the row ends (and column ends when clamped)
pub(crate) fn difference_tangents(
    grid: &SampleGrid<Point3<f64>>,
    i: usize,
    j: usize,
    edges: ColumnEdges,
) -> (Vector3<f64>, Vector3<f64>) {
    let last_row = grid.rows - 1;
    let (up, down) = (i.saturating_sub(1), (i + 1).min(last_row));
    let along_rows = grid.get(down, j) - grid.get(up, j);

    let along_columns = match edges {
        ColumnEdges::Periodic => {
            let prev = (j + grid.columns - 1) % grid.columns;
            let next = (j + 1) % grid.columns;
            grid.get(i, next) - grid.get(i, prev)
        }
        ColumnEdges::Clamped => {
            let last_column = grid.columns - 1;
            grid.get(i, (j + 1).min(last_column)) - grid.get(i, j.saturating_sub(1))
        }
    };

    (along_rows, along_columns)
}
