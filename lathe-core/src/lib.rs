/// Lathe Core Library - Parametric surface tessellation
///
/// Turns 2D profile curves (revolved about the vertical axis) and general
/// parametric surfaces into indexed triangle meshes with per-vertex normals,
/// ready for upload into vertex and index buffers.

pub mod error;
pub mod geometry;
mod grid;
pub mod profile;
pub mod revolve;
pub mod surface;

// Re-export commonly used types
pub use error::{MeshError, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use profile::{from_fn, Profile, ProfileCurve};
pub use revolve::{
    revolve_profile, revolve_profile_shared_seam, revolve_profile_with_options, MeshDiagnostics,
    NormalStrategy, RevolveOptions,
};
pub use surface::{surface_fn, tessellate_surface, tessellate_surface_with_diagnostics, Surface};
