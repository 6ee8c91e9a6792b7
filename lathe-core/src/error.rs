/// Errors produced by mesh generation and mesh validation
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A step count or other argument is outside its valid range
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The grid needs more vertices than a `u32` index can address
    #[error("mesh would need {vertices} vertices, exceeding the u32 index range")]
    TooManyVertices { vertices: u64 },

    /// A profile or surface returned a NaN or infinite point
    #[error("sample at parameter ({u}, {v}) is not finite")]
    NonFiniteSample { u: f64, v: f64 },

    #[error("buffer length mismatch: {positions} positions, {normals} normals")]
    BufferLengthMismatch { positions: usize, normals: usize },

    #[error("index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    #[error("normal {index} is not a finite unit vector")]
    InvalidNormal { index: usize },
}

impl MeshError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MeshError::invalid_argument("profile_steps", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid argument `profile_steps`: must be at least 1"
        );

        let err = MeshError::IndexOutOfBounds {
            index: 9,
            vertex_count: 4,
        };
        assert_eq!(err.to_string(), "index 9 out of bounds for 4 vertices");
    }
}
