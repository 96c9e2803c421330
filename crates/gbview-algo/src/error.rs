pub type Result<T> = std::result::Result<T, GeometryError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("extrusion height must be positive, got {0}")]
    InvalidHeight(f64),

    #[error("triangulation failed: {0}")]
    Triangulation(String),
}
