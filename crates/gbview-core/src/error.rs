/// First structural violation found while converting untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid graph building data")]
    NotAnObject,

    #[error("levels must be an array")]
    LevelsNotArray,

    #[error("invalid level at index {level}")]
    InvalidLevel { level: usize },

    #[error("invalid height at level {level}")]
    InvalidHeight { level: usize },

    #[error("invalid points at level {level}")]
    InvalidPoints { level: usize },

    #[error("invalid point format at levels[{level}].points.{key}: {raw}")]
    InvalidPoint {
        level: usize,
        key: String,
        raw: String,
    },

    #[error("invalid surfaces at level {level}")]
    SurfacesNotArray { level: usize },

    #[error("invalid surface at levels[{level}].surfaces[{index}]")]
    InvalidSurface { level: usize, index: usize },

    #[error("invalid spaces at level {level}")]
    SpacesNotArray { level: usize },

    #[error("invalid space at levels[{level}].spaces[{index}]")]
    InvalidSpace { level: usize, index: usize },

    #[error("invalid outer loop at levels[{level}].spaces[{space}]")]
    InvalidOuterLoop { level: usize, space: usize },

    #[error("invalid inner loops at levels[{level}].spaces[{space}]")]
    InvalidInnerLoops { level: usize, space: usize },

    #[error("invalid loop entry at {path}")]
    InvalidLoopEntry { path: String },

    #[error("units must be an array")]
    UnitsNotArray,

    #[error("invalid unit at index {unit}")]
    InvalidUnit { unit: usize },

    #[error("invalid space ids at units[{unit}]")]
    InvalidSpaceIds { unit: usize },

    #[error("missing properties at units[{unit}]")]
    MissingProperties { unit: usize },
}

impl ConversionError {
    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::LevelsNotArray => "levels_not_array",
            Self::InvalidLevel { .. } => "invalid_level",
            Self::InvalidHeight { .. } => "invalid_height",
            Self::InvalidPoints { .. } => "invalid_points",
            Self::InvalidPoint { .. } => "invalid_point",
            Self::SurfacesNotArray { .. } => "surfaces_not_array",
            Self::InvalidSurface { .. } => "invalid_surface",
            Self::SpacesNotArray { .. } => "spaces_not_array",
            Self::InvalidSpace { .. } => "invalid_space",
            Self::InvalidOuterLoop { .. } => "invalid_outer_loop",
            Self::InvalidInnerLoops { .. } => "invalid_inner_loops",
            Self::InvalidLoopEntry { .. } => "invalid_loop_entry",
            Self::UnitsNotArray => "units_not_array",
            Self::InvalidUnit { .. } => "invalid_unit",
            Self::InvalidSpaceIds { .. } => "invalid_space_ids",
            Self::MissingProperties { .. } => "missing_properties",
        }
    }

    /// Path of the offending field, `""` for the document root.
    pub fn path(&self) -> String {
        match self {
            Self::NotAnObject => String::new(),
            Self::LevelsNotArray => "levels".to_string(),
            Self::InvalidLevel { level } => format!("levels[{level}]"),
            Self::InvalidHeight { level } => format!("levels[{level}].height"),
            Self::InvalidPoints { level } => format!("levels[{level}].points"),
            Self::InvalidPoint { level, key, .. } => format!("levels[{level}].points.{key}"),
            Self::SurfacesNotArray { level } => format!("levels[{level}].surfaces"),
            Self::InvalidSurface { level, index } => format!("levels[{level}].surfaces[{index}]"),
            Self::SpacesNotArray { level } => format!("levels[{level}].spaces"),
            Self::InvalidSpace { level, index } => format!("levels[{level}].spaces[{index}]"),
            Self::InvalidOuterLoop { level, space } => {
                format!("levels[{level}].spaces[{space}].outerLoop")
            }
            Self::InvalidInnerLoops { level, space } => {
                format!("levels[{level}].spaces[{space}].innerLoops")
            }
            Self::InvalidLoopEntry { path } => path.clone(),
            Self::UnitsNotArray => "units".to_string(),
            Self::InvalidUnit { unit } => format!("units[{unit}]"),
            Self::InvalidSpaceIds { unit } => format!("units[{unit}].spaceIds"),
            Self::MissingProperties { unit } => format!("units[{unit}].properties"),
        }
    }
}

/// Failure of one ingestion attempt. `Display` is the single user-facing
/// string: `Error loading file: ...` or `Error parsing JSON: ...`.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Error loading file: {0}")]
    File(#[source] IngestFailure),

    #[error("Error parsing JSON: {0}")]
    Text(#[source] IngestFailure),

    #[error("Error loading sample: {0}")]
    Sample(#[source] IngestFailure),
}

impl IngestError {
    pub fn failure(&self) -> &IngestFailure {
        match self {
            Self::File(f) | Self::Text(f) | Self::Sample(f) => f,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestFailure {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Syntax(#[from] serde_json::Error),

    #[error("{0}")]
    Conversion(#[from] ConversionError),
}
