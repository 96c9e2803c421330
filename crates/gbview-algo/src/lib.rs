pub mod bounds;
pub mod camera;
pub mod error;
pub mod extrusion;
pub mod projection;
pub mod scene;
pub mod session;
pub mod svg_writer;
pub mod triangulate;

pub use bounds::{compute_bounds, SceneBounds};
pub use error::{GeometryError, Result};
pub use extrusion::{ExtrusionRenderer, MaterialOptions};
pub use projection::{project, Projection};
pub use scene::{Scene, SceneTag};
pub use session::RenderSession;
