//! Graph building topology model, validating converter and loop resolver.

pub mod convert;
pub mod error;
pub mod geom;
pub mod ingest;
pub mod model;
pub mod report;
pub mod resolve;
pub mod transform;

pub use convert::convert;
pub use error::{ConversionError, IngestError};
pub use model::Building;
