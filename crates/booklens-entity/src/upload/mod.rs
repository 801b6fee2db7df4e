//! Upload job entity and lifecycle types.

pub mod model;
pub mod status;

pub use model::UploadJob;
pub use status::{JobOutcome, UploadStatus};
