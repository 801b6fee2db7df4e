//! Shared value types: typed identifiers and formatting helpers.

pub mod id;
pub mod size;

pub use id::UploadId;
pub use size::format_size;
