//! # booklens-service
//!
//! The application-facing services: [`UploadService`] owns the submission
//! boundary and job lifecycle operations, [`CloudService`] serves the
//! cached aggregate views.

pub mod cloud;
pub mod upload;

pub use cloud::CloudService;
pub use upload::UploadService;
