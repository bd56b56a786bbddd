//! Camera-space transforms
//!
//! Drawing itself belongs to an external renderer; this module only
//! rewrites each camera-attached entity's render transform.

pub mod camera;

pub use camera::Camera;
