//! The geodesic-grid geometric model.
//!
//! The sphere is discretized into near-equilateral triangles and stored as
//! five congruent diamond-shaped parts. This module owns the per-level
//! precomputed tables, the sphere-to-grid resampler, the inter-part boundary
//! extension and the mapping of grid keypoints back to equirectangular
//! coordinates.

pub mod extend;
pub mod mapping;
pub mod resample;
pub mod tables;

pub use extend::*;
pub use mapping::*;
pub use resample::*;
pub use tables::*;
