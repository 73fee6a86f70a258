//! # SPHORB-Rust
//!
//! A pure Rust implementation of the SPHORB spherical binary feature
//! detector and descriptor.
//!
//! Planar feature pipelines run directly on an equirectangular panorama
//! distort distances non-uniformly near the poles, producing unstable
//! keypoints and rotation-variant descriptors. This library instead
//! resamples the sphere onto a geodesic grid of hexagonally-connected
//! pixels stored as five congruent diamond-shaped parts, detects corners
//! with a hexagonal accelerated-segment test, describes them with an
//! oriented 256-bit binary comparison pattern, and maps the results back
//! to equirectangular coordinates.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sphorb::prelude::*;
//! use sphorb::imgcodecs::imread;
//!
//! # fn main() -> sphorb::error::Result<()> {
//! let detector = SPHORB::from_data_dir("Data", 500, 7, 20)?;
//!
//! let pano = imread("panorama.jpg")?;
//! let (keypoints, descriptors) = detector.detect_and_compute(&pano)?;
//! assert_eq!(keypoints.len(), descriptors.len());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod features;
pub mod grid;
pub mod imgcodecs;
pub mod imgproc;
pub mod pfm;

pub mod prelude {
    //! Convenience module that re-exports commonly used items
    pub use crate::core::{Mat, Point, Point2f, Point3f, Size};
    pub use crate::error::{Error, Result};
    pub use crate::features::{KeyPoint, SPHORB};
    pub use crate::grid::{GridLevel, GridTables};
}
