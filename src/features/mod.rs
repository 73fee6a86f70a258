//! Feature detection and description on the storage grid.

pub mod descriptor;
pub mod keypoints;
pub mod nonmax;
pub mod orientation;
pub mod pattern;
pub mod sfast;
pub mod sphorb;

pub use descriptor::*;
pub use keypoints::*;
pub use nonmax::*;
pub use orientation::*;
pub use sfast::{Corner, DEFAULT_ARC_LENGTH, RING_OFFSETS};
pub use sphorb::SPHORB;
