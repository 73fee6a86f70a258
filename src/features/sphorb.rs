use crate::core::types::{ColorConversionCode, Size};
use crate::core::{Mat, Point};
use crate::error::{Error, Result};
use crate::features::descriptor::{compute_descriptor, DESCRIPTOR_SIZE};
use crate::features::keypoints::{features_per_level, retain_best, KeyPoint};
use crate::features::nonmax::nonmax_suppression;
use crate::features::orientation::ic_angle;
use crate::features::pattern::{pattern_points, HEX_GAUSSIAN_KERNEL};
use crate::features::sfast::{self, DEFAULT_ARC_LENGTH};
use crate::grid::{extend_parts, map_keypoints, split_sphere, GridTables, EDGE, EDGE_DESC};
use crate::imgproc::{cvt_color, filter_2d, resize_area};
use std::path::Path;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// SPHORB spherical feature detector and descriptor extractor.
///
/// Owns the per-level geodesic-grid tables and runs the full pyramid:
/// resample, extend, detect, suppress, orient, describe, map back.
/// Detection is a pure function of the input image, so a detector can be
/// shared freely across calls.
pub struct SPHORB {
    n_features: usize,
    n_levels: usize,
    barrier: i32,
    arc_length: usize,
    tables: GridTables,
    pattern: Vec<Point>,
}

impl SPHORB {
    /// Build a detector from a directory of precomputed table files.
    pub fn from_data_dir<P: AsRef<Path>>(
        dir: P,
        n_features: usize,
        n_levels: usize,
        barrier: i32,
    ) -> Result<Self> {
        let tables = GridTables::load(dir)?;
        Self::with_tables(tables, n_features, n_levels, barrier)
    }

    /// Build a detector around pre-constructed tables.
    ///
    /// `n_levels` is clamped to the number of available table sets.
    pub fn with_tables(
        tables: GridTables,
        n_features: usize,
        n_levels: usize,
        barrier: i32,
    ) -> Result<Self> {
        if tables.levels.is_empty() {
            return Err(Error::Initialization(
                "grid tables hold no levels".to_string(),
            ));
        }
        let n_levels = n_levels.clamp(1, tables.levels.len());

        Ok(Self {
            n_features,
            n_levels,
            barrier,
            arc_length: DEFAULT_ARC_LENGTH,
            tables,
            pattern: pattern_points(),
        })
    }

    /// Override the minimum contiguous arc length of the segment test.
    #[must_use]
    pub fn with_arc_length(mut self, arc_length: usize) -> Self {
        self.arc_length = arc_length;
        self
    }

    /// Descriptor size in bytes
    #[must_use]
    pub fn descriptor_size(&self) -> usize {
        DESCRIPTOR_SIZE
    }

    #[must_use]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Detect keypoints and compute their descriptors.
    pub fn detect_and_compute(
        &self,
        image: &Mat,
    ) -> Result<(Vec<KeyPoint>, Vec<[u8; DESCRIPTOR_SIZE]>)> {
        self.run(image, true)
    }

    /// Detect keypoints only.
    pub fn detect(&self, image: &Mat) -> Result<Vec<KeyPoint>> {
        Ok(self.run(image, false)?.0)
    }

    fn run(
        &self,
        image: &Mat,
        with_descriptors: bool,
    ) -> Result<(Vec<KeyPoint>, Vec<[u8; DESCRIPTOR_SIZE]>)> {
        if image.is_empty() {
            return Err(Error::BadInput("input image is empty".to_string()));
        }

        let gray = match image.channels() {
            1 => image.clone(),
            3 => {
                let mut gray = Mat::new(1, 1, 1)?;
                cvt_color(image, &mut gray, ColorConversionCode::RgbToGray)?;
                gray
            }
            n => {
                return Err(Error::BadInput(format!(
                    "expected a 1- or 3-channel image, got {n} channels"
                )));
            }
        };

        let budgets = features_per_level(self.n_features, self.n_levels);

        #[cfg(feature = "rayon")]
        let per_level = (0..self.n_levels)
            .into_par_iter()
            .map(|level| self.process_level(&gray, level, budgets[level], with_descriptors))
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "rayon"))]
        let per_level = (0..self.n_levels)
            .map(|level| self.process_level(&gray, level, budgets[level], with_descriptors))
            .collect::<Result<Vec<_>>>()?;

        let mut keypoints = Vec::new();
        let mut descriptors = Vec::new();
        for (kps, descs) in per_level {
            keypoints.extend(kps);
            descriptors.extend(descs);
        }

        Ok((keypoints, descriptors))
    }

    fn process_level(
        &self,
        gray: &Mat,
        level: usize,
        budget: usize,
        with_descriptors: bool,
    ) -> Result<(Vec<KeyPoint>, Vec<[u8; DESCRIPTOR_SIZE]>)> {
        let grid = &self.tables.levels[level];
        let cells = grid.cells;

        // Resample the panorama onto this level's grid resolution
        let size = Size::new((cells * 5) as i32, (cells * 5 / 2) as i32);
        let resized = resize_area(gray, size)?;

        let parts: Vec<Mat> = grid
            .img_tables
            .iter()
            .map(|table| split_sphere(&resized, table))
            .collect::<Result<Vec<_>>>()?;

        let mut extended = extend_parts(&parts, EDGE)?;

        let mut level_keypoints = Vec::new();
        for (p, part) in extended.iter().enumerate() {
            let corners = sfast::detect(part, &grid.mask, EDGE, self.barrier, self.arc_length)?;
            let scores = sfast::score(part, &corners, self.barrier, self.arc_length);
            level_keypoints.extend(nonmax_suppression(&corners, &scores, p as i32));
        }

        if level_keypoints.len() > budget {
            retain_best(&mut level_keypoints, budget);
        }

        for kp in &mut level_keypoints {
            kp.angle = ic_angle(&extended[kp.part_id as usize], EDGE_DESC as i32, kp.pt);
        }

        let descriptors = if with_descriptors {
            for part in &mut extended {
                *part = filter_2d(part, &HEX_GAUSSIAN_KERNEL, 7)?;
            }

            level_keypoints
                .iter()
                .map(|kp| {
                    compute_descriptor(
                        &extended[kp.part_id as usize],
                        kp.pt,
                        kp.angle,
                        &self.pattern,
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        let scale = self.tables.levels[0].cells as f32 / cells as f32;
        map_keypoints(
            &mut level_keypoints,
            &grid.geo,
            level,
            scale,
            gray.rows(),
            EDGE,
        )?;

        Ok((level_keypoints, descriptors))
    }
}
