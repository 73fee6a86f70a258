use crate::core::Mat;
use crate::error::{Error, Result};
use crate::pfm::{read_mask, read_pfm};
use ndarray::Array3;
use std::path::Path;

/// Cell counts of the seven pyramid levels, finest first
pub const CELLS: [usize; 7] = [256, 204, 162, 128, 102, 80, 64];

/// Number of storage parts covering the sphere
pub const PARTS: usize = 5;

/// Ring radius of the hexagonal segment test
pub const EDGE_FAST: usize = 3;

/// Half-patch radius of the descriptor sampling pattern
pub const EDGE_DESC: usize = 15;

/// Total boundary extension applied to every storage part
pub const EDGE: usize = EDGE_FAST + EDGE_DESC;

/// Precomputed tables for one pyramid level.
///
/// All three tables are immutable after construction and shared read-only
/// by every detection call.
#[derive(Debug, Clone)]
pub struct GridLevel {
    /// Cell count `C`; parts are `(C+1) x (2C+1)` pixels
    pub cells: usize,
    /// Unit-sphere 3-D coordinates per grid vertex, shape `(C+1, 2C+1, 3)`
    pub geo: Array3<f32>,
    /// Per-part resampling tables `(lx, ly, wh, wv)`, shape `(C+1, 2C+1, 4)`
    pub img_tables: Vec<Array3<f32>>,
    /// Nonzero where a grid pixel lies inside the diamond's valid region
    pub mask: Mat,
}

impl GridLevel {
    /// Storage-part height before extension
    #[must_use]
    pub fn part_height(&self) -> usize {
        self.cells + 1
    }

    /// Storage-part width before extension
    #[must_use]
    pub fn part_width(&self) -> usize {
        2 * self.cells + 1
    }

    /// Build a level from in-memory tables, validating all shapes.
    pub fn from_parts(
        cells: usize,
        geo: Array3<f32>,
        img_tables: Vec<Array3<f32>>,
        mask: Mat,
    ) -> Result<Self> {
        let h = cells + 1;
        let w = 2 * cells + 1;

        if geo.dim() != (h, w, 3) {
            return Err(Error::Initialization(format!(
                "geo table for {cells} cells has shape {:?}, expected ({h}, {w}, 3)",
                geo.dim()
            )));
        }
        if img_tables.len() != PARTS {
            return Err(Error::Initialization(format!(
                "expected {PARTS} image tables, got {}",
                img_tables.len()
            )));
        }
        for (p, table) in img_tables.iter().enumerate() {
            if table.dim() != (h, w, 4) {
                return Err(Error::Initialization(format!(
                    "image table {p} for {cells} cells has shape {:?}, expected ({h}, {w}, 4)",
                    table.dim()
                )));
            }
        }
        if mask.rows() != h || mask.cols() != w || mask.channels() != 1 {
            return Err(Error::Initialization(format!(
                "mask for {cells} cells is {}x{}x{}, expected {h}x{w}x1",
                mask.rows(),
                mask.cols(),
                mask.channels()
            )));
        }

        Ok(Self {
            cells,
            geo,
            img_tables,
            mask,
        })
    }

    fn load(dir: &Path, cells: usize) -> Result<Self> {
        let h = cells + 1;
        let w = 2 * cells + 1;

        let geo_path = dir.join(format!("geoinfo{cells}.pfm"));
        let geo_pfm = read_pfm(&geo_path)
            .map_err(|e| Error::Initialization(format!("{}: {e}", geo_path.display())))?;
        if geo_pfm.width != w || geo_pfm.height != h {
            return Err(Error::Initialization(format!(
                "{}: is {}x{}, expected {w}x{h}",
                geo_path.display(),
                geo_pfm.width,
                geo_pfm.height
            )));
        }
        let geo = Array3::from_shape_vec((h, w, 3), geo_pfm.data)
            .map_err(|e| Error::Initialization(format!("{}: {e}", geo_path.display())))?;

        // Image tables hold 4 floats per pixel, but the container packs
        // triplets; the payload is padded up to the next multiple of 3.
        let logical = h * w * 4;
        let padded = logical.div_ceil(3) * 3;
        let mut img_tables = Vec::with_capacity(PARTS);
        for p in 0..PARTS {
            let path = dir.join(format!("imginfo{cells}_{p}.pfm"));
            let pfm = read_pfm(&path)
                .map_err(|e| Error::Initialization(format!("{}: {e}", path.display())))?;
            if pfm.len() != padded {
                return Err(Error::Initialization(format!(
                    "{}: holds {} floats, expected {padded}",
                    path.display(),
                    pfm.len()
                )));
            }
            let mut data = pfm.data;
            data.truncate(logical);
            let table = Array3::from_shape_vec((h, w, 4), data)
                .map_err(|e| Error::Initialization(format!("{}: {e}", path.display())))?;
            img_tables.push(table);
        }

        let mask_path = dir.join(format!("mask{cells}.bmp"));
        let mask = read_mask(&mask_path)
            .map_err(|e| Error::Initialization(format!("{}: {e}", mask_path.display())))?;

        Self::from_parts(cells, geo, img_tables, mask)
    }
}

/// The complete per-level table set owned by a detector instance.
#[derive(Debug, Clone)]
pub struct GridTables {
    pub levels: Vec<GridLevel>,
}

impl GridTables {
    /// Load every level's tables from a data directory.
    ///
    /// Expects `geoinfo<C>.pfm`, `imginfo<C>_<p>.pfm` for the five parts and
    /// `mask<C>.bmp` for each cell count.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut levels = Vec::with_capacity(CELLS.len());
        for &cells in &CELLS {
            levels.push(GridLevel::load(dir, cells)?);
        }
        Ok(Self { levels })
    }

    /// Build from pre-constructed levels (alternative table sources).
    pub fn from_levels(levels: Vec<GridLevel>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::Initialization(
                "at least one grid level is required".to_string(),
            ));
        }
        Ok(Self { levels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_validates_geo_shape() {
        let cells = 8;
        let geo = Array3::zeros((cells, 2 * cells + 1, 3));
        let img_tables = (0..PARTS)
            .map(|_| Array3::zeros((cells + 1, 2 * cells + 1, 4)))
            .collect();
        let mask = Mat::zeros(cells + 1, 2 * cells + 1).unwrap();

        assert!(GridLevel::from_parts(cells, geo, img_tables, mask).is_err());
    }

    #[test]
    fn test_from_parts_validates_mask_shape() {
        let cells = 8;
        let geo = Array3::zeros((cells + 1, 2 * cells + 1, 3));
        let img_tables = (0..PARTS)
            .map(|_| Array3::zeros((cells + 1, 2 * cells + 1, 4)))
            .collect();
        let mask = Mat::zeros(cells + 1, cells + 1).unwrap();

        assert!(GridLevel::from_parts(cells, geo, img_tables, mask).is_err());
    }

    #[test]
    fn test_missing_data_dir_fails_initialization() {
        let err = GridTables::load("/nonexistent/sphorb-data").unwrap_err();
        assert!(matches!(err, Error::Initialization(_)));
    }

    #[test]
    fn test_edge_constants() {
        assert_eq!(EDGE, 18);
        assert_eq!(CELLS.len(), 7);
    }
}
