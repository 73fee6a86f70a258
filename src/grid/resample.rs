use crate::core::Mat;
use crate::error::{Error, Result};
use ndarray::Array3;

/// Render one storage-grid part from an equirectangular image.
///
/// Every output pixel carries a precomputed source position and bilinear
/// weight pair `(lx, ly, wh, wv)`. The horizontal axis is longitude and
/// wraps modulo the image width; the vertical axis is latitude and does not.
pub fn split_sphere(image: &Mat, table: &Array3<f32>) -> Result<Mat> {
    if image.channels() != 1 {
        return Err(Error::BadInput(
            "split_sphere requires a grayscale image".to_string(),
        ));
    }

    let (rows, cols, ch) = table.dim();
    if ch != 4 {
        return Err(Error::BadInput(format!(
            "resampling table must have 4 channels, got {ch}"
        )));
    }

    let src_rows = image.rows();
    let src_cols = image.cols();
    let src = image.data();

    let mut part = Mat::new(rows, cols, 1)?;
    let out = part.data_mut();

    for y in 0..rows {
        for x in 0..cols {
            let lx = table[[y, x, 0]];
            let ly = table[[y, x, 1]];
            let wh = table[[y, x, 2]];
            let wv = table[[y, x, 3]];

            let ix = (lx as usize).min(src_cols - 1);
            let iy = (ly as usize).min(src_rows - 1);
            let ix1 = (ix + 1) % src_cols;
            let iy1 = (iy + 1).min(src_rows - 1);

            let v1 = f32::from(src[iy * src_cols + ix]);
            let v2 = f32::from(src[iy * src_cols + ix1]);
            let v3 = f32::from(src[iy1 * src_cols + ix]);
            let v4 = f32::from(src[iy1 * src_cols + ix1]);

            let v12 = v1 * wh + v2 * (1.0 - wh);
            let v34 = v3 * wh + v4 * (1.0 - wh);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                out[y * cols + x] = (v12 * wv + v34 * (1.0 - wv)) as u8;
            }
        }
    }

    Ok(part)
}
