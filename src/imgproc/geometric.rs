use crate::core::types::Size;
use crate::core::Mat;
use crate::error::{Error, Result};

/// Resize an image by pixel-area averaging.
///
/// Every destination pixel averages the source rectangle it covers, with
/// fractional weights for partially-covered source cells. This is the
/// moire-free way to shrink a panorama before gridding it.
pub fn resize_area(src: &Mat, dsize: Size) -> Result<Mat> {
    if dsize.width <= 0 || dsize.height <= 0 {
        return Err(Error::BadInput(
            "Destination size must be positive".to_string(),
        ));
    }
    if src.is_empty() {
        return Err(Error::BadInput("Source image is empty".to_string()));
    }

    let new_rows = dsize.height as usize;
    let new_cols = dsize.width as usize;
    let channels = src.channels();

    let mut dst = Mat::new(new_rows, new_cols, channels)?;

    let scale_x = src.cols() as f64 / new_cols as f64;
    let scale_y = src.rows() as f64 / new_rows as f64;

    let src_data = src.data();
    let src_cols = src.cols();
    let src_rows = src.rows();

    for dst_row in 0..new_rows {
        let y0 = dst_row as f64 * scale_y;
        let y1 = (dst_row + 1) as f64 * scale_y;
        let iy0 = y0.floor() as usize;
        let iy1 = (y1.ceil() as usize).min(src_rows);

        for dst_col in 0..new_cols {
            let x0 = dst_col as f64 * scale_x;
            let x1 = (dst_col + 1) as f64 * scale_x;
            let ix0 = x0.floor() as usize;
            let ix1 = (x1.ceil() as usize).min(src_cols);

            let mut acc = [0.0f64; 4];
            let mut area = 0.0f64;

            for iy in iy0..iy1 {
                let wy = (iy as f64 + 1.0).min(y1) - (iy as f64).max(y0);
                if wy <= 0.0 {
                    continue;
                }
                for ix in ix0..ix1 {
                    let wx = (ix as f64 + 1.0).min(x1) - (ix as f64).max(x0);
                    if wx <= 0.0 {
                        continue;
                    }
                    let w = wx * wy;
                    let idx = (iy * src_cols + ix) * channels;
                    for ch in 0..channels {
                        acc[ch] += w * f64::from(src_data[idx + ch]);
                    }
                    area += w;
                }
            }

            let pixel = dst.at_mut(dst_row, dst_col);
            for ch in 0..channels {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    pixel[ch] = (acc[ch] / area).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    Ok(dst)
}
