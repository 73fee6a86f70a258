use crate::core::Mat;
use crate::error::{Error, Result};

/// Correlate a single-channel image with a dense square kernel.
///
/// Border pixels replicate the nearest edge pixel. The kernel is applied
/// as-is (correlation, no flip), matching the usual filter2D convention.
pub fn filter_2d(src: &Mat, kernel: &[f64], ksize: usize) -> Result<Mat> {
    if src.channels() != 1 {
        return Err(Error::BadInput(
            "filter_2d requires a single-channel image".to_string(),
        ));
    }
    if ksize % 2 == 0 || kernel.len() != ksize * ksize {
        return Err(Error::BadInput(format!(
            "Kernel must be odd and square, got {} entries for size {}",
            kernel.len(),
            ksize
        )));
    }

    let rows = src.rows();
    let cols = src.cols();
    let half = (ksize / 2) as i32;

    let mut dst = Mat::new(rows, cols, 1)?;
    let src_data = src.data();
    let dst_data = dst.data_mut();

    for row in 0..rows {
        for col in 0..cols {
            let mut sum = 0.0f64;

            for ky in -half..=half {
                let y = (row as i32 + ky).clamp(0, rows as i32 - 1) as usize;
                for kx in -half..=half {
                    let x = (col as i32 + kx).clamp(0, cols as i32 - 1) as usize;
                    let k = kernel[((ky + half) as usize) * ksize + (kx + half) as usize];
                    sum += k * f64::from(src_data[y * cols + x]);
                }
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                dst_data[row * cols + col] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_kernel() {
        let mut src = Mat::new(5, 5, 1).unwrap();
        for row in 0..5 {
            for col in 0..5 {
                src.set(row, col, (row * 10 + col) as u8);
            }
        }

        let mut kernel = vec![0.0; 9];
        kernel[4] = 1.0;

        let dst = filter_2d(&src, &kernel, 3).unwrap();
        assert_eq!(dst.data(), src.data());
    }

    #[test]
    fn test_normalized_kernel_keeps_constant_image() {
        let src = Mat::new_with_default(7, 9, 1, 99).unwrap();
        let kernel = vec![1.0 / 9.0; 9];

        let dst = filter_2d(&src, &kernel, 3).unwrap();
        assert!(dst.data().iter().all(|&v| v == 99));
    }

    #[test]
    fn test_rejects_even_kernel() {
        let src = Mat::new(4, 4, 1).unwrap();
        assert!(filter_2d(&src, &[0.25; 4], 2).is_err());
    }
}
