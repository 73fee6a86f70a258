use crate::core::types::ColorConversionCode;
use crate::core::Mat;
use crate::error::{Error, Result};

/// Convert a 3-channel image to single-channel grayscale
pub fn cvt_color(src: &Mat, dst: &mut Mat, code: ColorConversionCode) -> Result<()> {
    if src.channels() != 3 {
        return Err(Error::BadInput(
            "Source must have 3 channels".to_string(),
        ));
    }

    let is_bgr = code == ColorConversionCode::BgrToGray;

    *dst = Mat::new(src.rows(), src.cols(), 1)?;

    let src_data = src.data();
    let dst_data = dst.data_mut();

    for (gray, pixel) in dst_data.iter_mut().zip(src_data.chunks_exact(3)) {
        let (r, g, b) = if is_bgr {
            (pixel[2], pixel[1], pixel[0])
        } else {
            (pixel[0], pixel[1], pixel[2])
        };

        // Standard RGB to grayscale conversion weights
        *gray = (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)) as u8;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_gray_weights() {
        let mut src = Mat::new(1, 3, 3).unwrap();
        src.at_mut(0, 0).copy_from_slice(&[255, 0, 0]);
        src.at_mut(0, 1).copy_from_slice(&[0, 255, 0]);
        src.at_mut(0, 2).copy_from_slice(&[0, 0, 255]);

        let mut gray = Mat::new(1, 1, 1).unwrap();
        cvt_color(&src, &mut gray, ColorConversionCode::RgbToGray).unwrap();

        assert_eq!(gray.get(0, 0), (0.299f32 * 255.0) as u8);
        assert_eq!(gray.get(0, 1), (0.587f32 * 255.0) as u8);
        assert_eq!(gray.get(0, 2), (0.114f32 * 255.0) as u8);
    }

    #[test]
    fn test_bgr_swaps_channels() {
        let mut src = Mat::new(1, 1, 3).unwrap();
        src.at_mut(0, 0).copy_from_slice(&[255, 0, 0]);

        let mut gray = Mat::new(1, 1, 1).unwrap();
        cvt_color(&src, &mut gray, ColorConversionCode::BgrToGray).unwrap();

        // First channel is treated as blue
        assert_eq!(gray.get(0, 0), (0.114f32 * 255.0) as u8);
    }

    #[test]
    fn test_rejects_single_channel() {
        let src = Mat::new(2, 2, 1).unwrap();
        let mut dst = Mat::new(1, 1, 1).unwrap();
        assert!(cvt_color(&src, &mut dst, ColorConversionCode::RgbToGray).is_err());
    }
}
