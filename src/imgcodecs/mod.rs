use crate::core::Mat;
use crate::error::{Error, Result};
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use std::path::Path;

/// Read an image from file
///
/// Color images are returned as interleaved RGB, grayscale as a single
/// channel. Any other on-disk format is converted to RGB8.
pub fn imread<P: AsRef<Path>>(path: P) -> Result<Mat> {
    let img = image::open(path)?;

    match img {
        DynamicImage::ImageLuma8(buffer) => {
            let (width, height) = buffer.dimensions();
            let data = buffer.into_raw();
            Mat::from_raw(data, height as usize, width as usize, 1)
        }
        DynamicImage::ImageRgb8(buffer) => {
            let (width, height) = buffer.dimensions();
            let data = buffer.into_raw();
            Mat::from_raw(data, height as usize, width as usize, 3)
        }
        _ => {
            let rgb_img = img.to_rgb8();
            let (width, height) = rgb_img.dimensions();
            let data = rgb_img.into_raw();
            Mat::from_raw(data, height as usize, width as usize, 3)
        }
    }
}

/// Read an image from file as single-channel grayscale
pub fn imread_grayscale<P: AsRef<Path>>(path: P) -> Result<Mat> {
    let img = image::open(path)?.to_luma8();
    let (width, height) = img.dimensions();
    let data = img.into_raw();
    Mat::from_raw(data, height as usize, width as usize, 1)
}

/// Write an image to file
pub fn imwrite<P: AsRef<Path>>(path: P, mat: &Mat) -> Result<()> {
    match mat.channels() {
        1 => {
            let buffer = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(
                mat.cols() as u32,
                mat.rows() as u32,
                mat.data().to_vec(),
            )
            .ok_or_else(|| Error::BadInput("Failed to create image buffer".to_string()))?;

            buffer.save(path)?;
        }
        3 => {
            let buffer = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
                mat.cols() as u32,
                mat.rows() as u32,
                mat.data().to_vec(),
            )
            .ok_or_else(|| Error::BadInput("Failed to create image buffer".to_string()))?;

            buffer.save(path)?;
        }
        _ => {
            return Err(Error::BadInput(format!(
                "imwrite doesn't support {} channels",
                mat.channels()
            )));
        }
    }

    Ok(())
}
