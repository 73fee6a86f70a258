//! Minimal PFM (portable float map) payload support.
//!
//! The precomputed grid tables ship as PFM blobs: a three-line text header
//! (`PF`, `width height`, `scale`) followed by packed little-endian f32
//! triplets. A negative scale means the rows are stored bottom-up and each
//! row-scan is reversed on load. `#` lines in the header are comments.

use crate::core::Mat;
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// A decoded PFM payload, rows in top-down order.
#[derive(Debug, Clone)]
pub struct Pfm {
    pub width: usize,
    pub height: usize,
    /// `width * height * 3` floats, row-major
    pub data: Vec<f32>,
}

impl Pfm {
    /// Total number of floats in the payload
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn next_token(bytes: &[u8], pos: &mut usize) -> Option<String> {
    loop {
        while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
            *pos += 1;
        }
        if *pos < bytes.len() && bytes[*pos] == b'#' {
            while *pos < bytes.len() && bytes[*pos] != b'\n' {
                *pos += 1;
            }
            continue;
        }
        break;
    }

    if *pos >= bytes.len() {
        return None;
    }

    let start = *pos;
    while *pos < bytes.len() && !bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    Some(String::from_utf8_lossy(&bytes[start..*pos]).into_owned())
}

/// Read a PFM file, normalizing the payload to top-down row order.
pub fn read_pfm<P: AsRef<Path>>(path: P) -> Result<Pfm> {
    let bytes = std::fs::read(&path)?;
    let mut pos = 0usize;

    let magic = next_token(&bytes, &mut pos)
        .ok_or_else(|| Error::BadInput("PFM file is truncated".to_string()))?;
    if !magic.starts_with("PF") {
        return Err(Error::BadInput(format!(
            "Not a PFM file (magic {magic:?})"
        )));
    }

    let width: usize = next_token(&bytes, &mut pos)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::BadInput("PFM header has no valid width".to_string()))?;
    let height: usize = next_token(&bytes, &mut pos)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::BadInput("PFM header has no valid height".to_string()))?;
    let scale: f32 = next_token(&bytes, &mut pos)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::BadInput("PFM header has no valid scale".to_string()))?;

    // Exactly one separator byte between the scale token and the payload
    pos += 1;

    let count = width * height * 3;
    if bytes.len() < pos + count * 4 {
        return Err(Error::BadInput(format!(
            "PFM payload too short: need {} floats, have {} bytes",
            count,
            bytes.len().saturating_sub(pos)
        )));
    }

    let floats: Vec<f32> = bytes[pos..pos + count * 4]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let data = if scale < 0.0 {
        // Stored bottom-up: reverse the row order
        let row_len = width * 3;
        let mut out = vec![0.0f32; count];
        for (file_row, chunk) in floats.chunks_exact(row_len).enumerate() {
            let out_row = height - 1 - file_row;
            out[out_row * row_len..(out_row + 1) * row_len].copy_from_slice(chunk);
        }
        out
    } else {
        floats
    };

    Ok(Pfm {
        width,
        height,
        data,
    })
}

/// Write a PFM file in top-down order (positive scale).
pub fn write_pfm<P: AsRef<Path>>(path: P, width: usize, height: usize, data: &[f32]) -> Result<()> {
    if data.len() != width * height * 3 {
        return Err(Error::BadInput(format!(
            "PFM payload must hold {} floats, got {}",
            width * height * 3,
            data.len()
        )));
    }

    let mut file = std::fs::File::create(path)?;
    write!(file, "PF\n{width} {height}\n1.0\n")?;
    for &v in data {
        file.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Load an 8-bit single-channel mask image.
///
/// Accepts any format the `image` crate can decode; multi-channel files are
/// collapsed to luma.
pub fn read_mask<P: AsRef<Path>>(path: P) -> Result<Mat> {
    crate::imgcodecs::imread_grayscale(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn test_roundtrip_topdown() {
        let path = temp_file("sphorb_pfm_roundtrip.pfm");
        let data: Vec<f32> = (0..2 * 3 * 3).map(|i| i as f32 * 0.5).collect();

        write_pfm(&path, 3, 2, &data).unwrap();
        let pfm = read_pfm(&path).unwrap();

        assert_eq!(pfm.width, 3);
        assert_eq!(pfm.height, 2);
        assert_eq!(pfm.data, data);
    }

    #[test]
    fn test_bottom_up_rows_are_reversed() {
        let path = temp_file("sphorb_pfm_bottomup.pfm");

        // Hand-build a 2-row bottom-up file: the file's first row is the
        // image's last row.
        let mut bytes = b"PF\n2 2\n-1.0\n".to_vec();
        let bottom_row: Vec<f32> = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let top_row: Vec<f32> = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        for v in bottom_row.iter().chain(top_row.iter()) {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        let pfm = read_pfm(&path).unwrap();
        assert_eq!(&pfm.data[..6], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(&pfm.data[6..], &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
    }

    #[test]
    fn test_header_comments_are_skipped() {
        let path = temp_file("sphorb_pfm_comments.pfm");

        let mut bytes = b"PF\n# generated table\n1 1\n1.0\n".to_vec();
        for v in [7.0f32, 8.0, 9.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        std::fs::write(&path, bytes).unwrap();

        let pfm = read_pfm(&path).unwrap();
        assert_eq!(pfm.data, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let path = temp_file("sphorb_pfm_badmagic.pfm");
        std::fs::write(&path, b"P6\n1 1\n255\n").unwrap();
        assert!(read_pfm(&path).is_err());
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let path = temp_file("sphorb_pfm_truncated.pfm");
        std::fs::write(&path, b"PF\n4 4\n1.0\n\x00\x00").unwrap();
        assert!(read_pfm(&path).is_err());
    }
}
