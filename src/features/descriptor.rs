use crate::core::{Mat, Point, Point2f};

/// Descriptor length in bytes (256 comparison bits)
pub const DESCRIPTOR_SIZE: usize = 32;

/// Compute the oriented 256-bit binary descriptor at one keypoint.
///
/// The sampling offsets live in the skewed grid frame; the rotation is
/// carried out in the Euclidean lift and mapped back, which folds into the
/// coefficients `a' = a + d`, `b' = a - d`, `c' = 2d` with `a = cos`,
/// `b = sin`, `d = b * sqrt(3)/3`. Samples falling outside the extended
/// part clamp to its border. Bit k lands in the low-order bit of byte k/8.
#[must_use]
pub fn compute_descriptor(
    part: &Mat,
    pt: Point2f,
    angle_degrees: f32,
    pattern: &[Point],
) -> [u8; DESCRIPTOR_SIZE] {
    let angle = angle_degrees.to_radians();
    let a = angle.cos();
    let b = angle.sin();
    let d = b * 3.0f32.sqrt() / 3.0;
    let (a, b, c) = (a + d, a - d, 2.0 * d);

    let rows = part.rows() as i32;
    let cols = part.cols() as i32;
    let step = part.step() as i32;
    let data = part.data();

    #[allow(clippy::cast_possible_truncation)]
    let cy = pt.y.round() as i32;
    #[allow(clippy::cast_possible_truncation)]
    let cx = pt.x.round() as i32;

    let sample = |p: Point| -> i32 {
        #[allow(clippy::cast_possible_truncation)]
        let row = (p.y as f32 * a + p.x as f32 * c).round() as i32;
        #[allow(clippy::cast_possible_truncation)]
        let col = (p.x as f32 * b - p.y as f32 * c).round() as i32;

        let y = (cy + row).clamp(0, rows - 1);
        let x = (cx + col).clamp(0, cols - 1);
        i32::from(data[(y * step + x) as usize])
    };

    let mut descriptor = [0u8; DESCRIPTOR_SIZE];
    for (byte, chunk) in descriptor.iter_mut().zip(pattern.chunks_exact(16)) {
        let mut val = 0u8;
        for bit in 0..8 {
            let t0 = sample(chunk[2 * bit]);
            let t1 = sample(chunk[2 * bit + 1]);
            val |= u8::from(t0 < t1) << bit;
        }
        *byte = val;
    }

    descriptor
}

/// Hamming distance between two descriptors
#[must_use]
pub fn hamming_distance(a: &[u8; DESCRIPTOR_SIZE], b: &[u8; DESCRIPTOR_SIZE]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}
