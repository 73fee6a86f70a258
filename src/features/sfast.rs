use crate::core::Mat;
use crate::error::{Error, Result};

/// Hex-ring of radius 3 around a candidate pixel, as (dx, dy) offsets in
/// storage-grid coordinates, clockwise from the bottom spoke.
pub const RING_OFFSETS: [(i32, i32); 18] = [
    (0, 3),
    (1, 2),
    (2, 1),
    (3, 0),
    (3, -1),
    (3, -2),
    (3, -3),
    (2, -3),
    (1, -3),
    (0, -3),
    (-1, -2),
    (-2, -1),
    (-3, 0),
    (-3, 1),
    (-3, 2),
    (-3, 3),
    (-2, 3),
    (-1, 3),
];

/// Minimum contiguous arc length for the segment test, the 18-pixel-ring
/// analog of FAST-9
pub const DEFAULT_ARC_LENGTH: usize = 9;

/// A raw corner in extended-part coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub x: i32,
    pub y: i32,
}

fn ring_for_stride(stride: i32) -> [i32; 18] {
    std::array::from_fn(|k| {
        let (dx, dy) = RING_OFFSETS[k];
        dy * stride + dx
    })
}

/// Segment test: is there a contiguous arc of at least `arc_length` ring
/// pixels all brighter than `center + barrier`, or all darker than
/// `center - barrier`?
fn is_corner(data: &[u8], idx: usize, ring: &[i32; 18], barrier: i32, arc_length: usize) -> bool {
    let center = i32::from(data[idx]);
    let hi = center + barrier;
    let lo = center - barrier;

    let mut run_bright = 0usize;
    let mut run_dark = 0usize;

    // Walk the ring twice so arcs crossing the wrap point are seen whole
    for k in 0..36 {
        let v = i32::from(data[(idx as i32 + ring[k % 18]) as usize]);
        if v > hi {
            run_bright += 1;
            run_dark = 0;
            if run_bright >= arc_length {
                return true;
            }
        } else if v < lo {
            run_dark += 1;
            run_bright = 0;
            if run_dark >= arc_length {
                return true;
            }
        } else {
            run_bright = 0;
            run_dark = 0;
        }
    }

    false
}

/// Detect corners over an extended storage part, in raster order.
///
/// The mask lives in the pre-extension frame: mask pixel `(x, y)` guards
/// the extended-part pixel `(x + edge - 1, y + edge)`. Corner positions are
/// reported in the extended frame, which is what the orientation,
/// descriptor and mapping stages consume.
pub fn detect(
    part: &Mat,
    mask: &Mat,
    edge: usize,
    barrier: i32,
    arc_length: usize,
) -> Result<Vec<Corner>> {
    if edge < 4 {
        return Err(Error::BadInput(format!(
            "extension edge {edge} leaves no room for the detection ring"
        )));
    }
    if part.rows() != mask.rows() + 2 * edge - 1 || part.cols() != mask.cols() + 2 * edge - 1 {
        return Err(Error::BadInput(format!(
            "part {}x{} does not match mask {}x{} extended by {edge}",
            part.rows(),
            part.cols(),
            mask.rows(),
            mask.cols()
        )));
    }

    let stride = part.step();
    let ring = ring_for_stride(stride as i32);
    let data = part.data();
    let mask_data = mask.data();
    let mask_cols = mask.cols();

    let mut corners = Vec::new();
    for my in 0..mask.rows() {
        for mx in 0..mask_cols {
            if mask_data[my * mask_cols + mx] == 0 {
                continue;
            }
            let y = my + edge;
            let x = mx + edge - 1;
            if is_corner(data, y * stride + x, &ring, barrier, arc_length) {
                corners.push(Corner {
                    x: x as i32,
                    y: y as i32,
                });
            }
        }
    }

    Ok(corners)
}

/// Score each corner: the largest barrier at which the segment test still
/// passes, found by binary search.
#[must_use]
pub fn score(part: &Mat, corners: &[Corner], barrier: i32, arc_length: usize) -> Vec<i32> {
    let stride = part.step();
    let ring = ring_for_stride(stride as i32);
    let data = part.data();

    corners
        .iter()
        .map(|corner| {
            let idx = corner.y as usize * stride + corner.x as usize;
            let mut bmin = barrier;
            let mut bmax = 255;
            let mut b = (bmax + bmin) / 2;
            loop {
                if is_corner(data, idx, &ring, b, arc_length) {
                    bmin = b;
                } else {
                    bmax = b;
                }
                if bmin == bmax - 1 || bmin == bmax {
                    return bmin;
                }
                b = (bmin + bmax) / 2;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGE: usize = 4;

    fn uniform_setup(mask_rows: usize, mask_cols: usize, value: u8) -> (Mat, Mat) {
        let part = Mat::new_with_default(
            mask_rows + 2 * EDGE - 1,
            mask_cols + 2 * EDGE - 1,
            1,
            value,
        )
        .unwrap();
        let mask = Mat::new_with_default(mask_rows, mask_cols, 1, 255).unwrap();
        (part, mask)
    }

    #[test]
    fn test_uniform_image_has_no_corners() {
        let (part, mask) = uniform_setup(10, 20, 128);
        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        assert!(corners.is_empty());
    }

    #[test]
    fn test_bright_dot_is_a_corner() {
        let (mut part, mask) = uniform_setup(10, 20, 10);
        // Dot at mask position (5, 5) -> extended (5 + EDGE - 1, 5 + EDGE)
        let (x, y) = (5 + EDGE - 1, 5 + EDGE);
        part.set(y, x, 250);

        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        assert_eq!(
            corners,
            vec![Corner {
                x: x as i32,
                y: y as i32
            }]
        );
    }

    #[test]
    fn test_mask_zero_hides_corner() {
        let (mut part, mut mask) = uniform_setup(10, 20, 10);
        let (x, y) = (5 + EDGE - 1, 5 + EDGE);
        part.set(y, x, 250);
        mask.set(5, 5, 0);

        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        assert!(corners.is_empty());
    }

    #[test]
    fn test_arc_must_be_contiguous() {
        let (mut part, mask) = uniform_setup(12, 24, 100);
        let (cx, cy) = (6 + EDGE - 1, 6 + EDGE);

        // Brighten alternating ring pixels: 9 bright pixels total but never
        // two in a row, so no arc of length 9 exists.
        for (k, &(dx, dy)) in RING_OFFSETS.iter().enumerate() {
            if k % 2 == 0 {
                part.set(
                    (cy as i32 + dy) as usize,
                    (cx as i32 + dx) as usize,
                    255,
                );
            }
        }

        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        assert!(!corners.iter().any(|c| c.x == cx as i32 && c.y == cy as i32));
    }

    #[test]
    fn test_contiguous_dark_arc_detected() {
        let (mut part, mask) = uniform_setup(12, 24, 200);
        let (cx, cy) = (6 + EDGE - 1, 6 + EDGE);

        // Exactly 9 consecutive ring pixels darker than center - barrier
        for &(dx, dy) in RING_OFFSETS.iter().take(9) {
            part.set((cy as i32 + dy) as usize, (cx as i32 + dx) as usize, 50);
        }

        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        assert!(corners.iter().any(|c| c.x == cx as i32 && c.y == cy as i32));

        // One pixel fewer and the arc is too short
        let (dx, dy) = RING_OFFSETS[8];
        part.set((cy as i32 + dy) as usize, (cx as i32 + dx) as usize, 200);
        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        assert!(!corners.iter().any(|c| c.x == cx as i32 && c.y == cy as i32));
    }

    #[test]
    fn test_score_is_max_passing_barrier() {
        let (mut part, mask) = uniform_setup(10, 20, 10);
        let (x, y) = (5 + EDGE - 1, 5 + EDGE);
        part.set(y, x, 210);

        // Ring pixels sit at 10, center at 210: the dark arc persists while
        // 10 < 210 - b, i.e. up to b = 199.
        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        let scores = score(&part, &corners, 20, DEFAULT_ARC_LENGTH);
        assert_eq!(scores, vec![199]);
    }

    #[test]
    fn test_raster_order() {
        let (mut part, mask) = uniform_setup(10, 20, 10);
        let spots = [(3usize, 9usize), (5, 2), (5, 14)];
        for &(my, mx) in &spots {
            part.set(my + EDGE, mx + EDGE - 1, 250);
        }

        let corners = detect(&part, &mask, EDGE, 20, DEFAULT_ARC_LENGTH).unwrap();
        let positions: Vec<(i32, i32)> = corners.iter().map(|c| (c.y, c.x)).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert_eq!(corners.len(), 3);
    }
}
