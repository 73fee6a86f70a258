use crate::core::Mat;
use crate::error::{Error, Result};

/// Extend the five storage parts so local operators see seam-free data.
///
/// Each part is placed into a canvas of `(H + 2*edge - 1, W + 2*edge - 1)`
/// pixels, the original data landing at rows `[edge, H+edge)` and columns
/// `[edge-1, W+edge-1)`. The top/right pad is then filled from the next
/// part around the sphere, the bottom/left pad from the previous one. The
/// diagonal walks implement the 60-degree rotational gluing between
/// adjacent diamonds; their indexing must be reproduced exactly or
/// convolutions across a seam stop agreeing between the two copies.
pub fn extend_parts(parts: &[Mat], edge: usize) -> Result<Vec<Mat>> {
    if parts.len() != super::PARTS {
        return Err(Error::BadInput(format!(
            "expected {} parts, got {}",
            super::PARTS,
            parts.len()
        )));
    }
    let h = parts[0].rows();
    let w = parts[0].cols();
    if w != 2 * h - 1 {
        return Err(Error::BadInput(format!(
            "storage parts must be {h}x{} diamonds, got {h}x{w}",
            2 * h - 1
        )));
    }
    if edge < 2 || edge >= h {
        return Err(Error::BadInput(format!(
            "extension edge {edge} out of range for {h}-row parts"
        )));
    }
    for part in parts {
        if part.rows() != h || part.cols() != w || part.channels() != 1 {
            return Err(Error::BadInput(
                "all parts must be single-channel and equally sized".to_string(),
            ));
        }
    }

    let height = h + edge * 2 - 1;
    let width = w + edge * 2 - 1;

    let mut extended = Vec::with_capacity(parts.len());
    for part in parts {
        let mut canvas = Mat::zeros(height, width)?;
        for y in edge..h + edge {
            for x in (edge - 1)..(w + edge - 1) {
                canvas.set(y, x, part.get(y - edge, x + 1 - edge));
            }
        }
        extended.push(canvas);
    }

    for i in 0..parts.len() {
        extend_top_right(&mut extended[i], &parts[(i + 1) % parts.len()], edge as i32);
    }
    for i in 0..parts.len() {
        extend_bottom_left(
            &mut extended[i],
            &parts[(i + parts.len() - 1) % parts.len()],
            edge as i32,
        );
    }

    Ok(extended)
}

/// Fill the top and right pad of `canvas` from the neighbor part.
fn extend_top_right(canvas: &mut Mat, neighbor: &Mat, edge: i32) {
    let h = neighbor.rows() as i32;
    let w = neighbor.cols() as i32;

    // Top edge, first half: walk down-left in the neighbor
    let r = edge;
    for c in (edge - 1)..(h + edge - 1) {
        let c0 = c - edge + 1;
        let mut rn = c0;
        let mut cn = 0;
        for i in 1..=edge {
            rn -= 1;
            cn += 1;
            if rn >= 0 {
                canvas.set((r - i) as usize, c as usize, neighbor.get(rn as usize, cn as usize));
            } else {
                break;
            }
        }
    }

    // Top edge, second half: the walk stays on a fixed neighbor column
    for c in (h + edge - 1)..(w + edge - 1) {
        let c0 = c - edge + 1;
        let mut rn = h - 1;
        let cn = c0 - h + 1;
        for i in 1..=edge {
            rn -= 1;
            if rn + cn >= h - 1 {
                canvas.set((r - i) as usize, c as usize, neighbor.get(rn as usize, cn as usize));
            } else {
                break;
            }
        }
    }

    // Right edge: walk up-right along the neighbor's bottom rows
    let c = w + edge - 2;
    for r in edge..(h + edge) {
        let r0 = r - edge;
        let mut rn = h - 1;
        let mut cn = r0 + h - 1;
        for i in 1..=edge {
            rn -= 1;
            cn += 1;
            if cn < 2 * h - 1 {
                canvas.set(r as usize, (c + i) as usize, neighbor.get(rn as usize, cn as usize));
            } else {
                break;
            }
        }
    }
}

/// Fill the bottom and left pad of `canvas` from the neighbor part.
fn extend_bottom_left(canvas: &mut Mat, neighbor: &Mat, edge: i32) {
    let h = neighbor.rows() as i32;
    let w = neighbor.cols() as i32;

    // Left edge: walk down-left from the neighbor's top rows
    let c = edge - 1;
    for r in edge..(h + edge) {
        let r0 = r - edge;
        let mut rn = 0;
        let mut cn = r0;
        for i in 1..=(edge - 1) {
            rn += 1;
            cn -= 1;
            if cn >= 0 {
                canvas.set(r as usize, (c - i) as usize, neighbor.get(rn as usize, cn as usize));
            } else {
                break;
            }
        }
    }

    // Bottom edge, first half: fixed neighbor column
    let r = h + edge - 1;
    for c in (edge - 1)..(h + edge - 2) {
        let c0 = c - edge + 1;
        let mut rn = 0;
        let cn = c0 + h - 1;
        for i in 1..=(edge - 1) {
            rn += 1;
            if rn + cn <= 2 * h - 2 {
                canvas.set((r + i) as usize, c as usize, neighbor.get(rn as usize, cn as usize));
            } else {
                break;
            }
        }
    }

    // Bottom edge, second half: walk down-left along the neighbor's last column
    for c in (h + edge - 2)..(w + edge - 1) {
        let c0 = c - edge + 1;
        let mut rn = c0 - h + 1;
        let mut cn = 2 * h - 2;
        for i in 1..=(edge - 1) {
            rn += 1;
            cn -= 1;
            if rn < h {
                canvas.set((r + i) as usize, c as usize, neighbor.get(rn as usize, cn as usize));
            } else {
                break;
            }
        }
    }
}
