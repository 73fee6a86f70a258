use crate::core::Point2f;
use crate::error::{Error, Result};
use crate::features::KeyPoint;
use ndarray::Array3;
use std::f32::consts::PI;

/// Map keypoints from extended-part coordinates back to equirectangular
/// pixel coordinates in the frame of the supplied input image.
///
/// The part's placement on the sphere is a rotation of `2*pi*part/5` about
/// the polar axis; undoing the boundary extension and applying that rotation
/// to the precomputed 3-D vertex gives the point's spherical position, which
/// converts to pano coordinates through `k = pi / input_height`.
pub fn map_keypoints(
    keypoints: &mut [KeyPoint],
    geo: &Array3<f32>,
    level: usize,
    scale: f32,
    input_height: usize,
    edge: usize,
) -> Result<()> {
    if input_height == 0 {
        return Err(Error::BadInput("input height must be positive".to_string()));
    }

    let (rows, cols, _) = geo.dim();
    let edge = edge as i32;

    let pcos: [f32; super::PARTS] = std::array::from_fn(|p| (2.0 * PI * p as f32 / 5.0).cos());
    let psin: [f32; super::PARTS] = std::array::from_fn(|p| (2.0 * PI * p as f32 / 5.0).sin());

    let k = PI / input_height as f32;

    for kp in keypoints.iter_mut() {
        let x = kp.pt.x as i32 - edge + 1;
        let y = kp.pt.y as i32 - edge;

        if x < 0 || y < 0 || x as usize >= cols || y as usize >= rows {
            return Err(Error::InternalInvariant(format!(
                "keypoint ({}, {}) maps outside the {rows}x{cols} grid",
                kp.pt.x, kp.pt.y
            )));
        }
        let part = kp.part_id;
        if part < 0 || part as usize >= super::PARTS {
            return Err(Error::InternalInvariant(format!(
                "keypoint carries invalid part id {part}"
            )));
        }
        let part = part as usize;

        let sx = geo[[y as usize, x as usize, 0]];
        let sy = geo[[y as usize, x as usize, 1]];
        let sz = geo[[y as usize, x as usize, 2]];

        let dx = pcos[part] * sx - psin[part] * sy;
        let dy = pcos[part] * sy + psin[part] * sx;
        let dz = sz;

        let theta = dz.clamp(-1.0, 1.0).acos();
        let phi = dy.atan2(dx) + PI;

        kp.pt = Point2f::new(phi / k, theta / k);
        kp.size = 31.0 * scale;
        kp.octave = level as i32;
        kp.part_id = -1;
    }

    Ok(())
}
