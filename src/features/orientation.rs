use crate::core::{Mat, Point2f};

/// Intensity-centroid orientation over the hexagonal patch of radius
/// `half_k` around the keypoint, in degrees [0, 360).
///
/// The patch is the set of grid cells within hex-distance `half_k`: row y
/// spans columns [max(-R, -R-y), min(R, R-y)]. Moments are taken in the
/// Euclidean lift of the lattice, (x + y/2, sqrt(3)/2 * y), so the angle is
/// measured in the tangent plane rather than in skewed grid coordinates.
#[must_use]
pub fn ic_angle(part: &Mat, half_k: i32, pt: Point2f) -> f32 {
    let step = part.step() as i32;
    let data = part.data();

    #[allow(clippy::cast_possible_truncation)]
    let center = (pt.y.round() as i32) * step + pt.x.round() as i32;

    let row_scale = 3.0f32.sqrt() * 0.5;
    let mut m01 = 0.0f32;
    let mut m10 = 0.0f32;

    for y in -half_k..=half_k {
        let (xmin, xmax) = if y < 0 {
            (-y - half_k, half_k)
        } else {
            (-half_k, half_k - y)
        };

        for x in xmin..=xmax {
            let euclid_x = x as f32 + y as f32 * 0.5;
            let euclid_y = row_scale * y as f32;
            let v = f32::from(data[(center + x + y * step) as usize]);

            m10 += euclid_x * v;
            m01 += euclid_y * v;
        }
    }

    let mut degrees = m01.atan2(m10).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    degrees
}
