use crate::core::Point2f;
use crate::features::keypoints::KeyPoint;
use crate::features::sfast::Corner;

/// Raster-order non-maximum suppression over the hexagonal neighborhood.
///
/// The hex neighbors of grid cell (x, y) are {(x-1, y), (x+1, y), (x, y-1),
/// (x+1, y-1), (x, y+1), (x-1, y+1)}: the row above is checked at columns
/// x and x+1, the row below at x-1 and x. A corner is suppressed by any
/// neighbor with score >= its own, so on ties the earlier corner in raster
/// order survives. Corners must arrive in raster order; `above`/`below` are
/// rolling pointers into the previous/next row.
#[must_use]
pub fn nonmax_suppression(corners: &[Corner], scores: &[i32], part_id: i32) -> Vec<KeyPoint> {
    let mut keypoints = Vec::new();
    let sz = corners.len();
    if sz == 0 {
        return keypoints;
    }

    // Index of the first corner on each row; -1 marks an empty row
    let last_row = corners[sz - 1].y as usize;
    let mut row_start = vec![-1isize; last_row + 1];
    let mut prev_row = -1i32;
    for (i, corner) in corners.iter().enumerate() {
        if corner.y != prev_row {
            row_start[corner.y as usize] = i as isize;
            prev_row = corner.y;
        }
    }

    let mut point_above = 0usize;
    let mut point_below = 0usize;

    for i in 0..sz {
        let score = scores[i];
        let pos = corners[i];

        // Left neighbor
        if i > 0 {
            let prev = corners[i - 1];
            if prev.x == pos.x - 1 && prev.y == pos.y && scores[i - 1] >= score {
                continue;
            }
        }

        // Right neighbor
        if i < sz - 1 {
            let next = corners[i + 1];
            if next.x == pos.x + 1 && next.y == pos.y && scores[i + 1] >= score {
                continue;
            }
        }

        let mut suppressed = false;

        // Row above: columns x and x+1
        if pos.y != 0 && row_start[pos.y as usize - 1] != -1 {
            if corners[point_above].y < pos.y - 1 {
                point_above = row_start[pos.y as usize - 1] as usize;
            }
            while point_above < sz
                && corners[point_above].y < pos.y
                && corners[point_above].x < pos.x
            {
                point_above += 1;
            }

            let mut j = point_above;
            while j < sz && corners[j].y < pos.y && corners[j].x <= pos.x + 1 {
                let x = corners[j].x;
                if (x == pos.x || x == pos.x + 1) && scores[j] >= score {
                    suppressed = true;
                    break;
                }
                j += 1;
            }
        }

        // Row below: columns x-1 and x
        if !suppressed
            && (pos.y as usize) != last_row
            && row_start[pos.y as usize + 1] != -1
            && point_below < sz
        {
            if corners[point_below].y < pos.y + 1 {
                point_below = row_start[pos.y as usize + 1] as usize;
            }
            while point_below < sz
                && corners[point_below].y == pos.y + 1
                && corners[point_below].x < pos.x - 1
            {
                point_below += 1;
            }

            let mut j = point_below;
            while j < sz && corners[j].y == pos.y + 1 && corners[j].x <= pos.x {
                let x = corners[j].x;
                if (x == pos.x - 1 || x == pos.x) && scores[j] >= score {
                    suppressed = true;
                    break;
                }
                j += 1;
            }
        }

        if !suppressed {
            let mut kp = KeyPoint::new(Point2f::new(pos.x as f32, pos.y as f32), 0.0);
            kp.response = score as f32;
            kp.part_id = part_id;
            keypoints.push(kp);
        }
    }

    keypoints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spots: &[(i32, i32, i32)]) -> Vec<(i32, i32)> {
        // spots are (y, x, score), already in raster order
        let corners: Vec<Corner> = spots.iter().map(|&(y, x, _)| Corner { x, y }).collect();
        let scores: Vec<i32> = spots.iter().map(|&(_, _, s)| s).collect();
        nonmax_suppression(&corners, &scores, 0)
            .into_iter()
            .map(|kp| (kp.pt.y as i32, kp.pt.x as i32))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(run(&[]).is_empty());
    }

    #[test]
    fn test_isolated_corner_survives() {
        assert_eq!(run(&[(5, 5, 30)]), vec![(5, 5)]);
    }

    #[test]
    fn test_weaker_left_neighbor_suppressed() {
        assert_eq!(run(&[(5, 5, 10), (5, 6, 30)]), vec![(5, 6)]);
    }

    #[test]
    fn test_tie_on_row_suppresses_both_ways() {
        // Equal scores: the left corner is suppressed by its right neighbor
        // (>=) and the right corner by its left neighbor (>=). This mirrors
        // the reference behavior where >= runs in both directions.
        assert_eq!(run(&[(5, 5, 30), (5, 6, 30)]), Vec::<(i32, i32)>::new());
    }

    #[test]
    fn test_above_row_checks_x_and_x_plus_1() {
        // (4, 6) is the hex neighbor above-right of (5, 5)
        assert_eq!(run(&[(4, 6, 40), (5, 5, 30)]), vec![(4, 6)]);
        // (4, 4) is NOT a hex neighbor of (5, 5); both survive
        assert_eq!(run(&[(4, 4, 40), (5, 5, 30)]), vec![(4, 4), (5, 5)]);
    }

    #[test]
    fn test_below_row_checks_x_minus_1_and_x() {
        // (6, 4) is the hex neighbor below-left of (5, 5)
        assert_eq!(run(&[(5, 5, 30), (6, 4, 40)]), vec![(6, 4)]);
        // (6, 6) is NOT a hex neighbor of (5, 5); both survive
        assert_eq!(run(&[(5, 5, 30), (6, 6, 40)]), vec![(5, 5), (6, 6)]);
    }

    #[test]
    fn test_no_survivor_has_stronger_hex_neighbor() {
        // A small crowded field; verify the output property directly.
        let spots = [
            (2, 3, 12),
            (2, 4, 9),
            (3, 2, 15),
            (3, 3, 11),
            (3, 4, 20),
            (4, 3, 18),
            (4, 5, 7),
            (5, 4, 25),
        ];
        let survivors = run(&spots);

        let hex_neighbors = |y: i32, x: i32| {
            [
                (y, x - 1),
                (y, x + 1),
                (y - 1, x),
                (y - 1, x + 1),
                (y + 1, x - 1),
                (y + 1, x),
            ]
        };

        for &(y, x) in &survivors {
            let own = spots.iter().find(|s| s.0 == y && s.1 == x).unwrap().2;
            for (ny, nx) in hex_neighbors(y, x) {
                if let Some(&(_, _, ns)) = spots.iter().find(|s| s.0 == ny && s.1 == nx) {
                    assert!(
                        ns < own,
                        "survivor ({y},{x}) score {own} has neighbor ({ny},{nx}) score {ns}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_rows_with_gaps() {
        // Empty row between corners: no suppression across the gap
        assert_eq!(run(&[(2, 5, 10), (4, 5, 40)]), vec![(2, 5), (4, 5)]);
    }
}
