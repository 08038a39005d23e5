use std::cmp::Ordering;

use crate::{BBox, Point};

/// Lock height as the exact ratio 33/100 of the box height, from the top edge.
const LOCK_HEIGHT_NUM: i64 = 33;
const LOCK_HEIGHT_DEN: i64 = 100;

/// Estimate where to aim on a person box: horizontally centered, one third
/// of the way down (roughly head height for a standing person).
///
/// `x = round((x1 + x2) / 2)`, `y = round(y1 + 0.33 * (y2 - y1))`.
///
/// Rounding is half-to-even, computed in integer arithmetic so `.5` ties are
/// exact. The result always lies inside the box; zero-area boxes yield their
/// corner.
pub fn compute_lock_point(bbox: &BBox) -> Point {
    let x = div_round_half_even(i64::from(bbox.x1()) + i64::from(bbox.x2()), 2);
    let y = div_round_half_even(
        LOCK_HEIGHT_DEN * i64::from(bbox.y1()) + LOCK_HEIGHT_NUM * bbox.height(),
        LOCK_HEIGHT_DEN,
    );
    // Both lie within [min, max] of i32 box coordinates.
    Point::new(x as i32, y as i32)
}

/// `num / den` rounded to nearest, ties to even. `den` must be positive.
fn div_round_half_even(num: i64, den: i64) -> i64 {
    let quotient = num.div_euclid(den);
    let remainder = num.rem_euclid(den);
    match (2 * remainder).cmp(&den) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal if quotient.rem_euclid(2) == 0 => quotient,
        Ordering::Equal => quotient + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: i32, y1: i32, x2: i32, y2: i32) -> BBox {
        BBox::new(x1, y1, x2, y2).unwrap()
    }

    #[test]
    fn lock_point_is_top_third_center() {
        assert_eq!(compute_lock_point(&bbox(100, 100, 200, 400)), Point::new(150, 199));
        assert_eq!(compute_lock_point(&bbox(280, 100, 360, 380)), Point::new(320, 192));
    }

    #[test]
    fn horizontal_ties_round_to_even() {
        // (0 + 1) / 2 = 0.5 -> 0
        assert_eq!(compute_lock_point(&bbox(0, 0, 1, 0)).x, 0);
        // (1 + 2) / 2 = 1.5 -> 2
        assert_eq!(compute_lock_point(&bbox(1, 0, 2, 0)).x, 2);
        // (2 + 3) / 2 = 2.5 -> 2
        assert_eq!(compute_lock_point(&bbox(2, 0, 3, 0)).x, 2);
        // (-4 + 1) / 2 = -1.5 -> -2
        assert_eq!(compute_lock_point(&bbox(-4, 0, 1, 0)).x, -2);
    }

    #[test]
    fn vertical_ties_round_to_even() {
        // 0.33 * 50 = 16.5 -> 16
        assert_eq!(compute_lock_point(&bbox(0, 0, 0, 50)).y, 16);
        // 0.33 * 150 = 49.5 -> 50
        assert_eq!(compute_lock_point(&bbox(0, 10, 0, 160)).y, 60);
        // 0.33 * 10 = 3.3 -> 3
        assert_eq!(compute_lock_point(&bbox(0, 0, 0, 10)).y, 3);
    }

    #[test]
    fn vertical_tie_rounds_the_whole_sum() {
        // 1 + 16.5 = 17.5 -> 18
        assert_eq!(compute_lock_point(&bbox(0, 1, 0, 51)).y, 18);
        // 3 + 50.49 = 53.49 -> 53
        assert_eq!(compute_lock_point(&bbox(0, 3, 0, 156)).y, 53);
        // 3 + 49.5 = 52.5 -> 52
        assert_eq!(compute_lock_point(&bbox(0, 3, 0, 153)).y, 52);
        // 5 + 49.5 = 54.5 -> 54
        assert_eq!(compute_lock_point(&bbox(0, 5, 0, 155)).y, 54);
        // -1 + 16.5 = 15.5 -> 16
        assert_eq!(compute_lock_point(&bbox(0, -1, 0, 49)).y, 16);
    }

    #[test]
    fn degenerate_box_yields_its_corner() {
        assert_eq!(compute_lock_point(&bbox(42, 17, 42, 17)), Point::new(42, 17));
    }

    #[test]
    fn lock_point_always_inside_box() {
        let coords = [-37, -1, 0, 1, 2, 3, 7, 50, 99, 100, 101, 333, 640];
        for &x1 in &coords {
            for &x2 in coords.iter().filter(|&&v| v >= x1) {
                for &y1 in &coords {
                    for &y2 in coords.iter().filter(|&&v| v >= y1) {
                        let b = bbox(x1, y1, x2, y2);
                        let p = compute_lock_point(&b);
                        assert!((x1..=x2).contains(&p.x), "{b:?} -> {p:?}");
                        assert!((y1..=y2).contains(&p.y), "{b:?} -> {p:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let b = bbox(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let p = compute_lock_point(&b);
        assert_eq!(p.x, 0);
        assert!(p.y > i32::MIN && p.y < 0);
    }
}
