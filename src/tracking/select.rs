use super::lock_point::compute_lock_point;
use super::state::TrackingState;
use crate::detect::Detection;
use crate::Point;

/// Why a detection was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionReason {
    /// Nearest to the previous lock point and within the persistence radius.
    Persisted,
    /// Nearest to frame center (no previous lock, or it moved out of radius).
    NearestToCenter,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection<'a> {
    pub detection: &'a Detection,
    pub reason: SelectionReason,
}

/// Choose the target among this frame's person detections.
///
/// Non-person detections are ignored. If a previous lock exists and the
/// person whose lock point is nearest to it lies within `persistence_radius`,
/// that person is kept even when another one is closer to center. Otherwise
/// the person nearest to `frame_center` is chosen. Distance ties resolve to
/// the first detection in input order.
///
/// This is positional hysteresis only: no appearance matching, no track IDs,
/// no occlusion handling beyond the radius.
pub fn select_target<'a>(
    detections: &'a [Detection],
    frame_center: Point,
    previous: Option<&TrackingState>,
    persistence_radius: f64,
) -> Option<&'a Detection> {
    select_target_with_reason(detections, frame_center, previous, persistence_radius)
        .map(|selection| selection.detection)
}

/// `select_target`, also reporting which rule picked the detection.
pub fn select_target_with_reason<'a>(
    detections: &'a [Detection],
    frame_center: Point,
    previous: Option<&TrackingState>,
    persistence_radius: f64,
) -> Option<Selection<'a>> {
    let persons = move || detections.iter().filter(|det| det.is_person());

    if let Some(previous) = previous {
        if let Some((detection, distance)) = nearest_to(persons(), previous.lock_point) {
            if distance <= persistence_radius {
                return Some(Selection {
                    detection,
                    reason: SelectionReason::Persisted,
                });
            }
        }
    }

    nearest_to(persons(), frame_center).map(|(detection, _)| Selection {
        detection,
        reason: SelectionReason::NearestToCenter,
    })
}

/// First detection whose lock point is at minimum distance from `anchor`.
fn nearest_to<'a>(
    candidates: impl Iterator<Item = &'a Detection>,
    anchor: Point,
) -> Option<(&'a Detection, f64)> {
    let mut best: Option<(&'a Detection, f64)> = None;
    for candidate in candidates {
        let distance = compute_lock_point(&candidate.bbox).distance_to(anchor);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BBox;

    const CENTER: Point = Point::new(320, 240);
    const RADIUS: f64 = 80.0;

    fn det(class_id: u32, class_name: &str, confidence: f32, b: [i32; 4]) -> Detection {
        Detection::new(class_id, class_name, confidence, BBox::try_from(b).unwrap())
    }

    fn previous_at(lock_point: Point, b: [i32; 4]) -> TrackingState {
        TrackingState {
            lock_point,
            bbox: BBox::try_from(b).unwrap(),
            error_x: f64::from(lock_point.x - CENTER.x),
            error_y: f64::from(lock_point.y - CENTER.y),
            distance_px: lock_point.distance_to(CENTER),
            inside_deadzone: false,
        }
    }

    #[test]
    fn picks_person_nearest_center_and_ignores_other_classes() {
        let non_person = det(1, "bicycle", 0.8, [10, 10, 80, 80]);
        let far_person = det(0, "person", 0.95, [430, 100, 520, 380]);
        let near_center = det(0, "person", 0.9, [280, 100, 360, 380]);
        let detections = vec![non_person, far_person, near_center.clone()];

        let selected = select_target(&detections, CENTER, None, RADIUS);
        assert_eq!(selected, Some(&near_center));
    }

    #[test]
    fn previous_lock_wins_over_center_within_radius() {
        let previous = previous_at(Point::new(460, 180), [420, 80, 500, 380]);
        let near_previous = det(0, "person", 0.7, [430, 90, 510, 390]);
        let near_center = det(0, "person", 0.8, [290, 100, 350, 350]);
        let detections = vec![near_center, near_previous.clone()];

        let selection =
            select_target_with_reason(&detections, CENTER, Some(&previous), RADIUS).unwrap();
        assert_eq!(selection.detection, &near_previous);
        assert_eq!(selection.reason, SelectionReason::Persisted);
    }

    #[test]
    fn falls_back_to_center_when_previous_out_of_radius() {
        let previous = previous_at(Point::new(20, 20), [0, 0, 40, 60]);
        let right = det(0, "person", 0.7, [430, 90, 510, 390]);
        let middle = det(0, "person", 0.8, [290, 100, 350, 350]);
        let detections = vec![right, middle.clone()];

        let selection =
            select_target_with_reason(&detections, CENTER, Some(&previous), RADIUS).unwrap();
        assert_eq!(selection.detection, &middle);
        assert_eq!(selection.reason, SelectionReason::NearestToCenter);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        // lock point of the candidate is (320, 192); previous is exactly 80 px away
        let candidate = det(0, "person", 0.5, [280, 100, 360, 380]);
        let elsewhere = det(0, "person", 0.5, [600, 0, 640, 40]);
        let detections = vec![elsewhere, candidate.clone()];
        let previous = previous_at(Point::new(320, 272), [280, 180, 360, 460]);

        let selection =
            select_target_with_reason(&detections, Point::new(630, 10), Some(&previous), 80.0)
                .unwrap();
        assert_eq!(selection.detection, &candidate);
        assert_eq!(selection.reason, SelectionReason::Persisted);

        let selection =
            select_target_with_reason(&detections, Point::new(630, 10), Some(&previous), 79.9)
                .unwrap();
        assert_eq!(selection.reason, SelectionReason::NearestToCenter);
        assert_ne!(selection.detection, &candidate);
    }

    #[test]
    fn no_person_yields_none_even_with_other_classes() {
        let detections = vec![det(2, "car", 0.77, [100, 100, 180, 180])];
        let previous = previous_at(Point::new(140, 126), [100, 100, 180, 180]);

        assert_eq!(select_target(&detections, CENTER, None, RADIUS), None);
        assert_eq!(select_target(&detections, CENTER, Some(&previous), RADIUS), None);
        assert_eq!(select_target(&[], CENTER, None, RADIUS), None);
    }

    #[test]
    fn center_ties_resolve_to_first_in_input_order() {
        // lock points (240, 192) and (400, 192) are equidistant from center
        let left = det(0, "person", 0.6, [200, 100, 280, 380]);
        let right = det(0, "person", 0.9, [360, 100, 440, 380]);

        let forward = vec![left.clone(), right.clone()];
        let reversed = vec![right.clone(), left.clone()];
        for _ in 0..10 {
            assert_eq!(select_target(&forward, CENTER, None, RADIUS), Some(&left));
            assert_eq!(select_target(&reversed, CENTER, None, RADIUS), Some(&right));
        }
    }

    #[test]
    fn persistence_ties_resolve_to_first_in_input_order() {
        let previous = previous_at(Point::new(320, 192), [280, 100, 360, 380]);
        // lock points (310, 192) and (330, 192), both 10 px from the previous lock
        let a = det(0, "person", 0.6, [270, 100, 350, 380]);
        let b = det(0, "person", 0.6, [290, 100, 370, 380]);
        let detections = vec![a.clone(), b];

        let selected = select_target(&detections, CENTER, Some(&previous), RADIUS);
        assert_eq!(selected, Some(&a));
    }

    #[test]
    fn zero_radius_requires_identical_lock_point() {
        let previous = previous_at(Point::new(475, 192), [430, 100, 520, 380]);
        let same_place = det(0, "person", 0.5, [430, 100, 520, 380]);
        let center = det(0, "person", 0.5, [280, 100, 360, 380]);
        let detections = vec![center.clone(), same_place.clone()];

        assert_eq!(
            select_target(&detections, CENTER, Some(&previous), 0.0),
            Some(&same_place)
        );

        let moved = previous_at(Point::new(476, 192), [431, 100, 521, 380]);
        assert_eq!(
            select_target(&detections, CENTER, Some(&moved), 0.0),
            Some(&center)
        );
    }
}
