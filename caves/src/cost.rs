//! Edge costs and the heuristic used to rank search candidates.

use crate::cave::Position;

/// Weight applied to the straight-line distance to the goal when ranking candidates.
///
/// A weight above 1 makes the estimate non-admissible: the search converges faster
/// towards the goal but is no longer guaranteed to return the shortest route.
pub const HEURISTIC_WEIGHT: f64 = 2.0;

/// Euclidean distance between two positions
pub fn distance(a: Position, b: Position) -> f64 {
    // widen first, the difference of two i32 does not always fit an i32
    let dx = (i64::from(a.x) - i64::from(b.x)) as f64;
    let dy = (i64::from(a.y) - i64::from(b.y)) as f64;

    (dx * dx + dy * dy).sqrt()
}

/// Estimated remaining cost from `from` to `goal`
pub fn heuristic(from: Position, goal: Position) -> f64 {
    distance(from, goal) * HEURISTIC_WEIGHT
}

#[cfg(test)]
mod test {

    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_distance() {
        assert_eq!(distance(Position::new(0, 0), Position::new(3, 4)), 5.0);
        assert_eq!(distance(Position::new(-1, -1), Position::new(2, 3)), 5.0);
        assert_eq!(distance(Position::new(7, -2), Position::new(7, -2)), 0.0);
    }

    #[test]
    fn test_distance_extremes() {
        let d = distance(Position::new(i32::MIN, 0), Position::new(i32::MAX, 0));
        assert_eq!(d, u32::MAX as f64);
    }

    #[test]
    fn test_heuristic_is_weighted() {
        assert_eq!(heuristic(Position::new(0, 0), Position::new(3, 4)), 10.0);
        assert_eq!(heuristic(Position::new(2, 2), Position::new(2, 2)), 0.0);
    }

    #[test]
    fn prop_distance_symmetric() {
        fn prop(ax: i32, ay: i32, bx: i32, by: i32) -> bool {
            let (a, b) = (Position::new(ax, ay), Position::new(bx, by));
            distance(a, b) == distance(b, a)
        }
        quickcheck(prop as fn(_, _, _, _) -> bool);
    }

    #[test]
    fn prop_distance_to_self_is_zero() {
        fn prop(x: i32, y: i32) -> bool {
            distance(Position::new(x, y), Position::new(x, y)) == 0.0
        }
        quickcheck(prop as fn(_, _) -> bool);
    }

    #[test]
    fn prop_distance_non_negative() {
        fn prop(ax: i32, ay: i32, bx: i32, by: i32) -> bool {
            distance(Position::new(ax, ay), Position::new(bx, by)) >= 0.0
        }
        quickcheck(prop as fn(_, _, _, _) -> bool);
    }
}
