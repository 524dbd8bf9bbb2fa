/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use crate::structures::Point2D;

/// Perpendicular distance from a point to the line through `start` and
/// `end`; falls back to plain point distance when the line is degenerate.
pub fn point_line_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    let chord = *end - *start;
    let length = chord.magnitude();
    if length == 0f64 {
        return point.distance(start);
    }
    chord.cross(*point - *start).abs() / length
}

/// Ramer-Douglas-Peucker line simplification: vertices closer than
/// `epsilon` to the chord of their span are dropped. Worked iteratively
/// over a span stack with a keep mask; the endpoints always survive, so a
/// closed ring stays closed.
///
/// References:
/// Douglas, D.H., Peucker, T.K., 1973. Algorithms for the reduction of the number of points required to
/// represent a digitized line or its caricature. Cartographica 10, 112-122.
///
/// Ramer, U., 1972. An iterative procedure for the polygonal approximation of plane curves. Computer
/// Graphics and Image Processing 1, 244-256.
pub fn simplify_rdp(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut spans: Vec<(usize, usize)> = vec![(0, points.len() - 1)];
    while let Some((first, last)) = spans.pop() {
        if last <= first + 1 {
            continue;
        }
        let mut farthest = first;
        let mut dmax = 0f64;
        for n in (first + 1)..last {
            let d = point_line_distance(&points[n], &points[first], &points[last]);
            if d > dmax {
                dmax = d;
                farthest = n;
            }
        }
        if dmax > epsilon {
            keep[farthest] = true;
            spans.push((first, farthest));
            spans.push((farthest, last));
        }
    }

    points
        .iter()
        .zip(keep.iter())
        .filter(|(_, &kept)| kept)
        .map(|(p, _)| *p)
        .collect()
}

#[cfg(test)]
mod test {
    use super::{point_line_distance, simplify_rdp};
    use crate::structures::Point2D;

    #[test]
    fn test_point_line_distance() {
        let p = Point2D::new(0.0, 5.0);
        let start = Point2D::new(-10.0, 0.0);
        let end = Point2D::new(10.0, 0.0);
        assert_eq!(point_line_distance(&p, &start, &end), 5.0);
    }

    #[test]
    fn test_point_line_distance_degenerate_line() {
        let p = Point2D::new(3.0, 4.0);
        let start = Point2D::new(0.0, 0.0);
        assert_eq!(point_line_distance(&p, &start, &start), 5.0);
    }

    #[test]
    fn test_simplify_rdp_removes_near_collinear() {
        let line = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.05),
            Point2D::new(2.0, -0.02),
            Point2D::new(3.0, 0.0),
        ];
        let simplified = simplify_rdp(&line, 0.5);
        assert_eq!(
            simplified,
            vec![Point2D::new(0.0, 0.0), Point2D::new(3.0, 0.0)]
        );
    }

    #[test]
    fn test_simplify_rdp_keeps_significant_vertices() {
        let line = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 4.0),
            Point2D::new(10.0, 0.0),
        ];
        let simplified = simplify_rdp(&line, 0.5);
        assert_eq!(simplified.len(), 3);
    }

    #[test]
    fn test_simplify_rdp_closed_ring_stays_closed() {
        let ring = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(0.0, 2.0),
            Point2D::new(0.0, 0.0),
        ];
        let simplified = simplify_rdp(&ring, 0.1);
        assert_eq!(simplified.first(), simplified.last());
        assert!(simplified.len() >= 4);
    }
}
