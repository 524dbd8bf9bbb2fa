/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use crate::algorithms::is_clockwise_order;
use crate::structures::Point2D;

/// Calculates the winding number of a point with respect to a closed ring
/// (v[0] == v[v.len() - 1]), based on http://geomalgorithms.com/a03-_inclusion.html.
/// The winding number is zero only when the point is outside the ring.
pub fn point_in_ring(p: &Point2D, v: &[Point2D]) -> bool {
    if v.len() < 4 || v[0] != v[v.len() - 1] {
        return false;
    }
    let mut wn = 0i32;
    // loop through all edges of the polygon
    for i in 0..v.len() - 1 {
        // edge from v[i] to v[i+1]
        if v[i].y <= p.y {
            if v[i + 1].y > p.y {
                // an upward crossing
                if p.is_left(&v[i], &v[i + 1]) > 0f64 {
                    wn += 1i32; // have a valid up intersect
                }
            }
        } else {
            if v[i + 1].y <= p.y {
                // a downward crossing
                if p.is_left(&v[i], &v[i + 1]) < 0f64 {
                    wn -= 1i32; // have a valid down intersect
                }
            }
        }
    }
    wn != 0i32
}

// Angular step used when rounding a join, about 15 degrees.
const ARC_STEP: f64 = std::f64::consts::PI / 12.0;

/// Offsets a closed ring sideways by `dist` and returns the offset ring,
/// closed. Positive distances offset to the right of the direction of
/// travel; for rings that keep their solid side on the left (counter-
/// clockwise exteriors, clockwise holes) this dilates the solid region,
/// while negative distances erode it. Joins that open away from the offset
/// side are rounded with short arc segments. Returns an empty vector when
/// the ring collapses under the offset.
pub fn offset_ring(points: &[Point2D], dist: f64) -> Vec<Point2D> {
    if points.len() < 4 || dist == 0f64 {
        return points.to_vec();
    }
    let was_clockwise = is_clockwise_order(points);

    // Work on the open ring; the closing vertex is re-appended at the end.
    let verts = &points[..points.len() - 1];
    let n = verts.len();

    let mut offset: Vec<Point2D> = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = verts[(i + n - 1) % n];
        let curr = verts[i];
        let next = verts[(i + 1) % n];

        let d1 = unit(curr - prev);
        let d2 = unit(next - curr);
        let n1 = Point2D::new(d1.y, -d1.x); // right-hand normal
        let n2 = Point2D::new(d2.y, -d2.x);
        let cross = d1.cross(d2);

        // Turning toward the offset side makes the shifted edges converge;
        // turning away from it opens a gap that needs a join.
        let gap_on_offset_side = (dist > 0f64 && cross > 1e-12) || (dist < 0f64 && cross < -1e-12);
        if gap_on_offset_side {
            // The two offset edges diverge around this vertex; bridge the gap
            // with an arc centred on the vertex.
            let start = Point2D::new(n1.x * dist, n1.y * dist);
            let end = Point2D::new(n2.x * dist, n2.y * dist);
            offset.push(curr + start);
            let a1 = start.y.atan2(start.x);
            let a2 = end.y.atan2(end.x);
            let mut sweep = a2 - a1;
            while sweep > std::f64::consts::PI {
                sweep -= 2.0 * std::f64::consts::PI;
            }
            while sweep < -std::f64::consts::PI {
                sweep += 2.0 * std::f64::consts::PI;
            }
            let steps = (sweep.abs() / ARC_STEP).ceil() as usize;
            let r = dist.abs();
            for s in 1..steps {
                let a = a1 + sweep * (s as f64 / steps as f64);
                offset.push(curr + Point2D::new(r * a.cos(), r * a.sin()));
            }
            offset.push(curr + end);
        } else {
            // The offset edges converge; use their intersection, falling
            // back to a bevel when the miter would run away on a near-spike.
            let p1 = prev + Point2D::new(n1.x * dist, n1.y * dist);
            let p2 = curr + Point2D::new(n2.x * dist, n2.y * dist);
            let denom = d1.cross(d2);
            if denom.abs() < 1e-12 {
                offset.push(curr + Point2D::new(n1.x * dist, n1.y * dist));
            } else {
                let w = p2 - p1;
                let t = w.cross(d2) / denom;
                let mitre = Point2D::new(p1.x + d1.x * t, p1.y + d1.y * t);
                if mitre.distance(&curr) > 4.0 * dist.abs() {
                    offset.push(curr + Point2D::new(n1.x * dist, n1.y * dist));
                    offset.push(curr + Point2D::new(n2.x * dist, n2.y * dist));
                } else {
                    offset.push(mitre);
                }
            }
        }
    }

    if offset.len() < 3 {
        return vec![];
    }
    let first = offset[0];
    offset.push(first);

    remove_loops(&mut offset);

    // The ring vanished if erosion consumed it or flipped its orientation.
    if offset.len() < 4 || is_clockwise_order(&offset) != was_clockwise {
        return vec![];
    }
    offset
}

fn unit(p: Point2D) -> Point2D {
    let mag = p.magnitude();
    if mag < 1e-12 {
        return Point2D::new(0f64, 0f64);
    }
    Point2D::new(p.x / mag, p.y / mag)
}

/// Cuts self-intersection loops out of a closed ring in place. Offsetting
/// concave stretches by more than their local feature size produces small
/// swallowtail loops; each is replaced by its crossing point.
fn remove_loops(ring: &mut Vec<Point2D>) {
    let mut cleaned = true;
    while cleaned {
        cleaned = false;
        let n = ring.len();
        'outer: for a in 0..n.saturating_sub(3) {
            for b in (a + 2)..(n - 1) {
                // the first and last segments share the ring's closing vertex
                if a == 0 && b == n - 2 {
                    continue;
                }
                if let Some(p) =
                    segment_intersection(&ring[a], &ring[a + 1], &ring[b], &ring[b + 1])
                {
                    if b - a <= n / 2 {
                        // drop the vertices between the two crossing segments
                        ring.splice(a + 1..=b, std::iter::once(p));
                    } else {
                        // the span between the crossings is the ring body;
                        // keep it and drop the rest
                        let mut kept: Vec<Point2D> = Vec::with_capacity(b - a + 2);
                        kept.push(p);
                        kept.extend_from_slice(&ring[a + 1..=b]);
                        kept.push(p);
                        *ring = kept;
                    }
                    cleaned = true;
                    break 'outer;
                }
            }
        }
    }
}

fn segment_intersection(
    p1: &Point2D,
    p2: &Point2D,
    p3: &Point2D,
    p4: &Point2D,
) -> Option<Point2D> {
    let r = *p2 - *p1;
    let s = *p4 - *p3;
    let denom = r.cross(s);
    if denom.abs() < 1e-12 {
        return None;
    }
    let qp = *p3 - *p1;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    // strict interior crossings only; shared endpoints are normal in a ring
    if t > 1e-9 && t < 1.0 - 1e-9 && u > 1e-9 && u < 1.0 - 1e-9 {
        return Some(Point2D::new(p1.x + r.x * t, p1.y + r.y * t));
    }
    None
}
