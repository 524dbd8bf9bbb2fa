/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::collections::{HashMap, VecDeque};

use crate::algorithms::{is_clockwise_order, point_in_ring, polygon_area};
use crate::structures::{Array2D, Point2D};

/// Traces the boundaries of an 8-connected boolean mask into a multipolygon.
///
/// `mask` holds 1 for filled cells; `left`/`top`/`csx`/`csy` give the affine
/// placement of the mask's top-left corner. The result is a list of
/// polygons, each a list of closed rings with the exterior ring first
/// (counter-clockwise) followed by any holes (clockwise). Diagonally
/// touching cells belong to the same connected region; their shared corner
/// splits the outline into simple rings that touch at that corner.
pub fn vectorize_mask(
    mask: &Array2D<u8>,
    left: f64,
    top: f64,
    csx: f64,
    csy: f64,
) -> Vec<Vec<Vec<Point2D>>> {
    let rows = mask.rows();
    let columns = mask.columns();

    // Clump the mask into 8-connected regions.
    let dx = [0isize, 1, 0, -1, 1, 1, -1, -1];
    let dy = [-1isize, 0, 1, 0, -1, 1, 1, -1];
    let mut clumps: Array2D<u32> = Array2D::new(rows, columns, 0u32, 0u32).unwrap();
    let mut queue = VecDeque::new();
    let mut num_clumps = 0u32;
    for row in 0..rows {
        for col in 0..columns {
            if mask.get_value(row, col) == 1 && clumps.get_value(row, col) == 0 {
                num_clumps += 1;
                clumps.set_value(row, col, num_clumps);
                queue.push_back((row, col));
                while let Some(cell) = queue.pop_front() {
                    for n in 0..8 {
                        let rn = cell.0 + dy[n];
                        let cn = cell.1 + dx[n];
                        if mask.get_value(rn, cn) == 1 && clumps.get_value(rn, cn) == 0 {
                            clumps.set_value(rn, cn, num_clumps);
                            queue.push_back((rn, cn));
                        }
                    }
                }
            }
        }
    }
    if num_clumps == 0 {
        return vec![];
    }

    // Collect directed boundary edges per clump, in cell-corner coordinates.
    // Edges keep the filled side on their left, so exterior rings chain
    // counter-clockwise in world space and holes clockwise.
    let mut clump_edges: Vec<Vec<((i64, i64), (i64, i64))>> = vec![vec![]; num_clumps as usize];
    for row in 0..rows {
        for col in 0..columns {
            let z = clumps.get_value(row, col);
            if z == 0 {
                continue;
            }
            let (r, c) = (row as i64, col as i64);
            let edges = &mut clump_edges[z as usize - 1];
            if clumps.get_value(row - 1, col) != z {
                edges.push(((r, c + 1), (r, c))); // top side, walked west
            }
            if clumps.get_value(row, col + 1) != z {
                edges.push(((r + 1, c + 1), (r, c + 1))); // right side, walked north
            }
            if clumps.get_value(row + 1, col) != z {
                edges.push(((r + 1, c), (r + 1, c + 1))); // bottom side, walked east
            }
            if clumps.get_value(row, col - 1) != z {
                edges.push(((r, c), (r + 1, c))); // left side, walked south
            }
        }
    }

    let mut multipolygon: Vec<Vec<Vec<Point2D>>> = vec![];
    for edges in &clump_edges {
        let rings = chain_rings(edges);
        multipolygon.extend(assemble_polygons(rings, left, top, csx, csy));
    }
    multipolygon
}

/// Chains directed boundary edges into closed corner-coordinate rings.
/// A corner revisited mid-trace pinches off the loop walked since the first
/// visit, so every returned ring is simple.
fn chain_rings(edges: &[((i64, i64), (i64, i64))]) -> Vec<Vec<(i64, i64)>> {
    let mut start_at: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (n, edge) in edges.iter().enumerate() {
        start_at.entry(edge.0).or_insert_with(Vec::new).push(n);
    }
    let mut used = vec![false; edges.len()];
    let mut rings: Vec<Vec<(i64, i64)>> = vec![];

    for e0 in 0..edges.len() {
        if used[e0] {
            continue;
        }
        let mut path: Vec<(i64, i64)> = vec![edges[e0].0];
        let mut open: HashMap<(i64, i64), usize> = HashMap::new();
        open.insert(path[0], 0);
        let mut current = e0;

        loop {
            used[current] = true;
            if let Some(bucket) = start_at.get_mut(&edges[current].0) {
                bucket.retain(|&n| n != current);
            }
            let end = edges[current].1;

            if let Some(&p) = open.get(&end) {
                // Closed a loop back to position p; pinch it off.
                let mut ring: Vec<(i64, i64)> = path[p..].to_vec();
                ring.push(end);
                rings.push(ring);
                for corner in path.drain(p + 1..) {
                    open.remove(&corner);
                }
                if p == 0 {
                    break;
                }
            } else {
                path.push(end);
                open.insert(end, path.len() - 1);
            }

            let candidates = match start_at.get(&end) {
                Some(bucket) if !bucket.is_empty() => bucket,
                _ => break, // no continuation; only reachable on degenerate input
            };
            let next = if candidates.len() == 1 {
                candidates[0]
            } else {
                // Two ways out of this corner (diagonally touching cells);
                // take the sharpest turn toward the filled side so each
                // sub-loop hugs its own cell.
                let incoming = direction_world(edges[current]);
                let mut choice = candidates[0];
                let mut min_cross = f64::INFINITY;
                for &n in candidates.iter() {
                    let cross = incoming.cross(direction_world(edges[n]));
                    if cross < min_cross {
                        min_cross = cross;
                        choice = n;
                    }
                }
                choice
            };
            current = next;
        }
    }
    rings
}

// World-space direction of a corner-coordinate edge; row axis points down.
fn direction_world(edge: ((i64, i64), (i64, i64))) -> Point2D {
    Point2D::new(
        (edge.1 .1 - edge.0 .1) as f64,
        (edge.0 .0 - edge.1 .0) as f64,
    )
}

/// Converts corner rings to world coordinates, merges collinear runs, and
/// groups holes under the exterior ring that contains them.
fn assemble_polygons(
    rings: Vec<Vec<(i64, i64)>>,
    left: f64,
    top: f64,
    csx: f64,
    csy: f64,
) -> Vec<Vec<Vec<Point2D>>> {
    let mut exteriors: Vec<Vec<Point2D>> = vec![];
    let mut holes: Vec<Vec<Point2D>> = vec![];
    for ring in rings {
        let merged = merge_collinear(&ring);
        if merged.len() < 4 {
            continue;
        }
        let pts: Vec<Point2D> = merged
            .iter()
            .map(|&(r, c)| Point2D::new(left + c as f64 * csx, top - r as f64 * csy))
            .collect();
        if is_clockwise_order(&pts) {
            holes.push(pts);
        } else {
            exteriors.push(pts);
        }
    }

    let mut polygons: Vec<Vec<Vec<Point2D>>> = exteriors.into_iter().map(|e| vec![e]).collect();
    if polygons.is_empty() {
        return polygons;
    }
    for hole in holes {
        let mut owner = 0usize;
        if polygons.len() > 1 {
            let mut found = false;
            for (n, poly) in polygons.iter().enumerate() {
                if point_in_ring(&hole[0], &poly[0]) {
                    owner = n;
                    found = true;
                    break;
                }
            }
            if !found {
                // a hole vertex can sit exactly on a pinched exterior;
                // fall back to the largest exterior
                let mut max_area = 0f64;
                for (n, poly) in polygons.iter().enumerate() {
                    let area = polygon_area(&poly[0]);
                    if area > max_area {
                        max_area = area;
                        owner = n;
                    }
                }
            }
        }
        polygons[owner].push(hole);
    }
    polygons
}

// Drops vertices that continue in the same direction as the previous edge.
// Input and output rings are closed (first == last).
fn merge_collinear(ring: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let n = ring.len() - 1; // ignore the closing vertex
    if n < 3 {
        return ring.to_vec();
    }
    let mut kept: Vec<(i64, i64)> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let curr = ring[i];
        let next = ring[(i + 1) % n];
        let d1 = (curr.0 - prev.0, curr.1 - prev.1);
        let d2 = (next.0 - curr.0, next.1 - curr.1);
        let cross = d1.0 * d2.1 - d1.1 * d2.0;
        let dot = d1.0 * d2.0 + d1.1 * d2.1;
        if cross != 0 || dot <= 0 {
            kept.push(curr);
        }
    }
    if kept.is_empty() {
        return vec![];
    }
    let first = kept[0];
    kept.push(first);
    kept
}

#[cfg(test)]
mod test {
    use super::vectorize_mask;
    use crate::algorithms::{is_clockwise_order, polygon_area};
    use crate::structures::Array2D;

    fn mask_from(rows: isize, columns: isize, filled: &[(isize, isize)]) -> Array2D<u8> {
        let mut mask = Array2D::new(rows, columns, 0u8, 0u8).unwrap();
        for &(r, c) in filled {
            mask.set_value(r, c, 1);
        }
        mask
    }

    #[test]
    fn test_single_cell() {
        let mask = mask_from(3, 3, &[(1, 1)]);
        let polys = vectorize_mask(&mask, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 1);
        let ring = &polys[0][0];
        assert_eq!(ring.first(), ring.last());
        assert!(!is_clockwise_order(ring));
        assert_eq!(polygon_area(ring), 1.0);
    }

    #[test]
    fn test_rectangle_merges_collinear() {
        let mask = mask_from(3, 4, &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        let polys = vectorize_mask(&mask, 10.0, -10.0, 2.0, 2.0);
        assert_eq!(polys.len(), 1);
        let ring = &polys[0][0];
        // a 2x3-cell rectangle reduces to its 4 corners plus closure
        assert_eq!(ring.len(), 5);
        assert_eq!(polygon_area(ring), 6.0 * 2.0 * 2.0);
    }

    #[test]
    fn test_donut_has_hole() {
        let filled: Vec<(isize, isize)> = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .filter(|&(r, c)| !(r == 1 && c == 1))
            .collect();
        let mask = mask_from(3, 3, &filled);
        let polys = vectorize_mask(&mask, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].len(), 2);
        assert!(!is_clockwise_order(&polys[0][0]));
        assert!(is_clockwise_order(&polys[0][1]));
        assert_eq!(polygon_area(&polys[0][0]), 9.0);
        assert_eq!(polygon_area(&polys[0][1]), 1.0);
    }

    #[test]
    fn test_diagonal_cells_split_at_pinch() {
        let mask = mask_from(2, 2, &[(0, 0), (1, 1)]);
        let polys = vectorize_mask(&mask, 0.0, 0.0, 1.0, 1.0);
        // one 8-connected region, normalized to two simple rings that touch
        assert_eq!(polys.len(), 2);
        let total: f64 = polys.iter().map(|p| polygon_area(&p[0])).sum();
        assert_eq!(total, 2.0);
        for poly in &polys {
            assert_eq!(poly.len(), 1);
            assert!(!is_clockwise_order(&poly[0]));
        }
    }

    #[test]
    fn test_separate_regions() {
        let mask = mask_from(3, 5, &[(0, 0), (0, 4), (1, 4)]);
        let polys = vectorize_mask(&mask, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(polys.len(), 2);
        let total: f64 = polys.iter().map(|p| polygon_area(&p[0])).sum();
        assert_eq!(total, 3.0);
    }

    #[test]
    fn test_empty_mask() {
        let mask = mask_from(4, 4, &[]);
        assert!(vectorize_mask(&mask, 0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
