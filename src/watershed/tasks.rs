/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use crate::structures::Array2D;

/// Downstream cell offset (row, column) for each D8 code. Index 0 is the
/// "no flow" placeholder; codes run 1..=8.
pub const D8_OFFSET: [(isize, isize); 9] = [
    (0, 0),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
];

/// The D8 code a neighbour at offset (dr, dc) from a cell must carry for
/// its flow to enter that cell, indexed as `[dr + 1][dc + 1]`. Zero marks
/// the centre.
pub const D8_INFLOW: [[i32; 3]; 3] = [[7, 6, 5], [8, 0, 4], [1, 2, 3]];

// The eight neighbour offsets, in (row, column) order.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// An out-of-window neighbour reported by the flood kernel: its
/// within-window indices (one of which is out of range) and the D8 code it
/// must carry to contribute to the cell that reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEdge {
    pub i: isize,
    pub j: isize,
    pub dir: i32,
}

/// Walks the D8 chain downstream from (i, j) within one window until a
/// stream cell is hit, the walk leaves the window, or flow ends. A cell is
/// a stream cell when its value in `stream` differs from that grid's nodata.
///
/// Returns `(found, i, j)`. When the walk steps off the window the
/// out-of-range indices are preserved so the caller can locate the
/// neighbouring window from them.
pub fn find_stream_task(
    stream: &Array2D<f64>,
    fd: &Array2D<f64>,
    mut i: isize,
    mut j: isize,
) -> (bool, isize, isize) {
    loop {
        if stream.get_value(i, j) != stream.nodata() {
            return (true, i, j);
        }

        // Off map
        let dir = fd.get_value(i, j);
        if dir <= 0f64 || dir == fd.nodata() || dir > 8f64 {
            return (false, i, j);
        }

        // Collect the downstream cell
        let (i_offset, j_offset) = D8_OFFSET[dir as usize];
        i += i_offset;
        j += j_offset;

        if i < 0 || i >= fd.rows() || j < 0 || j >= fd.columns() {
            return (false, i, j);
        }
    }
}

/// Grows a watershed inside one window by flooding the reverse D8 graph
/// from the seed stack. Every within-window cell whose flow path enters a
/// seed is collected; neighbours that fall outside the window are reported
/// as candidate hand-offs together with the inflow code the next window
/// must verify.
///
/// `avoid_offsets` suppresses the listed neighbour offsets while the first
/// seed is expanded, which lets a caller keep a confluence seed from
/// re-absorbing the tributary that led to it; it is ignored after the
/// first pop.
pub fn delineate_task(
    fd: &Array2D<f64>,
    stack: Vec<(isize, isize)>,
    avoid_offsets: &[(isize, isize)],
) -> (Vec<(isize, isize)>, Vec<GridEdge>) {
    let rows = fd.rows();
    let columns = fd.columns();
    let mut basin: Vec<(isize, isize)> = Vec::with_capacity(stack.len() * 4);
    let mut edges: Vec<GridEdge> = vec![];

    let mut list_stack = stack;
    let mut first_pop = true;

    while let Some((i, j)) = list_stack.pop() {
        for &(row_offset, col_offset) in NEIGHBOURS.iter() {
            if first_pop && avoid_offsets.contains(&(row_offset, col_offset)) {
                continue;
            }

            let (t_i, t_j) = (i + row_offset, j + col_offset);
            let inflow = D8_INFLOW[(row_offset + 1) as usize][(col_offset + 1) as usize];

            // Out of bounds?
            if t_i < 0 || t_j < 0 || t_i == rows || t_j == columns {
                edges.push(GridEdge {
                    i: t_i,
                    j: t_j,
                    dir: inflow,
                });
                continue;
            }

            // Flow off map
            let z = fd.get_value(t_i, t_j);
            if z <= 0f64 || z == fd.nodata() {
                continue;
            }

            // Does the element at this offset contribute to the element
            // being tested?
            if z as i32 == inflow {
                list_stack.push((t_i, t_j));
                basin.push((t_i, t_j));
            }
        }

        // avoid offsets only applies to the first seed expanded
        first_pop = false;
    }

    (basin, edges)
}
