/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::collections::HashMap;

use crate::raster::Raster;
use crate::structures::{Array2D, Window};

/// A growing boolean mosaic aligned to a source raster's grid. Windows
/// register as they are touched; the buffer is reallocated to the union of
/// the registered windows' extents and every registered window keeps a
/// fixed slice into it. Cells hold 0/1 so the finished mosaic can feed the
/// vectorizer directly.
pub struct WindowAccumulator {
    top: f64,
    left: f64,
    csx: f64,
    csy: f64,
    top_accum: f64,
    bottom_accum: f64,
    left_accum: f64,
    right_accum: f64,
    a: Array2D<u8>,
    windows: HashMap<Window, (usize, usize)>,
}

impl WindowAccumulator {
    pub fn new(top: f64, left: f64, csx: f64, csy: f64, init_window: &Window) -> WindowAccumulator {
        let a = Array2D::new(init_window.height as isize, init_window.width as isize, 0u8, 0u8)
            .expect("window dimensions are non-negative");
        let top_accum = top - init_window.row_off as f64 * csy;
        let bottom_accum = top - (init_window.row_off + init_window.height) as f64 * csy;
        let left_accum = left + init_window.col_off as f64 * csx;
        let right_accum = left + (init_window.col_off + init_window.width) as f64 * csx;

        let mut windows = HashMap::new();
        windows.insert(*init_window, (0usize, 0usize));

        WindowAccumulator {
            top,
            left,
            csx,
            csy,
            top_accum,
            bottom_accum,
            left_accum,
            right_accum,
            a,
            windows,
        }
    }

    pub fn from_raster(raster: &Raster, window: &Window) -> WindowAccumulator {
        WindowAccumulator::new(raster.top(), raster.left(), raster.csx(), raster.csy(), window)
    }

    pub fn contains(&self, window: &Window) -> bool {
        self.windows.contains_key(window)
    }

    // All world-extent to cell-count conversions round the same way so
    // adjacent resizes can never disagree about a boundary cell.
    fn cells(&self, distance: f64, cell_size: f64) -> usize {
        let n = (distance / cell_size).round();
        if n <= 0f64 {
            0
        } else {
            n as usize
        }
    }

    /// Registers a window, growing the mosaic buffer if the window extends
    /// past the current bounds. A no-op for known windows.
    pub fn add_window(&mut self, window: &Window) {
        if self.windows.contains_key(window) {
            return;
        }

        let window_top = self.top - window.row_off as f64 * self.csy;
        let window_bottom = self.top - (window.row_off + window.height) as f64 * self.csy;
        let window_left = self.left + window.col_off as f64 * self.csx;
        let window_right = self.left + (window.col_off + window.width) as f64 * self.csx;

        let new_top = self.top_accum.max(window_top);
        let new_bottom = self.bottom_accum.min(window_bottom);
        let new_left = self.left_accum.min(window_left);
        let new_right = self.right_accum.max(window_right);

        let new_rows = self.cells(new_top - new_bottom, self.csy);
        let new_columns = self.cells(new_right - new_left, self.csx);
        let mut new_a = Array2D::new(new_rows as isize, new_columns as isize, 0u8, 0u8)
            .expect("mosaic dimensions are non-negative");

        // where the old buffer lands inside the new one
        let row_offset = self.cells(new_top - self.top_accum, self.csy);
        let col_offset = self.cells(self.left_accum - new_left, self.csx);
        for row in 0..self.a.rows() {
            for col in 0..self.a.columns() {
                new_a.set_value(
                    row + row_offset as isize,
                    col + col_offset as isize,
                    self.a.get_value(row, col),
                );
            }
        }

        let mut new_windows: HashMap<Window, (usize, usize)> =
            HashMap::with_capacity(self.windows.len() + 1);
        for (w, (row_start, col_start)) in self.windows.iter() {
            new_windows.insert(*w, (row_start + row_offset, col_start + col_offset));
        }
        new_windows.insert(
            *window,
            (
                self.cells(new_top - window_top, self.csy),
                self.cells(window_left - new_left, self.csx),
            ),
        );

        self.windows = new_windows;
        self.a = new_a;
        self.top_accum = new_top;
        self.bottom_accum = new_bottom;
        self.left_accum = new_left;
        self.right_accum = new_right;
    }

    /// The (row, column) slice origin of a registered window inside the
    /// mosaic buffer.
    pub fn window_slice(&self, window: &Window) -> Option<(usize, usize)> {
        self.windows.get(window).copied()
    }

    pub fn get_value(&self, window: &Window, i: isize, j: isize) -> u8 {
        match self.windows.get(window) {
            Some(&(row_start, col_start)) => self
                .a
                .get_value(row_start as isize + i, col_start as isize + j),
            None => 0,
        }
    }

    pub fn set_value(&mut self, window: &Window, i: isize, j: isize, value: u8) {
        if let Some(&(row_start, col_start)) = self.windows.get(window) {
            self.a
                .set_value(row_start as isize + i, col_start as isize + j, value);
        }
    }

    /// The finished mosaic and its affine placement `(left, top, csx, csy)`.
    pub fn materialize(&self) -> (&Array2D<u8>, (f64, f64, f64, f64)) {
        (
            &self.a,
            (self.left_accum, self.top_accum, self.csx, self.csy),
        )
    }
}
