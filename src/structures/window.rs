/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::fmt;

/// Identifies one block of a tiled raster by its offset and dimensions, in
/// cells. Two windows are the same block iff all four values agree, which
/// makes `Window` usable as a hash-map key for per-window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub row_off: usize,
    pub col_off: usize,
    pub height: usize,
    pub width: usize,
}

impl Window {
    pub fn new(row_off: usize, col_off: usize, height: usize, width: usize) -> Window {
        Window {
            row_off,
            col_off,
            height,
            width,
        }
    }

    /// True if the within-window index (i, j) falls inside the window.
    pub fn contains_index(&self, i: isize, j: isize) -> bool {
        i >= 0 && j >= 0 && i < self.height as isize && j < self.width as isize
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Window(row_off={}, col_off={}, height={}, width={})",
            self.row_off, self.col_off, self.height, self.width
        )
    }
}
