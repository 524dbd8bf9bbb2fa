/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

// private sub-module defined in other files
mod is_clockwise_order;
mod line_ops;
mod poly_area;
mod poly_ops;
mod vectorize;

// exports identifiers from private sub-modules in the current module namespace
pub use self::is_clockwise_order::is_clockwise_order;
pub use self::line_ops::{point_line_distance, simplify_rdp};
pub use self::poly_area::polygon_area;
pub use self::poly_ops::{offset_ring, point_in_ring};
pub use self::vectorize::vectorize_mask;
