/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use crate::structures::Point2D;

/// Calculates the area of a polygon defined by a series of vertices.
pub fn polygon_area(vertices: &[Point2D]) -> f64 {
    let num_vertices = vertices.len();

    let mut area = 0f64;

    for i in 0..num_vertices - 1 {
        area += vertices[i].x * vertices[i + 1].y - vertices[i + 1].x * vertices[i].y;
    }

    area +=
        vertices[num_vertices - 1].x * vertices[0].y - vertices[0].x * vertices[num_vertices - 1].y;

    area.abs() / 2.0f64
}
