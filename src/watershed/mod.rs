/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

// private sub-module defined in other files
mod accumulator;
mod points;
mod tasks;

// exports identifiers from private sub-modules in the current module namespace
pub use self::accumulator::WindowAccumulator;
pub use self::points::delineate_watersheds;
pub use self::tasks::{delineate_task, find_stream_task, GridEdge, D8_INFLOW, D8_OFFSET};

use std::collections::HashMap;
use std::io::{Error, ErrorKind};

use geojson::{Geometry, Value};

use crate::algorithms::{offset_ring, polygon_area, simplify_rdp, vectorize_mask};
use crate::crs::CrsTransformer;
use crate::raster::Raster;
use crate::structures::{Point2D, Window};

/// Options for `delineate` beyond the query point and the two mandatory
/// rasters.
#[derive(Clone, Debug, Default)]
pub struct DelineateOptions {
    /// Snap the point downstream to the nearest stream cell first. Requires
    /// `fa_src`.
    pub snap: bool,
    /// Flow accumulation raster, used to report drainage area when snapping.
    pub fa_src: Option<String>,
    /// EPSG code of the query point; the point is assumed to be in the
    /// raster CRS when absent.
    pub xy_srs: Option<u16>,
    /// EPSG code for the output polygon; raster CRS when absent.
    pub out_crs: Option<u16>,
    /// Douglas-Peucker tolerance for the output polygon; 0 disables.
    pub simplify: f64,
    /// Morphological smoothing distance (dilate then erode); 0 disables.
    pub smooth: f64,
}

/// A delineated watershed: the (possibly snapped) outlet point, the polygon
/// area in raster CRS units, and the polygon itself.
#[derive(Debug)]
pub struct Watershed {
    pub x: f64,
    pub y: f64,
    pub area: f64,
    pub geometry: Geometry,
}

/// Search downstream of (x, y) for the nearest stream cell and return its
/// centre coordinate. When a flow-accumulation raster is supplied the
/// drainage area at the snapped cell is returned as well.
///
/// The walk follows the D8 chain across block windows, reloading the
/// neighbouring window whenever the chain steps off the current one.
pub fn find_stream(
    stream_src: &str,
    fd_src: &str,
    fa_src: Option<&str>,
    x: f64,
    y: f64,
    xy_srs: Option<u16>,
) -> Result<(f64, f64, Option<f64>), Error> {
    let mut streams = Raster::open(stream_src)?;
    let mut fd = Raster::open(fd_src)?;
    if !fd.matches(&streams) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Input stream and flow direction rasters must match",
        ));
    }
    let mut fa = match fa_src {
        Some(path) => Some(Raster::open(path)?),
        None => None,
    };

    // Align the point with the grids and move downslope to a stream
    let (x_prepared, y_prepared) = match xy_srs {
        Some(srs) => CrsTransformer::new(srs, fd.epsg_code())?.transform(x, y)?,
        None => (x, y),
    };

    let (mut window, mut i, mut j) = fd.intersecting_window(x_prepared, y_prepared)?;

    {
        let fd_data = fd.read_window(&window)?;
        let dir = fd_data.get_value(i, j);
        if dir == fd.nodata() || dir <= 0f64 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("The point ({}, {}) has no defined flow direction", x, y),
            ));
        }
    }

    loop {
        let stream_data = streams.read_window(&window)?;
        let fd_data = fd.read_window(&window)?;
        let (found, i_next, j_next) = find_stream_task(&stream_data, &fd_data, i, j);
        i = i_next;
        j = j_next;
        if found {
            break;
        }

        if window.contains_index(i, j) {
            // the walk died on a cell with no downstream direction
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("No streams found near the point ({}, {})", x, y),
            ));
        }

        let (wx, wy) = fd.xy_from_window_index(i, j, &window);
        match fd.intersecting_window(wx, wy) {
            Ok((next_window, i_next, j_next)) => {
                window = next_window;
                i = i_next;
                j = j_next;
            }
            Err(_) => {
                // walked off the raster without meeting a stream
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("No streams found near the point ({}, {})", x, y),
                ));
            }
        }
    }

    let area = match fa.as_mut() {
        Some(fa) => {
            let fa_data = fa.read_window(&window)?;
            Some((fa_data.get_value(i, j) * fa.csx() * fa.csy()).abs())
        }
        None => None,
    };

    let (mut x_snap, mut y_snap) = fd.xy_from_window_index(i, j, &window);
    if let Some(srs) = xy_srs {
        // Return the coordinates to their original coordinate system
        let back = CrsTransformer::new(fd.epsg_code(), srs)?;
        let (bx, by) = back.transform(x_snap, y_snap)?;
        x_snap = bx;
        y_snap = by;
    }

    Ok((x_snap, y_snap, area))
}

/// Delineate the watershed draining through the point (x, y) and vectorize
/// it. The returned coordinates are the outlet actually used (snapped when
/// `options.snap` is set), in the query CRS.
pub fn delineate(
    x: f64,
    y: f64,
    stream_src: &str,
    fd_src: &str,
    options: &DelineateOptions,
) -> Result<Watershed, Error> {
    let (mut x, mut y) = (x, y);
    if options.snap {
        let fa_src = options.fa_src.as_deref().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                "Flow accumulation raster is required for snapping",
            )
        })?;
        let (x_snap, y_snap, _) =
            find_stream(stream_src, fd_src, Some(fa_src), x, y, options.xy_srs)?;
        x = x_snap;
        y = y_snap;
    }

    let mut fd = Raster::open(fd_src)?;
    {
        let streams = Raster::open(stream_src)?;
        if !fd.matches(&streams) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Input stream and flow direction rasters must match",
            ));
        }
    }

    // Match the point to the raster spatial reference
    let (x_grid, y_grid) = match options.xy_srs {
        Some(srs) => CrsTransformer::new(srs, fd.epsg_code())?.transform(x, y)?,
        None => (x, y),
    };

    let coverage = grow_basin(&mut fd, x_grid, y_grid)?;
    let (mask, (left, top, csx, csy)) = coverage.materialize();
    let mut polygons = vectorize_mask(mask, left, top, csx, csy);

    if options.simplify > 0f64 {
        polygons = simplify_polygons(polygons, options.simplify);
    }
    if options.smooth > 0f64 {
        polygons = smooth_polygons(polygons, options.smooth);
    }

    let area = multipolygon_area(&polygons);

    if let Some(out_crs) = options.out_crs {
        let transformer = CrsTransformer::new(fd.epsg_code(), out_crs)?;
        for polygon in polygons.iter_mut() {
            for ring in polygon.iter_mut() {
                for point in ring.iter_mut() {
                    let (px, py) = transformer.transform(point.x, point.y)?;
                    point.x = px;
                    point.y = py;
                }
            }
        }
    }

    Ok(Watershed {
        x,
        y,
        area,
        geometry: to_multipolygon_geometry(&polygons),
    })
}

/// Floods the reverse D8 graph upstream of (x, y), window by window,
/// carrying contributing cells across window seams, and returns the
/// coverage mosaic. Hand-offs that resolve outside the raster are dropped:
/// the watershed is simply truncated at the data edge.
fn grow_basin(fd: &mut Raster, x: f64, y: f64) -> Result<WindowAccumulator, Error> {
    let (seed_window, seed_i, seed_j) = fd.intersecting_window(x, y)?;

    let mut stacks: HashMap<Window, Vec<(isize, isize)>> = HashMap::new();
    stacks.insert(seed_window, vec![(seed_i, seed_j)]);

    let mut coverage = WindowAccumulator::from_raster(fd, &seed_window);
    coverage.set_value(&seed_window, seed_i, seed_j, 1);

    let mut current = seed_window;
    loop {
        // Flow direction data over the extent of the current window
        let data = fd.read_window(&current)?;

        // Add contributing cells to the window mask from the stack, and reset
        let seeds = stacks.insert(current, vec![]).unwrap_or_default();
        let (basin, edges) = delineate_task(&data, seeds, &[]);

        for &(bi, bj) in &basin {
            coverage.set_value(&current, bi, bj, 1);
        }

        // Edge cells are tracked to determine if adjacent windows are needed
        if !edges.is_empty() {
            let rows = data.rows();
            let columns = data.columns();

            // partition into the four single-edge overshoots and the four
            // corner overshoots; each bucket resolves to one target window
            let mut buckets: [Vec<GridEdge>; 8] = Default::default();
            for edge in edges {
                let top = edge.i < 0;
                let bottom = edge.i == rows;
                let left = edge.j < 0;
                let right = edge.j == columns;
                let b = if top && left {
                    4
                } else if top && right {
                    5
                } else if bottom && left {
                    6
                } else if bottom && right {
                    7
                } else if top {
                    0
                } else if bottom {
                    1
                } else if left {
                    2
                } else {
                    3
                };
                buckets[b].push(edge);
            }

            for bucket in buckets.iter() {
                if bucket.is_empty() {
                    continue;
                }
                let rep = bucket[0];
                let (wx, wy) = fd.xy_from_window_index(rep.i, rep.j, &current);
                let (next_window, rep_i, rep_j) = match fd.intersecting_window(wx, wy) {
                    Ok(resolved) => resolved,
                    Err(_) => continue, // out of bounds
                };

                // Align the edge locations with the next window and add
                // contributing locations to the respective window stack
                let di = rep_i - rep.i;
                let dj = rep_j - rep.j;

                let next_data = fd.read_window(&next_window)?;
                coverage.add_window(&next_window);

                for edge in bucket.iter() {
                    let (ti, tj) = (edge.i + di, edge.j + dj);
                    if next_data.get_value(ti, tj) as i32 != edge.dir {
                        continue;
                    }
                    // already-collected cells would only repeat work
                    if coverage.get_value(&next_window, ti, tj) != 0 {
                        continue;
                    }
                    coverage.set_value(&next_window, ti, tj, 1);
                    stacks
                        .entry(next_window)
                        .or_insert_with(Vec::new)
                        .push((ti, tj));
                }
            }
        }

        match stacks.iter().find(|(_, stack)| !stack.is_empty()) {
            Some((window, _)) => current = *window,
            None => break,
        }
    }

    Ok(coverage)
}

fn simplify_polygons(
    polygons: Vec<Vec<Vec<Point2D>>>,
    tolerance: f64,
) -> Vec<Vec<Vec<Point2D>>> {
    let mut out = vec![];
    for polygon in polygons {
        let mut rings: Vec<Vec<Point2D>> = vec![];
        for (n, ring) in polygon.into_iter().enumerate() {
            let simplified = simplify_rdp(&ring, tolerance);
            if simplified.len() >= 4 {
                rings.push(simplified);
            } else if n == 0 {
                // the exterior collapsed; the polygon is gone
                rings.clear();
                break;
            }
        }
        if !rings.is_empty() {
            out.push(rings);
        }
    }
    out
}

// Morphological smoothing: dilate every ring by `dist`, then erode the
// survivors by the same amount. Holes narrower than the distance close
// during dilation and stay closed.
fn smooth_polygons(polygons: Vec<Vec<Vec<Point2D>>>, dist: f64) -> Vec<Vec<Vec<Point2D>>> {
    let mut out = vec![];
    for polygon in polygons {
        let mut rings: Vec<Vec<Point2D>> = vec![];
        for (n, ring) in polygon.into_iter().enumerate() {
            let grown = offset_ring(&ring, dist);
            if grown.is_empty() {
                if n == 0 {
                    rings.clear();
                    break;
                }
                continue;
            }
            let smoothed = offset_ring(&grown, -dist);
            if smoothed.is_empty() {
                if n == 0 {
                    rings.clear();
                    break;
                }
                continue;
            }
            rings.push(smoothed);
        }
        if !rings.is_empty() {
            out.push(rings);
        }
    }
    out
}

fn multipolygon_area(polygons: &[Vec<Vec<Point2D>>]) -> f64 {
    let mut area = 0f64;
    for polygon in polygons {
        if polygon.is_empty() {
            continue;
        }
        area += polygon_area(&polygon[0]);
        for hole in polygon.iter().skip(1) {
            area -= polygon_area(hole);
        }
    }
    area
}

fn to_multipolygon_geometry(polygons: &[Vec<Vec<Point2D>>]) -> Geometry {
    let coordinates: Vec<Vec<Vec<Vec<f64>>>> = polygons
        .iter()
        .map(|polygon| {
            polygon
                .iter()
                .map(|ring| ring.iter().map(|p| vec![p.x, p.y]).collect())
                .collect()
        })
        .collect();
    Geometry::new(Value::MultiPolygon(coordinates))
}

#[cfg(test)]
mod test {
    use super::{delineate, find_stream, DelineateOptions};
    use crate::algorithms::point_in_ring;
    use crate::crs::transform_point;
    use crate::raster::{write_geotiff, DataType, RasterConfigs};
    use crate::structures::{Array2D, Point2D};
    use geojson::Value;

    struct Fixture {
        paths: Vec<String>,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            for p in &self.paths {
                let _ = std::fs::remove_file(p);
            }
        }
    }

    fn temp_path(name: &str, kind: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "fastws_ws_{}_{}_{}.tif",
            name,
            kind,
            std::process::id()
        ));
        p.to_string_lossy().to_string()
    }

    fn write_grid(
        path: &str,
        rows: usize,
        columns: usize,
        block: usize,
        values: &[f64],
        data_type: DataType,
        nodata: f64,
        epsg: u16,
        west: f64,
        north: f64,
    ) {
        let configs = RasterConfigs {
            rows,
            columns,
            nodata,
            north,
            south: north - rows as f64,
            east: west + columns as f64,
            west,
            resolution_x: 1.0,
            resolution_y: 1.0,
            data_type,
            epsg_code: epsg,
            block_width: block,
            block_height: block,
            ..Default::default()
        };
        let mut data = Array2D::new(rows as isize, columns as isize, nodata, nodata).unwrap();
        for row in 0..rows {
            for col in 0..columns {
                data.set_value(row as isize, col as isize, values[row * columns + col]);
            }
        }
        write_geotiff(path, &configs, &data).unwrap();
    }

    // Streams rasters mark stream cells with 1 over a nodata of 0; flow
    // accumulation rasters carry 1.0 everywhere.
    fn write_scenario(
        name: &str,
        rows: usize,
        columns: usize,
        block: usize,
        fd: &[f64],
        stream_cells: &[(usize, usize)],
        epsg: u16,
        west: f64,
        north: f64,
    ) -> (String, String, String, Fixture) {
        let fd_path = temp_path(name, "fd");
        let streams_path = temp_path(name, "streams");
        let fa_path = temp_path(name, "fa");
        write_grid(
            &fd_path, rows, columns, block, fd, DataType::I16, -32768.0, epsg, west, north,
        );
        let mut streams = vec![0f64; rows * columns];
        for &(r, c) in stream_cells {
            streams[r * columns + c] = 1f64;
        }
        write_grid(
            &streams_path, rows, columns, block, &streams, DataType::I16, 0.0, epsg, west, north,
        );
        let fa = vec![1f64; rows * columns];
        write_grid(
            &fa_path, rows, columns, block, &fa, DataType::F32, -9999.0, epsg, west, north,
        );
        let fixture = Fixture {
            paths: vec![fd_path.clone(), streams_path.clone(), fa_path.clone()],
        };
        (fd_path, streams_path, fa_path, fixture)
    }

    // The S2 grid: column 2 flows north to a stream cell at (0, 2) and
    // every other column drains sideways into column 2.
    fn spine_fd() -> Vec<f64> {
        let mut fd = vec![0f64; 25];
        for row in 0..5 {
            for col in 0..5 {
                fd[row * 5 + col] = match col {
                    0 | 1 => 8.0,
                    2 => 2.0,
                    _ => 4.0,
                };
            }
        }
        fd
    }

    // The cross-window grid: columns 0..=2 flow east, column 3 flows south
    // to a stream cell in the corner at (3, 3).
    fn cross_window_fd() -> Vec<f64> {
        let mut fd = vec![0f64; 16];
        for row in 0..4 {
            for col in 0..4 {
                fd[row * 4 + col] = if col == 3 { 6.0 } else { 8.0 };
            }
        }
        fd
    }

    fn multipolygon_coordinates(geometry: &geojson::Geometry) -> Vec<Vec<Vec<Vec<f64>>>> {
        match &geometry.value {
            Value::MultiPolygon(coords) => coords.clone(),
            other => panic!("expected a MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_s1_undefined_flow_direction() {
        let fd = vec![0f64; 9];
        let (fd_path, streams_path, fa_path, _fx) =
            write_scenario("s1", 3, 3, 3, &fd, &[(1, 1)], 32611, 0.0, 0.0);
        let err = find_stream(&streams_path, &fd_path, Some(&fa_path), 1.5, -1.5, None)
            .unwrap_err();
        assert!(
            err.to_string().contains("no defined flow direction"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_s2_snap_along_spine() {
        let (fd_path, streams_path, fa_path, _fx) =
            write_scenario("s2_snap", 5, 5, 5, &spine_fd(), &[(0, 2)], 32611, 0.0, 0.0);
        let (x, y, area) = find_stream(
            &streams_path,
            &fd_path,
            Some(&fa_path),
            2.5,
            -4.5,
            None,
        )
        .unwrap();
        assert_eq!((x, y), (2.5, -0.5));
        assert_eq!(area, Some(1.0));
    }

    #[test]
    fn test_s2_delineate_full_grid() {
        let (fd_path, streams_path, fa_path, _fx) =
            write_scenario("s2_delin", 5, 5, 5, &spine_fd(), &[(0, 2)], 32611, 0.0, 0.0);
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            ..Default::default()
        };
        let ws = delineate(2.5, -4.5, &streams_path, &fd_path, &options).unwrap();
        assert_eq!((ws.x, ws.y), (2.5, -0.5));
        assert_eq!(ws.area, 25.0);
        let coords = multipolygon_coordinates(&ws.geometry);
        assert_eq!(coords.len(), 1);
        assert_eq!(coords[0].len(), 1); // no holes
    }

    #[test]
    fn test_s3_cross_window_hand_off() {
        let (fd_path, streams_path, fa_path, _fx) = write_scenario(
            "s3", 4, 4, 2, &cross_window_fd(), &[(3, 3)], 32611, 0.0, 0.0,
        );
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            ..Default::default()
        };
        let ws = delineate(0.5, -0.5, &streams_path, &fd_path, &options).unwrap();
        assert_eq!((ws.x, ws.y), (3.5, -3.5));
        // the basin covers the whole raster, crossing every block seam
        assert_eq!(ws.area, 16.0);
        let coords = multipolygon_coordinates(&ws.geometry);
        assert_eq!(coords.len(), 1);
        let ring = &coords[0][0];
        let xs: Vec<f64> = ring.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = ring.iter().map(|p| p[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f64::INFINITY, f64::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f64::INFINITY, f64::min), -4.0);
        assert_eq!(ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 0.0);
    }

    #[test]
    fn test_s4_truncation_at_raster_edge() {
        // every cell flows east; the stream sits on the eastern edge, so
        // the basin's own edge cells resolve off the raster and are dropped
        let fd = vec![8f64; 9];
        let (fd_path, streams_path, fa_path, _fx) =
            write_scenario("s4", 3, 3, 3, &fd, &[(1, 2)], 32611, 0.0, 0.0);
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            ..Default::default()
        };
        let ws = delineate(0.5, -1.5, &streams_path, &fd_path, &options).unwrap();
        // row 1 drains through the stream cell; the boundary column is kept
        assert_eq!(ws.area, 3.0);
        let coords = multipolygon_coordinates(&ws.geometry);
        let ring = &coords[0][0];
        let xs: Vec<f64> = ring.iter().map(|p| p[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f64::INFINITY, f64::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 3.0);
    }

    #[test]
    fn test_s5_crs_round_trip() {
        // the same spine grid, but at real UTM 11N coordinates and queried
        // in geographic coordinates
        let west = 500000.0;
        let north = 5000000.0;
        let (fd_path, streams_path, fa_path, _fx) = write_scenario(
            "s5", 5, 5, 5, &spine_fd(), &[(0, 2)], 32611, west, north,
        );
        let (lon, lat) = transform_point(west + 2.5, north - 4.5, 32611, 4326).unwrap();
        let (x_snap, y_snap, _) = find_stream(
            &streams_path,
            &fd_path,
            Some(&fa_path),
            lon,
            lat,
            Some(4326),
        )
        .unwrap();
        let (x_utm, y_utm) = transform_point(x_snap, y_snap, 4326, 32611).unwrap();
        assert!((x_utm - (west + 2.5)).abs() < 0.5, "x = {}", x_utm);
        assert!((y_utm - (north - 0.5)).abs() < 0.5, "y = {}", y_utm);
    }

    #[test]
    fn test_s6_raster_mismatch() {
        let fd = vec![8f64; 20];
        let fd_path = temp_path("s6", "fd");
        write_grid(&fd_path, 4, 5, 2, &fd, DataType::I16, -32768.0, 32611, 0.0, 0.0);
        let streams = vec![0f64; 16];
        let streams_path = temp_path("s6", "streams");
        write_grid(&streams_path, 4, 4, 2, &streams, DataType::I16, 0.0, 32611, 0.0, 0.0);
        let _fx = Fixture {
            paths: vec![fd_path.clone(), streams_path.clone()],
        };
        let err = find_stream(&streams_path, &fd_path, None, 0.5, -0.5, None).unwrap_err();
        assert!(err.to_string().contains("must match"), "unexpected error: {}", err);

        let err = delineate(0.5, -0.5, &streams_path, &fd_path, &DelineateOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("must match"), "unexpected error: {}", err);
    }

    #[test]
    fn test_window_independence() {
        // the same grid delineated under two different tilings produces the
        // same polygon; (0, 0) drains north off the raster so the basin is
        // asymmetric
        let mut fd = cross_window_fd();
        fd[0] = 2.0;
        let (fd_a, st_a, fa_a, _fa_fx) =
            write_scenario("tile2", 4, 4, 2, &fd, &[(3, 3)], 32611, 0.0, 0.0);
        let (fd_b, st_b, fa_b, _fb_fx) =
            write_scenario("tile4", 4, 4, 4, &fd, &[(3, 3)], 32611, 0.0, 0.0);
        let options_a = DelineateOptions {
            snap: true,
            fa_src: Some(fa_a.clone()),
            ..Default::default()
        };
        let options_b = DelineateOptions {
            snap: true,
            fa_src: Some(fa_b.clone()),
            ..Default::default()
        };
        let ws_a = delineate(0.5, -1.5, &st_a, &fd_a, &options_a).unwrap();
        let ws_b = delineate(0.5, -1.5, &st_b, &fd_b, &options_b).unwrap();
        assert_eq!(ws_a.area, 15.0);
        assert_eq!(ws_a.area, ws_b.area);
        assert_eq!(
            multipolygon_coordinates(&ws_a.geometry),
            multipolygon_coordinates(&ws_b.geometry)
        );
    }

    #[test]
    fn test_idempotence() {
        let (fd_path, streams_path, fa_path, _fx) = write_scenario(
            "idem", 4, 4, 2, &cross_window_fd(), &[(3, 3)], 32611, 0.0, 0.0,
        );
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            ..Default::default()
        };
        let first = delineate(0.5, -0.5, &streams_path, &fd_path, &options).unwrap();
        let second = delineate(0.5, -0.5, &streams_path, &fd_path, &options).unwrap();
        assert_eq!(first.area, second.area);
        assert_eq!((first.x, first.y), (second.x, second.y));
        assert_eq!(
            multipolygon_coordinates(&first.geometry),
            multipolygon_coordinates(&second.geometry)
        );
    }

    #[test]
    fn test_basin_completeness_and_soundness() {
        // fd with an excluded corner: (0, 0) drains north off the raster
        let mut fd = cross_window_fd();
        fd[0] = 2.0;
        let (fd_path, streams_path, fa_path, _fx) =
            write_scenario("sound", 4, 4, 2, &fd, &[(3, 3)], 32611, 0.0, 0.0);
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            ..Default::default()
        };
        let ws = delineate(0.5, -1.5, &streams_path, &fd_path, &options).unwrap();
        let coords = multipolygon_coordinates(&ws.geometry);

        let contains = |x: f64, y: f64| -> bool {
            coords.iter().any(|polygon| {
                let ring: Vec<Point2D> =
                    polygon[0].iter().map(|p| Point2D::new(p[0], p[1])).collect();
                if !point_in_ring(&Point2D::new(x, y), &ring) {
                    return false;
                }
                !polygon.iter().skip(1).any(|hole| {
                    let hole: Vec<Point2D> =
                        hole.iter().map(|p| Point2D::new(p[0], p[1])).collect();
                    point_in_ring(&Point2D::new(x, y), &hole)
                })
            })
        };

        // walk the D8 grid in the test to the terminal cell
        let offsets = super::D8_OFFSET;
        let walk_reaches_outlet = |mut r: isize, mut c: isize| -> bool {
            loop {
                if (r, c) == (3, 3) {
                    return true;
                }
                let code = fd[(r * 4 + c) as usize];
                if code <= 0.0 {
                    return false;
                }
                let (dr, dc) = offsets[code as usize];
                r += dr;
                c += dc;
                if r < 0 || r > 3 || c < 0 || c > 3 {
                    return false;
                }
            }
        };

        for row in 0..4isize {
            for col in 0..4isize {
                let (x, y) = (col as f64 + 0.5, -(row as f64) - 0.5);
                if contains(x, y) {
                    // completeness: every marked cell drains to the outlet
                    assert!(walk_reaches_outlet(row, col), "({}, {})", row, col);
                } else {
                    // soundness: no unmarked cell drains to the outlet
                    assert!(!walk_reaches_outlet(row, col), "({}, {})", row, col);
                }
            }
        }
    }

    #[test]
    fn test_simplify_and_smooth_options() {
        let (fd_path, streams_path, fa_path, _fx) = write_scenario(
            "post", 4, 4, 2, &cross_window_fd(), &[(3, 3)], 32611, 0.0, 0.0,
        );
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            simplify: 0.1,
            smooth: 0.5,
            ..Default::default()
        };
        let ws = delineate(0.5, -0.5, &streams_path, &fd_path, &options).unwrap();
        // a square basin survives closing nearly unchanged
        assert!((ws.area - 16.0).abs() < 1.0, "area = {}", ws.area);
    }

    #[test]
    fn test_out_crs_reprojection() {
        let west = 500000.0;
        let north = 5000000.0;
        let (fd_path, streams_path, fa_path, _fx) = write_scenario(
            "outcrs", 4, 4, 2, &cross_window_fd(), &[(3, 3)], 32611, west, north,
        );
        let options = DelineateOptions {
            snap: true,
            fa_src: Some(fa_path.clone()),
            out_crs: Some(4326),
            ..Default::default()
        };
        let ws = delineate(west + 0.5, north - 0.5, &streams_path, &fd_path, &options).unwrap();
        // the area is reported in raster units, while the polygon is
        // reprojected to geographic coordinates
        assert_eq!(ws.area, 16.0);
        let coords = multipolygon_coordinates(&ws.geometry);
        for p in &coords[0][0] {
            assert!(p[0] < -110.0 && p[0] > -124.0, "lon = {}", p[0]);
            assert!(p[1] > 40.0 && p[1] < 50.0, "lat = {}", p[1]);
        }
    }

    #[test]
    fn test_snap_requires_accumulation() {
        let (fd_path, streams_path, _fa, _fx) =
            write_scenario("noacc", 3, 3, 3, &vec![8f64; 9], &[(1, 2)], 32611, 0.0, 0.0);
        let options = DelineateOptions {
            snap: true,
            ..Default::default()
        };
        let err = delineate(0.5, -1.5, &streams_path, &fd_path, &options).unwrap_err();
        assert!(err.to_string().contains("accumulation"), "unexpected error: {}", err);
    }

    #[test]
    fn test_no_stream_found() {
        // flow reaches the raster edge without meeting a stream
        let fd = vec![8f64; 9];
        let (fd_path, streams_path, fa_path, _fx) =
            write_scenario("nostream", 3, 3, 3, &fd, &[], 32611, 0.0, 0.0);
        let err = find_stream(&streams_path, &fd_path, Some(&fa_path), 0.5, -1.5, None)
            .unwrap_err();
        assert!(err.to_string().contains("No streams"), "unexpected error: {}", err);
    }
}
