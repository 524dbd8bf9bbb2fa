/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

pub mod geotiff;

use std::collections::HashMap;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

use crate::raster::geotiff::{read_geotiff, GeoTiffSource};
use crate::structures::{Array2D, BoundingBox, Window};
use crate::utils::Endianness;

pub use crate::raster::geotiff::write_geotiff;

/// Grid, placement, and storage description of an open raster.
#[derive(Clone, Debug)]
pub struct RasterConfigs {
    pub rows: usize,
    pub columns: usize,
    pub nodata: f64,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub resolution_x: f64,
    pub resolution_y: f64,
    pub data_type: DataType,
    pub endian: Endianness,
    pub epsg_code: u16,
    /// Block dimensions in cells; zero means strip organization.
    pub block_width: usize,
    pub block_height: usize,
}

impl Default for RasterConfigs {
    fn default() -> RasterConfigs {
        RasterConfigs {
            rows: 0,
            columns: 0,
            nodata: -32768.0,
            north: f64::NEG_INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            west: f64::INFINITY,
            resolution_x: f64::NEG_INFINITY,
            resolution_y: f64::NEG_INFINITY,
            data_type: DataType::Unknown,
            endian: Endianness::LittleEndian,
            epsg_code: 0u16,
            block_width: 0,
            block_height: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataType {
    U8,
    I16,
    U16,
    I32,
    F32,
    F64,
    Unknown,
}

impl DataType {
    pub fn get_data_size(&self) -> usize {
        match *self {
            DataType::U8 => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::F32 => 4,
            DataType::F64 => 8,
            DataType::Unknown => 0,
        }
    }

    pub fn tiff_sample_format(&self) -> u16 {
        match *self {
            DataType::U8 | DataType::U16 => 1,
            DataType::I16 | DataType::I32 => 2,
            DataType::F32 | DataType::F64 => 3,
            DataType::Unknown => 0,
        }
    }

    pub fn from_tiff(bits_per_sample: u16, sample_format: u16) -> DataType {
        match (sample_format, bits_per_sample) {
            (1, 8) => DataType::U8,
            (1, 16) => DataType::U16,
            (2, 8) => DataType::I16, // widened; i8 values survive the round trip
            (2, 16) => DataType::I16,
            (2, 32) => DataType::I32,
            (1, 32) => DataType::I32,
            (3, 32) => DataType::F32,
            (3, 64) => DataType::F64,
            _ => DataType::Unknown,
        }
    }
}

/// A tiled raster open for windowed reads. Decoded windows are cached for
/// the lifetime of the reader and shared by reference; the cache mutates on
/// reads, so a reader must not be shared across threads.
#[derive(Debug)]
pub struct Raster {
    pub file_name: String,
    pub configs: RasterConfigs,
    source: GeoTiffSource,
    data_cache: HashMap<Window, Arc<Array2D<f64>>>,
}

impl Raster {
    /// Opens a raster for windowed reads. Strip-organized (untiled) sources
    /// are rejected.
    pub fn open(file_name: &str) -> Result<Raster, Error> {
        let (configs, source) = read_geotiff(file_name)?;
        if configs.block_width == 0 || configs.block_height == 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Input raster should be tiled",
            ));
        }
        Ok(Raster {
            file_name: file_name.to_string(),
            configs,
            source,
            data_cache: HashMap::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.configs.rows
    }

    pub fn columns(&self) -> usize {
        self.configs.columns
    }

    pub fn left(&self) -> f64 {
        self.configs.west
    }

    pub fn top(&self) -> f64 {
        self.configs.north
    }

    pub fn csx(&self) -> f64 {
        self.configs.resolution_x
    }

    pub fn csy(&self) -> f64 {
        self.configs.resolution_y
    }

    pub fn nodata(&self) -> f64 {
        self.configs.nodata
    }

    pub fn epsg_code(&self) -> u16 {
        self.configs.epsg_code
    }

    /// The raster's blocks in row-major order. Border blocks are truncated
    /// to the raster extent, so the windows tile the grid exactly.
    pub fn block_windows(&self) -> Vec<Window> {
        let mut windows = vec![];
        let mut row_off = 0usize;
        while row_off < self.configs.rows {
            let height = self.configs.block_height.min(self.configs.rows - row_off);
            let mut col_off = 0usize;
            while col_off < self.configs.columns {
                let width = self.configs.block_width.min(self.configs.columns - col_off);
                windows.push(Window::new(row_off, col_off, height, width));
                col_off += self.configs.block_width;
            }
            row_off += self.configs.block_height;
        }
        windows
    }

    /// World extent of a window, inclusive of its outer edges.
    pub fn window_extent(&self, window: &Window) -> BoundingBox {
        let top = self.configs.north - window.row_off as f64 * self.configs.resolution_y;
        let bottom =
            self.configs.north - (window.row_off + window.height) as f64 * self.configs.resolution_y;
        let left = self.configs.west + window.col_off as f64 * self.configs.resolution_x;
        let right =
            self.configs.west + (window.col_off + window.width) as f64 * self.configs.resolution_x;
        BoundingBox::new(left, right, bottom, top)
    }

    /// Reads one window of cells, decoding on first access. Repeated reads
    /// of the same window return the same shared buffer.
    pub fn read_window(&mut self, window: &Window) -> Result<Arc<Array2D<f64>>, Error> {
        if let Some(data) = self.data_cache.get(window) {
            return Ok(Arc::clone(data));
        }
        let data = Arc::new(self.source.read_window(window, &self.configs)?);
        self.data_cache.insert(*window, Arc::clone(&data));
        Ok(data)
    }

    /// Returns the block containing the world point (x, y) along with the
    /// point's indices local to that block. The bounds test is inclusive on
    /// all four sides; points on shared edges resolve to the first block in
    /// row-major order.
    pub fn intersecting_window(&self, x: f64, y: f64) -> Result<(Window, isize, isize), Error> {
        for window in self.block_windows() {
            let ext = self.window_extent(&window);
            if ext.is_point_in_box(x, y) {
                let i = ((ext.max_y - y) / self.configs.resolution_y).floor() as isize;
                let j = ((x - ext.min_x) / self.configs.resolution_x).floor() as isize;
                return Ok((window, i, j));
            }
        }
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("No window intersects the point ({}, {})", x, y),
        ))
    }

    /// Cell-centre world coordinate of the index (i, j) relative to
    /// `window`. The indices may fall outside the window (negative or past
    /// its dimensions); the same linear formula applies, which is what lets
    /// a walker that stepped off a window locate the neighbouring one.
    pub fn xy_from_window_index(&self, i: isize, j: isize, window: &Window) -> (f64, f64) {
        let ext = self.window_extent(window);
        let half_csy = self.configs.resolution_y / 2.0;
        let half_csx = self.configs.resolution_x / 2.0;
        let y = (ext.max_y - i as f64 * self.configs.resolution_y) - half_csy;
        let x = (ext.min_x + j as f64 * self.configs.resolution_x) + half_csx;
        (x, y)
    }

    /// Converts a world point to a global grid index.
    pub fn coord_to_idx(&self, x: f64, y: f64) -> Result<(isize, isize), Error> {
        let i = ((self.configs.north - y) / self.configs.resolution_y).floor() as isize;
        let j = ((x - self.configs.west) / self.configs.resolution_x).floor() as isize;
        if i < 0 || j < 0 || i > self.configs.rows as isize - 1 || j > self.configs.columns as isize - 1
        {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Location ({}, {}) off of raster map", x, y),
            ));
        }
        Ok((i, j))
    }

    /// True when the two rasters cover the same grid: bounds agree to
    /// within one cell on every side, the CRS codes match, and the
    /// dimensions match.
    pub fn matches(&self, other: &Raster) -> bool {
        let tol_x = self.configs.resolution_x;
        let tol_y = self.configs.resolution_y;
        (self.configs.west - other.configs.west).abs() <= tol_x
            && (self.configs.east - other.configs.east).abs() <= tol_x
            && (self.configs.north - other.configs.north).abs() <= tol_y
            && (self.configs.south - other.configs.south).abs() <= tol_y
            && self.configs.epsg_code == other.configs.epsg_code
            && self.configs.rows == other.configs.rows
            && self.configs.columns == other.configs.columns
    }
}

#[cfg(test)]
mod test {
    use super::{write_geotiff, DataType, Raster, RasterConfigs};
    use crate::structures::Array2D;
    use std::sync::Arc;

    fn temp_path(name: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("fastws_raster_{}_{}.tif", name, std::process::id()));
        p.to_string_lossy().to_string()
    }

    fn configs(rows: usize, columns: usize, block: usize) -> RasterConfigs {
        RasterConfigs {
            rows,
            columns,
            nodata: -32768.0,
            north: 0.0,
            south: -(rows as f64),
            east: columns as f64,
            west: 0.0,
            resolution_x: 1.0,
            resolution_y: 1.0,
            data_type: DataType::I16,
            epsg_code: 32611,
            block_width: block,
            block_height: block,
            ..Default::default()
        }
    }

    fn sequential_data(rows: isize, columns: isize) -> Array2D<f64> {
        let mut data = Array2D::new(rows, columns, 0f64, -32768f64).unwrap();
        for row in 0..rows {
            for col in 0..columns {
                data.set_value(row, col, (row * columns + col) as f64);
            }
        }
        data
    }

    #[test]
    fn test_write_open_read_round_trip() {
        let path = temp_path("round_trip");
        let cfg = configs(5, 7, 3);
        let data = sequential_data(5, 7);
        write_geotiff(&path, &cfg, &data).unwrap();

        let mut raster = Raster::open(&path).unwrap();
        assert_eq!(raster.rows(), 5);
        assert_eq!(raster.columns(), 7);
        assert_eq!(raster.epsg_code(), 32611);
        assert_eq!(raster.nodata(), -32768.0);
        assert_eq!(raster.csx(), 1.0);

        for window in raster.block_windows() {
            let block = raster.read_window(&window).unwrap();
            assert_eq!(block.rows() as usize, window.height);
            assert_eq!(block.columns() as usize, window.width);
            for r in 0..window.height as isize {
                for c in 0..window.width as isize {
                    let row = window.row_off as isize + r;
                    let col = window.col_off as isize + c;
                    assert_eq!(block.get_value(r, c), data.get_value(row, col));
                }
            }
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_rejects_untiled() {
        let path = temp_path("untiled");
        let cfg = configs(4, 4, 0);
        let data = sequential_data(4, 4);
        write_geotiff(&path, &cfg, &data).unwrap();
        let err = Raster::open(&path).unwrap_err();
        assert!(err.to_string().contains("tiled"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_window_cache_returns_same_buffer() {
        let path = temp_path("cache");
        let cfg = configs(4, 4, 2);
        write_geotiff(&path, &cfg, &sequential_data(4, 4)).unwrap();
        let mut raster = Raster::open(&path).unwrap();
        let window = raster.block_windows()[0];
        let first = raster.read_window(&window).unwrap();
        let second = raster.read_window(&window).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_intersecting_window_and_indices() {
        let path = temp_path("intersect");
        let cfg = configs(4, 6, 2);
        write_geotiff(&path, &cfg, &sequential_data(4, 6)).unwrap();
        let raster = Raster::open(&path).unwrap();

        // centre of cell (3, 5) lives in the block at (2, 4)
        let (window, i, j) = raster.intersecting_window(5.5, -3.5).unwrap();
        assert_eq!(window.row_off, 2);
        assert_eq!(window.col_off, 4);
        assert_eq!((i, j), (1, 1));

        // a point on a shared block edge resolves to the first block that
        // contains it in row-major order
        let (window, _, _) = raster.intersecting_window(2.0, -1.0).unwrap();
        assert_eq!((window.row_off, window.col_off), (0, 0));

        assert!(raster.intersecting_window(100.0, 100.0).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_xy_from_window_index_handles_out_of_window() {
        let path = temp_path("xy_index");
        let cfg = configs(4, 4, 2);
        write_geotiff(&path, &cfg, &sequential_data(4, 4)).unwrap();
        let raster = Raster::open(&path).unwrap();
        let window = raster.block_windows()[3]; // row_off 2, col_off 2

        assert_eq!(raster.xy_from_window_index(0, 0, &window), (2.5, -2.5));
        // the same linear formula applies beyond the window bounds
        assert_eq!(raster.xy_from_window_index(-1, 0, &window), (2.5, -1.5));
        assert_eq!(raster.xy_from_window_index(2, 2, &window), (4.5, -4.5));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_coord_to_idx() {
        let path = temp_path("coord_idx");
        let cfg = configs(4, 4, 2);
        write_geotiff(&path, &cfg, &sequential_data(4, 4)).unwrap();
        let raster = Raster::open(&path).unwrap();
        assert_eq!(raster.coord_to_idx(0.5, -0.5).unwrap(), (0, 0));
        assert_eq!(raster.coord_to_idx(3.5, -3.5).unwrap(), (3, 3));
        assert!(raster.coord_to_idx(-0.5, -0.5).is_err());
        assert!(raster.coord_to_idx(0.5, -4.5).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_matches() {
        let path_a = temp_path("match_a");
        let path_b = temp_path("match_b");
        let path_c = temp_path("match_c");
        write_geotiff(&path_a, &configs(4, 4, 2), &sequential_data(4, 4)).unwrap();
        write_geotiff(&path_b, &configs(4, 4, 2), &sequential_data(4, 4)).unwrap();
        write_geotiff(&path_c, &configs(4, 5, 2), &sequential_data(4, 5)).unwrap();
        let a = Raster::open(&path_a).unwrap();
        let b = Raster::open(&path_b).unwrap();
        let c = Raster::open(&path_c).unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
        for p in [&path_a, &path_b, &path_c] {
            let _ = std::fs::remove_file(p);
        }
    }

    #[test]
    fn test_float_raster_round_trip() {
        let path = temp_path("float");
        let mut cfg = configs(3, 3, 2);
        cfg.data_type = DataType::F32;
        cfg.nodata = -9999.0;
        let mut data = Array2D::new(3, 3, 0f64, -9999f64).unwrap();
        data.set_value(1, 1, 2.5);
        data.set_value(2, 2, -9999.0);
        write_geotiff(&path, &cfg, &data).unwrap();
        let mut raster = Raster::open(&path).unwrap();
        assert_eq!(raster.nodata(), -9999.0);
        let (window, i, j) = raster.intersecting_window(1.5, -1.5).unwrap();
        let block = raster.read_window(&window).unwrap();
        assert_eq!(block.get_value(i, j), 2.5);
        let _ = std::fs::remove_file(&path);
    }
}
