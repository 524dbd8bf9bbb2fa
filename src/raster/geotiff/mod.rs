#![allow(dead_code)]
pub mod geokeys;

use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{Error, ErrorKind};

use miniz_oxide::inflate::decompress_to_vec_zlib;

use crate::raster::geotiff::geokeys::GeoKeys;
use crate::raster::{DataType, RasterConfigs};
use crate::structures::{Array2D, Window};
use crate::utils::{ByteOrderReader, ByteOrderWriter, Endianness};

/// Decoded header of an open GeoTIFF plus the raw file bytes; tiles are
/// decoded lazily, one window at a time.
#[derive(Debug)]
pub struct GeoTiffSource {
    th: ByteOrderReader,
    block_offsets: Vec<u64>,
    block_counts: Vec<u64>,
    blocks_across: usize,
    compression: u16,
    sample_format: u16,
    bits_per_sample: u16,
}

/// Parses the IFD of `file_name` and returns the raster configuration along
/// with a tile source for windowed reads. Strip-organized files yield a
/// configuration with `block_width == 0` and an empty tile table.
pub fn read_geotiff(file_name: &str) -> Result<(RasterConfigs, GeoTiffSource), Error> {
    let mut f = File::open(file_name)?;
    let metadata = fs::metadata(file_name)?;
    let file_size: usize = metadata.len() as usize;
    let mut buffer = vec![0; file_size];

    // read the file's bytes into a buffer
    f.read_exact(&mut buffer)?;

    let mut configs = RasterConfigs::default();

    match &buffer[0..2] {
        b"II" => configs.endian = Endianness::LittleEndian,
        b"MM" => configs.endian = Endianness::BigEndian,
        _ => return Err(Error::new(ErrorKind::InvalidData, "Incorrect TIFF header.")),
    }

    let mut th = ByteOrderReader::new(buffer, configs.endian);
    th.seek(2);

    match th.read_u16() {
        42 => (), // do nothing
        43 => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "The BigTiff format is not currently supported.",
            ))
        }
        _ => return Err(Error::new(ErrorKind::InvalidData, "Incorrect TIFF header.")),
    }

    let mut ifd_offset = th.read_u32() as usize;

    let mut ifd_map = HashMap::new();
    let mut cur_pos: usize;
    while ifd_offset > 0 {
        th.seek(ifd_offset);
        let num_directories = th.read_u16();
        for _ in 0..num_directories {
            let tag_id = th.read_u16();
            let field_type = th.read_u16();
            let num_values = th.read_u32();
            let value_offset = th.read_u32();
            let data_size = match field_type {
                1u16 | 2u16 | 6u16 | 7u16 => 1,
                3u16 | 8u16 => 2,
                4u16 | 9u16 | 11u16 => 4,
                5u16 | 10u16 | 12u16 => 8,
                _ => return Err(Error::new(ErrorKind::InvalidInput, "Error reading the IFDs.")),
            };

            // read the tag data
            let mut data: Vec<u8> = vec![];
            cur_pos = th.pos();
            if (data_size * num_values as usize) > 4 {
                // the values are stored at the offset location
                th.seek(value_offset as usize);
            } else {
                // the value(s) are contained in the offset itself
                th.seek(cur_pos - 4);
            }
            for _ in 0..(num_values as usize * data_size) {
                data.push(th.read_u8());
            }
            th.seek(cur_pos);

            let ifd = IfdDirectory::new(
                tag_id,
                field_type,
                num_values,
                value_offset,
                data,
                configs.endian,
            );
            ifd_map.insert(tag_id, ifd);
        }
        ifd_offset = th.read_u32() as usize;
    }

    configs.columns = match ifd_map.get(&TAG_IMAGEWIDTH) {
        // The 256 tag can be either u16 or u32 type
        Some(ifd) => ifd.interpret_as_usize()[0],
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "The raster Columns value was not read correctly",
            ))
        }
    };

    configs.rows = match ifd_map.get(&TAG_IMAGELENGTH) {
        Some(ifd) => ifd.interpret_as_usize()[0],
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "The raster Rows value was not read correctly",
            ))
        }
    };

    let bits_per_sample = match ifd_map.get(&TAG_BITSPERSAMPLE) {
        Some(ifd) => ifd.interpret_as_u16()[0],
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "The raster BitsPerSample value was not read correctly",
            ))
        }
    };

    let compression = match ifd_map.get(&TAG_COMPRESSION) {
        Some(ifd) => ifd.interpret_as_u16()[0],
        _ => COMPRESS_NONE,
    };
    match compression {
        COMPRESS_NONE | COMPRESS_PACKBITS | COMPRESS_DEFLATE | COMPRESS_DEFLATEOLD => (),
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported TIFF compression method ({}).", compression),
            ))
        }
    }

    let samples_per_pixel = match ifd_map.get(&TAG_SAMPLESPERPIXEL) {
        Some(ifd) => ifd.interpret_as_u16()[0],
        _ => 1,
    };
    if samples_per_pixel != 1 {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "Only single-band rasters are supported.",
        ));
    }

    let sample_format = match ifd_map.get(&TAG_SAMPLEFORMAT) {
        Some(ifd) => ifd.interpret_as_u16()[0],
        _ => SAMPLE_FORMAT_UINT,
    };

    configs.data_type = DataType::from_tiff(bits_per_sample, sample_format);
    if configs.data_type == DataType::Unknown {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Unsupported sample layout ({} bits, format {}).",
                bits_per_sample, sample_format
            ),
        ));
    }

    let model_tiepoints = match ifd_map.get(&TAG_MODELTIEPOINTTAG) {
        Some(ifd) => ifd.interpret_as_f64(),
        _ => vec![0.0],
    };

    let model_pixel_scale = match ifd_map.get(&TAG_MODELPIXELSCALETAG) {
        Some(ifd) => ifd.interpret_as_f64(),
        _ => vec![0.0],
    };

    if model_tiepoints.len() == 6 && model_pixel_scale.len() >= 2 {
        configs.resolution_x = model_pixel_scale[0];
        configs.resolution_y = model_pixel_scale[1];
        configs.west = model_tiepoints[3];
        configs.east = configs.west + configs.resolution_x * configs.columns as f64;
        configs.north = model_tiepoints[4];
        configs.south = configs.north - configs.resolution_y * configs.rows as f64;
    }

    if let Some(ifd) = ifd_map.get(&TAG_GEOKEYDIRECTORYTAG) {
        let geokeys = GeoKeys::from_tag_data(ifd.interpret_as_u16());
        configs.epsg_code = geokeys.epsg_code();
    }

    if let Some(ifd) = ifd_map.get(&TAG_GDAL_NODATA) {
        let s = ifd.interpret_as_ascii();
        if let Ok(val) = s.trim().trim_matches(char::from(0)).parse::<f64>() {
            configs.nodata = val;
        }
    }

    let mut block_offsets: Vec<u64> = vec![];
    let mut block_counts: Vec<u64> = vec![];
    let mut blocks_across = 0usize;

    if ifd_map.contains_key(&TAG_TILEWIDTH) {
        configs.block_width = match ifd_map.get(&TAG_TILEWIDTH) {
            Some(ifd) => ifd.interpret_as_usize()[0],
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "The TileWidth value was not read correctly",
                ))
            }
        };
        configs.block_height = match ifd_map.get(&TAG_TILELENGTH) {
            Some(ifd) => ifd.interpret_as_usize()[0],
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "The TileLength value was not read correctly",
                ))
            }
        };

        blocks_across = (configs.columns + configs.block_width - 1) / configs.block_width;

        block_offsets = match ifd_map.get(&TAG_TILEOFFSETS) {
            Some(ifd) => ifd.interpret_as_usize().iter().map(|&v| v as u64).collect(),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "The TileOffsets value was not read correctly",
                ))
            }
        };
        block_counts = match ifd_map.get(&TAG_TILEBYTECOUNTS) {
            Some(ifd) => ifd.interpret_as_usize().iter().map(|&v| v as u64).collect(),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    "The TileByteCounts value was not read correctly",
                ))
            }
        };
    } else {
        // strip-organized; callers that require tiled sources reject this
        configs.block_width = 0;
        configs.block_height = 0;
    }

    let source = GeoTiffSource {
        th,
        block_offsets,
        block_counts,
        blocks_across,
        compression,
        sample_format,
        bits_per_sample,
    };

    Ok((configs, source))
}

impl GeoTiffSource {
    /// Decodes the tile holding `window` and returns exactly the window's
    /// cells. Windows are block-aligned, so the tile is located by integer
    /// division; border tiles are padded on disk and cropped here.
    pub fn read_window(
        &mut self,
        window: &Window,
        configs: &RasterConfigs,
    ) -> Result<Array2D<f64>, Error> {
        if configs.block_width == 0 || configs.block_height == 0 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Input raster should be tiled",
            ));
        }
        let tile_row = window.row_off / configs.block_height;
        let tile_col = window.col_off / configs.block_width;
        let tile_index = tile_row * self.blocks_across + tile_col;
        if tile_index >= self.block_offsets.len() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Tile index {} out of range", tile_index),
            ));
        }

        let offset = self.block_offsets[tile_index] as usize;
        let n = self.block_counts[tile_index] as usize;
        if offset + n > self.th.len() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Tile data extends past the end of the file",
            ));
        }
        let raw = self.th.slice(offset, offset + n).to_vec();
        let bytes = match self.compression {
            COMPRESS_NONE => raw,
            COMPRESS_PACKBITS => packbits_decoder(&raw),
            COMPRESS_DEFLATE | COMPRESS_DEFLATEOLD => decompress_to_vec_zlib(&raw)
                .map_err(|_| Error::new(ErrorKind::InvalidData, "Bad deflate stream in tile"))?,
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("Unsupported TIFF compression method ({}).", self.compression),
                ))
            }
        };

        let value_size = (self.bits_per_sample / 8) as usize;
        let row_stride = configs.block_width * value_size;
        if bytes.len() < row_stride * window.height {
            return Err(Error::new(ErrorKind::InvalidData, "Tile data is truncated"));
        }

        let mut bor = ByteOrderReader::new(bytes, configs.endian);
        let mut data: Array2D<f64> = Array2D::new(
            window.height as isize,
            window.width as isize,
            configs.nodata,
            configs.nodata,
        )?;
        for r in 0..window.height {
            bor.seek(r * row_stride);
            for c in 0..window.width {
                let value = match self.sample_format {
                    SAMPLE_FORMAT_UINT => match self.bits_per_sample {
                        8 => bor.read_u8() as f64,
                        16 => bor.read_u16() as f64,
                        32 => bor.read_u32() as f64,
                        _ => {
                            return Err(Error::new(
                                ErrorKind::InvalidData,
                                "The raster was not read correctly",
                            ))
                        }
                    },
                    SAMPLE_FORMAT_INT => match self.bits_per_sample {
                        8 => bor.read_i8() as f64,
                        16 => bor.read_i16() as f64,
                        32 => bor.read_i32() as f64,
                        _ => {
                            return Err(Error::new(
                                ErrorKind::InvalidData,
                                "The raster was not read correctly",
                            ))
                        }
                    },
                    SAMPLE_FORMAT_FLOAT => match self.bits_per_sample {
                        32 => bor.read_f32() as f64,
                        64 => bor.read_f64(),
                        _ => {
                            return Err(Error::new(
                                ErrorKind::InvalidData,
                                "The raster was not read correctly",
                            ))
                        }
                    },
                    _ => {
                        return Err(Error::new(
                            ErrorKind::InvalidData,
                            "The raster was not read correctly",
                        ))
                    }
                };
                data.set_value(r as isize, c as isize, value);
            }
        }
        Ok(data)
    }
}

/// Writes a single-band little-endian GeoTIFF. A positive block size in the
/// configuration produces a tiled layout; a zero block size produces a
/// single strip (which `Raster::open` will refuse to read back, by design).
/// Compression is not applied on output.
pub fn write_geotiff(
    file_name: &str,
    configs: &RasterConfigs,
    data: &Array2D<f64>,
) -> Result<(), Error> {
    if data.rows() as usize != configs.rows || data.columns() as usize != configs.columns {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Data dimensions do not agree with the raster configuration.",
        ));
    }
    let value_size = configs.data_type.get_data_size();
    if value_size == 0 {
        return Err(Error::new(ErrorKind::InvalidData, "Unknown data type."));
    }

    let tiled = configs.block_width > 0 && configs.block_height > 0;

    // pixel data region begins immediately after the 8-byte header
    let mut pixels = ByteOrderWriter::new(Endianness::LittleEndian);
    let mut block_offsets: Vec<u32> = vec![];
    let mut block_counts: Vec<u32> = vec![];

    if tiled {
        let blocks_across = (configs.columns + configs.block_width - 1) / configs.block_width;
        let blocks_down = (configs.rows + configs.block_height - 1) / configs.block_height;
        for tile_row in 0..blocks_down {
            for tile_col in 0..blocks_across {
                block_offsets.push(8u32 + pixels.len() as u32);
                let row_off = (tile_row * configs.block_height) as isize;
                let col_off = (tile_col * configs.block_width) as isize;
                // tiles are written padded to the full block size
                for r in 0..configs.block_height as isize {
                    for c in 0..configs.block_width as isize {
                        let row = row_off + r;
                        let col = col_off + c;
                        let value = if row < data.rows() && col < data.columns() {
                            data.get_value(row, col)
                        } else {
                            configs.nodata
                        };
                        write_value(&mut pixels, value, configs.data_type)?;
                    }
                }
                block_counts
                    .push((configs.block_width * configs.block_height * value_size) as u32);
            }
        }
    } else {
        block_offsets.push(8u32);
        for row in 0..data.rows() {
            for col in 0..data.columns() {
                write_value(&mut pixels, data.get_value(row, col), configs.data_type)?;
            }
        }
        block_counts.push(pixels.len() as u32);
    }

    let ifd_offset = 8u32 + pixels.len() as u32;

    // assemble the IFD entries in ascending tag order
    let mut entries: Vec<IfdEntry> = vec![];
    entries.push(IfdEntry::long(TAG_IMAGEWIDTH, vec![configs.columns as u32]));
    entries.push(IfdEntry::long(TAG_IMAGELENGTH, vec![configs.rows as u32]));
    entries.push(IfdEntry::short(
        TAG_BITSPERSAMPLE,
        vec![(value_size * 8) as u16],
    ));
    entries.push(IfdEntry::short(TAG_COMPRESSION, vec![COMPRESS_NONE]));
    entries.push(IfdEntry::short(TAG_PHOTOMETRICINTERPRETATION, vec![PI_BLACKISZERO]));
    if !tiled {
        entries.push(IfdEntry::long(TAG_STRIPOFFSETS, block_offsets.clone()));
    }
    entries.push(IfdEntry::short(TAG_SAMPLESPERPIXEL, vec![1u16]));
    if !tiled {
        entries.push(IfdEntry::long(TAG_ROWSPERSTRIP, vec![configs.rows as u32]));
        entries.push(IfdEntry::long(TAG_STRIPBYTECOUNTS, block_counts.clone()));
    }
    if tiled {
        entries.push(IfdEntry::long(TAG_TILEWIDTH, vec![configs.block_width as u32]));
        entries.push(IfdEntry::long(TAG_TILELENGTH, vec![configs.block_height as u32]));
        entries.push(IfdEntry::long(TAG_TILEOFFSETS, block_offsets.clone()));
        entries.push(IfdEntry::long(TAG_TILEBYTECOUNTS, block_counts.clone()));
    }
    entries.push(IfdEntry::short(
        TAG_SAMPLEFORMAT,
        vec![configs.data_type.tiff_sample_format()],
    ));
    entries.push(IfdEntry::double(
        TAG_MODELPIXELSCALETAG,
        vec![configs.resolution_x, configs.resolution_y, 0f64],
    ));
    entries.push(IfdEntry::double(
        TAG_MODELTIEPOINTTAG,
        vec![0f64, 0f64, 0f64, configs.west, configs.north, 0f64],
    ));
    if configs.epsg_code != 0 {
        entries.push(IfdEntry::short(
            TAG_GEOKEYDIRECTORYTAG,
            GeoKeys::build(configs.epsg_code),
        ));
    }
    let mut nodata_str = format!("{}", configs.nodata).into_bytes();
    nodata_str.push(0u8);
    entries.push(IfdEntry::ascii(TAG_GDAL_NODATA, nodata_str));

    // values longer than four bytes live after the entry table
    let mut external_offset = ifd_offset + 2 + 12 * entries.len() as u32 + 4;
    let mut external = ByteOrderWriter::new(Endianness::LittleEndian);
    let mut table = ByteOrderWriter::new(Endianness::LittleEndian);
    table.write_u16(entries.len() as u16);
    for entry in &entries {
        table.write_u16(entry.tag);
        table.write_u16(entry.field_type);
        table.write_u32(entry.count);
        if entry.value_bytes.len() <= 4 {
            let mut inline = entry.value_bytes.clone();
            inline.resize(4, 0u8);
            table.write_bytes(&inline);
        } else {
            table.write_u32(external_offset);
            external.write_bytes(&entry.value_bytes);
            external_offset += entry.value_bytes.len() as u32;
        }
    }
    table.write_u32(0u32); // no further IFDs

    let f = File::create(file_name)?;
    let mut writer = std::io::BufWriter::new(f);
    let mut header = ByteOrderWriter::new(Endianness::LittleEndian);
    header.write_bytes(b"II");
    header.write_u16(42u16);
    header.write_u32(ifd_offset);
    writer.write_all(&header.buffer)?;
    writer.write_all(&pixels.buffer)?;
    writer.write_all(&table.buffer)?;
    writer.write_all(&external.buffer)?;
    writer.flush()?;

    Ok(())
}

fn write_value(w: &mut ByteOrderWriter, value: f64, data_type: DataType) -> Result<(), Error> {
    match data_type {
        DataType::U8 => w.write_u8(value as u8),
        DataType::I16 => w.write_i16(value as i16),
        DataType::U16 => w.write_u16(value as u16),
        DataType::I32 => w.write_i32(value as i32),
        DataType::F32 => w.write_f32(value as f32),
        DataType::F64 => w.write_f64(value),
        DataType::Unknown => {
            return Err(Error::new(ErrorKind::InvalidData, "Unknown data type."));
        }
    }
    Ok(())
}

struct IfdEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    value_bytes: Vec<u8>,
}

impl IfdEntry {
    fn short(tag: u16, values: Vec<u16>) -> IfdEntry {
        let mut w = ByteOrderWriter::new(Endianness::LittleEndian);
        for v in &values {
            w.write_u16(*v);
        }
        IfdEntry {
            tag,
            field_type: DT_SHORT,
            count: values.len() as u32,
            value_bytes: w.buffer,
        }
    }

    fn long(tag: u16, values: Vec<u32>) -> IfdEntry {
        let mut w = ByteOrderWriter::new(Endianness::LittleEndian);
        for v in &values {
            w.write_u32(*v);
        }
        IfdEntry {
            tag,
            field_type: DT_LONG,
            count: values.len() as u32,
            value_bytes: w.buffer,
        }
    }

    fn double(tag: u16, values: Vec<f64>) -> IfdEntry {
        let mut w = ByteOrderWriter::new(Endianness::LittleEndian);
        for v in &values {
            w.write_f64(*v);
        }
        IfdEntry {
            tag,
            field_type: DT_DOUBLE,
            count: values.len() as u32,
            value_bytes: w.buffer,
        }
    }

    fn ascii(tag: u16, bytes: Vec<u8>) -> IfdEntry {
        IfdEntry {
            tag,
            field_type: DT_ASCII,
            count: bytes.len() as u32,
            value_bytes: bytes,
        }
    }
}

#[derive(Clone, Debug)]
pub struct IfdDirectory {
    pub tag: u16,
    pub ifd_type: u16,
    pub num_values: u32,
    pub offset: u32,
    pub data: Vec<u8>,
    byte_order: Endianness,
}

impl IfdDirectory {
    pub fn new(
        tag: u16,
        ifd_type: u16,
        num_values: u32,
        offset: u32,
        data: Vec<u8>,
        byte_order: Endianness,
    ) -> IfdDirectory {
        IfdDirectory {
            tag,
            ifd_type,
            num_values,
            offset,
            data,
            byte_order,
        }
    }

    pub fn interpret_as_u16(&self) -> Vec<u16> {
        let mut bor = ByteOrderReader::new(self.data.clone(), self.byte_order);
        let mut vals: Vec<u16> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_u16());
        }
        vals
    }

    pub fn interpret_as_u32(&self) -> Vec<u32> {
        let mut bor = ByteOrderReader::new(self.data.clone(), self.byte_order);
        let mut vals: Vec<u32> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_u32());
        }
        vals
    }

    /// Several tags (dimensions, tile layout, offsets) may be stored as
    /// either SHORT or LONG; this widens whichever was used.
    pub fn interpret_as_usize(&self) -> Vec<usize> {
        if self.ifd_type == DT_SHORT {
            self.interpret_as_u16().iter().map(|&v| v as usize).collect()
        } else {
            self.interpret_as_u32().iter().map(|&v| v as usize).collect()
        }
    }

    pub fn interpret_as_f64(&self) -> Vec<f64> {
        let mut bor = ByteOrderReader::new(self.data.clone(), self.byte_order);
        let mut vals: Vec<f64> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_f64());
        }
        vals
    }

    pub fn interpret_as_ascii(&self) -> String {
        if !self.data.is_empty() && self.data[self.data.len() - 1] == 0 {
            let s = &self.data[0..self.data.len() - 1];
            String::from_utf8_lossy(s).to_string()
        } else {
            String::from_utf8_lossy(&self.data).to_string()
        }
    }
}

/// PackBits run-length decoding (TIFF specification, section 9): a header
/// byte of n in 0..=127 copies the next n+1 bytes literally, n in -127..=-1
/// repeats the next byte 1-n times, and -128 is a no-op.
pub fn packbits_decoder(input: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = vec![];
    let mut pos = 0usize;
    while pos < input.len() {
        let header = input[pos] as i8;
        pos += 1;
        if header >= 0 {
            let run = header as usize + 1;
            let end = (pos + run).min(input.len());
            out.extend_from_slice(&input[pos..end]);
            pos = end;
        } else if header != -128 && pos < input.len() {
            let run = 1 - header as isize;
            let value = input[pos];
            pos += 1;
            out.resize(out.len() + run as usize, value);
        }
    }
    out
}

const COMPRESS_NONE: u16 = 1;
const COMPRESS_DEFLATE: u16 = 8; // zlib compression.
const COMPRESS_PACKBITS: u16 = 32773;
const COMPRESS_DEFLATEOLD: u16 = 32946; // Superseded by cDeflate.

const DT_ASCII: u16 = 2;
const DT_SHORT: u16 = 3;
const DT_LONG: u16 = 4;
const DT_DOUBLE: u16 = 12;

const PI_BLACKISZERO: u16 = 1;

const SAMPLE_FORMAT_UINT: u16 = 1;
const SAMPLE_FORMAT_INT: u16 = 2;
const SAMPLE_FORMAT_FLOAT: u16 = 3;

// Tags (see p. 28-41 of the TIFF spec).
const TAG_IMAGEWIDTH: u16 = 256u16;
const TAG_IMAGELENGTH: u16 = 257u16;
const TAG_BITSPERSAMPLE: u16 = 258u16;
const TAG_COMPRESSION: u16 = 259u16;
const TAG_PHOTOMETRICINTERPRETATION: u16 = 262u16;
const TAG_STRIPOFFSETS: u16 = 273u16;
const TAG_SAMPLESPERPIXEL: u16 = 277u16;
const TAG_ROWSPERSTRIP: u16 = 278u16;
const TAG_STRIPBYTECOUNTS: u16 = 279u16;
const TAG_TILEWIDTH: u16 = 322u16;
const TAG_TILELENGTH: u16 = 323u16;
const TAG_TILEOFFSETS: u16 = 324u16;
const TAG_TILEBYTECOUNTS: u16 = 325u16;
const TAG_SAMPLEFORMAT: u16 = 339u16;
const TAG_MODELPIXELSCALETAG: u16 = 33550u16;
const TAG_MODELTIEPOINTTAG: u16 = 33922u16;
const TAG_GEOKEYDIRECTORYTAG: u16 = 34735u16;
const TAG_GDAL_NODATA: u16 = 42113u16;
