use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

/// Decodes scalar values sequentially from an in-memory buffer, in a byte
/// order chosen when the reader is created. Reads past the end of the
/// buffer yield zeroes; callers validate lengths up front.
#[derive(Debug)]
pub struct ByteOrderReader {
    byte_order: Endianness,
    cursor: Cursor<Vec<u8>>,
}

macro_rules! endian_read {
    ($name:ident, $ty:ty, $read:ident) => {
        pub fn $name(&mut self) -> $ty {
            match self.byte_order {
                Endianness::LittleEndian => self.cursor.$read::<LittleEndian>(),
                Endianness::BigEndian => self.cursor.$read::<BigEndian>(),
            }
            .unwrap_or_default()
        }
    };
}

impl ByteOrderReader {
    pub fn new(buffer: Vec<u8>, byte_order: Endianness) -> ByteOrderReader {
        ByteOrderReader {
            byte_order,
            cursor: Cursor::new(buffer),
        }
    }

    pub fn seek(&mut self, position: usize) {
        self.cursor.set_position(position as u64);
    }

    pub fn pos(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    /// Borrows a raw range of the underlying buffer without moving the
    /// read position.
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.cursor.get_ref()[start..end]
    }

    // single bytes carry no endianness
    pub fn read_u8(&mut self) -> u8 {
        self.cursor.read_u8().unwrap_or_default()
    }

    pub fn read_i8(&mut self) -> i8 {
        self.cursor.read_i8().unwrap_or_default()
    }

    endian_read!(read_u16, u16, read_u16);
    endian_read!(read_i16, i16, read_i16);
    endian_read!(read_u32, u32, read_u32);
    endian_read!(read_i32, i32, read_i32);
    endian_read!(read_f32, f32, read_f32);
    endian_read!(read_f64, f64, read_f64);
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Endianness {
    #[default]
    LittleEndian,
    BigEndian,
}
