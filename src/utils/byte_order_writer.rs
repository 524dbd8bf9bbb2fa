use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::utils::Endianness;

/// The writing counterpart of `ByteOrderReader`: appends scalar values to
/// an owned byte buffer in a byte order chosen when the writer is created.
pub struct ByteOrderWriter {
    byte_order: Endianness,
    pub buffer: Vec<u8>,
}

macro_rules! endian_write {
    ($name:ident, $ty:ty, $write:ident) => {
        pub fn $name(&mut self, value: $ty) {
            let mut raw = [0u8; std::mem::size_of::<$ty>()];
            match self.byte_order {
                Endianness::LittleEndian => LittleEndian::$write(&mut raw, value),
                Endianness::BigEndian => BigEndian::$write(&mut raw, value),
            }
            self.buffer.extend_from_slice(&raw);
        }
    };
}

impl ByteOrderWriter {
    pub fn new(byte_order: Endianness) -> ByteOrderWriter {
        ByteOrderWriter {
            byte_order,
            buffer: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_bytes(&mut self, values: &[u8]) {
        self.buffer.extend_from_slice(values);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    endian_write!(write_u16, u16, write_u16);
    endian_write!(write_i16, i16, write_i16);
    endian_write!(write_u32, u32, write_u32);
    endian_write!(write_i32, i32, write_i32);
    endian_write!(write_f32, f32, write_f32);
    endian_write!(write_f64, f64, write_f64);
}
