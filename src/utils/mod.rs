// private sub-module defined in other files
mod byte_order_reader;
mod byte_order_writer;

// exports identifiers from private sub-modules in the current module namespace
pub use self::byte_order_reader::ByteOrderReader;
pub use self::byte_order_reader::Endianness;
pub use self::byte_order_writer::ByteOrderWriter;

use std::time::Instant;

/// Formats a timer's elapsed time for progress output, e.g. `2min 7.480s`.
pub fn get_formatted_elapsed_time(instant: Instant) -> String {
    let total_ms = instant.elapsed().as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) as f64 / 1000.0;
    if minutes > 0 {
        format!("{}min {:.3}s", minutes, seconds)
    } else {
        format!("{:.3}s", seconds)
    }
}
