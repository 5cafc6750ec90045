//! Hanover Flip-Dot Hardware Library
//!
//! Provides the pixel buffer and serial framing for Hanover flip-dot
//! displays driven over an RS-485 serial link.

pub mod bitmap;
pub mod display;
pub mod error;
pub mod protocol;

pub use bitmap::PixelBuffer;
pub use display::{Flipdot, SerialFlipdot};
pub use error::{Error, Result};
pub use protocol::{checksum, encode_byte, encode_value, generate_packet};

/// Rows on the stock panel, including the two hidden rows.
pub const DEFAULT_ROWS: usize = 16;

/// Columns on the stock panel.
pub const DEFAULT_COLUMNS: usize = 20;

/// Serial baud rate expected by the display controller.
pub const BAUD_RATE: u32 = 4800;
