//! Error types for the Hanover flip-dot library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building frames or talking to the display.
#[derive(Error, Debug)]
pub enum Error {
    /// Pixel coordinates outside the addressable area (hidden rows included).
    #[error("Pixel ({x}, {y}) out of range for {columns}x{visible_rows} visible area")]
    PixelOutOfRange {
        x: usize,
        y: usize,
        columns: usize,
        visible_rows: usize,
    },

    /// Value cannot be represented as a single ASCII-hex byte.
    #[error("Value out of range for one byte: {0}")]
    ValueOutOfRange(usize),

    /// Bit buffer length is not a whole number of bytes.
    #[error("Bit buffer of {bits} bits is not a multiple of 8")]
    UnalignedBuffer { bits: usize },

    /// Packed byte buffer does not match the grid size.
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Grid size the row folding cannot address.
    #[error("Unsupported panel geometry: {rows} rows x {columns} columns")]
    UnsupportedGeometry { rows: usize, columns: usize },

    /// Bus address too large once the protocol offset is applied.
    #[error("Address out of range: {0}")]
    AddressOutOfRange(u8),

    /// Frame payload longer than the one-byte length field allows.
    #[error("Payload too large: {bytes} bytes (max 255)")]
    PayloadTooLarge { bytes: usize },

    /// Serial device not present.
    #[error("Serial port not found: {0}")]
    PortNotFound(String),

    /// Serial port communication error.
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Serial I/O error.
    #[error("Serial I/O error: {0}")]
    SerialIo(#[from] std::io::Error),
}
