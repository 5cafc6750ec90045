//! Packed pixel buffer for the flip-dot panel.
//!
//! The panel stores its dots column by column, `rows` bits per column. Inside
//! a column the rows are wired in a folded order and two physical rows are
//! not connected to any dots:
//!
//! ```text
//! logical y   0  1  2  3  4  5  6 | 7  8  9 10 11 12 13
//! physical    6  5  4  3  2  1  0 |15 14 13 12 11 10  9
//! ```
//!
//! Physical rows 7 and 8 are the hidden rows.

use crate::protocol::{pack_bits, unpack_bits, ADDRESS_OFFSET};
use crate::{Error, Result};

/// Number of physical rows that carry no dots.
pub const HIDDEN_ROWS: usize = 2;

/// Logical rows addressed by the first, mirrored wiring region.
const FIRST_REGION_ROWS: usize = 7;

/// Row counts above this always fold two visible rows onto one bit.
pub const MAX_ROWS: usize = 23;

/// Largest payload the one-byte length field can describe.
const MAX_PAYLOAD_BYTES: usize = u8::MAX as usize;

/// Maps a logical row to its physical row inside a column.
///
/// Returns `None` when the row lies past the end of the second region.
pub fn physical_row(y: usize) -> Option<usize> {
    if y < FIRST_REGION_ROWS {
        Some(6 - y)
    } else {
        22usize.checked_sub(y)
    }
}

/// Fixed-size bit buffer in the panel's native layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Physical bits, column-major.
    bits: Vec<bool>,
    /// Physical row for each visible logical row.
    row_map: Vec<usize>,
    /// Rows per column, hidden rows included.
    rows: usize,
    /// Number of columns.
    columns: usize,
    /// Bus address of the display unit.
    address: u8,
}

impl PixelBuffer {
    /// Creates a dark buffer for a panel of the given size.
    ///
    /// The grid must be a whole number of bytes that fits one frame, every
    /// visible row must fold onto a distinct physical row inside the column,
    /// and the address must stay within a byte once offset.
    pub fn new(rows: usize, columns: usize, address: u8) -> Result<Self> {
        if rows <= HIDDEN_ROWS || rows > MAX_ROWS || columns == 0 {
            return Err(Error::UnsupportedGeometry { rows, columns });
        }

        let len = rows
            .checked_mul(columns)
            .ok_or(Error::UnsupportedGeometry { rows, columns })?;
        if len % 8 != 0 {
            return Err(Error::UnalignedBuffer { bits: len });
        }
        if len / 8 > MAX_PAYLOAD_BYTES {
            return Err(Error::PayloadTooLarge { bytes: len / 8 });
        }
        if address.checked_add(ADDRESS_OFFSET).is_none() {
            return Err(Error::AddressOutOfRange(address));
        }

        let mut used = 0u32;
        let mut row_map = Vec::with_capacity(rows - HIDDEN_ROWS);
        for y in 0..rows - HIDDEN_ROWS {
            match physical_row(y) {
                Some(r) if r < rows && used & (1 << r) == 0 => {
                    used |= 1 << r;
                    row_map.push(r);
                }
                _ => return Err(Error::UnsupportedGeometry { rows, columns }),
            }
        }

        Ok(Self {
            bits: vec![false; len],
            row_map,
            rows,
            columns,
            address,
        })
    }

    /// Rebuilds a buffer from packed bytes as produced by [`to_bytes`].
    ///
    /// [`to_bytes`]: PixelBuffer::to_bytes
    pub fn from_bytes(rows: usize, columns: usize, address: u8, bytes: &[u8]) -> Result<Self> {
        let mut buffer = Self::new(rows, columns, address)?;
        let expected = buffer.bits.len() / 8;
        if bytes.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }

        buffer.bits = unpack_bits(bytes);
        Ok(buffer)
    }

    /// Returns the rows per column, hidden rows included.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of rows that can be set.
    pub fn visible_rows(&self) -> usize {
        self.rows - HIDDEN_ROWS
    }

    /// Returns the number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns the buffer length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the buffer holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the raw physical bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Returns a single physical bit.
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Computes the physical bit index of a visible pixel.
    pub fn bit_index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.columns || y >= self.visible_rows() {
            return Err(Error::PixelOutOfRange {
                x,
                y,
                columns: self.columns,
                visible_rows: self.visible_rows(),
            });
        }

        Ok(self.row_map[y] + x * self.rows)
    }

    /// Sets a pixel.
    pub fn set(&mut self, x: usize, y: usize, state: bool) -> Result<()> {
        let idx = self.bit_index(x, y)?;
        self.bits[idx] = state;
        Ok(())
    }

    /// Gets a pixel.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let idx = self.bit_index(x, y)?;
        Ok(self.bits[idx])
    }

    /// Turns every dot off.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Sets every visible pixel. Hidden rows are left untouched.
    pub fn fill(&mut self, state: bool) {
        for x in 0..self.columns {
            let column = x * self.rows;
            for &row in &self.row_map {
                self.bits[column + row] = state;
            }
        }
    }

    /// Packs the bits into bytes, most significant bit first.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_bits(&self.bits)
    }
}
