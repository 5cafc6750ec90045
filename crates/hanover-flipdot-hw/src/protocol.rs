//! Hanover serial protocol framing.
//!
//! Frame structure:
//! - STX (0x02), sent as a raw byte
//! - Address + 17, ASCII hex
//! - Payload length in bytes, ASCII hex
//! - Payload, each byte as ASCII hex
//! - ETX (0x03), sent as a raw byte
//! - Checksum, ASCII hex
//!
//! ASCII hex uses two uppercase digits per byte, so 0x67 goes on the wire as
//! `b"67"`. The checksum makes every byte after STX, ETX included, plus the
//! checksum value itself sum to zero modulo 256.

use crate::bitmap::PixelBuffer;
use crate::{Error, Result};
use tracing::debug;

/// Start of text marker.
pub const STX: u8 = 0x02;

/// End of text marker.
pub const ETX: u8 = 0x03;

/// Offset added to the bus address before it is sent.
pub const ADDRESS_OFFSET: u8 = 17;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Encodes a byte as two uppercase ASCII hex digits.
#[inline]
pub fn encode_byte(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0x0F) as usize],
    ]
}

/// Encodes a value that must fit in one byte.
pub fn encode_value(value: usize) -> Result<[u8; 2]> {
    let byte = u8::try_from(value).map_err(|_| Error::ValueOutOfRange(value))?;
    Ok(encode_byte(byte))
}

/// Calculates the checksum for a frame.
///
/// `frame` runs from STX up to, but not including, ETX. STX is part of the
/// sum but not of the checked range while ETX is the other way round, hence
/// the `+ 1`.
pub fn checksum(frame: &[u8]) -> u8 {
    let sum = frame
        .iter()
        .fold(0u8, |acc, &x| acc.wrapping_add(x))
        .wrapping_add(1);
    (sum ^ 0xFF).wrapping_add(1)
}

/// Packs bits into bytes, most significant bit first.
///
/// A trailing partial byte is padded with zero bits.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk.iter().enumerate().fold(0u8, |acc, (i, &bit)| {
                if bit {
                    acc | (0x80 >> i)
                } else {
                    acc
                }
            })
        })
        .collect()
}

/// Expands bytes into bits, most significant bit first.
pub fn unpack_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |i| byte & (0x80 >> i) != 0))
        .collect()
}

/// Builds a complete frame from a bit buffer.
pub fn generate_packet(address: u8, bits: &[bool]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(Error::UnalignedBuffer { bits: bits.len() });
    }
    generate_packet_from_bytes(address, &pack_bits(bits))
}

/// Builds a complete frame for a pixel buffer, using its own address.
pub fn buffer_packet(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    generate_packet(buffer.address(), buffer.bits())
}

/// Builds a complete frame from already packed payload bytes.
pub fn generate_packet_from_bytes(address: u8, data: &[u8]) -> Result<Vec<u8>> {
    let wire_address = address
        .checked_add(ADDRESS_OFFSET)
        .ok_or(Error::AddressOutOfRange(address))?;
    let length = encode_value(data.len()).map_err(|_| Error::PayloadTooLarge {
        bytes: data.len(),
    })?;

    let mut packet = Vec::with_capacity(8 + data.len() * 2);
    packet.push(STX);
    packet.extend_from_slice(&encode_byte(wire_address));
    packet.extend_from_slice(&length);
    for &byte in data {
        packet.extend_from_slice(&encode_byte(byte));
    }

    let csum = checksum(&packet);
    packet.push(ETX);
    packet.extend_from_slice(&encode_byte(csum));

    debug!(
        "Built frame for address {} ({} data bytes, checksum {:02X})",
        address,
        data.len(),
        csum
    );
    Ok(packet)
}

/// Formats bytes as `[ 0x02 0x31 ... ]` for logs.
pub fn format_hex(data: &[u8]) -> String {
    let hex: Vec<String> = data.iter().map(|b| format!("0x{:02x}", b)).collect();
    format!("[ {} ]", hex.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sum of every byte after STX plus the decoded checksum.
    fn frame_sum(packet: &[u8]) -> u8 {
        let etx = packet.len() - 3;
        assert_eq!(packet[etx], ETX);
        let digits = std::str::from_utf8(&packet[etx + 1..]).unwrap();
        let csum = u8::from_str_radix(digits, 16).unwrap();
        packet[1..=etx].iter().fold(csum, |acc, &x| acc.wrapping_add(x))
    }

    #[test]
    fn test_encode_byte() {
        assert_eq!(&encode_byte(0x00), b"00");
        assert_eq!(&encode_byte(0xFF), b"FF");
        assert_eq!(&encode_byte(0x67), b"67");
        assert_eq!(&encode_byte(0xAB), b"AB");
        assert_eq!(&encode_byte(0x0C), b"0C");
    }

    #[test]
    fn test_encode_value_range() {
        assert_eq!(&encode_value(255).unwrap(), b"FF");
        assert!(matches!(encode_value(256), Err(Error::ValueOutOfRange(256))));
    }

    #[test]
    fn test_checksum() {
        // 0x02 + 0x31 + 0x31 = 0x64, + 1 = 0x65, negated = 0x9B
        assert_eq!(checksum(&[0x02, 0x31, 0x31]), 0x9B);
        // Sum of 0xFF + 1 wraps to zero, and so does its negation.
        assert_eq!(checksum(&[0xFF]), 0x00);
    }

    #[test]
    fn test_pack_bits() {
        let mut bits = vec![false; 16];
        bits[0] = true;
        bits[6] = true;
        bits[15] = true;
        assert_eq!(pack_bits(&bits), vec![0x82, 0x01]);
        assert_eq!(unpack_bits(&[0x82, 0x01]), bits);
    }

    #[test]
    fn test_stock_panel_frame() {
        let mut buf = PixelBuffer::new(16, 20, 0).unwrap();
        buf.clear();
        buf.set(0, 0, true).unwrap();

        let packet = buffer_packet(&buf).unwrap();
        assert_eq!(packet.len(), 1 + 2 + 2 + 80 + 1 + 2);
        assert_eq!(packet[0], STX);
        assert_eq!(&packet[1..3], b"11");
        assert_eq!(&packet[3..5], b"28");
        // Bit 6 is 0x02 in the first byte.
        assert_eq!(&packet[5..7], b"02");
        assert!(packet[7..85].iter().all(|&b| b == b'0'));
        assert_eq!(frame_sum(&packet), 0);
    }

    #[test]
    fn test_blank_frame_checksum() {
        let packet = generate_packet(0, &[false; 320]).unwrap();
        // 2 + "11" + "28" + 80 * '0' = 4046; + 1 = 4047 = 0xCF mod 256
        assert_eq!(&packet[packet.len() - 3..], &[ETX, b'3', b'1']);
        assert_eq!(frame_sum(&packet), 0);
    }

    #[test]
    fn test_checksum_law_holds() {
        let mut buf = PixelBuffer::new(16, 20, 5).unwrap();
        for i in 0..14 {
            buf.set(i, i, true).unwrap();
            buf.set(19 - i, i, true).unwrap();
            let packet = buffer_packet(&buf).unwrap();
            assert_eq!(&packet[1..3], b"16");
            assert_eq!(frame_sum(&packet), 0);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            generate_packet(0, &[false; 12]),
            Err(Error::UnalignedBuffer { bits: 12 })
        ));
        assert!(matches!(
            generate_packet(239, &[false; 8]),
            Err(Error::AddressOutOfRange(239))
        ));
        assert!(generate_packet(238, &[false; 8]).is_ok());
        assert!(matches!(
            generate_packet_from_bytes(0, &[0; 256]),
            Err(Error::PayloadTooLarge { bytes: 256 })
        ));
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0x02, 0x31, 0xff]), "[ 0x02 0x31 0xff ]");
    }
}
