//! Helpers for explicit little-endian wire conversions.
//!
//! The camera protocol encodes every header field little-endian. Keeping the
//! conversions here lets the datagram module stay explicit about wire
//! endianness without sprinkling `from_le_bytes` across the parser.

/// Serialise a `u16` in wire byte order (little-endian).
///
/// # Examples
///
/// ```
/// use depthframe::byte_order::write_wire_u16;
///
/// assert_eq!(write_wire_u16(0x1234), [0x34, 0x12]);
/// ```
#[must_use]
pub fn write_wire_u16(value: u16) -> [u8; 2] { value.to_le_bytes() }

/// Parse a wire-order `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use depthframe::byte_order::read_wire_u16;
///
/// assert_eq!(read_wire_u16([0x34, 0x12]), 0x1234);
/// ```
#[must_use]
pub fn read_wire_u16(bytes: [u8; 2]) -> u16 { u16::from_le_bytes(bytes) }

/// Serialise a `u32` in wire byte order (little-endian).
///
/// # Examples
///
/// ```
/// use depthframe::byte_order::write_wire_u32;
///
/// assert_eq!(write_wire_u32(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
/// ```
#[must_use]
pub fn write_wire_u32(value: u32) -> [u8; 4] { value.to_le_bytes() }

/// Parse a wire-order `u32` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use depthframe::byte_order::read_wire_u32;
///
/// assert_eq!(read_wire_u32([0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
/// ```
#[must_use]
pub fn read_wire_u32(bytes: [u8; 4]) -> u32 { u32::from_le_bytes(bytes) }

/// Copy a fixed-width field out of `buf` starting at `offset`.
///
/// Returns `None` when the field would run past the end of `buf`.
#[must_use]
pub(crate) fn field<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    buf.get(offset..end)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    //! Tests for the little-endian conversion helpers.

    use rstest::rstest;

    use super::{field, read_wire_u16, read_wire_u32, write_wire_u16, write_wire_u32};

    #[rstest]
    #[case::u16(
        0x1234u32,
        &write_wire_u16(0x1234)[..],
        &[0x34, 0x12],
        u32::from(read_wire_u16([0x34, 0x12]))
    )]
    #[case::u32(
        0x1234_5678u32,
        &write_wire_u32(0x1234_5678)[..],
        &[0x78, 0x56, 0x34, 0x12],
        read_wire_u32([0x78, 0x56, 0x34, 0x12])
    )]
    fn wire_byte_order_is_little_endian(
        #[case] value: u32,
        #[case] written: &[u8],
        #[case] expected_bytes: &[u8],
        #[case] read_back: u32,
    ) {
        assert_eq!(written, expected_bytes);
        assert_eq!(read_back, value);
    }

    #[test]
    fn field_extracts_in_bounds_slice() {
        let buf = [1_u8, 2, 3, 4, 5, 6];
        assert_eq!(field::<2>(&buf, 4), Some([5, 6]));
    }

    #[rstest]
    #[case::past_end(5)]
    #[case::overflowing_offset(usize::MAX)]
    fn field_rejects_out_of_bounds_reads(#[case] offset: usize) {
        let buf = [1_u8, 2, 3, 4, 5, 6];
        assert_eq!(field::<2>(&buf, offset), None);
    }
}
