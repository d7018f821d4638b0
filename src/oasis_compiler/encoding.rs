// Variable-width numeric encoding
//
// Values 0-63 take one byte. Values 64-255 are prefixed with the marker
// byte 64, so the interpreter can tell a literal from an opcode.

use std::fmt;

pub const WIDE_MARKER: u32 = 64;
pub const MAX_ENCODABLE: u32 = 255;
/// Largest absolute offset a two-byte jump target can hold
pub const MAX_OFFSET: u32 = 0xFFFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNumber {
    pub text: String,
    pub bytes: u32,
}

impl EncodedNumber {
    /// Marker form, used even when `value` does not fit so that sizes stay
    /// stable after an out-of-range error has been reported
    pub fn wide(value: u32) -> Self {
        EncodedNumber {
            text: format!("{}, {}", WIDE_MARKER, value),
            bytes: 2,
        }
    }
}

impl fmt::Display for EncodedNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange(pub u32);

pub fn encode_number(value: u32) -> Result<EncodedNumber, OutOfRange> {
    if value > MAX_ENCODABLE {
        Err(OutOfRange(value))
    } else if value >= WIDE_MARKER {
        Ok(EncodedNumber::wide(value))
    } else {
        Ok(EncodedNumber {
            text: value.to_string(),
            bytes: 1,
        })
    }
}

/// Bytes `value` occupies once encoded
pub fn encoded_width(value: u32) -> u32 {
    if value >= WIDE_MARKER {
        2
    } else {
        1
    }
}

/// Relative distance of a forward jump whose opcode is followed by `span`
/// bytes besides its own distance operand. The operand width depends on the
/// distance, which in turn includes the operand.
pub fn forward_jump_distance(span: u32) -> u32 {
    let distance = span + 1;
    if distance >= WIDE_MARKER {
        distance + 1
    } else {
        distance
    }
}

/// Little-endian split of an absolute offset: `offset = 256 * hi + lo`
pub fn split_offset(offset: u32) -> Result<(u32, u32), OutOfRange> {
    if offset > MAX_OFFSET {
        Err(OutOfRange(offset))
    } else {
        Ok((offset % 256, offset / 256))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_short_and_wide() {
        assert_eq!(
            encode_number(0),
            Ok(EncodedNumber {
                text: "0".to_string(),
                bytes: 1
            })
        );
        assert_eq!(encode_number(63).map(|e| e.bytes), Ok(1));
        assert_eq!(
            encode_number(64),
            Ok(EncodedNumber {
                text: "64, 64".to_string(),
                bytes: 2
            })
        );
        assert_eq!(encode_number(200).map(|e| e.text), Ok("64, 200".to_string()));
        assert_eq!(encode_number(255).map(|e| e.bytes), Ok(2));
    }

    #[test]
    fn test_encode_rejects_above_255() {
        assert_eq!(encode_number(256), Err(OutOfRange(256)));
        assert_eq!(encode_number(1000), Err(OutOfRange(1000)));
    }

    #[test]
    fn test_forward_jump_width_correction() {
        assert_eq!(forward_jump_distance(0), 1);
        assert_eq!(forward_jump_distance(62), 63);
        // 63 bytes plus a one-byte operand would be 64, which needs the marker
        assert_eq!(forward_jump_distance(63), 65);
        assert_eq!(forward_jump_distance(100), 102);
        for span in 0..250 {
            let distance = forward_jump_distance(span);
            assert_eq!(distance, span + encoded_width(distance));
        }
    }

    #[test]
    fn test_split_offset() {
        assert_eq!(split_offset(0), Ok((0, 0)));
        assert_eq!(split_offset(255), Ok((255, 0)));
        assert_eq!(split_offset(256), Ok((0, 1)));
        assert_eq!(split_offset(0x1234), Ok((0x34, 0x12)));
        assert_eq!(split_offset(0xFFFF), Ok((255, 255)));
        assert_eq!(split_offset(0x10000), Err(OutOfRange(0x10000)));
    }
}
