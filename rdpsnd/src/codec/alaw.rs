//! ITU-T G.711 A-law expansion

use super::{DecodeMethod, Decoder};
use byteorder::{ByteOrder, LittleEndian};

/// Expand one A-law code to a 16-bit linear sample
#[inline]
pub fn expand(code: u8) -> i16 {
    // Even bits and the sign bit are inverted on the wire
    let y = (code ^ 0xD5) as i32;
    let exponent = (y & 0x70) >> 4;
    let mut value = ((y & 0x0F) << 4) + 8;

    if exponent != 0 {
        value += 0x100;
    }
    if exponent > 1 {
        value <<= exponent - 1;
    }

    if y & 0x80 != 0 {
        value = -value;
    }
    value as i16
}

/// Expand `input[..len]` into little-endian samples in `output`
///
/// Stops at whichever of `len`, the input or the output runs out first.
/// Returns the number of bytes written.
pub fn decode(input: &[u8], output: &mut [u8], len: usize) -> usize {
    let count = len.min(input.len()).min(output.len() / 2);

    for (&code, out) in input[..count].iter().zip(output.chunks_exact_mut(2)) {
        LittleEndian::write_i16(out, expand(code));
    }

    count * 2
}

/// Stateless A-law decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct ALawDecoder;

impl Decoder for ALawDecoder {
    fn decode_into(&self, input: &[u8], output: &mut [u8]) -> usize {
        decode(input, output, input.len())
    }

    fn method(&self) -> DecodeMethod {
        DecodeMethod::ALaw
    }
}
