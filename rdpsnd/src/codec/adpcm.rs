//! Microsoft ADPCM block decoder
//!
//! A stream is a sequence of fixed-size blocks. Each block opens with a
//! 7-byte header per channel (predictor index, initial step size and two seed
//! samples) followed by 4-bit deltas, high nibble first. Blocks are
//! independent: predictor state starts over from every header.

use super::{DecodeMethod, Decoder};
use crate::format::FormatDescriptor;
use byteorder::{ByteOrder, LittleEndian};

/// Header bytes per channel at the start of every block
pub const BLOCK_HEADER_SIZE: usize = 7;

/// Smallest step size the adaptation may reach
pub const MIN_DELTA: i32 = 16;

/// Step size scale factors, indexed by the encoded nibble
const ADAPTATION_TABLE: [i32; 16] = [
    230, 230, 230, 230, 307, 409, 512, 614, 768, 614, 512, 409, 307, 230, 230, 230,
];

/// First predictor coefficient for each block predictor index (8.8 fixed point)
const ADAPT_COEFF1: [i32; 7] = [256, 512, 0, 192, 240, 460, 392];

/// Second predictor coefficient for each block predictor index (8.8 fixed point)
const ADAPT_COEFF2: [i32; 7] = [0, -256, 0, 64, 0, -208, -232];

/// Decode state of one channel within one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelPredictorState {
    /// Weight of the most recent sample
    pub coeff1: i32,
    /// Weight of the second most recent sample
    pub coeff2: i32,
    /// Adaptive step size
    pub delta: i32,
    /// Most recent reconstructed sample
    pub sample1: i16,
    /// Second most recent reconstructed sample
    pub sample2: i16,
}

impl ChannelPredictorState {
    /// Seed a channel from its block header fields
    ///
    /// The predictor byte is signed on the wire. Negative indices select the
    /// first coefficient pair and indices beyond the table select its last.
    pub fn new(predictor: u8, delta: u16, sample1: i16, sample2: i16) -> Self {
        let index = (predictor as i8).clamp(0, ADAPT_COEFF1.len() as i8 - 1) as usize;
        Self {
            coeff1: ADAPT_COEFF1[index],
            coeff2: ADAPT_COEFF2[index],
            delta: delta as i32,
            sample1,
            sample2,
        }
    }

    /// Reconstruct the next sample from a 4-bit delta and adapt the step size
    ///
    /// Arithmetic is 32-bit and wrapping, and the stored sample is the low
    /// 16 bits of the prediction. Out-of-range predictions wrap instead of
    /// clipping, which is what MS-ADPCM encoders expect.
    #[inline]
    pub fn expand_nibble(&mut self, nibble: u8) -> i16 {
        let nibble = nibble & 0x0F;

        let mut prediction =
            (self.sample1 as i32 * self.coeff1 + self.sample2 as i32 * self.coeff2) / 256;
        let signed = if nibble & 0x08 != 0 {
            nibble as i32 - 16
        } else {
            nibble as i32
        };
        prediction = prediction.wrapping_add(signed.wrapping_mul(self.delta));

        let sample = prediction as i16;
        self.sample2 = self.sample1;
        self.sample1 = sample;

        self.delta = ADAPTATION_TABLE[nibble as usize].wrapping_mul(self.delta) >> 8;
        if self.delta < MIN_DELTA {
            self.delta = MIN_DELTA;
        }

        sample
    }
}

/// Bytes of PCM one whole block of this format decodes to
///
/// Two seed samples per channel plus two samples per payload byte, each two
/// bytes wide. Zero when the block cannot even hold its header.
pub fn block_output_size(fmt: &FormatDescriptor) -> usize {
    if fmt.block_align == 0 {
        return 0;
    }
    block_span(fmt, fmt.block_align as usize).map_or(0, |(_, produced)| produced)
}

/// Input bytes read and output bytes written for a block of `block_size`
/// bytes, or `None` when the block is shorter than its header
fn block_span(fmt: &FormatDescriptor, block_size: usize) -> Option<(usize, usize)> {
    let payload = block_size.checked_sub(BLOCK_HEADER_SIZE * fmt.channels as usize)?;
    let channels = if fmt.is_stereo() { 2 } else { 1 };
    Some((
        BLOCK_HEADER_SIZE * channels + payload,
        4 * channels + 4 * payload,
    ))
}

/// Decode every whole block in `input[..len]` into `output`
///
/// A partial trailing block is dropped. Returns the number of bytes written.
pub fn decode(input: &[u8], output: &mut [u8], len: usize, fmt: &FormatDescriptor) -> usize {
    let block_align = fmt.block_align as usize;
    if block_align == 0 {
        log::debug!("ADPCM stream with zero block alignment, nothing to decode");
        return 0;
    }

    let len = len.min(input.len());
    let blocks = len / block_align;
    if len % block_align != 0 {
        log::trace!(
            "Dropping {} trailing bytes of a partial ADPCM block",
            len % block_align
        );
    }

    let mut output_offset = 0;
    for block in 0..blocks {
        output_offset = decode_block(
            fmt,
            input,
            block * block_align,
            block_align,
            output,
            output_offset,
        );
    }

    output_offset
}

/// Decode one block starting at `input_offset` into `output` at `output_offset`
///
/// Returns the output offset after the block. A block too short for its
/// header, or one whose bytes or samples do not fit the buffers, is skipped
/// and the offset is returned unchanged.
pub fn decode_block(
    fmt: &FormatDescriptor,
    input: &[u8],
    input_offset: usize,
    block_size: usize,
    output: &mut [u8],
    output_offset: usize,
) -> usize {
    if block_size == 0 {
        return output_offset;
    }

    let block_align = fmt.block_align as usize;
    let block_size = if block_align != 0 && block_size > block_align {
        block_align
    } else {
        block_size
    };

    let Some((consumed, produced)) = block_span(fmt, block_size) else {
        log::debug!(
            "Skipping ADPCM block of {} bytes, shorter than its header",
            block_size
        );
        return output_offset;
    };
    let channels = if fmt.is_stereo() { 2 } else { 1 };

    let Some(block) = input
        .get(input_offset..)
        .and_then(|rest| rest.get(..consumed))
    else {
        log::debug!(
            "Skipping ADPCM block at offset {}: {} bytes needed, input holds {}",
            input_offset,
            consumed,
            input.len()
        );
        return output_offset;
    };

    let Some(out) = output
        .get_mut(output_offset..)
        .and_then(|rest| rest.get_mut(..produced))
    else {
        log::debug!(
            "Skipping ADPCM block at offset {}: {} output bytes needed at {}, buffer holds {}",
            input_offset,
            produced,
            output_offset,
            output.len()
        );
        return output_offset;
    };

    // Header layout: predictors, then deltas, then sample1s, then sample2s,
    // one field per channel each.
    let mut states = [ChannelPredictorState::default(); 2];
    for (ch, state) in states.iter_mut().enumerate().take(channels) {
        let delta = LittleEndian::read_u16(&block[channels + 2 * ch..]);
        let sample1 = LittleEndian::read_i16(&block[3 * channels + 2 * ch..]);
        let sample2 = LittleEndian::read_i16(&block[5 * channels + 2 * ch..]);
        *state = ChannelPredictorState::new(block[ch], delta, sample1, sample2);
    }

    let mut pos = 0;
    for state in &states[..channels] {
        put_sample(out, &mut pos, state.sample1);
    }
    for state in &states[..channels] {
        put_sample(out, &mut pos, state.sample2);
    }

    let second = channels - 1;
    for &byte in &block[BLOCK_HEADER_SIZE * channels..] {
        let high = states[0].expand_nibble(byte >> 4);
        put_sample(out, &mut pos, high);
        let low = states[second].expand_nibble(byte & 0x0F);
        put_sample(out, &mut pos, low);
    }

    output_offset + pos
}

#[inline]
fn put_sample(out: &mut [u8], pos: &mut usize, sample: i16) {
    LittleEndian::write_i16(&mut out[*pos..*pos + 2], sample);
    *pos += 2;
}

/// MS-ADPCM decoder bound to one stream format
#[derive(Debug, Clone)]
pub struct AdpcmDecoder {
    format: FormatDescriptor,
}

impl AdpcmDecoder {
    /// Create a decoder for blocks of the given format
    pub fn new(format: FormatDescriptor) -> Self {
        Self { format }
    }

    /// Format this decoder was created for
    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }
}

impl Decoder for AdpcmDecoder {
    fn decode_into(&self, input: &[u8], output: &mut [u8]) -> usize {
        decode(input, output, input.len(), &self.format)
    }

    fn method(&self) -> DecodeMethod {
        DecodeMethod::AdpcmMs
    }
}
