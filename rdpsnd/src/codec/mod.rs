//! Decoders for the encodings the sound channel delivers
//!
//! Every decoder turns a compressed packet into little-endian 16-bit linear
//! PCM, channel-interleaved. Encodings without a decoder pass through as-is.

pub mod adpcm;
pub mod alaw;

pub use adpcm::{AdpcmDecoder, ChannelPredictorState};
pub use alaw::ALawDecoder;

use crate::error::{Error, Result};
use crate::format::{FormatDescriptor, FormatTag};
use crate::size::estimate_output_size;

/// How a stream's packets are turned into PCM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMethod {
    /// Bytes are copied unchanged
    PassThrough,
    /// G.711 A-law expansion
    ALaw,
    /// Microsoft ADPCM block decoding
    AdpcmMs,
}

impl DecodeMethod {
    /// Select the method for a format tag
    ///
    /// Tags without a decoder, linear PCM included, pass through. For PCM this
    /// is exact; for anything else the bytes reach the device undecoded.
    pub fn from_tag(tag: FormatTag) -> Self {
        match tag {
            FormatTag::ALaw => DecodeMethod::ALaw,
            FormatTag::AdpcmMs => DecodeMethod::AdpcmMs,
            FormatTag::LinearPcm | FormatTag::Other(_) => DecodeMethod::PassThrough,
        }
    }
}

/// Unified trait for the stream decoders
pub trait Decoder {
    /// Decode a whole packet into `output`
    ///
    /// # Arguments
    /// * `input` - The compressed packet
    /// * `output` - Destination, sized with [`estimate_output_size`]
    ///
    /// # Returns
    /// The number of bytes written
    fn decode_into(&self, input: &[u8], output: &mut [u8]) -> usize;

    /// Returns the decode method
    fn method(&self) -> DecodeMethod;
}

/// Copies packets unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Decoder for PassThrough {
    fn decode_into(&self, input: &[u8], output: &mut [u8]) -> usize {
        let count = input.len().min(output.len());
        output[..count].copy_from_slice(&input[..count]);
        count
    }

    fn method(&self) -> DecodeMethod {
        DecodeMethod::PassThrough
    }
}

/// Create the decoder for a stream format
pub fn decoder_for(fmt: &FormatDescriptor) -> Box<dyn Decoder + Send + Sync> {
    match DecodeMethod::from_tag(fmt.format_tag) {
        DecodeMethod::PassThrough => Box::new(PassThrough),
        DecodeMethod::ALaw => Box::new(ALawDecoder),
        DecodeMethod::AdpcmMs => Box::new(AdpcmDecoder::new(fmt.clone())),
    }
}

/// Decode the first `len` bytes of `input` into a caller-provided buffer
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// [`Error::SizeOverflow`] for lengths a peer may not send and
/// [`Error::BufferTooSmall`] when `output` cannot hold the decoded packet.
pub fn decode_into(
    input: &[u8],
    output: &mut [u8],
    len: usize,
    fmt: &FormatDescriptor,
) -> Result<usize> {
    let len = len.min(input.len());
    let expected = estimate_output_size(len as u64, fmt)?;
    if output.len() < expected {
        return Err(Error::BufferTooSmall {
            expected,
            actual: output.len(),
        });
    }

    let method = DecodeMethod::from_tag(fmt.format_tag);
    log::debug!(
        "Decoding {} bytes of {} to {} bytes with {:?}",
        len,
        fmt.format_tag.name(),
        expected,
        method
    );

    let written = match method {
        DecodeMethod::ALaw => alaw::decode(input, output, len),
        DecodeMethod::AdpcmMs => adpcm::decode(input, output, len, fmt),
        DecodeMethod::PassThrough => {
            if let FormatTag::Other(tag) = fmt.format_tag {
                log::trace!("No decoder for format tag 0x{:04X}, passing through", tag);
            }
            PassThrough.decode_into(&input[..len], output)
        }
    };

    Ok(written)
}

/// Decode the first `len` bytes of `input` into a new buffer
pub fn decode(input: &[u8], len: usize, fmt: &FormatDescriptor) -> Result<Vec<u8>> {
    let len = len.min(input.len());
    let mut output = vec![0u8; estimate_output_size(len as u64, fmt)?];
    let written = decode_into(input, &mut output, len, fmt)?;
    output.truncate(written);
    Ok(output)
}
