//! Audio format descriptors and device format translation
//!
//! The sound channel announces every stream with a WAVEFORMATEX record. The
//! descriptor parsed from it drives both the decoder selection and the format
//! the playback device must be opened with.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Wire values of the `wFormatTag` field
pub mod tags {
    /// Linear PCM
    pub const PCM: u16 = 0x0001;
    /// Microsoft ADPCM
    pub const ADPCM_MS: u16 = 0x0002;
    /// ITU-T G.711 A-law
    pub const ALAW: u16 = 0x0006;
}

/// Size of a WAVEFORMATEX record without its extra data
pub const WAVE_FORMAT_HEADER_SIZE: usize = 18;

/// Encoding of an audio stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatTag {
    /// Already linear, played as-is
    LinearPcm,
    /// G.711 A-law, 8 bits per sample
    ALaw,
    /// Microsoft ADPCM, 4 bits per sample in fixed-size blocks
    AdpcmMs,
    /// Any other encoding, carried through untouched
    Other(u16),
}

impl FormatTag {
    /// Gets a FormatTag from its wire value
    pub fn from_tag(tag: u16) -> Self {
        match tag {
            tags::PCM => FormatTag::LinearPcm,
            tags::ALAW => FormatTag::ALaw,
            tags::ADPCM_MS => FormatTag::AdpcmMs,
            other => FormatTag::Other(other),
        }
    }

    /// Returns the wire value for this tag
    pub fn to_tag(&self) -> u16 {
        match *self {
            FormatTag::LinearPcm => tags::PCM,
            FormatTag::ALaw => tags::ALAW,
            FormatTag::AdpcmMs => tags::ADPCM_MS,
            FormatTag::Other(tag) => tag,
        }
    }

    /// Short lowercase name, used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            FormatTag::LinearPcm => "pcm",
            FormatTag::ALaw => "alaw",
            FormatTag::AdpcmMs => "adpcm",
            FormatTag::Other(_) => "other",
        }
    }
}

/// Parameters of an audio stream, as announced on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatDescriptor {
    /// Stream encoding
    pub format_tag: FormatTag,

    /// Number of interleaved channels (1 or 2)
    pub channels: u16,

    /// Sample rate in Hz
    pub samples_per_sec: u32,

    /// Average data rate in bytes per second
    pub avg_bytes_per_sec: u32,

    /// Bytes per block for ADPCM, bytes per sample frame otherwise
    pub block_align: u16,

    /// Bits per encoded sample
    pub bits_per_sample: u16,

    /// Codec-specific trailer, kept opaque
    pub extra: Option<Vec<u8>>,
}

impl FormatDescriptor {
    /// Create a linear PCM descriptor
    pub fn pcm(channels: u16, samples_per_sec: u32, bits_per_sample: u16) -> Self {
        let block_align = (channels as u32 * bits_per_sample as u32 / 8) as u16;
        Self {
            format_tag: FormatTag::LinearPcm,
            channels,
            samples_per_sec,
            avg_bytes_per_sec: (block_align as u32).wrapping_mul(samples_per_sec),
            block_align,
            bits_per_sample,
            extra: None,
        }
    }

    /// Create an 8-bit A-law descriptor
    pub fn alaw(channels: u16, samples_per_sec: u32) -> Self {
        Self {
            format_tag: FormatTag::ALaw,
            channels,
            samples_per_sec,
            avg_bytes_per_sec: (channels as u32).wrapping_mul(samples_per_sec),
            block_align: channels,
            bits_per_sample: 8,
            extra: None,
        }
    }

    /// Create a 4-bit MS-ADPCM descriptor with the given block size
    pub fn adpcm(channels: u16, samples_per_sec: u32, block_align: u16) -> Self {
        let mut format = Self {
            format_tag: FormatTag::AdpcmMs,
            channels,
            samples_per_sec,
            avg_bytes_per_sec: 0,
            block_align,
            bits_per_sample: 4,
            extra: None,
        };

        let samples_per_block = format.adpcm_samples_per_block();
        if samples_per_block > 0 {
            format.avg_bytes_per_sec =
                (samples_per_sec as u64 * block_align as u64 / samples_per_block as u64) as u32;
        }
        format
    }

    /// Samples per channel carried by one ADPCM block: two header seeds plus
    /// two per payload byte shared across channels
    pub fn adpcm_samples_per_block(&self) -> u32 {
        let header = 7 * self.channels as u32;
        let block_align = self.block_align as u32;
        if self.channels == 0 || block_align < header {
            return 0;
        }
        (block_align - header) * 2 / self.channels as u32 + 2
    }

    /// Returns true for two-channel streams
    #[inline]
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Check that the stream can be decoded meaningfully
    ///
    /// Decoders never fail on bad descriptors, they produce nothing or noise.
    /// Callers accepting formats from a remote peer validate them first.
    pub fn validate(&self) -> Result<()> {
        if self.channels != 1 && self.channels != 2 {
            return Err(Error::UnsupportedChannels(self.channels));
        }

        match self.format_tag {
            FormatTag::AdpcmMs => {
                let header = 7 * self.channels;
                if self.block_align <= header {
                    return Err(Error::invalid_format(format!(
                        "ADPCM block alignment {} does not exceed the {}-byte block header",
                        self.block_align, header
                    )));
                }
            }
            FormatTag::ALaw => {
                if self.bits_per_sample == 0 {
                    return Err(Error::invalid_format("A-law stream with zero bits per sample"));
                }
            }
            FormatTag::LinearPcm | FormatTag::Other(_) => {}
        }

        Ok(())
    }

    /// Read a WAVEFORMATEX record
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let format_tag = FormatTag::from_tag(reader.read_u16::<LittleEndian>()?);
        let channels = reader.read_u16::<LittleEndian>()?;
        let samples_per_sec = reader.read_u32::<LittleEndian>()?;
        let avg_bytes_per_sec = reader.read_u32::<LittleEndian>()?;
        let block_align = reader.read_u16::<LittleEndian>()?;
        let bits_per_sample = reader.read_u16::<LittleEndian>()?;
        let extra_size = reader.read_u16::<LittleEndian>()?;

        let extra = if extra_size > 0 {
            let mut extra = vec![0u8; extra_size as usize];
            reader.read_exact(&mut extra)?;
            Some(extra)
        } else {
            None
        };

        Ok(Self {
            format_tag,
            channels,
            samples_per_sec,
            avg_bytes_per_sec,
            block_align,
            bits_per_sample,
            extra,
        })
    }

    /// Write a WAVEFORMATEX record
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let extra = self.extra.as_deref().unwrap_or(&[]);
        let extra_size = u16::try_from(extra.len()).map_err(|_| {
            Error::invalid_format(format!("extra data of {} bytes is too large", extra.len()))
        })?;

        writer.write_u16::<LittleEndian>(self.format_tag.to_tag())?;
        writer.write_u16::<LittleEndian>(self.channels)?;
        writer.write_u32::<LittleEndian>(self.samples_per_sec)?;
        writer.write_u32::<LittleEndian>(self.avg_bytes_per_sec)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;
        writer.write_u16::<LittleEndian>(extra_size)?;
        writer.write_all(extra)?;

        Ok(())
    }

    /// Size of the encoded record including extra data
    pub fn encoded_size(&self) -> usize {
        WAVE_FORMAT_HEADER_SIZE + self.extra.as_ref().map_or(0, Vec::len)
    }
}

/// Derive the format the playback device must be opened with
///
/// Linear PCM plays as announced. Every decoder emits 16-bit linear samples
/// with the source channel count and rate, so other encodings map to that.
/// The tag is kept so callers still know which decoder to run.
pub fn translate_for_device(input: &FormatDescriptor) -> FormatDescriptor {
    if input.format_tag == FormatTag::LinearPcm {
        return input.clone();
    }

    let block_align = input.channels.wrapping_mul(2);
    FormatDescriptor {
        format_tag: input.format_tag,
        channels: input.channels,
        samples_per_sec: input.samples_per_sec,
        avg_bytes_per_sec: (block_align as u32).wrapping_mul(input.samples_per_sec),
        block_align,
        bits_per_sample: 16,
        extra: None,
    }
}
