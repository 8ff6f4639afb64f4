//! # rdpsnd - Remote Desktop Sound Decoding
//!
//! Decoders for the compressed audio a remote desktop server sends over its
//! sound output channel. Packets arrive as G.711 A-law or Microsoft ADPCM
//! and leave as little-endian 16-bit linear PCM, ready for a playback device.
//!
//! ## Features
//!
//! - Translation of announced stream formats to the device format
//! - Exact decoded-size estimation before decoding
//! - Stateless A-law expansion
//! - Block-based MS-ADPCM decoding with per-channel predictors
//! - WAVEFORMATEX parsing and serialization
//!
//! ## Example
//!
//! ```
//! use rdpsnd::{codec, estimate_output_size, translate_for_device, FormatDescriptor};
//!
//! # fn main() -> Result<(), rdpsnd::Error> {
//! let source = FormatDescriptor::alaw(1, 8000);
//! let device = translate_for_device(&source);
//! assert_eq!(device.bits_per_sample, 16);
//!
//! let packet = [0xD5u8; 160];
//! let mut pcm = vec![0u8; estimate_output_size(packet.len() as u64, &source)?];
//! let written = codec::decode_into(&packet, &mut pcm, packet.len(), &source)?;
//! assert_eq!(written, 320);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod codec;
pub mod error;
pub mod format;
pub mod size;

// Re-export commonly used types
pub use codec::{decode, decode_into, DecodeMethod, Decoder};
pub use error::{Error, Result};
pub use format::{translate_for_device, FormatDescriptor, FormatTag};
pub use size::estimate_output_size;
