//! Decoded buffer size estimation
//!
//! Lets a caller allocate the output buffer for a packet before decoding it.
//! The numbers match what the decoders write byte for byte.

use crate::codec::adpcm;
use crate::error::{Error, Result};
use crate::format::{FormatDescriptor, FormatTag};

/// Largest compressed length accepted from a peer
pub const MAX_COMPRESSED_LEN: u64 = i32::MAX as u64;

/// Number of bytes decoding `compressed_len` bytes of `fmt` produces
///
/// The result is exact rather than an upper bound: A-law is always two bytes
/// per input byte and ADPCM counts only the samples whole blocks carry.
///
/// # Errors
///
/// Returns [`Error::SizeOverflow`] when `compressed_len` exceeds
/// [`MAX_COMPRESSED_LEN`] or the decoded size is not addressable.
pub fn estimate_output_size(compressed_len: u64, fmt: &FormatDescriptor) -> Result<usize> {
    if compressed_len > MAX_COMPRESSED_LEN {
        return Err(Error::SizeOverflow(compressed_len));
    }
    let len = usize::try_from(compressed_len).map_err(|_| Error::SizeOverflow(compressed_len))?;

    let size = match fmt.format_tag {
        // One byte per sample in, one 16-bit sample out
        FormatTag::ALaw => len.checked_mul(2),
        FormatTag::AdpcmMs => {
            let block_align = fmt.block_align as usize;
            if block_align == 0 {
                Some(0)
            } else {
                (len / block_align).checked_mul(adpcm::block_output_size(fmt))
            }
        }
        FormatTag::LinearPcm | FormatTag::Other(_) => Some(len),
    };

    size.ok_or(Error::SizeOverflow(compressed_len))
}
