//! Integration tests for decoded size estimation

use proptest::prelude::*;
use rdpsnd::codec::adpcm::BLOCK_HEADER_SIZE;
use rdpsnd::size::MAX_COMPRESSED_LEN;
use rdpsnd::{decode_into, estimate_output_size, Error, FormatDescriptor};

#[test]
fn test_alaw_mono_is_twice_input() {
    let fmt = FormatDescriptor::alaw(1, 8000);
    for len in [0u64, 1, 2, 160, 320, 4096, 65535] {
        assert_eq!(estimate_output_size(len, &fmt).unwrap(), 2 * len as usize);
    }
}

#[test]
fn test_adpcm_whole_blocks() {
    // 2 seed samples per channel + 2 samples per payload byte, 2 bytes each
    for (channels, block_align) in [(1u16, 256u16), (1, 512), (2, 512), (2, 2048)] {
        let fmt = FormatDescriptor::adpcm(channels, 22050, block_align);
        let payload = block_align as usize - BLOCK_HEADER_SIZE * channels as usize;
        for k in 0..4usize {
            assert_eq!(
                estimate_output_size((k * block_align as usize) as u64, &fmt).unwrap(),
                k * (4 * payload + 4 * channels as usize)
            );
        }
    }
}

#[test]
fn test_adpcm_single_mono_block() {
    let fmt = FormatDescriptor::adpcm(1, 22050, 256);
    // 249 payload bytes -> 498 samples, plus 2 seeds -> 500 samples
    assert_eq!(estimate_output_size(256, &fmt).unwrap(), 1000);
}

#[test]
fn test_untrusted_length_rejected() {
    let fmt = FormatDescriptor::adpcm(2, 44100, 2048);
    assert!(estimate_output_size(MAX_COMPRESSED_LEN, &fmt).is_ok());
    assert!(matches!(
        estimate_output_size(MAX_COMPRESSED_LEN + 1, &fmt),
        Err(Error::SizeOverflow(_))
    ));
}

fn any_format() -> impl Strategy<Value = FormatDescriptor> {
    prop_oneof![
        (1u16..=2).prop_map(|channels| FormatDescriptor::alaw(channels, 8000)),
        (1u16..=2, 0u16..=2048)
            .prop_map(|(channels, block_align)| FormatDescriptor::adpcm(
                channels,
                22050,
                block_align
            )),
        (1u16..=2).prop_map(|channels| FormatDescriptor::pcm(channels, 44100, 16)),
    ]
}

proptest! {
    #[test]
    fn prop_estimate_bounds_decoded_size(
        fmt in any_format(),
        input in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let expected = estimate_output_size(input.len() as u64, &fmt).unwrap();
        let mut output = vec![0u8; expected];
        let written = decode_into(&input, &mut output, input.len(), &fmt).unwrap();
        prop_assert_eq!(written, expected);
    }

    #[test]
    fn prop_decode_is_deterministic(
        fmt in any_format(),
        input in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let first = rdpsnd::decode(&input, input.len(), &fmt).unwrap();
        let second = rdpsnd::decode(&input, input.len(), &fmt).unwrap();
        prop_assert_eq!(first, second);
    }
}
