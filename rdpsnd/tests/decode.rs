//! Integration tests for the decoders

use pretty_assertions::assert_eq;
use rdpsnd::codec::{adpcm, alaw, decoder_for};
use rdpsnd::{decode, decode_into, estimate_output_size, FormatDescriptor, FormatTag};

/// ITU-T G.711 reference A-law compressor
fn alaw_compress(sample: i16) -> u8 {
    let mut ix = if sample < 0 {
        ((!sample) as u16 >> 4) as i16
    } else {
        sample >> 4
    };

    if ix > 15 {
        let mut iexp = 1;
        while ix > 16 + 15 {
            ix >>= 1;
            iexp += 1;
        }
        ix -= 16;
        ix += iexp << 4;
    }

    if sample >= 0 {
        ix |= 0x0080;
    }

    (ix ^ 0x0055) as u8
}

fn samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Build an ADPCM block with every channel seeded identically
fn adpcm_block(channels: u16, block_align: u16, predictor: u8, delta: u16, seed: i16, fill: u8) -> Vec<u8> {
    let channels = channels as usize;
    let mut block = vec![predictor; channels];
    for _ in 0..channels {
        block.extend_from_slice(&delta.to_le_bytes());
    }
    for _ in 0..2 * channels {
        block.extend_from_slice(&seed.to_le_bytes());
    }
    block.resize(block_align as usize, fill);
    block
}

#[test]
fn test_alaw_itu_round_trip() {
    let mut previous = i16::MIN;
    for sample in i16::MIN..=i16::MAX {
        let decoded = alaw::expand(alaw_compress(sample));

        let error = (decoded as i32 - sample as i32).abs();
        let bound = (sample as i32).abs() / 16;
        assert!(
            error <= bound.max(16),
            "sample {} decoded to {} (error {})",
            sample,
            decoded,
            error
        );

        assert!(decoded >= previous, "not monotonic at sample {}", sample);
        previous = decoded;
    }
}

#[test]
fn test_alaw_stream() {
    let fmt = FormatDescriptor::alaw(1, 8000);
    let input: Vec<u8> = (0..=255).collect();

    let output = decode(&input, input.len(), &fmt).expect("decode failed");
    assert_eq!(output.len(), 512);

    let expected: Vec<i16> = input.iter().map(|&code| alaw::expand(code)).collect();
    assert_eq!(samples(&output), expected);
}

#[test]
fn test_adpcm_delta_pinned_at_floor() {
    let fmt = FormatDescriptor::adpcm(1, 8000, 256);
    let block = adpcm_block(1, 256, 0, 16, 0, 0x00);

    let output = decode(&block, block.len(), &fmt).expect("decode failed");
    assert_eq!(output.len(), 1000);
    assert!(samples(&output).iter().all(|&s| s == 0));

    // The same nibble stream through a single predictor never leaves the floor
    let mut state = adpcm::ChannelPredictorState::new(0, 16, 0, 0);
    for _ in 0..2 * 249 {
        state.expand_nibble(0);
        assert_eq!(state.delta, adpcm::MIN_DELTA);
    }
}

#[test]
fn test_adpcm_stereo_interleaving() {
    let fmt = FormatDescriptor::adpcm(2, 22050, 16);
    let mut block = vec![0u8, 0u8];
    block.extend_from_slice(&16u16.to_le_bytes());
    block.extend_from_slice(&16u16.to_le_bytes());
    block.extend_from_slice(&1000i16.to_le_bytes());
    block.extend_from_slice(&(-1000i16).to_le_bytes());
    block.extend_from_slice(&900i16.to_le_bytes());
    block.extend_from_slice(&(-900i16).to_le_bytes());
    block.extend_from_slice(&[0x1F, 0x00]);

    let output = decode(&block, block.len(), &fmt).expect("decode failed");
    assert_eq!(
        samples(&output),
        // left +1 step, right -1 step, then both hold
        vec![1000, -1000, 900, -900, 1016, -1016, 1016, -1016]
    );
}

#[test]
fn test_adpcm_short_input() {
    let fmt = FormatDescriptor::adpcm(1, 8000, 256);

    assert_eq!(decode(&[], 0, &fmt).expect("decode failed"), Vec::<u8>::new());
    assert_eq!(decode(&[0x01], 1, &fmt).expect("decode failed"), Vec::<u8>::new());

    let mut output = [0u8; 16];
    assert_eq!(adpcm::decode_block(&fmt, &[0x01], 0, 1, &mut output, 6), 6);
}

#[test]
fn test_decode_is_idempotent() {
    let fmt = FormatDescriptor::adpcm(2, 44100, 64);
    let input: Vec<u8> = (0..640u32).map(|i| (i * 37 % 251) as u8).collect();

    let first = decode(&input, input.len(), &fmt).expect("decode failed");
    let second = decode(&input, input.len(), &fmt).expect("decode failed");
    assert_eq!(first, second);

    let decoder = decoder_for(&fmt);
    let mut third = vec![0u8; first.len()];
    assert_eq!(decoder.decode_into(&input, &mut third), first.len());
    assert_eq!(third, first);
}

#[test]
fn test_parallel_blocks_match_serial() {
    let fmt = FormatDescriptor::adpcm(1, 22050, 128);
    let block_align = fmt.block_align as usize;
    let input: Vec<u8> = (0..8 * block_align as u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
        .collect();

    let serial = decode(&input, input.len(), &fmt).expect("decode failed");

    let span = adpcm::block_output_size(&fmt);
    let mut parallel = vec![0u8; serial.len()];
    std::thread::scope(|scope| {
        for (index, out) in parallel.chunks_mut(span).enumerate() {
            let fmt = &fmt;
            let input = &input;
            scope.spawn(move || {
                let end = adpcm::decode_block(fmt, input, index * block_align, block_align, out, 0);
                assert_eq!(end, span);
            });
        }
    });

    assert_eq!(parallel, serial);
}

#[test]
fn test_unknown_tag_passes_through() {
    let mut fmt = FormatDescriptor::pcm(2, 44100, 16);
    fmt.format_tag = FormatTag::Other(0x0055);
    let input = b"not really mp3".to_vec();

    let output = decode(&input, input.len(), &fmt).expect("decode failed");
    assert_eq!(output, input);
}

#[test]
fn test_written_matches_estimate() {
    let formats = [
        FormatDescriptor::alaw(1, 8000),
        FormatDescriptor::alaw(2, 8000),
        FormatDescriptor::adpcm(1, 22050, 256),
        FormatDescriptor::adpcm(2, 44100, 512),
        FormatDescriptor::pcm(2, 44100, 16),
    ];
    let input: Vec<u8> = (0..3000u32).map(|i| (i % 256) as u8).collect();

    for fmt in &formats {
        for len in [0, 1, 255, 256, 257, 1024, 3000] {
            let expected = estimate_output_size(len as u64, fmt).expect("estimate failed");
            let mut output = vec![0u8; expected];
            let written = decode_into(&input, &mut output, len, fmt).expect("decode failed");
            assert_eq!(written, expected, "{:?} with {} bytes", fmt.format_tag, len);
        }
    }
}
