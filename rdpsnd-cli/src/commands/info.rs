//! Stream format information

use anyhow::Result;
use colored::Colorize;
use rdpsnd::{estimate_output_size, translate_for_device, DecodeMethod, FormatDescriptor, FormatTag};
use serde::Serialize;

use crate::output::print_output;

#[derive(Debug, Serialize)]
struct InfoReport {
    source: FormatDescriptor,
    device: FormatDescriptor,
    method: String,
    samples_per_block: Option<u32>,
    compressed_bytes: Option<u64>,
    decoded_bytes: Option<usize>,
}

/// Show how a stream format is decoded and played
pub fn info(format: &FormatDescriptor, length: Option<u64>) -> Result<()> {
    let device = translate_for_device(format);
    let decoded_bytes = length
        .map(|len| estimate_output_size(len, format))
        .transpose()?;
    let samples_per_block =
        (format.format_tag == FormatTag::AdpcmMs).then(|| format.adpcm_samples_per_block());

    let report = InfoReport {
        source: format.clone(),
        device,
        method: format!("{:?}", DecodeMethod::from_tag(format.format_tag)),
        samples_per_block,
        compressed_bytes: length,
        decoded_bytes,
    };

    if print_output(&report)? {
        return Ok(());
    }

    println!("{}", "Stream format:".bold());
    print_format(&report.source);
    if let Some(samples) = report.samples_per_block {
        println!("  Samples/block:   {}", samples);
    }
    println!("  Decoder:         {}", report.method);

    println!();
    println!("{}", "Device format:".bold());
    print_format(&report.device);

    if let (Some(compressed), Some(decoded)) = (report.compressed_bytes, report.decoded_bytes) {
        println!();
        println!("{}", "Decoded size:".bold());
        println!("  {} bytes -> {} bytes", compressed, decoded);
    }

    Ok(())
}

fn print_format(format: &FormatDescriptor) {
    println!(
        "  Encoding:        {} (0x{:04X})",
        format.format_tag.name(),
        format.format_tag.to_tag()
    );
    println!("  Channels:        {}", format.channels);
    println!("  Sample rate:     {} Hz", format.samples_per_sec);
    println!("  Bits/sample:     {}", format.bits_per_sample);
    println!("  Block align:     {}", format.block_align);
    println!("  Bytes/second:    {}", format.avg_bytes_per_sec);
}
