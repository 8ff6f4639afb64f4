//! Payload decoding to PCM or WAV files

use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use colored::Colorize;
use rdpsnd::{translate_for_device, FormatDescriptor, FormatTag};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::output::{print_output, verbose_println};

#[derive(Debug, Serialize)]
struct DecodeReport<'a> {
    input: String,
    output: String,
    format: &'a str,
    compressed_bytes: usize,
    decoded_bytes: usize,
    wav: bool,
}

/// Decode a compressed payload file
pub fn decode(input: &Path, output: &Path, format: &FormatDescriptor, wav: bool) -> Result<()> {
    let data =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    verbose_println(
        1,
        &format!("Read {} bytes from {}", data.len(), input.display()),
    );

    let pcm = rdpsnd::decode(&data, data.len(), format)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    verbose_println(1, &format!("Decoded to {} bytes", pcm.len()));

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    if wav {
        write_wav_header(&mut writer, &translate_for_device(format), pcm.len())?;
    }
    writer.write_all(&pcm)?;
    writer.flush()?;

    let report = DecodeReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        format: format.format_tag.name(),
        compressed_bytes: data.len(),
        decoded_bytes: pcm.len(),
        wav,
    };

    if !print_output(&report)? {
        println!(
            "{} {} bytes of {} into {} bytes of 16-bit PCM ({})",
            "Decoded".green().bold(),
            report.compressed_bytes,
            report.format,
            report.decoded_bytes,
            report.output
        );
    }

    Ok(())
}

/// Write a RIFF/WAVE header for `data_len` bytes of samples in `device` format
fn write_wav_header<W: Write>(writer: &mut W, device: &FormatDescriptor, data_len: usize) -> Result<()> {
    // Decoded samples are plain PCM whatever the source encoding was
    let mut fmt = device.clone();
    fmt.format_tag = FormatTag::LinearPcm;
    fmt.extra = None;

    let fmt_size = fmt.encoded_size();
    let riff_size = 4 + (8 + fmt_size) + (8 + data_len);
    let Ok(riff_size) = u32::try_from(riff_size) else {
        bail!("{} bytes of samples do not fit in a WAV file", data_len);
    };

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(riff_size)?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(fmt_size as u32)?;
    fmt.write(writer)?;

    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_len as u32)?;

    Ok(())
}
