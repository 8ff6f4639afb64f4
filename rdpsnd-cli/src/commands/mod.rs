//! Command implementations

pub mod decode;
pub mod info;

use anyhow::{Context, Result};
use rdpsnd::FormatDescriptor;

use crate::config::Config;
use crate::{Encoding, FormatArgs};

/// Build the stream format from command-line options and configuration
pub fn resolve_format(args: &FormatArgs, config: &Config) -> Result<FormatDescriptor> {
    let encoding = match args.format {
        Some(encoding) => encoding,
        None => config.encoding()?,
    };
    let channels = args.channels.or(config.default_channels).unwrap_or(2);
    let rate = args.rate.or(config.default_rate).unwrap_or(22050);

    let format = match encoding {
        Encoding::Pcm => FormatDescriptor::pcm(channels, rate, 16),
        Encoding::Alaw => FormatDescriptor::alaw(channels, rate),
        Encoding::Adpcm => {
            let block_align = args
                .block_align
                .or(config.default_block_align)
                .unwrap_or(1024);
            FormatDescriptor::adpcm(channels, rate, block_align)
        }
    };

    format
        .validate()
        .with_context(|| format!("Unusable {} stream format", format.format_tag.name()))?;
    log::debug!("Resolved stream format: {:?}", format);

    Ok(format)
}
