//! rdpsnd CLI - Command-line tool for decoding remote desktop sound streams
//!
//! Decodes captured A-law and MS-ADPCM payloads to linear PCM and reports how
//! a stream format maps onto a playback device.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

mod commands;
mod config;
mod output;

// Global context for commands to access
pub static GLOBAL_OPTS: OnceLock<GlobalOptions> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub output: OutputFormat,
    pub verbose: u8,
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Stream encodings the tool can describe and decode
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Encoding {
    Pcm,
    Alaw,
    Adpcm,
}

#[derive(Parser)]
#[command(
    name = "rdpsnd-cli",
    about = "Command-line tool for decoding remote desktop sound streams",
    long_about = None,
    after_help = "EXAMPLES:
    # Decode a captured A-law payload to raw PCM
    rdpsnd-cli decode capture.alaw out.pcm --format alaw --channels 1 --rate 8000

    # Decode MS-ADPCM into a playable WAV file
    rdpsnd-cli decode capture.adpcm out.wav --format adpcm --block-align 1024 --wav

    # Show the device format and decoded size for a stream
    rdpsnd-cli info --format adpcm --channels 2 --block-align 2048 --length 65536

    # Generate shell completions
    rdpsnd-cli completion bash > ~/.bash_completion.d/rdpsnd-cli.bash"
)]
#[command(version)]
struct Cli {
    /// Output format (defaults to the configured one, else text)
    #[arg(global = true, short = 'o', long, value_enum)]
    output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(global = true, short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(global = true, short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output
    #[arg(global = true, long)]
    no_color: bool,

    /// Configuration file to use instead of the default locations
    #[arg(global = true, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Stream format options, each falling back to the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Stream encoding
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<Encoding>,

    /// Number of channels (1 or 2)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u16).range(1..=2))]
    pub channels: Option<u16>,

    /// Sample rate in Hz
    #[arg(short = 'r', long)]
    pub rate: Option<u32>,

    /// Bytes per ADPCM block
    #[arg(short = 'b', long)]
    pub block_align: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a compressed payload to 16-bit PCM
    Decode {
        /// File holding the compressed payload
        input: PathBuf,
        /// Destination file
        #[arg(value_name = "OUTPUT")]
        destination: PathBuf,
        #[command(flatten)]
        format: FormatArgs,
        /// Wrap the samples in a RIFF/WAVE container
        #[arg(short, long)]
        wav: bool,
    },
    /// Show the device format and decoded size for a stream format
    Info {
        #[command(flatten)]
        format: FormatArgs,
        /// Compressed length in bytes to estimate the decoded size for
        #[arg(short, long)]
        length: Option<u64>,
    },
    /// Generate shell completion scripts
    #[command(about = "Generate completion scripts for your shell")]
    Completion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = config::load_config(cli.config.as_ref())?;
    log::debug!("Using configuration: {:?}", config);

    let output = match cli.output {
        Some(output) => output,
        None => config.output_format()?,
    };

    // Set up colored output based on flags
    if cli.no_color || output != OutputFormat::Text {
        colored::control::set_override(false);
    }

    // Store global options for commands to access
    let global_opts = GlobalOptions {
        output,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    GLOBAL_OPTS
        .set(global_opts)
        .expect("Failed to set global options");

    // Execute command
    match cli.command {
        Commands::Decode {
            input,
            destination,
            format,
            wav,
        } => {
            let format = commands::resolve_format(&format, &config)?;
            commands::decode::decode(&input, &destination, &format, wav)?;
        }
        Commands::Info { format, length } => {
            let format = commands::resolve_format(&format, &config)?;
            commands::info::info(&format, length)?;
        }
        Commands::Completion { shell } => {
            // Generate completion script for the specified shell
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}
