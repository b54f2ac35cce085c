use clap::{Args, Subcommand};
use std::path::PathBuf;

use qwire::frame::DEFAULT_MAX_FRAME_SIZE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode 9P2000 frames and print the messages.
    Decode(DecodeArgs),
    /// Encode JSON-lines messages into 9P2000 frames.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File containing frames. Default: stdin.
    pub input: Option<PathBuf>,
    /// Stop after N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Reject frames larger than this many bytes (header included).
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_SIZE)]
    pub max_frame_size: u32,
    /// Log and skip frames with an unknown message type instead of failing.
    #[arg(long)]
    pub skip_unknown: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON-lines file, one message per line. Default: stdin.
    pub input: Option<PathBuf>,
    /// Write frames to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
