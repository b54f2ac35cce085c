use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use qwire::frame::{Codec, FrameConfig, FrameError, MessageReader};
use qwire::ninep::{self, Message};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{MessagePrinter, OutputFormat};

#[derive(Debug, Default, PartialEq, Eq)]
struct DecodeSummary {
    decoded: usize,
    skipped: usize,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.count == Some(0) {
        return Err(CliError::new(USAGE, "--count must be greater than zero"));
    }

    let input = open_input(args.input.as_deref())?;
    let mut printer = MessagePrinter::new(format);
    let result = decode_all(BufReader::new(input), &args, |message| printer.push(message));
    printer.finish();

    let summary = result.map_err(|err| frame_error("decode failed", err))?;
    tracing::info!(
        decoded = summary.decoded,
        skipped = summary.skipped,
        "decode finished"
    );
    Ok(SUCCESS)
}

fn decode_all<R, F>(input: R, args: &DecodeArgs, mut sink: F) -> Result<DecodeSummary, FrameError>
where
    R: Read,
    F: FnMut(&Message),
{
    let codec = Codec::with_config(
        ninep::registry(),
        FrameConfig {
            max_frame_size: args.max_frame_size,
        },
    );
    let mut reader = MessageReader::new(input, codec);
    let limit = args.count.unwrap_or(usize::MAX);
    let mut summary = DecodeSummary::default();

    while summary.decoded < limit {
        match reader.next_message() {
            Ok(Some(message)) => {
                sink(&message);
                summary.decoded += 1;
            }
            Ok(None) => break,
            // The body of an unknown frame has already been consumed, so the
            // stream is positioned at the next frame.
            Err(FrameError::UnknownMessageType(message_type)) if args.skip_unknown => {
                tracing::warn!(%message_type, "skipping frame with unknown message type");
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

pub(crate) fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        Some(path) => match File::open(path) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) => Err(io_error(&format!("failed opening {}", path.display()), err)),
        },
        None => Ok(Box::new(io::stdin().lock())),
    }
}
