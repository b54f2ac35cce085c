use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use qwire::frame::MessageWriter;
use qwire::ninep::Message;

use crate::cmd::decode::open_input;
use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let input = BufReader::new(open_input(args.input.as_deref())?);
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).map_err(|err| {
            io_error(&format!("failed creating {}", path.display()), err)
        })?),
        None => Box::new(io::stdout().lock()),
    };

    let encoded = encode_lines(input, BufWriter::new(output))?;
    tracing::info!(encoded, "encode finished");
    Ok(SUCCESS)
}

/// Encode one frame per JSON line. Blank lines and `#` comments are skipped.
fn encode_lines<R: BufRead, W: Write>(input: R, output: W) -> CliResult<usize> {
    let mut writer = MessageWriter::new(output, qwire::default_protocol());
    let mut encoded = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|err| io_error("failed reading input", err))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let message: Message = serde_json::from_str(trimmed).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("line {line_no}: invalid message: {err}"),
            )
        })?;

        writer
            .write_message(&message)
            .map_err(|err| frame_error(&format!("line {line_no}: encode failed"), err))?;
        tracing::debug!(line = line_no, name = message.name(), tag = message.tag(), "encoded message");
        encoded += 1;
    }

    Ok(encoded)
}
