use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use qwire::ninep::Message;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    index: usize,
    type_id: u8,
    name: &'a str,
    tag: u16,
    message: &'a Message,
}

/// Prints decoded messages. JSON and pretty output stream one line per
/// message; table output is buffered and printed by [`finish`](Self::finish).
pub struct MessagePrinter {
    format: OutputFormat,
    table: Option<Table>,
    count: usize,
}

impl MessagePrinter {
    pub fn new(format: OutputFormat) -> Self {
        let table = matches!(format, OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TYPE", "NAME", "TAG", "FIELDS"]);
            table
        });
        Self {
            format,
            table,
            count: 0,
        }
    }

    pub fn push(&mut self, message: &Message) {
        let index = self.count;
        self.count += 1;

        match self.format {
            OutputFormat::Json => println!("{}", json_line(index, message)),
            OutputFormat::Pretty => println!(
                "#{index} {} type={} tag={} {:?}",
                message.name(),
                message.message_type(),
                message.tag(),
                message
            ),
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(vec![
                        index.to_string(),
                        message.message_type().to_string(),
                        message.name().to_string(),
                        message.tag().to_string(),
                        serde_json::to_string(message).unwrap_or_default(),
                    ]);
                }
            }
        }
    }

    /// Number of messages printed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(self) {
        if let Some(table) = self.table {
            if self.count > 0 {
                println!("{table}");
            }
        }
    }
}

fn json_line(index: usize, message: &Message) -> String {
    let out = MessageOutput {
        index,
        type_id: message.message_type().0,
        name: message.name(),
        tag: message.tag(),
        message,
    };
    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
}
