use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use replwire_client::{EvalSummary, Response};
use replwire_codec::{to_bytes, Value};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// One JSON document per line.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Every response as received: JSON lines, a key/value table, `key=value`
/// text, or the bencode bytes themselves.
pub fn print_responses(responses: &[Response], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for response in responses {
                print_json(response);
            }
        }
        OutputFormat::Table => {
            let rows = responses
                .iter()
                .enumerate()
                .flat_map(|(index, response)| {
                    response.fields().iter().map(move |(key, value)| {
                        vec![index.to_string(), key.clone(), value_text(value)]
                    })
                })
                .collect();
            print_table(&["#", "KEY", "VALUE"], rows);
        }
        OutputFormat::Pretty => {
            for response in responses {
                let line = response
                    .fields()
                    .iter()
                    .map(|(key, value)| format!("{key}={}", value_text(value)))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{line}");
            }
        }
        OutputFormat::Raw => {
            for response in responses {
                print_raw(&to_bytes(&response.clone().into_value()));
            }
        }
    }
}

/// Evaluation results. Pretty mode behaves like a REPL: output streams to
/// stdout/stderr and each value is echoed after `=>`.
pub fn print_eval(summary: &EvalSummary, responses: &[Response], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table => {
            let mut rows = Vec::new();
            if let Some(session) = &summary.session {
                rows.push(vec!["session".to_string(), session.clone()]);
            }
            for value in &summary.values {
                rows.push(vec!["value".to_string(), value.clone()]);
            }
            if !summary.out.is_empty() {
                rows.push(vec!["out".to_string(), summary.out.clone()]);
            }
            if !summary.err.is_empty() {
                rows.push(vec!["err".to_string(), summary.err.clone()]);
            }
            if let Some(ex) = &summary.ex {
                rows.push(vec!["ex".to_string(), ex.clone()]);
            }
            if let Some(ns) = &summary.ns {
                rows.push(vec!["ns".to_string(), ns.clone()]);
            }
            print_table(&["FIELD", "VALUE"], rows);
        }
        OutputFormat::Pretty => {
            print!("{}", summary.out);
            eprint!("{}", summary.err);
            for value in &summary.values {
                println!("=> {value}");
            }
            if let Some(ex) = &summary.ex {
                eprintln!("exception: {ex}");
            }
        }
        OutputFormat::Raw => print_responses(responses, format),
    }
}

/// Human-readable rendering of a decoded value. Lists and dicts fall back to
/// JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.kind().to_string()),
    }
}
