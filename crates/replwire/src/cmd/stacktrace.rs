use replwire_client::{Client, StackFrame};

use crate::cmd::StacktraceArgs;
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_json, print_responses, print_table, OutputFormat};

pub async fn run(client: &Client, args: StacktraceArgs, format: OutputFormat) -> CliResult<i32> {
    let responses = client
        .stacktrace(&args.session)
        .await
        .map_err(|err| client_error("stacktrace failed", err))?;
    let frames = StackFrame::from_responses(&responses);

    match format {
        OutputFormat::Json => print_json(&frames),
        OutputFormat::Table => print_table(
            &["CLASS", "METHOD", "FILE", "LINE", "FLAGS"],
            frames
                .iter()
                .map(|f| {
                    vec![
                        f.class.clone().unwrap_or_default(),
                        f.method.clone().unwrap_or_default(),
                        f.file.clone().unwrap_or_default(),
                        f.line.map(|l| l.to_string()).unwrap_or_default(),
                        f.flags.join(","),
                    ]
                })
                .collect(),
        ),
        OutputFormat::Pretty => {
            for frame in &frames {
                println!(
                    "  at {}.{} ({}:{})",
                    frame.class.as_deref().unwrap_or("?"),
                    frame.method.as_deref().unwrap_or("?"),
                    frame.file.as_deref().unwrap_or("?"),
                    frame.line.unwrap_or(0)
                );
            }
        }
        OutputFormat::Raw => print_responses(&responses, format),
    }
    Ok(SUCCESS)
}
