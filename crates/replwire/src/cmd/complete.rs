use replwire_client::{Client, Completion};

use crate::cmd::SymbolArgs;
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_json, print_responses, print_table, OutputFormat};

pub async fn run(client: &Client, args: SymbolArgs, format: OutputFormat) -> CliResult<i32> {
    let response = client
        .complete(&args.symbol, args.ns.as_deref(), args.session.as_deref())
        .await
        .map_err(|err| client_error("complete failed", err))?;
    let completions = Completion::from_response(&response);

    match format {
        OutputFormat::Json => print_json(&completions),
        OutputFormat::Table => print_table(
            &["CANDIDATE", "NS", "TYPE"],
            completions
                .iter()
                .map(|c| {
                    vec![
                        c.candidate.clone(),
                        c.ns.clone().unwrap_or_default(),
                        c.kind.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
        ),
        OutputFormat::Raw => print_responses(std::slice::from_ref(&response), format),
        OutputFormat::Pretty => {
            for completion in &completions {
                println!("{}", completion.candidate);
            }
        }
    }
    Ok(SUCCESS)
}
