use replwire_client::Client;

use crate::cmd::CloseArgs;
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_json, print_responses, print_table, OutputFormat};

pub async fn list(client: &Client, format: OutputFormat) -> CliResult<i32> {
    let sessions = client
        .list_sessions()
        .await
        .map_err(|err| client_error("ls-sessions failed", err))?;

    match format {
        OutputFormat::Json => print_json(&sessions),
        OutputFormat::Table => print_table(
            &["SESSION"],
            sessions.into_iter().map(|s| vec![s]).collect(),
        ),
        OutputFormat::Pretty | OutputFormat::Raw => {
            for session in &sessions {
                println!("{session}");
            }
        }
    }
    Ok(SUCCESS)
}

pub async fn close(client: &Client, args: CloseArgs, format: OutputFormat) -> CliResult<i32> {
    let responses = client
        .close_session(Some(&args.session))
        .await
        .map_err(|err| client_error("close failed", err))?;
    print_responses(&responses, format);
    Ok(SUCCESS)
}
