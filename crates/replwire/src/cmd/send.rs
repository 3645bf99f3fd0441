use replwire_client::Client;
use replwire_codec::Request;

use crate::cmd::SendArgs;
use crate::exit::{client_error, codec_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_responses, OutputFormat};

pub async fn run(client: &Client, args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let request = resolve_request(&args).await?;
    tracing::debug!(op = request.op(), keys = ?request.keys().collect::<Vec<_>>(), "sending raw request");

    let responses = client
        .send(request)
        .await
        .map_err(|err| client_error("send failed", err))?;
    print_responses(&responses, format);
    Ok(SUCCESS)
}

async fn resolve_request(args: &SendArgs) -> CliResult<Request> {
    let text = match (&args.json, &args.file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        (None, None) => return Err(CliError::new(USAGE, "pass --json or --file")),
    };
    parse_request(&text)
}

fn parse_request(text: &str) -> CliResult<Request> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| CliError::new(USAGE, format!("request is not valid JSON: {err}")))?;
    Request::from_json(json).map_err(|err| codec_error("invalid request", err))
}
