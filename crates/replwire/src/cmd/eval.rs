use std::path::Path;

use replwire_client::{Client, EvalSummary, Response};
use tokio::io::AsyncReadExt;

use crate::cmd::{EvalArgs, LoadFileArgs};
use crate::exit::{client_error, io_error, CliError, CliResult, EVAL_ERROR, SUCCESS, USAGE};
use crate::output::{print_eval, OutputFormat};

pub async fn run(client: &Client, args: EvalArgs, format: OutputFormat) -> CliResult<i32> {
    let code = resolve_code(&args).await?;
    let responses = client
        .evaluate(&code, args.session.as_deref())
        .await
        .map_err(|err| client_error("eval failed", err))?;
    Ok(report(&responses, format))
}

pub async fn run_file(client: &Client, args: LoadFileArgs, format: OutputFormat) -> CliResult<i32> {
    let code = read_file(&args.path).await?;
    let responses = client
        .evaluate_file(&code, &args.path, args.session.as_deref())
        .await
        .map_err(|err| client_error("load-file failed", err))?;
    Ok(report(&responses, format))
}

fn report(responses: &[Response], format: OutputFormat) -> i32 {
    let summary = EvalSummary::from_responses(responses);
    print_eval(&summary, responses, format);
    if summary.failed {
        EVAL_ERROR
    } else {
        SUCCESS
    }
}

async fn resolve_code(args: &EvalArgs) -> CliResult<String> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }
    if let Some(path) = &args.file {
        return read_file(path).await;
    }

    let mut code = String::new();
    tokio::io::stdin()
        .read_to_string(&mut code)
        .await
        .map_err(|err| io_error("failed reading stdin", err))?;
    if code.trim().is_empty() {
        return Err(CliError::new(USAGE, "no code given"));
    }
    Ok(code)
}

async fn read_file(path: &Path) -> CliResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}
