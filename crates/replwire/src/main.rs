mod cmd;
mod exit;
mod logging;
mod output;
mod port_file;

use clap::Parser;

use crate::cmd::{Command, ConnectionArgs};
use crate::exit::{CliError, INTERNAL, INTERRUPTED};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "replwire", version, about = "nREPL client")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            std::process::exit(INTERNAL);
        }
    };

    // Ctrl-C drops the pending request future, which closes its socket. A
    // blocking stdin read can outlive it, so the runtime is not joined.
    let result = runtime.block_on(async {
        tokio::select! {
            result = cmd::run(cli.command, &cli.connection, format) => result,
            _ = tokio::signal::ctrl_c() => Err(CliError::new(INTERRUPTED, "interrupted")),
        }
    });
    runtime.shutdown_background();

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eval_subcommand() {
        let cli = Cli::try_parse_from(["replwire", "--port", "7888", "eval", "(+ 1 2)"])
            .expect("eval args should parse");

        assert!(matches!(cli.command, Command::Eval(_)));
        assert_eq!(cli.connection.port, Some(7888));
    }

    #[test]
    fn rejects_code_and_file_together() {
        let err = Cli::try_parse_from(["replwire", "eval", "(+ 1 2)", "--file", "core.clj"])
            .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn connection_flags_are_global() {
        let cli = Cli::try_parse_from([
            "replwire",
            "sessions",
            "--host",
            "10.0.0.2",
            "--timeout",
            "3s",
        ])
        .expect("global flags should parse after the subcommand");
        assert!(matches!(cli.command, Command::Sessions));
        assert_eq!(cli.connection.host, "10.0.0.2");
        assert_eq!(cli.connection.timeout, "3s");
    }

    #[test]
    fn send_requires_a_payload() {
        let err = Cli::try_parse_from(["replwire", "send"]).expect_err("send needs --json or --file");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
