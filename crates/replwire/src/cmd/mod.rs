use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use replwire_client::{Client, ClientConfig};
use replwire_transport::ConnectionDescriptor;

use crate::exit::{transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;
use crate::port_file;

pub mod complete;
pub mod describe;
pub mod eval;
pub mod info;
pub mod send;
pub mod sessions;
pub mod stacktrace;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate code in a fresh session.
    Eval(EvalArgs),
    /// Load a source file in a fresh session.
    LoadFile(LoadFileArgs),
    /// List completion candidates for a symbol prefix.
    Complete(SymbolArgs),
    /// Show documentation and location for a symbol.
    Info(SymbolArgs),
    /// Show the stacktrace of the last exception in a session.
    Stacktrace(StacktraceArgs),
    /// Run tests for a namespace, or every loaded namespace.
    Test(TestArgs),
    /// List sessions known to the server.
    Sessions,
    /// Close a session.
    Close(CloseArgs),
    /// Show the server's supported operations and versions.
    Describe,
    /// Send one raw request given as a JSON object.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub async fn run(command: Command, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args),
        Command::Eval(args) => eval::run(&conn.client()?, args, format).await,
        Command::LoadFile(args) => eval::run_file(&conn.client()?, args, format).await,
        Command::Complete(args) => complete::run(&conn.client()?, args, format).await,
        Command::Info(args) => info::run(&conn.client()?, args, format).await,
        Command::Stacktrace(args) => stacktrace::run(&conn.client()?, args, format).await,
        Command::Test(args) => test::run(&conn.client()?, args, format).await,
        Command::Sessions => sessions::list(&conn.client()?, format).await,
        Command::Close(args) => sessions::close(&conn.client()?, args, format).await,
        Command::Describe => describe::run(&conn.client()?, format).await,
        Command::Send(args) => send::run(&conn.client()?, args, format).await,
    }
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Server host.
    #[arg(long, env = "REPLWIRE_HOST", default_value = replwire_transport::DEFAULT_HOST, global = true)]
    pub host: String,

    /// Server port. Read from ./.nrepl-port when omitted.
    #[arg(long, env = "REPLWIRE_PORT", global = true)]
    pub port: Option<u16>,

    /// Server address as host:port, [v6]:port or a bare port. Overrides
    /// --host and --port.
    #[arg(long, value_name = "ADDR", env = "REPLWIRE_CONNECT", global = true)]
    pub connect: Option<String>,

    /// Per-request timeout (e.g. 30s, 500ms).
    #[arg(long, default_value = "30s", global = true)]
    pub timeout: String,
}

impl ConnectionArgs {
    pub fn descriptor(&self, dir: &Path) -> CliResult<ConnectionDescriptor> {
        if let Some(addr) = &self.connect {
            return addr
                .parse()
                .map_err(|err| transport_error("invalid --connect", err));
        }
        let port = match self.port {
            Some(port) => port,
            None => port_file::discover(dir)?.ok_or_else(|| {
                CliError::new(
                    USAGE,
                    format!(
                        "no port given: pass --port, set REPLWIRE_PORT, or run where {} exists",
                        port_file::PORT_FILE
                    ),
                )
            })?,
        };
        if port == 0 {
            return Err(CliError::new(USAGE, "port must be greater than zero"));
        }
        Ok(ConnectionDescriptor::new(self.host.clone(), port))
    }

    pub fn client(&self) -> CliResult<Client> {
        let dir = std::env::current_dir()
            .map_err(|err| crate::exit::io_error("failed reading working directory", err))?;
        let descriptor = self.descriptor(&dir)?;
        let timeout = parse_duration(&self.timeout)?;
        tracing::debug!(addr = %descriptor, ?timeout, "using endpoint");

        let config = ClientConfig {
            connect_timeout: Some(timeout),
            request_timeout: Some(timeout),
            ..ClientConfig::default()
        };
        Ok(Client::for_endpoint(descriptor).with_config(config))
    }
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Code to evaluate. Read from stdin when neither this nor --file is given.
    #[arg(conflicts_with = "file")]
    pub code: Option<String>,
    /// Read the code from a file.
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
    /// Session to clone the evaluation session from.
    #[arg(long, short = 's')]
    pub session: Option<String>,
}

#[derive(Args, Debug)]
pub struct LoadFileArgs {
    /// Source file to load.
    pub path: PathBuf,
    /// Session to clone the evaluation session from.
    #[arg(long, short = 's')]
    pub session: Option<String>,
}

#[derive(Args, Debug)]
pub struct SymbolArgs {
    /// Symbol (or prefix, for completion).
    pub symbol: String,
    /// Namespace to resolve the symbol in.
    #[arg(long)]
    pub ns: Option<String>,
    #[arg(long, short = 's')]
    pub session: Option<String>,
}

#[derive(Args, Debug)]
pub struct StacktraceArgs {
    /// Session whose last exception to show.
    pub session: String,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Namespace to test. Every loaded namespace when omitted.
    pub ns: Option<String>,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Session to close.
    pub session: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Request as a JSON object, e.g. '{"op":"describe"}'.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the JSON request from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}
