use crate::commands::{run_normalize, run_qualify, NormalizeArgs, QualifyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use triangle_origin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "triangle-origin",
    about = "USMCA origin qualification and tariff-savings estimation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Qualify one product request from a JSON file and print the report
    Qualify(QualifyArgs),
    /// Canonicalize rate records from a JSON file
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Qualify(args) => run_qualify(args).await,
        Command::Normalize(args) => run_normalize(args),
    }
}
