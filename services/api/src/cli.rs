use crate::analyze::{run_analyze, run_simulate, run_types, AnalyzeArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use claimguard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "claimguard-api",
    about = "Analyze insurance policy text and serve the ClaimGuard HTTP API",
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
    /// Analyze an extracted policy text file and print the report
    Analyze(AnalyzeArgs),
    /// Analyze a policy text file, then simulate a claim against it
    Simulate(SimulateArgs),
    /// List the supported policy categories
    Types,
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
        Command::Analyze(args) => run_analyze(args),
        Command::Simulate(args) => run_simulate(args),
        Command::Types => run_types(),
    }
}
