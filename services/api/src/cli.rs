use crate::commands::{run_import, run_score, run_value, ImportArgs, ScoreArgs, ValueCommand};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use patent_valuation::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Patent Valuation Engine",
    about = "Score patents and run valuation models from the command line or over HTTP",
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
    /// Score a patent from its bibliographic counts
    Score(ScoreArgs),
    /// Run a single valuation model and print the result as JSON
    Value {
        #[command(subcommand)]
        command: ValueCommand,
    },
    /// Score every patent in a CSV export and print the vault with portfolio metrics
    Import(ImportArgs),
    /// Walk through a seeded portfolio and every valuation model
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Value { command } => run_value(command),
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
