use crate::demo::{run_demo, run_eligibility_report, DemoArgs, EligibilityArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use placement_core::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Campus Placement Pipeline",
    about = "Evaluate candidate eligibility and run placement drives from the command line",
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
    /// Print a check-by-check eligibility report for a seeded candidate
    Eligibility(EligibilityArgs),
    /// Walk the seeded drives through apply, shortlist and interview rounds
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
        Command::Eligibility(args) => run_eligibility_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
