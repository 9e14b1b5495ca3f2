use crate::demo::{run_demo, run_tier_lookup, DemoArgs, TierArgs};
use crate::server;
use crate::terminal::{run_interactive, TakeArgs};
use clap::{Args, Parser, Subcommand};
use readiness_quiz::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "AI Infrastructure Readiness Quiz",
    about = "Serve or take the AI infrastructure readiness assessment from the command line",
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
    /// Take the six-question assessment in the terminal
    Take(TakeArgs),
    /// Show the result tier for a score on the 0-5 scale
    Tier(TierArgs),
    /// Run a scripted attempt from a list of answers and print the results
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
        Command::Take(args) => run_interactive(args).await,
        Command::Tier(args) => run_tier_lookup(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
