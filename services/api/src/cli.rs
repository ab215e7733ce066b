use crate::preview::{run_enrich, run_preview, EnrichArgs, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contact_enrichment::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contact Enrichment",
    about = "Serve and run CRM contact enrichment from the command line",
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
    /// Enrich a single contact in the configured CRM
    Enrich(EnrichArgs),
    /// Show what would be inferred for an email and job title without touching the CRM
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve against an in-memory contact store seeded with sample contacts
    #[arg(long)]
    pub(crate) in_memory: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Enrich(args) => run_enrich(args).await,
        Command::Preview(args) => run_preview(args),
    }
}
