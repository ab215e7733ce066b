mod cli;
mod infra;
mod preview;
mod routes;
mod server;

use contact_enrichment::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
