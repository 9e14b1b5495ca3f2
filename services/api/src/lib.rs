mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod terminal;

use readiness_quiz::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
