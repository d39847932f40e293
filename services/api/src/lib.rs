mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use triangle_origin::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
