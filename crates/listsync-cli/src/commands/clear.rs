use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_clear(db_path: &Path) -> Result<(), CliError> {
    open_service(db_path).await?.record_store().clear_all().await?;
    println!("Cleared cached records");
    Ok(())
}
