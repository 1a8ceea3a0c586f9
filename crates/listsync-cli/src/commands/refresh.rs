use listsync_core::config::ResolvedConfig;
use listsync_core::models::process_records;

use crate::commands::common::{build_repository, open_service};
use crate::error::CliError;

/// One explicit fetch-and-merge. Returns how many records are now displayable.
pub async fn run_refresh(config: &ResolvedConfig) -> Result<usize, CliError> {
    let service = open_service(&config.db_path).await?;
    let repository = build_repository(config, &service)?;

    repository.refresh_items().await?;

    let stored = repository.store().list_all().await?;
    let stored_count = stored.len();
    let displayable = process_records(stored).len();
    println!("Refresh completed: {stored_count} records cached, {displayable} displayable");
    Ok(displayable)
}
