use std::path::Path;

use crate::cli::LayoutMode;
use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_layout(mode: Option<LayoutMode>, db_path: &Path) -> Result<LayoutMode, CliError> {
    let preferences = open_service(db_path).await?.preference_store();

    let layout = match mode {
        Some(mode) => {
            preferences.set_layout_mode(mode.is_list_mode()).await?;
            mode
        }
        None => LayoutMode::from_list_mode(preferences.layout_mode().await?),
    };

    println!("Layout: {}", layout.label());
    Ok(layout)
}
