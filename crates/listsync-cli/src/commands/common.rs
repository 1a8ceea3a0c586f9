use std::path::{Path, PathBuf};

use listsync_core::config::{self, ClientConfig, ResolvedConfig};
use listsync_core::services::DatabaseService;
use listsync_core::{HomeState, HttpRemoteSource, Record, SyncRepository};
use serde::Serialize;

use crate::cli::LayoutMode;
use crate::error::CliError;

const GRID_COLUMNS: usize = 3;
const GRID_CELL_WIDTH: usize = 18;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RecordListItem {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
}

/// Merge CLI flags over the environment over the config file, then validate.
pub fn resolve_config(
    flags: ClientConfig,
    config_path: Option<&Path>,
) -> Result<ResolvedConfig, CliError> {
    let config_path = config_path.map_or_else(config::default_config_path, Path::to_path_buf);
    let file = config::load_from_path(&config_path);
    let env = ClientConfig::from_env().map_err(|e| CliError::Config(e.to_string()))?;

    flags
        .merge(env.merge(file))
        .resolve()
        .map_err(|e| CliError::Config(e.to_string()))
}

pub async fn open_service(db_path: &Path) -> Result<DatabaseService, CliError> {
    Ok(DatabaseService::open_path(PathBuf::from(db_path)).await?)
}

pub fn build_repository(
    config: &ResolvedConfig,
    service: &DatabaseService,
) -> Result<SyncRepository<HttpRemoteSource>, CliError> {
    let remote = config.remote_source()?;
    Ok(SyncRepository::new(remote, service.record_store()))
}

pub fn record_to_list_item(record: &Record) -> RecordListItem {
    RecordListItem {
        id: record.id,
        list_id: record.group_id,
        name: record.display_name.clone().unwrap_or_default(),
    }
}

fn record_name(record: &Record) -> &str {
    record.display_name.as_deref().unwrap_or_default().trim()
}

pub fn format_record_lines(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| format!("{:>6}  {}", record.id, record_name(record)))
        .collect()
}

pub fn format_grid_lines(records: &[Record]) -> Vec<String> {
    records
        .chunks(GRID_COLUMNS)
        .map(|row| {
            row.iter()
                .map(|record| {
                    let cell: String = record_name(record)
                        .chars()
                        .take(GRID_CELL_WIDTH)
                        .collect();
                    format!("[{cell:<GRID_CELL_WIDTH$}]")
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub fn format_group_tabs(group_ids: &[i64], selected: Option<i64>) -> String {
    group_ids
        .iter()
        .map(|id| {
            if Some(*id) == selected {
                format!("[{id}]")
            } else {
                format!(" {id} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Terminal rendering of one published home state.
pub fn render_state(state: &HomeState) -> Vec<String> {
    let layout = LayoutMode::from_list_mode(state.is_list_mode);
    let mut lines = Vec::new();

    let mut status = format!("{} items, {} layout", state.items.len(), layout.label());
    if state.is_loading {
        status.push_str(", refreshing...");
    }
    lines.push(status);

    if let Some(message) = state.error_message() {
        lines.push(format!("! {message}"));
    }

    if state.items.is_empty() {
        if !state.is_loading {
            lines.push("No items yet. Press r to refresh.".to_string());
        }
        return lines;
    }

    lines.push(format!(
        "Groups: {}",
        format_group_tabs(&state.group_ids, state.selected_group_id)
    ));

    if state.selected_group_items.is_empty() {
        lines.push("(no items in this group)".to_string());
    } else if state.is_list_mode {
        lines.extend(format_record_lines(&state.selected_group_items));
    } else {
        lines.extend(format_grid_lines(&state.selected_group_items));
    }

    lines
}
