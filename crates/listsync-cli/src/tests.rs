use std::sync::Arc;
use std::time::Duration;

use listsync_core::config::{ClientConfig, ResolvedConfig};
use listsync_core::services::DatabaseService;
use listsync_core::{Error, HomeAction, HomeState, Record, RemoteError};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::cli::LayoutMode;
use crate::commands::clear::run_clear;
use crate::commands::common::{
    format_grid_lines, format_group_tabs, format_record_lines, record_to_list_item,
    render_state, resolve_config, RecordListItem,
};
use crate::commands::layout::run_layout;
use crate::commands::refresh::run_refresh;
use crate::commands::watch::{parse_watch_input, WatchInput};
use crate::error::CliError;

fn loaded_state(is_list_mode: bool) -> HomeState {
    let items = vec![
        Record::named(1, 1, "Item 1"),
        Record::named(2, 1, "Item 2"),
        Record::named(3, 1, "Item 3"),
        Record::named(4, 1, "Item 4"),
        Record::named(5, 2, "Item 5"),
    ];
    HomeState {
        selected_group_items: items[..4].to_vec(),
        group_ids: vec![1, 2],
        selected_group_id: Some(1),
        items,
        is_list_mode,
        ..HomeState::default()
    }
}

fn unreachable_config(db_path: std::path::PathBuf) -> ResolvedConfig {
    ResolvedConfig {
        endpoint_url: "http://127.0.0.1:9/hiring.json".to_string(),
        refresh_interval: Duration::from_secs(30),
        request_timeout: Duration::from_secs(2),
        db_path,
    }
}

#[test]
fn parse_watch_input_accepts_known_commands() {
    assert_eq!(
        parse_watch_input("r"),
        Some(WatchInput::Action(HomeAction::Refresh))
    );
    assert_eq!(
        parse_watch_input(" Toggle "),
        Some(WatchInput::Action(HomeAction::ToggleLayout))
    );
    assert_eq!(
        parse_watch_input("g 42"),
        Some(WatchInput::Action(HomeAction::SelectGroup(42)))
    );
    assert_eq!(parse_watch_input("q"), Some(WatchInput::Quit));
}

#[test]
fn parse_watch_input_rejects_malformed_lines() {
    assert_eq!(parse_watch_input(""), None);
    assert_eq!(parse_watch_input("g"), None);
    assert_eq!(parse_watch_input("g two"), None);
    assert_eq!(parse_watch_input("r now"), None);
    assert_eq!(parse_watch_input("x"), None);
}

#[test]
fn group_tabs_mark_selection() {
    assert_eq!(format_group_tabs(&[1, 2, 4], Some(2)), " 1  [2]  4 ");
    assert_eq!(format_group_tabs(&[1, 2], Some(99)), " 1   2 ");
    assert_eq!(format_group_tabs(&[], None), "");
}

#[test]
fn record_lines_align_ids() {
    let lines = format_record_lines(&[
        Record::named(7, 1, "Item 7"),
        Record::named(123, 1, "Item 123"),
    ]);
    assert_eq!(lines, vec!["     7  Item 7", "   123  Item 123"]);
}

#[test]
fn grid_lines_use_three_columns() {
    let state = loaded_state(false);
    let lines = format_grid_lines(&state.selected_group_items);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].matches('[').count(), 3);
    assert_eq!(lines[1].matches('[').count(), 1);
    assert!(lines[0].starts_with("[Item 1"));
}

#[test]
fn render_state_switches_layout() {
    let list = render_state(&loaded_state(true));
    assert_eq!(list[0], "5 items, list layout");
    assert_eq!(list[1], "Groups: [1]  2 ");
    assert_eq!(list.len(), 6);

    let grid = render_state(&loaded_state(false));
    assert_eq!(grid[0], "5 items, grid layout");
    assert_eq!(grid.len(), 4);
}

#[test]
fn render_state_shows_loading_and_error() {
    let state = HomeState {
        is_loading: true,
        error: Some(Arc::new(Error::Remote(RemoteError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }))),
        ..loaded_state(true)
    };
    let lines = render_state(&state);

    assert_eq!(lines[0], "5 items, list layout, refreshing...");
    assert_eq!(lines[1], "! Refresh failed: Remote returned 503: unavailable");
}

#[test]
fn render_state_empty_hints_refresh() {
    let lines = render_state(&HomeState::default());
    assert_eq!(
        lines,
        vec![
            "0 items, list layout".to_string(),
            "No items yet. Press r to refresh.".to_string(),
        ]
    );
}

#[test]
fn render_state_absent_group_has_placeholder() {
    let state = HomeState {
        selected_group_id: Some(99),
        selected_group_items: Vec::new(),
        ..loaded_state(true)
    };
    let lines = render_state(&state);
    assert_eq!(lines.last().unwrap(), "(no items in this group)");
}

#[test]
fn list_item_uses_wire_names() {
    let item = record_to_list_item(&Record::named(1, 5, "Widget"));
    assert_eq!(
        item,
        RecordListItem {
            id: 1,
            list_id: 5,
            name: "Widget".to_string(),
        }
    );
    let json = serde_json::to_string(&item).unwrap();
    assert_eq!(json, r#"{"id":1,"list_id":5,"name":"Widget"}"#);
}

#[test]
fn resolve_config_prefers_flags_over_file() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"endpoint_url": "https://file.example/items.json", "request_timeout_secs": 9}"#,
    )
    .unwrap();

    let flags = ClientConfig {
        endpoint_url: Some("https://flag.example/items.json".to_string()),
        db_path: Some(tmp.path().join("flag.db")),
        ..ClientConfig::default()
    };
    let resolved = resolve_config(flags, Some(&config_path)).unwrap();

    assert_eq!(resolved.endpoint_url, "https://flag.example/items.json");
    assert_eq!(resolved.db_path, tmp.path().join("flag.db"));
}

#[test]
fn resolve_config_reports_invalid_flags() {
    let tmp = tempdir().unwrap();
    let flags = ClientConfig {
        endpoint_url: Some("not-a-url".to_string()),
        ..ClientConfig::default()
    };
    let result = resolve_config(flags, Some(&tmp.path().join("missing.json")));
    assert!(matches!(result, Err(CliError::Config(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_layout_persists_mode() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("listsync.db");

    assert_eq!(run_layout(None, &db_path).await.unwrap(), LayoutMode::List);
    assert_eq!(
        run_layout(Some(LayoutMode::Grid), &db_path).await.unwrap(),
        LayoutMode::Grid
    );
    assert_eq!(run_layout(None, &db_path).await.unwrap(), LayoutMode::Grid);
}

#[tokio::test(flavor = "multi_thread")]
async fn run_clear_empties_cache() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("listsync.db");
    {
        let service = DatabaseService::open_path(&db_path).await.unwrap();
        service
            .record_store()
            .upsert_all(&[Record::named(1, 1, "A")])
            .await
            .unwrap();
    }

    run_clear(&db_path).await.unwrap();

    let service = DatabaseService::open_path(&db_path).await.unwrap();
    assert!(service.record_store().list_all().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn run_refresh_fails_when_remote_is_unreachable() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("listsync.db");
    {
        let service = DatabaseService::open_path(&db_path).await.unwrap();
        service
            .record_store()
            .upsert_all(&[Record::named(7, 2, "X")])
            .await
            .unwrap();
    }

    let result = run_refresh(&unreachable_config(db_path.clone())).await;
    assert!(matches!(
        result,
        Err(CliError::Core(Error::Remote(RemoteError::Http(_))))
    ));

    let service = DatabaseService::open_path(&db_path).await.unwrap();
    assert_eq!(
        service.record_store().list_all().await.unwrap(),
        vec![Record::named(7, 2, "X")]
    );
}
