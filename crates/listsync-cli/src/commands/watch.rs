use listsync_core::config::ResolvedConfig;
use listsync_core::{HomeAction, HomeController, HomeState};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::common::{build_repository, open_service, render_state};
use crate::error::CliError;

pub const WATCH_HELP: &str = "Commands: r = refresh, t = toggle layout, g <id> = select group, q = quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchInput {
    Action(HomeAction),
    Quit,
}

/// Parse one line typed while watching. `None` for anything unrecognised.
pub fn parse_watch_input(line: &str) -> Option<WatchInput> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_ascii_lowercase();
    let argument = parts.next();
    if parts.next().is_some() {
        return None;
    }

    match (command.as_str(), argument) {
        ("r" | "refresh", None) => Some(WatchInput::Action(HomeAction::Refresh)),
        ("t" | "toggle", None) => Some(WatchInput::Action(HomeAction::ToggleLayout)),
        ("g" | "group", Some(id)) => id
            .parse::<i64>()
            .ok()
            .map(|id| WatchInput::Action(HomeAction::SelectGroup(id))),
        ("q" | "quit" | "exit", None) => Some(WatchInput::Quit),
        _ => None,
    }
}

fn print_state(state: &HomeState) {
    println!();
    println!("-- {} --", chrono::Local::now().format("%H:%M:%S"));
    for line in render_state(state) {
        println!("{line}");
    }
}

pub async fn run_watch(config: &ResolvedConfig) -> Result<(), CliError> {
    let service = open_service(&config.db_path).await?;
    let repository = build_repository(config, &service)?;
    let controller = HomeController::start(
        repository,
        service.preference_store(),
        config.controller_options()?,
    )
    .await;

    println!("{WATCH_HELP}");
    let mut states = controller.subscribe();
    let initial = states.borrow_and_update().clone();
    print_state(&initial);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                print_state(&state);
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match parse_watch_input(&line) {
                        Some(WatchInput::Quit) => break,
                        Some(WatchInput::Action(action)) => controller.dispatch(action),
                        None if line.trim().is_empty() => {}
                        None => eprintln!("{WATCH_HELP}"),
                    },
                    None => stdin_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    controller.shutdown();
    Ok(())
}
