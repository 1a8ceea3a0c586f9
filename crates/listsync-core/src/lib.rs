//! listsync-core - Core library for listsync
//!
//! This crate contains the record model, the libSQL-backed local store, the
//! HTTP remote source, the offline-first sync repository and the view-state
//! controller shared by every listsync front end.

pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod sync;
pub mod util;

#[cfg(test)]
mod testing;

pub use controller::{ControllerOptions, HomeController};
pub use error::{Error, Result};
pub use models::Record;
pub use remote::{HttpRemoteSource, RemoteError, RemoteSource};
pub use state::{HomeAction, HomeState};
pub use sync::SyncRepository;
