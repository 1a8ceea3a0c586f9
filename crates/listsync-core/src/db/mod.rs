//! Database layer for listsync

mod connection;
mod migrations;
mod record_repository;
mod settings_repository;

pub use connection::Database;
pub use record_repository::{LibSqlRecordRepository, RecordRepository};
pub use settings_repository::{
    LibSqlSettingsRepository, SettingsRepository, DEFAULT_LIST_MODE, LIST_MODE_KEY,
};
