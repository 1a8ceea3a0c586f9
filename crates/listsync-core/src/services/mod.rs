//! Shared services used by listsync clients

mod database;
mod preference_store;
mod record_store;

pub use database::DatabaseService;
pub use preference_store::{LayoutModeStream, PreferenceStore};
pub use record_store::{RecordStore, RecordStream};
