//! Data models for listsync

mod record;

pub use record::{distinct_group_ids, process_records, records_in_group, Record};
