use std::path::Path;

use listsync_core::models::{process_records, records_in_group};

use crate::commands::common::{
    format_record_lines, open_service, record_to_list_item, RecordListItem,
};
use crate::error::CliError;

pub async fn run_list(group: Option<i64>, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let service = open_service(db_path).await?;
    let mut records = process_records(service.record_store().list_all().await?);
    if group.is_some() {
        records = records_in_group(&records, group);
    }

    if as_json {
        let json_items = records
            .iter()
            .map(record_to_list_item)
            .collect::<Vec<RecordListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No cached records. Run `listsync refresh` to fetch them.");
        return Ok(());
    }

    let mut current_group = None;
    for record in &records {
        if current_group != Some(record.group_id) {
            current_group = Some(record.group_id);
            println!("List {}", record.group_id);
        }
        for line in format_record_lines(std::slice::from_ref(record)) {
            println!("{line}");
        }
    }

    Ok(())
}
