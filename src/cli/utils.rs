use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::guestbook::AdminEntry;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(obj) = response.as_object_mut() {
                    obj.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an entry listing in the appropriate format
pub fn output_entries(output_format: &OutputFormat, entries: &[AdminEntry]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No entries");
            }
            for entry in entries {
                println!("{}", format_entry_line(entry));
            }
        }
    }
    Ok(())
}

/// One-line summary: key, timestamp, state, author and remark
pub fn format_entry_line(entry: &AdminEntry) -> String {
    let e = &entry.entry;
    let state = match (e.deleted, e.needs_approval) {
        (true, _) => "deleted",
        (false, true) => "pending",
        (false, false) => "public",
    };

    let mut line = format!("{}  {}  [{}]  {} ({})", entry.key, e.timestamp, state, e.name, e.ip);
    if !e.remarks.is_empty() {
        line.push_str(": ");
        line.push_str(&e.remarks);
    }
    line
}
