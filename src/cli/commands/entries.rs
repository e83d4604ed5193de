use serde_json::json;

use crate::cli::client::AdminClient;
use crate::cli::utils::{output_entries, output_success};
use crate::cli::{Commands, OutputFormat};
use crate::guestbook::AdminEntry;

pub async fn handle(cmd: Commands, client: &AdminClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        Commands::List { pending, deleted } => {
            let entries = filter_entries(client.list().await?, pending, deleted);
            output_entries(&output_format, &entries)
        }
        Commands::Approve { key } => {
            client.update(&key, true).await?;
            output_success(&output_format, &format!("Approved entry '{}'", key), Some(json!({ "key": key })))
        }
        Commands::Undelete { key } => {
            client.update(&key, false).await?;
            output_success(&output_format, &format!("Restored entry '{}'", key), Some(json!({ "key": key })))
        }
        Commands::Delete { key, hard } => {
            client.delete(&key, hard).await?;
            let verb = if hard { "Permanently deleted" } else { "Deleted" };
            output_success(
                &output_format,
                &format!("{} entry '{}'", verb, key),
                Some(json!({ "key": key, "hard": hard })),
            )
        }
    }
}

/// With neither flag set every entry is kept; otherwise an entry matching
/// any requested state is kept
pub fn filter_entries(entries: Vec<AdminEntry>, pending: bool, deleted: bool) -> Vec<AdminEntry> {
    if !pending && !deleted {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| (pending && e.entry.needs_approval) || (deleted && e.entry.deleted))
        .collect()
}
