//! Fetch a single record by id

use anyhow::{Context, Result};
use booksearch_core::{Config, DetailRecord, HttpSearchService, RecordId, SearchService};
use clap::Args;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Record id, as shown by `booksearch query`
    pub id: RecordId,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: &GetArgs, config: &Config) -> Result<()> {
    let service = HttpSearchService::from_config(config)?;
    let record = service
        .fetch_detail(args.id)
        .with_context(|| format!("Failed to fetch record {}", args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        for line in format_record(&record) {
            println!("{line}");
        }
    }
    Ok(())
}

/// One `key  value` line per attribute, keys padded to a common width
fn format_record(record: &DetailRecord) -> Vec<String> {
    let width = record.keys().map(|k| k.width()).max().unwrap_or(0);
    record
        .iter()
        .map(|(key, value)| {
            let pad = " ".repeat(width - key.width());
            format!("{}{}  {}", key.bold(), pad, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_record_alignment() {
        colored::control::set_override(false);
        let record = BTreeMap::from([
            ("Title".to_string(), "Dune".to_string()),
            ("Authors".to_string(), "Frank Herbert".to_string()),
        ]);
        assert_eq!(
            format_record(&record),
            vec!["Authors  Frank Herbert", "Title    Dune"]
        );
    }
}
