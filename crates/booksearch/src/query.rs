//! One-shot search from the command line

use anyhow::{Context, Result};
use booksearch_core::{Config, Highlighter, HttpSearchService, Match, SearchService, normalize};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Search term
    pub term: String,

    /// Print the raw matches as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: &QueryArgs, config: &Config) -> Result<()> {
    let term = normalize(&args.term);
    if term.is_empty() {
        anyhow::bail!("Search term must not be blank");
    }

    let service = HttpSearchService::from_config(config)?;
    let matches = service
        .search(&term)
        .with_context(|| format!("Search for '{}' failed", term))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("{}", "No results found".dimmed());
        return Ok(());
    }

    let highlighter = Highlighter::new(&term);
    for m in &matches {
        println!("{}", format_match(m, &highlighter));
    }
    Ok(())
}

fn format_match(m: &Match, highlighter: &Highlighter) -> String {
    let label: String = highlighter
        .segments(&m.original_entry)
        .into_iter()
        .map(|s| {
            if s.highlighted {
                s.text.yellow().bold().to_string()
            } else {
                s.text.to_string()
            }
        })
        .collect();

    let mut line = label;
    if !m.attribute.is_empty() {
        line.push_str(&format!("  {}", m.attribute.dimmed()));
    }
    if let Some(id) = m.record_id {
        line.push_str(&format!(" {}", format!("#{id}").dimmed()));
    }
    line
}
