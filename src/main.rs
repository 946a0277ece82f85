//! String table tooling for the SoLoud audio engine Script Canvas nodes.
//!
//! Usage:
//!   scriptcanvas-strings validate [--strict]   # Check uniqueness and hierarchy
//!   scriptcanvas-strings lookup <id>...        # Print display strings
//!   scriptcanvas-strings list <context>        # Print a context's entries in order
//!   scriptcanvas-strings contexts              # Print context names
//!   scriptcanvas-strings stats                 # Translation coverage as JSON
//!   scriptcanvas-strings coverage              # Reflected names missing from the table
//!   scriptcanvas-strings export                # Regenerate the bus context
//!   scriptcanvas-strings format                # Re-serialize in normalized form
//!
//! Optional environment variables:
//! - SCRIPT_STRINGS_TABLE (defaults to the bundled table)
//! - SCRIPT_STRINGS_STRICT (defaults to false)

use anyhow::{bail, Result};
use scriptcanvas_strings::config::Config;
use scriptcanvas_strings::i18n::format::write_document;
use scriptcanvas_strings::i18n::{StringTable, TableRegistry, TableStats, TableValidator};
use scriptcanvas_strings::reflect::BusDescriptor;
use tracing::{info, warn};

const USAGE: &str = "Usage: scriptcanvas-strings <validate [--strict] | lookup <id>... | list <context> | contexts | stats | coverage | export | format>";

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging (stderr, so stdout stays machine-readable)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scriptcanvas_strings=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let table = match &config.table_path {
        Some(path) => TableRegistry::install_from(path)?,
        None => TableRegistry::get(),
    };

    let ok = match command.as_str() {
        "validate" => validate(table, config.strict || rest.iter().any(|a| a == "--strict")),
        "lookup" => lookup(table, rest)?,
        "list" => list(table, rest)?,
        "contexts" => {
            for context in table.contexts() {
                println!("{}\t{}", context.name, context.entries.len());
            }
            true
        }
        "stats" => {
            println!("{}", serde_json::to_string_pretty(&TableStats::collect(table))?);
            true
        }
        "coverage" => coverage(table)?,
        "export" => {
            print!("{}", export(table));
            true
        }
        "format" => {
            print!("{}", table.to_xml());
            true
        }
        other => {
            eprintln!("Unknown command: {}\n{}", other, USAGE);
            std::process::exit(2);
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn validate(table: &StringTable, strict: bool) -> bool {
    let report = TableValidator::validate(table.document());

    for violation in &report.violations {
        println!("error: {}", violation);
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    info!(
        "Validated {} entries: {} violation(s), {} warning(s)",
        table.len(),
        report.violations.len(),
        report.warnings.len()
    );

    report.passes(strict)
}

fn lookup(table: &StringTable, ids: &[String]) -> Result<bool> {
    if ids.is_empty() {
        bail!("lookup needs at least one id");
    }

    let mut all_found = true;
    for id in ids {
        if table.get(id).is_none() {
            warn!("Id {} is not in the table, showing it as is", id);
            all_found = false;
        }
        println!("{}", table.lookup(id));
    }
    Ok(all_found)
}

fn list(table: &StringTable, args: &[String]) -> Result<bool> {
    let Some(context) = args.first() else {
        bail!("list needs a context name (e.g. \"EBus: AudioEngineSoLoudRequestBus\")");
    };

    let entries = table.entries_for(context);
    if entries.is_empty() {
        warn!("Context '{}' has no entries", context);
        return Ok(false);
    }

    for entry in entries {
        println!("{}\t{}", entry.id, entry.display_text());
    }
    Ok(true)
}

fn coverage(table: &StringTable) -> Result<bool> {
    let bus = BusDescriptor::audio_engine_soloud();
    let missing: Vec<String> = bus
        .missing_names(table)
        .iter()
        .map(|id| id.to_string())
        .collect();

    println!("{}", serde_json::to_string_pretty(&missing)?);
    if !missing.is_empty() {
        warn!("{} reflected name(s) have no entry", missing.len());
    }
    Ok(missing.is_empty())
}

/// Table with the bus context regenerated from the reflected bus.
fn export(table: &StringTable) -> String {
    write_document(&BusDescriptor::audio_engine_soloud().export_into(table))
}
