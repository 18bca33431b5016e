use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};

use latin_library_backend::aggregator::{parse_all_with, Aggregate, CollectionOutcome};
use latin_library_backend::collections::all_collections;
use latin_library_backend::db::{insert_records, rebuild_fts_index, recreate_database, DatabaseHandle};
use latin_library_backend::logger::{self, format_duration};
use latin_library_backend::page_source::MirrorDirSource;
use latin_library_backend::validation::check_records;
use latin_library_backend::AppPaths;

/// Parse every collection from the mirror, reporting each as it finishes.
fn parse_mirror(mirror_dir: &Path) -> Result<Aggregate> {
    if !mirror_dir.is_dir() {
        anyhow::bail!(
            "Mirror directory not found: {}. Run the fetch command first.",
            mirror_dir.display()
        );
    }

    let source = MirrorDirSource::new(mirror_dir);
    let configs = all_collections();

    let pb = ProgressBar::new(configs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let aggregate = parse_all_with(&source, &configs, |config, outcome| {
        pb.set_message(config.slug.to_string());
        match outcome {
            CollectionOutcome::Parsed(records) => {
                logger::info(&format!("Parsed {}: {} records", config.slug, records.len()));
            }
            CollectionOutcome::Failed(e) => {
                logger::error(&format!("Failed to parse {}: {}", config.slug, e));
            }
        }
        pb.inc(1);
    });

    pb.finish_with_message("Parsing complete");

    let violations = check_records(&aggregate.records, Some(aggregate.walked_links.as_slice()));
    for v in violations.iter() {
        logger::warn(&v.to_string());
    }
    if !violations.is_empty() {
        logger::warn(&format!("{} record invariant violations", violations.len()));
    }

    Ok(aggregate)
}

pub fn bootstrap(paths: &AppPaths, allow_partial: bool) -> Result<()> {
    logger::info("=== bootstrap() ===");
    let start_time: DateTime<Local> = Local::now();

    let aggregate = parse_mirror(&paths.mirror_dir)?;

    if !aggregate.is_complete() {
        let slugs: Vec<&str> = aggregate.failures.iter().map(|f| f.slug.as_str()).collect();
        if !allow_partial {
            anyhow::bail!(
                "Collections failed to parse: {}. Use --allow-partial to write the others.",
                slugs.join(", ")
            );
        }
        logger::warn(&format!("Writing without: {}", slugs.join(", ")));
    }

    logger::info(&format!("Recreating database: {}", paths.db_path.display()));
    drop(recreate_database(&paths.db_path)?);

    let handle = DatabaseHandle::open(&paths.db_path)?;
    let inserted = handle.do_write(|conn| {
        let inserted = insert_records(conn, &aggregate.records)?;
        let indexed = rebuild_fts_index(conn)?;
        logger::info(&format!("Indexed {} passages", indexed));
        Ok(inserted)
    })?;

    let end_time = Local::now();
    let duration = (end_time - start_time).to_std().unwrap_or_default();

    let msg = format!(
r#"
======
Bootstrap started: {}
Bootstrap ended:   {}
Records:           {}
Duration:          {}
"#,
        start_time.format("%Y-%m-%d %H:%M:%S"),
        end_time.format("%Y-%m-%d %H:%M:%S"),
        inserted,
        format_duration(duration)
    );

    logger::info(&msg);
    logger::info(&format!("Log: {}", logger::log_file_path().display()));

    Ok(())
}

/// Write the parsed records as JSON lines, to stdout when no output is given.
pub fn export(paths: &AppPaths, output: Option<&Path>) -> Result<()> {
    let aggregate = parse_mirror(&paths.mirror_dir)?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for record in aggregate.records.iter() {
        let line = serde_json::to_string(record).context("Failed to serialize record")?;
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        logger::info(&format!("Wrote {} records to {}", aggregate.records.len(), path.display()));
    }
    for f in aggregate.failures.iter() {
        logger::warn(&format!("Not exported, {} failed: {}", f.slug, f.error));
    }

    Ok(())
}
