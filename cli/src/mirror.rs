use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use latin_library_backend::collections::{all_collections, CollectionConfig};
use latin_library_backend::logger;
use latin_library_backend::mirror::{fetch_collection, http_client, verify_mirror};

pub fn fetch(mirror_dir: &Path, configs: &[CollectionConfig]) -> Result<()> {
    logger::info("=== fetch() ===");
    let client = http_client()?;

    for config in configs {
        let pb = ProgressBar::new(config.expected_books as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message(config.slug.to_string());

        let report = fetch_collection(&client, config, mirror_dir, |_| pb.inc(1))?;
        pb.finish_and_clear();

        logger::info(&format!(
            "Fetched {}: {} book pages, index at {}",
            report.slug,
            report.book_pages,
            report.index_path.display()
        ));
    }

    Ok(())
}

pub fn verify(mirror_dir: &Path) -> Result<()> {
    let mut incomplete = 0;

    for config in all_collections() {
        let check = verify_mirror(mirror_dir, &config);
        let status = if check.is_complete() {
            "ok".green()
        } else {
            incomplete += 1;
            "incomplete".red()
        };
        let index = if check.has_index { "index found" } else { "index missing" };
        println!(
            "{:<12} {}/{} book pages, {}: {}",
            check.slug, check.found_books, check.expected_books, index, status
        );
    }

    if incomplete > 0 {
        anyhow::bail!("{} collections are incompletely mirrored in {}", incomplete, mirror_dir.display());
    }
    Ok(())
}
