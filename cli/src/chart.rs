use anyhow::Result;
use colored::{ColoredString, Colorize};

use latin_library_backend::db::DatabaseHandle;
use latin_library_backend::query::{usage_by_book, BookUsage};
use latin_library_backend::AppPaths;

use crate::search::latin_term;

/// Width of the longest bar in characters.
const BAR_WIDTH: usize = 40;

fn color_for(title: &str, text: &str) -> ColoredString {
    match title {
        "Cassiodorus" => text.red(),
        "Statius" => text.green(),
        "Vergil" => text.blue(),
        "Silius" => text.yellow(),
        _ => text.normal(),
    }
}

/// Horizontal bars of per-book counts, longest first, coloured by collection.
pub fn render_usage_chart(term: &str, usage: &[BookUsage]) -> String {
    if usage.is_empty() {
        return "No Results\n".to_string();
    }

    let max_count = usage.iter().map(|u| u.count).max().unwrap_or(1).max(1);
    let label_width = usage.iter().map(|u| u.book.chars().count()).max().unwrap_or(0);

    let mut s = format!("Usage of '{}' by book\n", term);
    for u in usage {
        let len = ((u.count as usize * BAR_WIDTH) / max_count as usize).max(1);
        let bar = color_for(&u.title, &"#".repeat(len));
        s.push_str(&format!("{:<width$} | {} {}\n", u.book, bar, u.count, width = label_width));
    }

    let legend: Vec<String> = ["Cassiodorus", "Statius", "Vergil", "Silius"]
        .iter()
        .map(|t| color_for(t, t).to_string())
        .collect();
    s.push_str(&format!("\n{}\n", legend.join("  ")));
    s
}

pub fn chart_db(handle: &DatabaseHandle, term: &str, english: bool) -> Result<String> {
    let latin = latin_term(term, english)?;
    let usage = handle.do_read(|conn| usage_by_book(conn, &latin))?;
    Ok(render_usage_chart(&latin, &usage))
}

pub fn run_chart(paths: &AppPaths, term: &str, english: bool) -> Result<()> {
    let handle = DatabaseHandle::open(&paths.db_path)?;
    print!("{}", chart_db(&handle, term, english)?);
    Ok(())
}
