use std::io::{self, BufRead, Write};

use anyhow::Result;

use latin_library_backend::db::DatabaseHandle;
use latin_library_backend::logger;
use latin_library_backend::AppPaths;

use crate::chart::chart_db;
use crate::search::search_db;

const MENU: &str = "
1. Search for a Latin term
2. Search for an English term
3. Chart usage of a Latin term
4. Chart usage of an English term
5. Quit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SearchLatin,
    SearchEnglish,
    ChartLatin,
    ChartEnglish,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::SearchLatin),
            "2" => Some(MenuChoice::SearchEnglish),
            "3" => Some(MenuChoice::ChartLatin),
            "4" => Some(MenuChoice::ChartEnglish),
            "5" => Some(MenuChoice::Quit),
            _ => None,
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            MenuChoice::SearchLatin | MenuChoice::ChartLatin => "Enter a Latin search term: ",
            MenuChoice::SearchEnglish | MenuChoice::ChartEnglish => "Enter an English search term: ",
            MenuChoice::Quit => "",
        }
    }
}

/// Print a prompt and read one line, None at end of input.
fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// The menu loop. `on_choice` runs a choice on a term and returns the text to show.
pub fn menu_loop<R, W, F>(input: &mut R, output: &mut W, mut on_choice: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(MenuChoice, &str) -> Result<String>,
{
    loop {
        let Some(line) = read_line(input, output, &format!("{}\nChoose an option: ", MENU))? else {
            return Ok(());
        };

        let choice = match MenuChoice::parse(&line) {
            Some(MenuChoice::Quit) => return Ok(()),
            Some(c) => c,
            None => {
                writeln!(output, "Invalid option: {}", line)?;
                continue;
            }
        };

        let Some(term) = read_line(input, output, choice.prompt())? else {
            return Ok(());
        };

        // A failed lookup is reported and the menu is shown again.
        match on_choice(choice, &term) {
            Ok(text) => write!(output, "{}", text)?,
            Err(e) => {
                logger::error(&format!("{:?} '{}' failed: {}", choice, term, e));
                writeln!(output, "Error: {}", e)?;
            }
        }
    }
}

pub fn run(paths: &AppPaths) -> Result<()> {
    let handle = DatabaseHandle::open(&paths.db_path)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    menu_loop(&mut input, &mut output, |choice, term| match choice {
        MenuChoice::SearchLatin => search_db(&handle, term, false),
        MenuChoice::SearchEnglish => search_db(&handle, term, true),
        MenuChoice::ChartLatin => chart_db(&handle, term, false),
        MenuChoice::ChartEnglish => chart_db(&handle, term, true),
        MenuChoice::Quit => Ok(String::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> (Vec<(MenuChoice, String)>, String) {
        let mut input = io::Cursor::new(script.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        let mut calls: Vec<(MenuChoice, String)> = Vec::new();

        menu_loop(&mut input, &mut output, |choice, term| {
            calls.push((choice, term.to_string()));
            Ok(format!("result for {}\n", term))
        }).unwrap();

        (calls, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(MenuChoice::parse(" 1\n"), Some(MenuChoice::SearchLatin));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::ChartEnglish));
        assert_eq!(MenuChoice::parse("5"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_menu_loop_until_quit() {
        let (calls, output) = run_script("1\narma\n7\n2\nwar\n5\n3\nnever\n");

        assert_eq!(
            calls,
            vec![
                (MenuChoice::SearchLatin, "arma".to_string()),
                (MenuChoice::SearchEnglish, "war".to_string()),
            ]
        );
        assert!(output.contains("Enter a Latin search term: result for arma"));
        assert!(output.contains("Invalid option: 7"));
        assert!(output.contains("Enter an English search term: result for war"));
    }

    #[test]
    fn test_menu_loop_ends_at_end_of_input() {
        let (calls, _) = run_script("3\n");
        assert!(calls.is_empty());
    }
}
