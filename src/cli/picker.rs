//! Interactive dataset picker.
//!
//! Used when `bikedash tui` is started without a resolvable data file. The
//! picker lists `*.csv` files under the current directory whose header row
//! carries the required dashboard columns, and lets the user choose one.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::data::dataset::REQUIRED_FIELDS;
use crate::error::AppError;

/// Directory recursion depth for finding CSV files.
const SEARCH_DEPTH: usize = 3;

/// Prompt the user to pick a dataset from the current directory tree.
///
/// Accepts a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_dataset() -> Result<PathBuf, AppError> {
    let files = discover_datasets(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No bike-rental CSV found. Pass one with `--data <file.csv>` or set BIKEDASH_DATA.",
        ));
    }

    println!("Found {} dataset(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    let stdin = io::stdin();
    loop {
        print!("Select a dataset (1-{}), type a path, or q to quit: ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut input)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::new(2, "No input received."));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return Ok(files[choice - 1].clone());
            }
            println!("Invalid choice: {choice}.");
            continue;
        }

        match validate_dataset_path(Path::new(input)) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Check that `path` is an existing `.csv` file.
pub fn validate_dataset_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(2, format!("Data file not found: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file, got: {}", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// CSV files under `root` whose header names every required column.
pub fn discover_datasets(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out.retain(|p| header_looks_valid(p));
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !matches!(name, ".git" | "target") {
                walk(&path, depth + 1, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn header_looks_valid(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut first = String::new();
    if BufReader::new(file).read_line(&mut first).is_err() {
        return false;
    }
    let headers: Vec<&str> = first
        .split(',')
        .map(|h| h.trim().trim_start_matches('\u{feff}').trim_matches('"'))
        .collect();
    REQUIRED_FIELDS.iter().all(|r| headers.contains(r))
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn pretty_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}
