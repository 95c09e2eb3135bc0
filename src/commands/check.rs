use crate::core::paths::{check_paths, PathFault, PathReport};
use crate::error::Result;
use crate::utils::fs::expand_tilde;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct JsonReport<'a> {
    clean: bool,
    faults: &'a [PathFault],
}

/// Run the path scan and print the report in the requested format.
///
/// Detected faults are part of the report, not errors; the returned
/// `Result` only covers input handling and output serialization.
pub fn check_environment(
    dirs: &[String],
    files: &[String],
    create_dirs: bool,
    create_files: bool,
    format: &str,
) -> Result<PathReport> {
    let dirs = expand_all(dirs)?;
    let files = expand_all(files)?;

    let report = check_paths(&dirs, &files, create_dirs, create_files);

    if format == "json" {
        let body = serde_json::to_string_pretty(&JsonReport {
            clean: report.is_clean(),
            faults: report.faults(),
        })?;
        println!("{body}");
    } else {
        match report.to_message() {
            None => println!("All paths ok"),
            Some(message) => println!("{message}"),
        }
    }

    Ok(report)
}

fn expand_all(paths: &[String]) -> Result<Vec<PathBuf>> {
    paths.iter().map(|p| expand_tilde(p)).collect()
}
