use crate::error::{GroundworkError, Result};
use std::path::Path;
use std::process::Command;

/// Result of probing the package database for one candidate name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Directly installable under its own name.
    Installable,
    /// Virtual or renamed package; install the named provider instead.
    Virtual(String),
    /// Nothing installable under this name.
    Unknown,
}

/// Package-manager capability behind the resolution algorithm.
///
/// Keeping the process invocations behind this trait lets resolution run
/// against a fake backend with canned probe answers in tests.
pub trait PackageBackend {
    /// Refresh the package index. A failure here is fatal to the whole
    /// install operation.
    fn refresh_index(&self) -> Result<()>;

    /// Probe one candidate name. Probe failures are per-candidate and
    /// non-fatal, so this never errors; anything unprobeable is `Unknown`.
    fn probe(&self, name: &str) -> Probe;

    /// Install the whole resolved set in one batch.
    fn install(&self, packages: &[String]) -> Result<()>;
}

/// `apt-get` backend for Debian-based hosts.
pub struct Apt;

impl Apt {
    pub fn new() -> Result<Self> {
        which::which("apt-get").map_err(|_| GroundworkError::ToolNotFound {
            name: "apt-get".to_string(),
        })?;
        Ok(Apt)
    }
}

impl PackageBackend for Apt {
    fn refresh_index(&self) -> Result<()> {
        println!("Updating package index...");
        run_apt(&["update".to_string()])
    }

    fn probe(&self, name: &str) -> Probe {
        // `-s` simulates the install, which surfaces renames and
        // single-provider virtual packages without touching the system.
        let output = match Command::new("apt-get")
            .args(["install", "-s", name])
            .output()
        {
            Ok(output) => output,
            Err(_) => return Probe::Unknown,
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            if let Some(provider) = parse_selected_instead(&stdout, name) {
                return Probe::Virtual(provider);
            }
            return Probe::Installable;
        }

        // A virtual package with several providers makes the simulation
        // fail but lists the providers; take the first one.
        let stderr = String::from_utf8_lossy(&output.stderr);
        match parse_virtual_provider(&stdout).or_else(|| parse_virtual_provider(&stderr)) {
            Some(provider) => Probe::Virtual(provider),
            None => Probe::Unknown,
        }
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        let mut args = vec!["install".to_string(), "-y".to_string()];
        args.extend(packages.iter().cloned());
        run_apt(&args)
    }
}

fn run_apt(args: &[String]) -> Result<()> {
    let status = Command::new("apt-get").args(args).status()?;
    if !status.success() {
        return Err(GroundworkError::CommandFailed {
            command: format!("apt-get {}", args.join(" ")),
            status: status.code(),
        });
    }
    Ok(())
}

// "Note, selecting 'libfoo2' instead of 'libfoo'"
fn parse_selected_instead(output: &str, requested: &str) -> Option<String> {
    let suffix = format!("instead of '{requested}'");
    for line in output.lines() {
        let line = line.trim();
        if !line.contains(&suffix) {
            continue;
        }
        if let Some(rest) = line.strip_prefix("Note, selecting '") {
            if let Some(end) = rest.find('\'') {
                return Some(rest[..end].to_string());
            }
        }
    }
    None
}

// "Package libfoo is a virtual package provided by:" followed by an
// indented provider listing, one "name version" per line.
fn parse_virtual_provider(output: &str) -> Option<String> {
    let mut lines = output.lines();
    while let Some(line) = lines.next() {
        if line.contains("is a virtual package provided by") {
            return lines.find_map(|candidate| {
                candidate
                    .split_whitespace()
                    .next()
                    .map(|name| name.to_string())
            });
        }
    }
    None
}

/// Parse one line of a dependency file into its alternate candidates.
///
/// Strips a parenthesized version constraint, splits alternates on `|`, and
/// returns `None` for blank lines and `#` comments.
pub fn parse_specifier(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut cleaned = String::with_capacity(line.len());
    let mut depth = 0usize;
    for ch in line.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => cleaned.push(ch),
            _ => {}
        }
    }

    let candidates: Vec<String> = cleaned
        .split('|')
        .map(|candidate| candidate.trim().to_string())
        .filter(|candidate| !candidate.is_empty())
        .collect();

    if candidates.is_empty() {
        None
    } else {
        Some(candidates)
    }
}

/// Resolve one specifier's alternates in order; the first installable
/// candidate wins, and a virtual candidate resolves to its provider.
pub fn resolve_candidates(candidates: &[String], backend: &dyn PackageBackend) -> Option<String> {
    for candidate in candidates {
        match backend.probe(candidate) {
            Probe::Installable => return Some(candidate.clone()),
            Probe::Virtual(provider) => {
                println!("Package {candidate} is virtual, installing {provider} instead");
                return Some(provider);
            }
            Probe::Unknown => {}
        }
    }
    None
}

/// Resolve every specifier in `path` against `backend`, in file order.
///
/// Lines with no installable alternate get a printed warning and are
/// dropped; they never abort resolution of the remaining lines. Repeats are
/// passed through verbatim.
pub fn resolve_file(path: &Path, backend: &dyn PackageBackend) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let mut resolved = Vec::new();

    for line in content.lines() {
        let Some(candidates) = parse_specifier(line) else {
            continue;
        };
        match resolve_candidates(&candidates, backend) {
            Some(name) => resolved.push(name),
            None => println!(
                "Warning: no installable candidate for '{}', skipping",
                line.trim()
            ),
        }
    }

    Ok(resolved)
}

/// Refresh the index, resolve every specifier in `path`, and install the
/// resolved set in one batch. Only the index refresh and the batch install
/// can fail the operation.
pub fn install_from_file(path: &Path, backend: &dyn PackageBackend) -> Result<()> {
    backend.refresh_index()?;

    let resolved = resolve_file(path, backend)?;
    if resolved.is_empty() {
        println!("No installable packages found in {}", path.display());
        return Ok(());
    }

    println!(
        "Installing {} package(s): {}",
        resolved.len(),
        resolved.join(" ")
    );
    backend.install(&resolved)
}
