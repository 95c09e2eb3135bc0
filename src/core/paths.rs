use crate::utils::fs::{is_executable, is_readable, is_writable};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of a path scan.
///
/// `Clean` carries nothing; `Faulted` carries one record per detected issue,
/// in input order: all directory faults first, then file faults, each list
/// preserving the order the paths were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathReport {
    Clean,
    Faulted(Vec<PathFault>),
}

impl PathReport {
    pub fn is_clean(&self) -> bool {
        matches!(self, PathReport::Clean)
    }

    /// Newline-joined report, one line per fault. `None` when clean.
    pub fn to_message(&self) -> Option<String> {
        match self {
            PathReport::Clean => None,
            PathReport::Faulted(faults) => Some(
                faults
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }

    pub fn faults(&self) -> &[PathFault] {
        match self {
            PathReport::Clean => &[],
            PathReport::Faulted(faults) => faults,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathFault {
    pub path: PathBuf,
    pub kind: FaultKind,
}

impl PathFault {
    fn new(path: &Path, kind: FaultKind) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    MissingDirectory,
    MissingParent,
    MissingFile,
    NotReadable,
    NotWritable,
    NotExecutable,
    Io { message: String },
}

impl fmt::Display for PathFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.kind {
            FaultKind::MissingDirectory => write!(f, "Directory does not exist: {path}"),
            FaultKind::MissingParent => write!(f, "Parent directory does not exist: {path}"),
            FaultKind::MissingFile => write!(f, "File does not exist: {path}"),
            FaultKind::NotReadable => write!(f, "Path not readable: {path}"),
            FaultKind::NotWritable => write!(f, "Path not writable: {path}"),
            FaultKind::NotExecutable => write!(f, "Path not executable: {path}"),
            FaultKind::Io { message } => write!(f, "Error while checking {path}: {message}"),
        }
    }
}

/// Validate `dirs` for existence and read/write access and `files` for
/// existence and read/write/execute access, optionally creating missing
/// entries.
///
/// Each entry is processed independently: an unexpected I/O failure on one
/// path becomes a fault record for that path and never aborts the scan of
/// the remaining entries.
pub fn check_paths(
    dirs: &[PathBuf],
    files: &[PathBuf],
    create_dirs: bool,
    create_files: bool,
) -> PathReport {
    let mut faults = Vec::new();

    for dir in dirs {
        check_directory(dir, create_dirs, &mut faults);
    }
    for file in files {
        check_file(file, create_files, &mut faults);
    }

    if faults.is_empty() {
        PathReport::Clean
    } else {
        PathReport::Faulted(faults)
    }
}

fn check_directory(path: &Path, create: bool, faults: &mut Vec<PathFault>) {
    if !path.exists() {
        if !create {
            faults.push(PathFault::new(path, FaultKind::MissingDirectory));
            return;
        }
        if let Err(e) = std::fs::create_dir_all(path) {
            faults.push(PathFault::new(
                path,
                FaultKind::Io {
                    message: e.to_string(),
                },
            ));
            return;
        }
    }

    // Both access checks run even when the first one fails.
    if !is_readable(path) {
        faults.push(PathFault::new(path, FaultKind::NotReadable));
    }
    if !is_writable(path) {
        faults.push(PathFault::new(path, FaultKind::NotWritable));
    }
}

fn check_file(path: &Path, create: bool, faults: &mut Vec<PathFault>) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !parent.exists() {
        if !create {
            faults.push(PathFault::new(path, FaultKind::MissingParent));
            return;
        }
        if let Err(e) = std::fs::create_dir_all(&parent) {
            faults.push(PathFault::new(
                path,
                FaultKind::Io {
                    message: e.to_string(),
                },
            ));
            return;
        }
    }

    if !path.exists() {
        if !create {
            faults.push(PathFault::new(path, FaultKind::MissingFile));
            return;
        }
        if let Err(e) = touch(path) {
            faults.push(PathFault::new(
                path,
                FaultKind::Io {
                    message: e.to_string(),
                },
            ));
            return;
        }
    }

    if !is_readable(path) {
        faults.push(PathFault::new(path, FaultKind::NotReadable));
    }
    if !is_writable(path) {
        faults.push(PathFault::new(path, FaultKind::NotWritable));
    }
    if !is_executable(path) {
        faults.push(PathFault::new(path, FaultKind::NotExecutable));
    }
}

// Provisioned files get full owner access so a rerun of the same scan
// passes the read/write/execute checks.
fn touch(path: &Path) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.append(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o755);
    }

    options.open(path).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn existing_writable_directories_are_clean() {
        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a");
        let b = root.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();

        let report = check_paths(&[a, b], &[], false, false);
        assert_eq!(report, PathReport::Clean);
        assert!(report.to_message().is_none());
    }

    #[test]
    fn empty_lists_are_vacuously_clean() {
        let report = check_paths(&[], &[], false, false);
        assert!(report.is_clean());
    }

    #[test]
    fn missing_directory_without_provisioning_is_one_fault() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");

        let report = check_paths(&[missing.clone()], &[], false, false);
        assert_eq!(
            report.faults(),
            &[PathFault {
                path: missing,
                kind: FaultKind::MissingDirectory,
            }]
        );
    }

    #[test]
    fn missing_parent_skips_remaining_file_checks() {
        let root = tempfile::tempdir().unwrap();
        let orphan = root.path().join("no-parent/child.txt");

        let report = check_paths(&[], &[orphan.clone()], false, false);
        assert_eq!(
            report.faults(),
            &[PathFault {
                path: orphan,
                kind: FaultKind::MissingParent,
            }]
        );
    }

    #[test]
    fn missing_file_with_existing_parent_is_one_fault() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("absent.txt");

        let report = check_paths(&[], &[file.clone()], false, false);
        assert_eq!(
            report.faults(),
            &[PathFault {
                path: file,
                kind: FaultKind::MissingFile,
            }]
        );
    }

    #[cfg(unix)]
    #[test]
    fn provisioning_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("made/deeply");
        let file = root.path().join("made/deeper/file.txt");

        let first = check_paths(
            std::slice::from_ref(&dir),
            std::slice::from_ref(&file),
            true,
            true,
        );
        assert!(dir.is_dir());
        assert!(file.is_file());
        assert_eq!(first, PathReport::Clean);

        let second = check_paths(&[dir], &[file], true, true);
        assert_eq!(second, PathReport::Clean);
    }

    #[cfg(unix)]
    #[test]
    fn faults_are_reported_in_input_order() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let a = root.path().join("a");
        let b = root.path().join("b");
        let c = root.path().join("c.txt");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::set_permissions(&b, std::fs::Permissions::from_mode(0o300)).unwrap();

        let report = check_paths(&[a, b.clone()], std::slice::from_ref(&c), false, false);
        assert_eq!(
            report.faults(),
            &[
                PathFault {
                    path: b.clone(),
                    kind: FaultKind::NotReadable,
                },
                PathFault {
                    path: c.clone(),
                    kind: FaultKind::MissingFile,
                },
            ]
        );
        assert_eq!(
            report.to_message().unwrap(),
            format!(
                "Path not readable: {}\nFile does not exist: {}",
                b.display(),
                c.display()
            )
        );

        std::fs::set_permissions(&b, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn one_directory_can_accrue_both_access_faults() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let locked = root.path().join("locked");
        std::fs::create_dir_all(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o100)).unwrap();

        let report = check_paths(std::slice::from_ref(&locked), &[], false, false);
        assert_eq!(
            report.faults(),
            &[
                PathFault {
                    path: locked.clone(),
                    kind: FaultKind::NotReadable,
                },
                PathFault {
                    path: locked.clone(),
                    kind: FaultKind::NotWritable,
                },
            ]
        );

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn one_bad_path_never_blocks_the_rest() {
        let root = tempfile::tempdir().unwrap();

        // A regular file where the parent directory chain needs to go makes
        // provisioning fail for that entry with an unexpected I/O error.
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, "in the way").unwrap();
        let bad = blocker.join("sub/file.txt");
        let good = root.path().join("ok.txt");

        let report = check_paths(&[], &[bad.clone(), good.clone()], false, true);

        let faults = report.faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].path, bad);
        assert!(matches!(faults[0].kind, FaultKind::Io { .. }));

        // The entry after the failing one was still provisioned.
        assert!(good.is_file());
    }
}
