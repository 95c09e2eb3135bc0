use crate::commands;
use crate::core::fetch;
use crate::core::manifest::SetupManifest;
use crate::core::paths::check_paths;
use crate::error::Result;
use crate::utils::fs::expand_tilde;
use std::path::{Path, PathBuf};

/// Apply a setup manifest: paths first, then archives, then (only when
/// requested) the dependency list.
///
/// Returns whether the path scan came back clean. Path faults are printed
/// but do not stop the remaining sections; archive and dependency failures
/// are fatal and propagate.
pub fn apply_manifest(manifest_path: &str, install_deps: bool, yes: bool) -> Result<bool> {
    let manifest_path = expand_tilde(manifest_path)?;
    let manifest = SetupManifest::load(&manifest_path)?;

    // Relative manifest entries resolve against the manifest's directory.
    let base = match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut clean = true;

    if let Some(paths) = &manifest.paths {
        println!("Checking paths...");
        let dirs = rebase(&base, &paths.directories);
        let files = rebase(&base, &paths.files);
        let report = check_paths(&dirs, &files, paths.create_missing, paths.create_missing);
        match report.to_message() {
            None => println!("All paths ok"),
            Some(message) => {
                println!("{message}");
                clean = false;
            }
        }
    }

    for archive in &manifest.archives {
        fetch::fetch_archive(
            &archive.url,
            &base.join(&archive.dest),
            archive.unzip,
            archive.delete_archive,
        )?;
    }

    if install_deps {
        if let Some(dependencies) = &manifest.dependencies {
            let file = base.join(&dependencies.file);
            commands::deps::install_dependencies(&file.to_string_lossy(), yes, false)?;
        }
    }

    Ok(clean)
}

fn rebase(base: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().map(|path| base.join(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn apply_provisions_manifest_paths() {
        let root = tempfile::tempdir().unwrap();
        let manifest_path = root.path().join("setup.toml");
        std::fs::write(
            &manifest_path,
            r#"
[paths]
directories = ["data", "logs"]
files = ["config/app.toml"]
create_missing = true
"#,
        )
        .unwrap();

        let clean = apply_manifest(&manifest_path.to_string_lossy(), false, true).unwrap();

        assert!(clean);
        assert!(root.path().join("data").is_dir());
        assert!(root.path().join("logs").is_dir());
        assert!(root.path().join("config/app.toml").is_file());
    }

    #[test]
    fn apply_reports_faults_without_aborting() {
        let root = tempfile::tempdir().unwrap();
        let manifest_path = root.path().join("setup.toml");
        std::fs::write(
            &manifest_path,
            r#"
[paths]
directories = ["missing-a", "missing-b"]
"#,
        )
        .unwrap();

        let clean = apply_manifest(&manifest_path.to_string_lossy(), false, true).unwrap();
        assert!(!clean);
        // Nothing was provisioned, but the scan itself completed.
        assert!(!root.path().join("missing-a").exists());
    }
}
