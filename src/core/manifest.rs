use crate::error::{GroundworkError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Setup manifest structure matching the setup.toml format.
///
/// Every section is optional; an empty manifest applies nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetupManifest {
    #[serde(default)]
    pub paths: Option<PathsSection>,
    #[serde(default)]
    pub archives: Vec<ArchiveSection>,
    #[serde(default)]
    pub dependencies: Option<DependenciesSection>,
}

/// Directories and files to validate, with one shared provisioning switch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsSection {
    #[serde(default)]
    pub directories: Vec<PathBuf>,
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub create_missing: bool,
}

/// One archive to download and unpack.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveSection {
    pub url: String,
    pub dest: PathBuf,
    #[serde(default = "default_true")]
    pub unzip: bool,
    #[serde(default = "default_true")]
    pub delete_archive: bool,
}

/// Dependency list handed to the package installer.
#[derive(Debug, Clone, Deserialize)]
pub struct DependenciesSection {
    pub file: PathBuf,
}

fn default_true() -> bool {
    true
}

impl SetupManifest {
    /// Load a setup manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GroundworkError::manifest_error(format!(
                "Manifest not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a setup manifest from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: SetupManifest =
            toml::from_str(content).map_err(|e| GroundworkError::ManifestError {
                message: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        for archive in &self.archives {
            if archive.url.is_empty() {
                return Err(GroundworkError::manifest_error(
                    "Archive entry is missing a URL",
                ));
            }
        }
        Ok(())
    }
}
