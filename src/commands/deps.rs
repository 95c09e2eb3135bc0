use crate::core::deps::{self, Apt};
use crate::error::{GroundworkError, Result};
use crate::utils::fs::expand_tilde;
use dialoguer::Confirm;

pub fn install_dependencies(file: &str, yes: bool, dry_run: bool) -> Result<()> {
    let path = expand_tilde(file)?;
    let backend = Apt::new()?;

    if dry_run {
        let resolved = deps::resolve_file(&path, &backend)?;
        if resolved.is_empty() {
            println!("No installable packages found in {}", path.display());
        } else {
            println!("Would install: {}", resolved.join(" "));
        }
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Install packages listed in {}?", path.display()))
            .default(true)
            .interact()
            .map_err(|e| GroundworkError::PromptError {
                message: e.to_string(),
            })?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    deps::install_from_file(&path, &backend)
}
