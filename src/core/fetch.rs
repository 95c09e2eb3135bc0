use crate::error::{GroundworkError, Result};
use crate::utils::fs::ensure_dir_exists;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::Path;
use std::process::Command;
use tar::Archive;
use zip::ZipArchive;

/// Download an archive from `url` into `dest_dir`, optionally extracting it
/// there and deleting the archive afterward.
///
/// The local file name is the final path segment of the URL. Deletion only
/// happens after a successful extraction, so a failed extraction leaves the
/// downloaded archive in place even when `delete_archive` is set.
pub fn fetch_archive(url: &str, dest_dir: &Path, unzip: bool, delete_archive: bool) -> Result<()> {
    ensure_dir_exists(dest_dir)?;

    let name = archive_name_from_url(url)?;
    let archive_path = dest_dir.join(&name);

    println!("Downloading from {url}...");
    download_file(url, &archive_path)?;

    finish_archive(&archive_path, dest_dir, unzip, delete_archive)?;

    println!("Done.");
    Ok(())
}

/// Derive the local archive file name from the URL's final path segment,
/// ignoring any query string or fragment.
pub fn archive_name_from_url(url: &str) -> Result<String> {
    let without_suffix = url.split(['?', '#']).next().unwrap_or(url);
    let name = without_suffix.rsplit('/').next().unwrap_or("");

    if name.is_empty() {
        return Err(GroundworkError::InvalidUrl {
            url: url.to_string(),
        });
    }
    Ok(name.to_string())
}

fn download_file(url: &str, destination: &Path) -> Result<()> {
    let output = Command::new("curl")
        .arg("-L") // Follow redirects
        .arg("-f") // Fail on HTTP error status
        .arg("-s") // Silent
        .arg("-H")
        .arg("User-Agent: groundwork/0.2.0")
        .arg("-o")
        .arg(destination)
        .arg(url)
        .output()?;

    if !output.status.success() {
        return Err(GroundworkError::DownloadError {
            url: url.to_string(),
            status: output.status.code(),
        });
    }
    Ok(())
}

fn finish_archive(
    archive_path: &Path,
    dest_dir: &Path,
    unzip: bool,
    delete_archive: bool,
) -> Result<()> {
    if unzip {
        println!("Extracting to {}...", dest_dir.display());
        extract_archive(archive_path, dest_dir)?;
    }

    if delete_archive {
        std::fs::remove_file(archive_path)?;
        println!("Deleted archive: {}", archive_path.display());
    }

    Ok(())
}

pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    ensure_dir_exists(destination)?;

    let file_name = archive_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| GroundworkError::UnsupportedArchive {
            name: archive_path.display().to_string(),
        })?;

    if file_name.ends_with(".zip") {
        extract_zip(archive_path, destination)
    } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
        extract_tar_gz(archive_path, destination)
    } else {
        Err(GroundworkError::UnsupportedArchive {
            name: file_name.to_string(),
        })
    }
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|source| GroundworkError::BadArchive {
        path: archive_path.to_path_buf(),
        source,
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => continue,
        };

        if entry.name().ends_with('/') {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }
    Ok(())
}

fn extract_tar_gz(archive_path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);
    archive.unpack(destination)?;
    Ok(())
}
