use crate::core::fetch;
use crate::error::Result;
use crate::utils::fs::expand_tilde;

pub fn fetch_archive(url: &str, dest: &str, unzip: bool, delete_archive: bool) -> Result<()> {
    let dest_dir = expand_tilde(dest)?;
    fetch::fetch_archive(url, &dest_dir, unzip, delete_archive)
}
