use std::{fs, io};
use std::io::ErrorKind;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

/// Unpacks the embedded site skeleton into `out_dir`. The directory is
/// created if needed but must be empty; scaffolding never overwrites
/// existing files.
pub fn scaffold_site(out_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(out_dir)?;

    if fs::read_dir(out_dir)?.next().is_some() {
        return Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("Directory is not empty: {}", out_dir.display()),
        ));
    }

    let tar_gz = include_bytes!(concat!(env!("OUT_DIR"), "/skeleton.tar.gz"));
    let tar = GzDecoder::new(tar_gz.as_ref());
    let mut archive = Archive::new(tar);
    archive.unpack(out_dir)?;

    Ok(())
}
