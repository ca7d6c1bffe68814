use std::{env, fs, io};
use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

fn archive_path() -> PathBuf {
    let out_dir = env::var("OUT_DIR").unwrap();
    PathBuf::from(out_dir).join("skeleton.tar.gz")
}

fn compress_skeleton(res_dir: &Path) -> io::Result<()> {
    let tar_gz = File::create(archive_path())?;
    let enc = GzEncoder::new(tar_gz, Compression::default());
    let mut tar = tar::Builder::new(enc);
    tar.append_dir_all(".", res_dir)?;
    tar.finish()
}

fn main() {
    println!("cargo:rerun-if-changed=res");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let res_dir = PathBuf::from(&manifest_dir).join("res");

    let _ = fs::remove_file(archive_path());
    compress_skeleton(&res_dir).unwrap();
}
