use std::path::{Path, PathBuf};

use crate::CliOpts;

pub mod manifest;

pub const MANIFEST_FILE: &str = "package.json";

pub fn root_manifest_path(opts: &CliOpts) -> PathBuf {
    opts.root.join(MANIFEST_FILE)
}

pub fn package_manifest_path(opts: &CliOpts, folder: &Path) -> PathBuf {
    opts.root.join(folder).join(MANIFEST_FILE)
}
