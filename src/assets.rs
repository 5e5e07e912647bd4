use std::path::Path;

use crate::{checksum::Checksum, error::{ErrorKind, Result}, log, CliOpts};

/// Copies `source` over `target`, creating parent directories. Returns the bytes copied.
///
/// In dry-run mode only the source is checked for existence.
pub async fn copy_file(opts: &CliOpts, source: &Path, target: &Path) -> Result<u64> {
    if opts.dry_run {
        let len = tokio::fs::metadata(source).await
            .map_err(ErrorKind::at(source))?
            .len();

        log(format!("  would copy {} -> {}", source.display(), target.display()));

        return Ok(len)
    }

    create_dirs(target).await?;

    let len = tokio::fs::copy(source, target).await
        .map_err(ErrorKind::at(source))?;

    verify_copy(opts, source, target).await?;

    if opts.verbose {
        log(format!("  copied {} -> {}", source.display(), target.display()));
    }

    Ok(len)
}

async fn verify_copy(opts: &CliOpts, source: &Path, target: &Path) -> Result<()> {
    if opts.no_verify {
        return Ok(())
    }

    Checksum::sha512_of_file(source).await?
        .verify_file(target).await
}

pub async fn create_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent_dir) = path.as_ref().parent() {
        if !parent_dir.exists() {
            tokio::fs::create_dir_all(parent_dir).await
                .map_err(ErrorKind::at(parent_dir))?;
        }
    }

    Ok(())
}
