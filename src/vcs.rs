use std::path::Path;

use tokio::process::Command;

use crate::error::{ErrorKind, Result};

async fn run_git(args: &[&str], cwd: &Path) -> Result<String> {
    let out = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output().await?;

    if !out.status.success() {
        return Err(ErrorKind::Git {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }

    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// The revision currently checked out in `root`.
pub async fn commit_hash(root: &Path) -> Result<String> {
    let hash = run_git(&["rev-parse", "HEAD"], root).await?;

    if hash.is_empty() {
        return Err(ErrorKind::Git { args: "rev-parse HEAD".into(), stderr: "empty revision".into() })
    }

    Ok(hash)
}
