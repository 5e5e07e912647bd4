use std::{fmt::Display, path::Path};

use console::style;

use crate::{
    assets::copy_file,
    error::{ErrorKind, PrepareError},
    inject::inject,
    log,
    metadata::{manifest::{read_manifest, write_manifest, Manifest}, package_manifest_path, root_manifest_path},
    plan::{PackagePlan, ReleasePlan},
    CliOpts,
};

const TOTAL_STEPS: usize = 3;

#[derive(Default, Debug)]
pub struct PrepareResult {
    manifests: u64,
    files: u64,
    bytes: u64,
    pinned: u64,
}

impl Display for PrepareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} manifest updates, {} files copied ({} bytes), {} dependencies pinned",
            self.manifests, self.files, self.bytes, self.pinned))
    }
}

pub async fn prepare(opts: &CliOpts, plan: &ReleasePlan, commit: &str) -> Result<PrepareResult, PrepareError> {
    let mut result = PrepareResult::default();

    step(1, "Stamping commit");

    for package in plan.packages.iter().filter(|p| p.stamp_commit) {
        let path = package_manifest_path(opts, &package.folder);

        stamp_commit(opts, &path, commit).await
            .map_err(|e| PrepareError::Commit(path.clone(), e))?;

        result.manifests += 1;
    }

    step(2, "Copying assets");

    for package in &plan.packages {
        let (files, bytes) = copy_assets(opts, plan, package).await
            .map_err(|e| PrepareError::Copy(package.folder.clone(), e))?;

        result.files += files;
        result.bytes += bytes;
    }

    step(3, "Injecting dependencies");

    for package in &plan.packages {
        let path = package_manifest_path(opts, &package.folder);

        result.pinned += inject_package(opts, &path, package).await
            .map_err(|e| PrepareError::Inject(path.clone(), e))?;

        result.manifests += 1;
    }

    Ok(result)
}

fn step(n: usize, title: &str) {
    log(style(format!("[{n}/{TOTAL_STEPS}] {title}")).bold().cyan());
}

async fn stamp_commit(opts: &CliOpts, path: &Path, commit: &str) -> Result<(), ErrorKind> {
    log(format!("> update {} commit", path.display()));

    let mut manifest = read_manifest(path).await?;
    manifest.set("commit", commit);

    log(format!("  commit: {commit}"));

    persist(opts, path, &manifest).await
}

async fn copy_assets(opts: &CliOpts, plan: &ReleasePlan, package: &PackagePlan) -> Result<(u64, u64), ErrorKind> {
    let folder = opts.root.join(&package.folder);
    let mut files = 0;
    let mut bytes = 0;

    for artifact in &package.artifacts {
        bytes += copy_file(opts, &opts.root.join(&artifact.from), &folder.join(&artifact.to)).await?;
        files += 1;
    }

    for license in &plan.license_files {
        let name = license.file_name()
            .ok_or_else(|| ErrorKind::UnnamedLicenseFile(license.clone()))?;

        bytes += copy_file(opts, &opts.root.join(license), &folder.join(name)).await?;
        files += 1;
    }

    Ok((files, bytes))
}

/// Pins the package's dependencies and release fields to the root manifest. Returns how many were pinned.
async fn inject_package(opts: &CliOpts, path: &Path, package: &PackagePlan) -> Result<u64, ErrorKind> {
    log(format!("> update {} (injecting dependencies & version)", path.display()));

    let mut manifest = read_manifest(path).await?;
    let root = read_manifest(&root_manifest_path(opts)).await?;

    let injection = inject(&mut manifest, &root, package.dependencies.as_slice(), package.kind())?;

    if opts.verbose {
        for dep in &injection.resolved {
            log(format!("  using {}: {}@{} (into {})", dep.source.singular(), dep.name, dep.version, injection.kind));
        }
    }

    manifest.inherit_release_fields(&root);

    persist(opts, path, &manifest).await?;

    Ok(injection.resolved.len() as u64)
}

async fn persist(opts: &CliOpts, path: &Path, manifest: &Manifest) -> Result<(), ErrorKind> {
    if opts.dry_run {
        log(format!("  would write {}", path.display()));
        return Ok(())
    }

    write_manifest(path, manifest).await
}
