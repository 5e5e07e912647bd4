use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::Deserialize;

use crate::{error::{ErrorKind, Result}, metadata::manifest::DependencyKind};

/// Which packages get prepared and what goes into each of them.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePlan {
    #[serde(default = "default_license_files")]
    pub license_files: Vec<PathBuf>,
    pub packages: Vec<PackagePlan>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PackagePlan {
    pub folder: PathBuf,
    #[serde(default)]
    pub dependencies: Vec<CompactString>,
    #[serde(default)]
    pub dev: bool,
    #[serde(default = "default_true")]
    pub stamp_commit: bool,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl PackagePlan {
    pub fn kind(&self) -> DependencyKind {
        DependencyKind::from_dev(self.dev)
    }
}

/// `from` is relative to the project root, `to` to the package folder.
#[derive(Deserialize, Debug)]
pub struct Artifact {
    pub from: PathBuf,
    pub to: PathBuf,
}

fn default_license_files() -> Vec<PathBuf> {
    vec!["LICENSE".into(), "NOTICE".into()]
}

fn default_true() -> bool {
    true
}

impl ReleasePlan {
    pub fn parse(data: &str) -> Result<Self> {
        let plan: ReleasePlan = serde_json::from_str(data)?;

        if plan.packages.is_empty() {
            return Err(ErrorKind::EmptyPlan)
        }

        if let Some(unnamed) = plan.license_files.iter().find(|l| l.file_name().is_none()) {
            return Err(ErrorKind::UnnamedLicenseFile(unnamed.clone()))
        }

        Ok(plan)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read_to_string(path).await
            .map_err(ErrorKind::at(path))?;

        Self::parse(&data)
    }
}
