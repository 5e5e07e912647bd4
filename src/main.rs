use std::{fmt::Display, path::PathBuf, process::exit};

use clap::{command, arg, Parser};
use error::PrepareError;
use plan::ReleasePlan;
use prepare::prepare;

mod assets;
mod checksum;
mod error;
mod inject;
mod metadata;
mod plan;
mod prepare;
mod vcs;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let opts = CliOpts::parse();

    log("Release preparation started");
    match run(&opts).await {
        Ok(res) => {
            log(format!("Release preparation completed: {res}"));
            exit(0)
        },
        Err(e) => {
            log(format!("Release preparation failed: {e}"));
            exit(-1)
        }
    }
}

async fn run(opts: &CliOpts) -> Result<prepare::PrepareResult, PrepareError> {
    let plan = ReleasePlan::load(&opts.plan).await
        .map_err(PrepareError::Plan)?;

    let commit = match &opts.commit {
        Some(commit) => commit.clone(),
        None => vcs::commit_hash(&opts.root).await
            .map_err(PrepareError::Revision)?,
    };

    if opts.dry_run {
        log("Dry run, nothing will be written");
    }

    prepare(opts, &plan, &commit).await
}

#[derive(Parser, Clone, Debug)]
#[command(author, version, about)]
struct CliOpts {
    #[arg(short, long, env, default_value = ".",
        help = "The project root containing the root package.json, LICENSE and NOTICE")]
    root: PathBuf,

    #[arg(short, long, env, default_value = "./dist-plan.json",
        help = "The release plan listing the packages to prepare")]
    plan: PathBuf,

    #[arg(short, long, env,
        help = "Commit hash to stamp. Defaults to `git rev-parse HEAD` in the project root")]
    commit: Option<String>,

    #[arg(short, long, env, default_value_t = false,
        help = "Resolve and log everything, but don't write manifests or copy files")]
    dry_run: bool,

    #[arg(long, env, default_value_t = false,
        help = "Don't compare checksums of copied files against their source")]
    no_verify: bool,

    #[arg(short, long, env, default_value_t = false,
        help = "Verbose logging. Prints every pinned dependency and copied file.")]
    verbose: bool,
}

fn now() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn log<M: Display>(msg: M) {
    println!("{} {msg}", now());
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    pub fn opts_for(root: &Path) -> CliOpts {
        CliOpts {
            root: root.to_path_buf(),
            plan: root.join("dist-plan.json"),
            commit: None,
            dry_run: false,
            no_verify: false,
            verbose: true,
        }
    }

    #[test]
    fn parses_flags() {
        let opts = CliOpts::try_parse_from(["distprep", "--root", "/repo", "--commit", "abc", "--dry-run", "--no-verify"]).unwrap();

        assert_eq!(opts.root, PathBuf::from("/repo"));
        assert_eq!(opts.commit.as_deref(), Some("abc"));
        assert!(opts.dry_run);
        assert!(opts.no_verify);
    }

    #[tokio::test]
    async fn run_fails_on_missing_plan() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = opts_for(dir.path());
        opts.commit = Some("abc".into());

        assert!(matches!(run(&opts).await, Err(PrepareError::Plan(_))));
    }
}
