use std::path::PathBuf;

use thiserror::Error;


pub type Result<T> = std::result::Result<T, ErrorKind>;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("loading release plan failed: {}", .0)]
    Plan(ErrorKind),

    #[error("resolving commit hash failed: {}", .0)]
    Revision(ErrorKind),

    #[error("stamping commit into {} failed: {}", .0.display(), .1)]
    Commit(PathBuf, ErrorKind),

    #[error("copying assets for {} failed: {}", .0.display(), .1)]
    Copy(PathBuf, ErrorKind),

    #[error("injecting dependencies into {} failed: {}", .0.display(), .1)]
    Inject(PathBuf, ErrorKind),
}

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("missing dependencies \"{}\"", .0.join("\", \""))]
    MissingDependencies(Vec<String>),

    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("release plan does not list any packages")]
    EmptyPlan,

    #[error("license file entry \"{}\" does not name a file", .0.display())]
    UnnamedLicenseFile(PathBuf),

    #[error("checksum mismatch for {}: expected {expected}, got {hash}", .path.display())]
    Checksum { path: PathBuf, expected: String, hash: String },

    #[error("git {args} failed: {stderr}")]
    Git { args: String, stderr: String },

    #[error("{}: {source}", .path.display())]
    Path { path: PathBuf, source: std::io::Error },

    #[error("io error: {}", .0)]
    Io(#[from]std::io::Error),

    #[error("deserializing failed: {}", .0)]
    Serde(#[from]serde_json::Error),
}

impl ErrorKind {
    pub fn at<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> ErrorKind {
        let path = path.into();
        move |source| ErrorKind::Path { path, source }
    }
}
