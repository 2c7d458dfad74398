use std::path::PathBuf;
use std::process::ExitStatus;

pub type SetupResult<T> = Result<T, SetupError>;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("command failed: {command}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("path must be absolute: {}", .0.display())]
    PathNotAbsolute(PathBuf),

    #[error("backup source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    DestinationAlreadyExists(PathBuf),

    #[error("backup bundle at {} is incomplete (missing: {missing})", .path.display())]
    IncompleteBundle { path: PathBuf, missing: String },

    #[error("instance at {} is partially provisioned (missing: {missing})", .dir.display())]
    PartiallyProvisioned { dir: PathBuf, missing: String },

    #[error("no instance found at {}", .0.display())]
    InstanceNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
