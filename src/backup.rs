use std::fs;
use std::path::{Path, PathBuf};

use crate::cmd;
use crate::error::{SetupError, SetupResult};
use crate::instance::{COMPOSE_FILE, DATA_DIRS, DEFAULT_DIR, Instance, SETTINGS_FILE};
use crate::lifecycle;

/// Outcome of a best-effort step that must never fail the main
/// operation. Callers log it; they do not branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    Applied(String),
    Skipped { step: String, reason: String },
}

impl Advisory {
    /// One-line report for the CLI.
    pub fn report(&self) {
        match self {
            Self::Applied(step) => eprintln!("  {step}: done"),
            Self::Skipped { step, reason } => eprintln!("  {step}: skipped ({reason})"),
        }
    }
}

/// Result of a completed restore.
#[derive(Debug)]
pub struct Restored {
    pub dir: PathBuf,
    pub relabel: Advisory,
}

/// Stop the stack and copy the instance state into `target`.
/// Returns the absolute path of the written bundle.
pub fn backup(instance: &Instance, target: &Path) -> SetupResult<PathBuf> {
    require_absolute(target)?;
    instance.require_provisioned()?;

    lifecycle::stop(instance)?;
    copy_instance(instance, target)?;

    Ok(target.to_path_buf())
}

/// Copy the three data directories and both config documents into
/// `target`, preserving permission bits. No compression, no
/// checksums; the bundle is a plain mirror of the instance.
pub fn copy_instance(instance: &Instance, target: &Path) -> SetupResult<()> {
    fs::create_dir_all(target)?;

    for dir in DATA_DIRS {
        eprintln!("  copying {dir}/ ...");
        copy_tree(&instance.data_dir(dir), &target.join(dir))?;
    }
    for file in [COMPOSE_FILE, SETTINGS_FILE] {
        fs::copy(instance.dir().join(file), target.join(file))?;
    }

    Ok(())
}

/// Recreate an instance from a backup bundle.
///
/// Fails closed before touching the filesystem: the source must
/// be absolute, exist, and contain the complete instance unit,
/// and the destination directory must not exist. There are no
/// merge semantics.
pub fn restore(source: &Path, target_dir: Option<&Path>) -> SetupResult<Restored> {
    require_absolute(source)?;
    if !source.is_dir() {
        return Err(SetupError::SourceNotFound(source.to_path_buf()));
    }

    let dest = target_dir.unwrap_or(Path::new(DEFAULT_DIR));
    if dest.exists() {
        return Err(SetupError::DestinationAlreadyExists(dest.to_path_buf()));
    }

    // An incomplete bundle would restore into partial state the
    // user only discovers on the next setup; refuse it up front.
    let missing = crate::instance::missing_pieces(source);
    if !missing.is_empty() {
        return Err(SetupError::IncompleteBundle {
            path: source.to_path_buf(),
            missing: missing.join(", "),
        });
    }

    let instance = Instance::new(dest);
    instance.create_skeleton()?;

    for dir in DATA_DIRS {
        eprintln!("  restoring {dir}/ ...");
        copy_tree(&source.join(dir), &instance.data_dir(dir))?;
    }
    for file in [COMPOSE_FILE, SETTINGS_FILE] {
        fs::copy(source.join(file), instance.dir().join(file))?;
    }

    fix_permissions(&instance)?;
    let relabel = relabel_data_dirs(&instance);

    Ok(Restored {
        dir: dest.to_path_buf(),
        relabel,
    })
}

fn require_absolute(path: &Path) -> SetupResult<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(SetupError::PathNotAbsolute(path.to_path_buf()))
    }
}

/// Recursive copy preserving permission bits.
fn copy_tree(from: &Path, to: &Path) -> SetupResult<()> {
    fs::create_dir_all(to)?;
    fs::set_permissions(to, fs::metadata(from)?.permissions())?;

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let dest = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Re-apply the fixed permission bits the services expect.
/// PostgreSQL refuses to start on a world-readable data directory.
fn fix_permissions(instance: &Instance) -> SetupResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(
            instance.data_dir("postgres-data"),
            fs::Permissions::from_mode(0o700),
        )?;
        for dir in ["data", "minio-data"] {
            fs::set_permissions(instance.data_dir(dir), fs::Permissions::from_mode(0o755))?;
        }
    }
    #[cfg(not(unix))]
    let _ = instance;
    Ok(())
}

/// Apply container-friendly SELinux labels to the restored data
/// directories. Advisory: only meaningful on enforcing platforms,
/// so a missing tool or a failed relabel is reported, never fatal.
fn relabel_data_dirs(instance: &Instance) -> Advisory {
    let step = "SELinux relabel".to_string();

    if !cmd::command_exists("chcon") {
        return Advisory::Skipped {
            step,
            reason: "chcon not available".into(),
        };
    }

    for dir in DATA_DIRS {
        let path = instance.data_dir(dir);
        let path = path.to_string_lossy().to_string();
        if !cmd::succeeds("chcon", &["-Rt", "svirt_sandbox_file_t", &path]) {
            return Advisory::Skipped {
                step,
                reason: format!("relabeling {dir}/ failed"),
            };
        }
    }

    Advisory::Applied(step)
}
