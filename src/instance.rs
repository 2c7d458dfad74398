use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SetupError, SetupResult};

/// File name of the service-topology document inside an
/// instance directory.
pub const COMPOSE_FILE: &str = "compose.yaml";
/// File name of the application-settings document.
pub const SETTINGS_FILE: &str = "settings.yaml";
/// Data directories owned by the running services.
pub const DATA_DIRS: [&str; 3] = ["data", "postgres-data", "minio-data"];

/// Default instance directory, relative to the working directory.
pub const DEFAULT_DIR: &str = "photodock";

/// Provisioning state of an instance directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    /// The directory does not exist.
    Absent,
    /// Both config documents and all data directories are present.
    Provisioned,
    /// The directory exists but the unit invariant does not hold.
    /// Carries the missing pieces, relative to the instance root.
    Partial(Vec<String>),
}

/// One provisioned deployment directory. An instance is a unit:
/// it holds both configuration documents and all three data
/// directories, or it is not considered provisioned.
#[derive(Debug, Clone)]
pub struct Instance {
    dir: PathBuf,
}

impl Instance {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Instance at the default location.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(DEFAULT_DIR)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn compose_path(&self) -> PathBuf {
        self.dir.join(COMPOSE_FILE)
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    #[must_use]
    pub fn data_dir(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Evaluate the unit invariant.
    #[must_use]
    pub fn state(&self) -> InstanceState {
        if !self.dir.exists() {
            return InstanceState::Absent;
        }

        let missing = missing_pieces(&self.dir);
        if missing.is_empty() {
            InstanceState::Provisioned
        } else {
            InstanceState::Partial(missing)
        }
    }

    /// Error unless the instance is fully provisioned. Partial
    /// state is refused rather than repaired; recovery semantics
    /// for a half-provisioned directory are undefined.
    pub fn require_provisioned(&self) -> SetupResult<()> {
        match self.state() {
            InstanceState::Provisioned => Ok(()),
            InstanceState::Absent => Err(SetupError::InstanceNotFound(self.dir.clone())),
            InstanceState::Partial(missing) => Err(SetupError::PartiallyProvisioned {
                dir: self.dir.clone(),
                missing: missing.join(", "),
            }),
        }
    }

    /// Create the instance directory and its data directories.
    pub fn create_skeleton(&self) -> SetupResult<()> {
        for data_dir in DATA_DIRS {
            fs::create_dir_all(self.data_dir(data_dir))?;
        }
        Ok(())
    }
}

/// Pieces of the unit (both config documents, three data
/// directories) missing under `dir`. Also used to vet backup
/// bundles, which mirror the instance layout.
#[must_use]
pub fn missing_pieces(dir: &Path) -> Vec<String> {
    let mut missing = Vec::new();
    for file in [COMPOSE_FILE, SETTINGS_FILE] {
        if !dir.join(file).is_file() {
            missing.push(file.to_string());
        }
    }
    for data_dir in DATA_DIRS {
        if !dir.join(data_dir).is_dir() {
            missing.push(format!("{data_dir}/"));
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn absent_when_missing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let instance = Instance::new(tmp.path().join("nope"));

        assert_eq!(instance.state(), InstanceState::Absent);
        assert!(matches!(
            instance.require_provisioned(),
            Err(SetupError::InstanceNotFound(_))
        ));
    }

    #[test]
    fn skeleton_alone_is_partial() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let instance = Instance::new(tmp.path().join("inst"));
        instance.create_skeleton().expect("skeleton");

        match instance.state() {
            InstanceState::Partial(missing) => {
                assert!(missing.contains(&COMPOSE_FILE.to_string()));
                assert!(missing.contains(&SETTINGS_FILE.to_string()));
            }
            other => panic!("expected partial, got {other:?}"),
        }
    }

    #[test]
    fn provisioned_when_unit_complete() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let instance = Instance::new(tmp.path().join("inst"));
        instance.create_skeleton().expect("skeleton");
        fs::write(instance.compose_path(), "services: {}\n").expect("compose");
        fs::write(instance.settings_path(), "db: {}\n").expect("settings");

        assert_eq!(instance.state(), InstanceState::Provisioned);
        assert!(instance.require_provisioned().is_ok());
    }

    #[test]
    fn partial_names_missing_data_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let instance = Instance::new(tmp.path().join("inst"));
        instance.create_skeleton().expect("skeleton");
        fs::write(instance.compose_path(), "services: {}\n").expect("compose");
        fs::write(instance.settings_path(), "db: {}\n").expect("settings");
        fs::remove_dir(instance.data_dir("minio-data")).expect("remove");

        match instance.require_provisioned() {
            Err(SetupError::PartiallyProvisioned { missing, .. }) => {
                assert_eq!(missing, "minio-data/");
            }
            other => panic!("expected partial error, got {other:?}"),
        }
    }
}
