use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::StackConfig;
use crate::error::SetupResult;
use crate::secrets::StackSecrets;

/// Names of the three object-storage backends, in bucket
/// creation order.
pub const BACKEND_NAMES: [&str; 3] = ["primary", "replica", "archive"];

/// The application-settings document consumed by the API server.
/// Written once at provisioning time with freshly generated
/// secrets; read back whenever a later command needs credentials
/// (e.g. bucket provisioning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub db: DbSettings,
    pub storage: StorageSettings,
    pub key: KeySettings,
    pub jwt: JwtSettings,
    pub cors: CorsSettings,
    pub admins: AdminSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

/// Three named storage targets. All point at the bundled MinIO
/// service in a stock deployment; operators repoint individual
/// backends at real providers by editing the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub primary: StorageBackend,
    pub replica: StorageBackend,
    pub archive: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageBackend {
    pub key: String,
    pub secret: String,
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySettings {
    pub encryption: String,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    #[serde(rename = "allowed-origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(rename = "user-ids")]
    pub user_ids: Vec<String>,
}

impl Settings {
    /// Materialize a settings document for a fresh instance.
    #[must_use]
    pub fn materialize(config: &StackConfig, secrets: &StackSecrets) -> Self {
        let backend = |bucket: &str| StorageBackend {
            key: secrets.minio_user.clone(),
            secret: secrets.minio_password.clone(),
            // In-network endpoint; containers resolve the service
            // name and the container-internal port, regardless of
            // the host port mapping.
            endpoint: "http://minio:3200".to_string(),
            region: "local".to_string(),
            bucket: bucket.to_string(),
        };

        Self {
            db: DbSettings {
                host: "postgres".to_string(),
                port: 5432,
                name: "photodock_db".to_string(),
                user: "photodock".to_string(),
                password: secrets.postgres_password.clone(),
            },
            storage: StorageSettings {
                primary: backend("primary"),
                replica: backend("replica"),
                archive: backend("archive"),
            },
            key: KeySettings {
                encryption: secrets.encryption_key.clone(),
                hash: secrets.hash_key.clone(),
            },
            jwt: JwtSettings {
                secret: secrets.jwt_secret.clone(),
            },
            cors: CorsSettings {
                allowed_origins: vec![
                    format!("http://localhost:{}", config.web_port),
                    format!("http://localhost:{}", config.albums_port),
                ],
            },
            admins: AdminSettings {
                user_ids: Vec::new(),
            },
        }
    }

    /// Render the document as YAML.
    pub fn render(&self) -> SetupResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the document, overwriting any existing file.
    pub fn write(&self, path: &Path) -> SetupResult<()> {
        fs::write(path, self.render()?)?;
        Ok(())
    }

    /// Load a previously written document.
    pub fn load(path: &Path) -> SetupResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// The backends in declaration order, paired with their names.
    #[must_use]
    pub fn backends(&self) -> [(&'static str, &StorageBackend); 3] {
        [
            ("primary", &self.storage.primary),
            ("replica", &self.storage.replica),
            ("archive", &self.storage.archive),
        ]
    }
}
