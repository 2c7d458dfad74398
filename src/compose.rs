use docker_compose_types::{
    Command, Compose, ComposeNetworks, DependsCondition, DependsOnOptions, Environment,
    Healthcheck, HealthcheckTest, MapOrEmpty, NetworkSettings, Networks, Ports, Service, Services,
    Volumes,
};
use indexmap::IndexMap;

use crate::config::StackConfig;
use crate::secrets::StackSecrets;

const NETWORK: &str = "photodock-network";

/// Render the complete service-topology document for one
/// instance. Data directories and the settings document are bind
/// mounted from the instance directory, so the document is
/// self-contained relative to its own location.
#[must_use]
pub fn render(config: &StackConfig, secrets: &StackSecrets) -> String {
    let mut services = IndexMap::new();
    services.insert("postgres".to_string(), Some(postgres_service(config, secrets)));
    services.insert("minio".to_string(), Some(minio_service(config, secrets)));
    services.insert("api".to_string(), Some(api_service(config)));
    services.insert("web".to_string(), Some(web_service(config)));

    let compose = Compose {
        services: Services(services),
        networks: network(),
        ..Default::default()
    };

    serde_yaml::to_string(&compose).expect("failed to serialize compose")
}

fn postgres_service(config: &StackConfig, secrets: &StackSecrets) -> Service {
    Service {
        image: Some(config.postgres_image.clone()),
        container_name: Some("photodock-postgres".to_string()),
        restart: Some("unless-stopped".to_string()),
        environment: Environment::List(vec![
            "POSTGRES_USER=photodock".to_string(),
            format!("POSTGRES_PASSWORD={}", secrets.postgres_password),
            "POSTGRES_DB=photodock_db".to_string(),
        ]),
        volumes: vec![Volumes::Simple(
            "./postgres-data:/var/lib/postgresql/data".to_string(),
        )],
        healthcheck: Some(healthcheck(
            "pg_isready -U photodock -d photodock_db",
            "5s",
        )),
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

fn minio_service(config: &StackConfig, secrets: &StackSecrets) -> Service {
    Service {
        image: Some(config.minio_image.clone()),
        container_name: Some("photodock-minio".to_string()),
        restart: Some("unless-stopped".to_string()),
        command: Some(Command::Simple(
            "server /data --address :3200 --console-address :3201".to_string(),
        )),
        environment: Environment::List(vec![
            format!("MINIO_ROOT_USER={}", secrets.minio_user),
            format!("MINIO_ROOT_PASSWORD={}", secrets.minio_password),
        ]),
        ports: Ports::Short(vec![
            binding(config, config.minio_port, 3200),
            binding(config, config.minio_console_port, 3201),
        ]),
        volumes: vec![Volumes::Simple("./minio-data:/data".to_string())],
        healthcheck: Some(healthcheck(
            "mc ready local 2>/dev/null || curl -f http://localhost:3200/minio/health/live",
            "5s",
        )),
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

fn api_service(config: &StackConfig) -> Service {
    let mut depends = IndexMap::new();
    depends.insert("postgres".to_string(), DependsCondition::service_healthy());
    depends.insert("minio".to_string(), DependsCondition::service_healthy());

    Service {
        image: Some(config.api_image.clone()),
        container_name: Some("photodock-api".to_string()),
        restart: Some("unless-stopped".to_string()),
        ports: Ports::Short(vec![binding(config, config.api_port, 8080)]),
        volumes: vec![
            Volumes::Simple("./settings.yaml:/app/settings.yaml:ro".to_string()),
            Volumes::Simple("./data:/app/data".to_string()),
        ],
        healthcheck: Some(healthcheck("curl -f http://localhost:8080/ping", "10s")),
        depends_on: DependsOnOptions::Conditional(depends),
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

fn web_service(config: &StackConfig) -> Service {
    Service {
        image: Some(config.web_image.clone()),
        container_name: Some("photodock-web".to_string()),
        restart: Some("unless-stopped".to_string()),
        environment: Environment::List(vec![format!(
            "PHOTODOCK_API_ORIGIN=http://localhost:{}",
            config.api_port
        )]),
        ports: Ports::Short(vec![
            binding(config, config.web_port, 3000),
            binding(config, config.albums_port, 3001),
        ]),
        networks: Networks::Simple(vec![NETWORK.to_string()]),
        ..Default::default()
    }
}

/// Host port binding honoring the network-exposure flag.
fn binding(config: &StackConfig, host_port: u16, container_port: u16) -> String {
    format!("{}:{host_port}:{container_port}", config.bind_address())
}

fn healthcheck(cmd: &str, start_period: &str) -> Healthcheck {
    Healthcheck {
        test: Some(HealthcheckTest::Multiple(vec![
            "CMD".to_string(),
            "sh".to_string(),
            "-c".to_string(),
            cmd.to_string(),
        ])),
        interval: Some("30s".to_string()),
        timeout: Some("10s".to_string()),
        retries: 3,
        start_period: Some(start_period.to_string()),
        ..Default::default()
    }
}

fn network() -> ComposeNetworks {
    let mut nets = IndexMap::new();
    nets.insert(
        NETWORK.to_string(),
        MapOrEmpty::Map(NetworkSettings {
            driver: Some("bridge".to_string()),
            ..Default::default()
        }),
    );
    ComposeNetworks(nets)
}
