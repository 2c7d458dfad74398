use photodock::{Settings, StackConfig, StackSecrets};

fn materialized() -> Settings {
    let config = StackConfig::new();
    let secrets = StackSecrets {
        postgres_password: "pg-pass".into(),
        minio_user: "minio-user".into(),
        minio_password: "minio-pass".into(),
        jwt_secret: "jwt-secret".into(),
        encryption_key: "enc-key".into(),
        hash_key: "hash-key".into(),
    };
    Settings::materialize(&config, &secrets)
}

#[test]
fn db_block_points_at_compose_service() {
    let settings = materialized();

    assert_eq!(settings.db.host, "postgres");
    assert_eq!(settings.db.port, 5432);
    assert_eq!(settings.db.name, "photodock_db");
    assert_eq!(settings.db.user, "photodock");
    assert_eq!(settings.db.password, "pg-pass");
}

#[test]
fn three_backends_share_credentials() {
    let settings = materialized();

    for (name, backend) in settings.backends() {
        assert_eq!(backend.key, "minio-user", "backend {name}");
        assert_eq!(backend.secret, "minio-pass", "backend {name}");
        assert_eq!(backend.endpoint, "http://minio:3200", "backend {name}");
        assert_eq!(backend.region, "local", "backend {name}");
        assert_eq!(backend.bucket, name, "backend {name}");
    }
}

#[test]
fn cors_origins_follow_web_ports() {
    let config = StackConfig::new().web_port(4000).albums_port(4001);
    let secrets = StackSecrets::generate();
    let settings = Settings::materialize(&config, &secrets);

    assert_eq!(
        settings.cors.allowed_origins,
        vec!["http://localhost:4000", "http://localhost:4001"]
    );
}

#[test]
fn admins_start_empty() {
    assert!(materialized().admins.user_ids.is_empty());
}

#[test]
fn rendered_yaml_uses_hyphenated_keys() {
    let yaml = materialized().render().expect("render");

    assert!(yaml.contains("allowed-origins:"));
    assert!(yaml.contains("user-ids:"));
    assert!(yaml.contains("jwt:"));
    assert!(yaml.contains("secret: jwt-secret"));
    assert!(yaml.contains("encryption: enc-key"));
    assert!(yaml.contains("hash: hash-key"));
}

#[test]
fn write_then_load_round_trips() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("settings.yaml");

    let settings = materialized();
    settings.write(&path).expect("write");
    let loaded = Settings::load(&path).expect("load");

    assert_eq!(loaded.db.password, settings.db.password);
    assert_eq!(loaded.jwt.secret, settings.jwt.secret);
    assert_eq!(loaded.storage.archive.bucket, "archive");
    assert_eq!(loaded.cors.allowed_origins, settings.cors.allowed_origins);
}

#[test]
fn load_rejects_malformed_document() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("settings.yaml");
    std::fs::write(&path, "not: [valid").expect("write");

    assert!(Settings::load(&path).is_err());
}
