use std::thread;
use std::time::Duration;

use crate::cmd;
use crate::config::StackConfig;
use crate::error::{SetupError, SetupResult};
use crate::instance::Instance;
use crate::poll::{PollOutcome, Poller};
use crate::settings::Settings;

/// Check that docker and its compose plugin are available before
/// doing any provisioning work.
pub fn check_prerequisites() -> SetupResult<()> {
    if !cmd::command_exists("docker") {
        return Err(SetupError::PrerequisiteMissing(
            "docker is not installed or not on PATH".into(),
        ));
    }
    if !cmd::succeeds("docker", &["compose", "version"]) {
        return Err(SetupError::PrerequisiteMissing(
            "docker compose plugin is not available".into(),
        ));
    }
    Ok(())
}

/// Start the stack. Safe against an already-running stack; compose
/// reconciles running containers itself. The launch is detached
/// and callers gate on a readiness poll.
pub fn ensure_running(instance: &Instance) -> SetupResult<()> {
    let file = instance.compose_path();
    let file = file.to_string_lossy();

    eprintln!("Starting containers...");
    cmd::spawn_detached("docker", &["compose", "-f", &file, "up", "-d"])?;

    // Give compose a moment to create the containers before the
    // first probe lands.
    thread::sleep(Duration::from_secs(3));
    Ok(())
}

/// Stop the stack and wait for it to come down.
pub fn stop(instance: &Instance) -> SetupResult<()> {
    let file = instance.compose_path();
    let file = file.to_string_lossy();

    eprintln!("Stopping containers...");
    cmd::run_interactive("docker", &["compose", "-f", &file, "down"])
}

/// Container status passthrough.
pub fn status(instance: &Instance) -> SetupResult<()> {
    let file = instance.compose_path();
    let file = file.to_string_lossy();
    cmd::run_interactive("docker", &["compose", "-f", &file, "ps"])
}

/// Unauthenticated HTTP liveness gate for the API server.
#[must_use]
pub fn wait_for_api(config: &StackConfig) -> PollOutcome {
    let url = config.api_health_url();
    eprintln!("Waiting for the API server...");
    Poller::default().wait(|| cmd::succeeds("curl", &["-fsS", "-o", "/dev/null", &url]))
}

/// Authenticated handshake gate for the object-storage service:
/// registering a client alias only succeeds once MinIO accepts
/// authenticated requests.
#[must_use]
pub fn wait_for_storage(instance: &Instance, settings: &Settings) -> PollOutcome {
    let file = instance.compose_path();
    let file = file.to_string_lossy();
    let backend = &settings.storage.primary;

    eprintln!("Waiting for object storage...");
    Poller::default().wait(|| {
        cmd::succeeds(
            "docker",
            &[
                "compose",
                "-f",
                &file,
                "exec",
                "-T",
                "minio",
                "mc",
                "alias",
                "set",
                "local",
                "http://localhost:3200",
                &backend.key,
                &backend.secret,
            ],
        )
    })
}

/// Create the three storage buckets. Idempotent; existing buckets
/// are left untouched.
pub fn create_buckets(instance: &Instance, settings: &Settings) -> SetupResult<PollOutcome> {
    let outcome = wait_for_storage(instance, settings);
    if !outcome.is_ready() {
        return Ok(outcome);
    }

    let file = instance.compose_path();
    let file = file.to_string_lossy();

    for (name, backend) in settings.backends() {
        eprintln!("  creating bucket '{}' ({name})...", backend.bucket);
        let target = format!("local/{}", backend.bucket);
        cmd::run(
            "docker",
            &[
                "compose",
                "-f",
                &file,
                "exec",
                "-T",
                "minio",
                "mc",
                "mb",
                "--ignore-existing",
                &target,
            ],
        )?;
    }

    eprintln!("Buckets ready.");
    Ok(outcome)
}

/// Print the remediation hint for a storage readiness timeout.
/// A timeout is a warning, not a failure; the stack keeps starting
/// in the background.
pub fn report_storage_timeout() {
    eprintln!("WARNING: object storage did not come up within the deadline.");
    eprintln!("The containers may still be starting. Once they are up, run:");
    eprintln!("  photodock create-buckets");
}

/// Print the remediation hint for an API readiness timeout.
pub fn report_api_timeout(config: &StackConfig) {
    eprintln!("WARNING: the API server did not respond within the deadline.");
    eprintln!("Check progress with:");
    eprintln!("  photodock status");
    eprintln!("and retry {} once the containers are up.", config.api_health_url());
}
