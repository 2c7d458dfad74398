use crate::compose;
use crate::config::StackConfig;
use crate::error::SetupResult;
use crate::instance::{Instance, InstanceState};
use crate::lifecycle;
use crate::secrets::StackSecrets;
use crate::settings::Settings;

/// What `setup` does for a given instance state. Computed from
/// [`InstanceState`] alone, before anything touches the
/// filesystem or the container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    /// Start the stack; existing configuration stays untouched.
    StartExisting,
    /// Generate fresh configuration, then start.
    Provision,
    /// Partial state is refused outright.
    Refuse,
}

/// The provisioning decision: only an absent directory is ever
/// provisioned, so re-running setup can never overwrite an
/// existing configuration.
#[must_use]
pub const fn action_for(state: &InstanceState) -> SetupAction {
    match state {
        InstanceState::Provisioned => SetupAction::StartExisting,
        InstanceState::Absent => SetupAction::Provision,
        InstanceState::Partial(_) => SetupAction::Refuse,
    }
}

/// Provision a new instance, or start an existing one.
///
/// Re-running setup against a provisioned directory never touches
/// its configuration; it only starts the stack. A partially
/// provisioned directory is refused.
pub fn setup(config: &StackConfig, instance: &Instance, assume_yes: bool) -> SetupResult<()> {
    lifecycle::check_prerequisites()?;

    match action_for(&instance.state()) {
        SetupAction::StartExisting => {
            eprintln!(
                "Instance at '{}' already provisioned, starting it.",
                instance.dir().display()
            );
            start_existing(config, instance)
        }
        SetupAction::Refuse => instance.require_provisioned(),
        SetupAction::Provision => {
            if !assume_yes && !confirm(instance)? {
                eprintln!("Aborted.");
                return Ok(());
            }
            provision(config, instance)
        }
    }
}

/// Default-start: bring up the default instance, which must
/// already be provisioned.
pub fn start(config: &StackConfig, instance: &Instance) -> SetupResult<()> {
    lifecycle::check_prerequisites()?;
    instance.require_provisioned()?;
    start_existing(config, instance)
}

fn start_existing(config: &StackConfig, instance: &Instance) -> SetupResult<()> {
    lifecycle::ensure_running(instance)?;

    if !lifecycle::wait_for_api(config).is_ready() {
        lifecycle::report_api_timeout(config);
    }

    print_endpoints(config);
    Ok(())
}

fn provision(config: &StackConfig, instance: &Instance) -> SetupResult<()> {
    eprintln!("Provisioning new instance at '{}'...", instance.dir().display());

    instance.create_skeleton()?;

    let secrets = StackSecrets::generate();
    let settings = Settings::materialize(config, &secrets);

    eprintln!("Writing configuration...");
    std::fs::write(instance.compose_path(), compose::render(config, &secrets))?;
    settings.write(&instance.settings_path())?;

    lifecycle::ensure_running(instance)?;

    if !lifecycle::create_buckets(instance, &settings)?.is_ready() {
        lifecycle::report_storage_timeout();
    }

    if !lifecycle::wait_for_api(config).is_ready() {
        lifecycle::report_api_timeout(config);
    }

    print_endpoints(config);
    Ok(())
}

fn confirm(instance: &Instance) -> SetupResult<bool> {
    eprint!(
        "Provision a new instance in '{}'? [y/N] ",
        instance.dir().display()
    );
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Where everything ended up. Printed after every successful
/// setup or start.
pub fn print_endpoints(config: &StackConfig) {
    let host = if config.public { "<this-host>" } else { "localhost" };

    eprintln!();
    eprintln!("Stack is up. Endpoints:");
    eprintln!("  API:           http://{host}:{}", config.api_port);
    eprintln!("  Web:           http://{host}:{}", config.web_port);
    eprintln!("  Shared albums: http://{host}:{}", config.albums_port);
    eprintln!("  Storage API:   http://{host}:{}", config.minio_port);
    eprintln!(
        "  Storage UI:    http://{host}:{}",
        config.minio_console_port
    );
}
