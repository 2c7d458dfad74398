use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use photodock::{Instance, Settings, StackConfig, backup, lifecycle, setup};

#[derive(Parser, Debug)]
#[command(name = "photodock")]
#[command(about = "Provision and manage a self-hosted photo-storage stack", version)]
struct Cli {
    /// Skip interactive confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision a new instance, or start an existing one
    Setup {
        /// Instance directory (default: ./photodock)
        target_dir: Option<PathBuf>,

        /// Bind service ports on all interfaces instead of loopback
        #[arg(long)]
        public: bool,
    },

    /// Stop the stack and copy instance state to a backup path
    Backup {
        /// Absolute path for the backup bundle
        path: PathBuf,

        /// Instance directory (default: ./photodock)
        target_dir: Option<PathBuf>,
    },

    /// Recreate an instance from a backup bundle
    Restore {
        /// Absolute path of an existing backup bundle
        path: PathBuf,

        /// Destination instance directory (default: ./photodock)
        target_dir: Option<PathBuf>,
    },

    /// Create the object-storage buckets
    CreateBuckets {
        /// Instance directory (default: ./photodock)
        target_dir: Option<PathBuf>,
    },

    /// Show container status
    Status {
        /// Instance directory (default: ./photodock)
        target_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        std::process::exit(exit_for_parse_error(&err));
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Setup { target_dir, public }) => {
            let mut config = StackConfig::new();
            if public {
                config = config.expose_public();
            }
            let instance = instance_at(target_dir);
            setup::setup(&config, &instance, cli.yes)?;
        }

        Some(Command::Backup { path, target_dir }) => {
            let instance = instance_at(target_dir);
            let written = backup::backup(&instance, &path)?;
            println!("Backup written to {}", written.display());
        }

        Some(Command::Restore { path, target_dir }) => {
            let restored = backup::restore(&path, target_dir.as_deref())?;
            restored.relabel.report();
            println!("Restored instance at {}", restored.dir.display());
            eprintln!("Start it with: photodock setup {}", restored.dir.display());
        }

        Some(Command::CreateBuckets { target_dir }) => {
            let instance = instance_at(target_dir);
            instance.require_provisioned()?;
            let settings = Settings::load(&instance.settings_path())?;
            if !lifecycle::create_buckets(&instance, &settings)?.is_ready() {
                lifecycle::report_storage_timeout();
            }
        }

        Some(Command::Status { target_dir }) => {
            let instance = instance_at(target_dir);
            instance.require_provisioned()?;
            lifecycle::status(&instance)?;
        }

        // No subcommand: start the default instance.
        None => {
            let config = StackConfig::new();
            setup::start(&config, &Instance::default_location())?;
        }
    }

    Ok(())
}

fn instance_at(target_dir: Option<PathBuf>) -> Instance {
    target_dir.map_or_else(Instance::default_location, Instance::new)
}

/// Requested help or version output is a success; every real
/// usage error exits 1 like any other failure.
fn exit_for_parse_error(err: &clap::Error) -> i32 {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
